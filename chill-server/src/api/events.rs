//! Event API handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use shared::error::{AppError, ErrorCode};
use shared::models::{Event, EventCreate, EventUpdate};
use shared::validation::{MAX_NAME_LEN, MAX_URL_LEN, ensure_same_id, validate_required_text};

use super::{ApiResult, created, not_found};
use crate::db;
use crate::state::AppState;

/// Description has no upper bound (TEXT column)
fn validate(title: &str, description: &str, image_url: &str) -> Result<(), AppError> {
    validate_required_text(title, "title", MAX_NAME_LEN)?;
    validate_required_text(description, "description", usize::MAX)?;
    validate_required_text(image_url, "image_url", MAX_URL_LEN)?;
    Ok(())
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Event>> {
    let events = db::events::list(&state.pool).await?;
    Ok(Json(events))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Event> {
    let event = db::events::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ErrorCode::EventNotFound, id))?;
    Ok(Json(event))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<EventCreate>,
) -> Result<Response, AppError> {
    validate(&req.title, &req.description, &req.image_url)?;

    let event = db::events::create(&state.pool, &req).await?;
    tracing::info!(event_id = event.id, title = %event.title, "Event created");
    Ok(created("Events", event.id, event))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<EventUpdate>,
) -> Result<StatusCode, AppError> {
    ensure_same_id(id, req.id)?;
    validate(&req.title, &req.description, &req.image_url)?;

    if !db::events::update(&state.pool, id, &req).await? {
        return Err(not_found(ErrorCode::EventNotFound, id));
    }
    tracing::info!(event_id = id, "Event updated");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if !db::events::delete(&state.pool, id).await? {
        return Err(not_found(ErrorCode::EventNotFound, id));
    }
    tracing::info!(event_id = id, "Event deleted");
    Ok(StatusCode::NO_CONTENT)
}
