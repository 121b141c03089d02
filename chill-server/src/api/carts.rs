//! Cart API handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use shared::error::{AppError, ErrorCode};
use shared::models::{Cart, CartCreate, CartQuery, CartUpdate};
use shared::validation::ensure_same_id;

use super::{ApiResult, created, not_found};
use crate::db::{self, Entity, row_exists};
use crate::state::AppState;

async fn ensure_user_exists(state: &AppState, user_id: i32) -> Result<(), AppError> {
    if !row_exists(&state.pool, Entity::User, user_id).await? {
        return Err(AppError::reference_not_found("user_id", user_id));
    }
    Ok(())
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<CartQuery>,
) -> ApiResult<Vec<Cart>> {
    let carts = db::carts::list(&state.pool, query.user_id).await?;
    Ok(Json(carts))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Cart> {
    let cart = db::carts::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ErrorCode::CartNotFound, id))?;
    Ok(Json(cart))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CartCreate>,
) -> Result<Response, AppError> {
    ensure_user_exists(&state, req.user_id).await?;
    // FK violation still covers a user deleted in between
    let cart = db::carts::create(&state.pool, req.user_id).await?;
    tracing::info!(cart_id = cart.id, user_id = cart.user_id, "Cart created");
    Ok(created("Carts", cart.id, cart))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<CartUpdate>,
) -> Result<StatusCode, AppError> {
    ensure_same_id(id, req.id)?;
    ensure_user_exists(&state, req.user_id).await?;

    if !db::carts::update(&state.pool, id, req.user_id).await? {
        return Err(not_found(ErrorCode::CartNotFound, id));
    }
    tracing::info!(cart_id = id, user_id = req.user_id, "Cart reassigned");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if !db::carts::delete(&state.pool, id).await? {
        return Err(not_found(ErrorCode::CartNotFound, id));
    }
    tracing::info!(cart_id = id, "Cart deleted");
    Ok(StatusCode::NO_CONTENT)
}
