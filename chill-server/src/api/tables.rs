//! Dining table API handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use shared::error::{AppError, ErrorCode};
use shared::models::{Table, TableCreate, TableUpdate};
use shared::validation::{MAX_TABLE_NAME_LEN, ensure_same_id, validate_required_text};

use super::{ApiResult, created, not_found};
use crate::db;
use crate::state::AppState;

async fn ensure_name_free(state: &AppState, name: &str, except_id: Option<i32>) -> Result<(), AppError> {
    if db::tables::name_taken(&state.pool, name, except_id).await? {
        return Err(AppError::new(ErrorCode::TableNameExists)
            .with_field("name")
            .with_detail("name", name));
    }
    Ok(())
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Table>> {
    let tables = db::tables::list(&state.pool).await?;
    Ok(Json(tables))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Table> {
    let table = db::tables::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ErrorCode::TableNotFound, id))?;
    Ok(Json(table))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<TableCreate>,
) -> Result<Response, AppError> {
    validate_required_text(&req.name, "name", MAX_TABLE_NAME_LEN)?;
    let name = req.name.trim();
    ensure_name_free(&state, name, None).await?;

    let table = db::tables::create(&state.pool, name).await?;
    tracing::info!(table_id = table.id, name = %table.name, "Table created");
    Ok(created("Tables", table.id, table))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<TableUpdate>,
) -> Result<StatusCode, AppError> {
    ensure_same_id(id, req.id)?;
    validate_required_text(&req.name, "name", MAX_TABLE_NAME_LEN)?;
    let name = req.name.trim();
    ensure_name_free(&state, name, Some(id)).await?;

    if !db::tables::update(&state.pool, id, name).await? {
        return Err(not_found(ErrorCode::TableNotFound, id));
    }
    tracing::info!(table_id = id, name = %name, "Table renamed");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if !db::tables::delete(&state.pool, id).await? {
        return Err(not_found(ErrorCode::TableNotFound, id));
    }
    tracing::info!(table_id = id, "Table deleted");
    Ok(StatusCode::NO_CONTENT)
}
