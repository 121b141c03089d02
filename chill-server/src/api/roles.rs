//! Role API handlers
//!
//! The built-in client role is hidden from every endpoint.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use shared::error::{AppError, ErrorCode};
use shared::models::{CLIENT_ROLE_ID, Role, RoleCreate, RoleUpdate};
use shared::validation::{MAX_SHORT_NAME_LEN, ensure_same_id, validate_required_text};

use super::{ApiResult, created, not_found};
use crate::db;
use crate::db::GuardedDelete;
use crate::state::AppState;

fn reject_client_role(id: i32) -> Result<(), AppError> {
    if id == CLIENT_ROLE_ID {
        return Err(AppError::new(ErrorCode::RoleIsSystem).with_detail("id", id));
    }
    Ok(())
}

async fn ensure_name_free(state: &AppState, name: &str, except_id: Option<i32>) -> Result<(), AppError> {
    if db::roles::name_taken(&state.pool, name, except_id).await? {
        return Err(AppError::new(ErrorCode::RoleNameExists)
            .with_field("name")
            .with_detail("name", name));
    }
    Ok(())
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Role>> {
    let roles = db::roles::list_visible(&state.pool).await?;
    Ok(Json(roles))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Role> {
    reject_client_role(id)?;
    let role = db::roles::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ErrorCode::RoleNotFound, id))?;
    Ok(Json(role))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<RoleCreate>,
) -> Result<Response, AppError> {
    validate_required_text(&req.name, "name", MAX_SHORT_NAME_LEN)?;
    let name = req.name.trim();
    ensure_name_free(&state, name, None).await?;

    let role = db::roles::create(&state.pool, name).await?;
    tracing::info!(role_id = role.id, name = %role.name, "Role created");
    Ok(created("Roles", role.id, role))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<RoleUpdate>,
) -> Result<StatusCode, AppError> {
    ensure_same_id(id, req.id)?;
    reject_client_role(id)?;
    validate_required_text(&req.name, "name", MAX_SHORT_NAME_LEN)?;
    let name = req.name.trim();
    ensure_name_free(&state, name, Some(id)).await?;

    if !db::roles::update(&state.pool, id, name).await? {
        return Err(not_found(ErrorCode::RoleNotFound, id));
    }
    tracing::info!(role_id = id, "Role updated");
    Ok(StatusCode::NO_CONTENT)
}

/// Map a guarded delete to the client error, if any
fn role_delete_result(id: i32, outcome: GuardedDelete) -> Result<(), AppError> {
    match outcome {
        GuardedDelete::Deleted => Ok(()),
        GuardedDelete::Missing => Err(not_found(ErrorCode::RoleNotFound, id)),
        GuardedDelete::InUse(users) => Err(AppError::new(ErrorCode::RoleInUse)
            .with_detail("id", id)
            .with_detail("users", users)),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    reject_client_role(id)?;

    let outcome = db::roles::delete_unused(&state.pool, id).await?;
    if let GuardedDelete::InUse(users) = outcome {
        tracing::warn!(role_id = id, users, "Refusing to delete role in use");
    }
    role_delete_result(id, outcome)?;
    tracing::info!(role_id = id, "Role deleted");
    Ok(StatusCode::NO_CONTENT)
}
