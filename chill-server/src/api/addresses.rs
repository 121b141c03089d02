//! Address API handlers
//!
//! Flagging an address as default clears the flag on the user's other
//! addresses in the same transaction.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use shared::error::{AppError, ErrorCode};
use shared::models::{Address, AddressCreate, AddressQuery, AddressUpdate};
use shared::validation::{MAX_ADDRESS_LEN, validate_required_text};

use super::{ApiResult, created, not_found};
use crate::db;
use crate::db::addresses::UpdateOutcome;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<AddressQuery>,
) -> ApiResult<Vec<Address>> {
    let addresses = db::addresses::list(&state.pool, query.user_id).await?;
    Ok(Json(addresses))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Address> {
    let address = db::addresses::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ErrorCode::AddressNotFound, id))?;
    Ok(Json(address))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<AddressCreate>,
) -> Result<Response, AppError> {
    validate_required_text(&req.address_text, "address_text", MAX_ADDRESS_LEN)?;

    let address = db::addresses::create(&state.pool, &req)
        .await?
        .ok_or_else(|| AppError::reference_not_found("user_id", req.user_id))?;
    tracing::info!(
        address_id = address.id,
        user_id = address.user_id,
        is_default = address.is_default,
        "Address created"
    );
    Ok(created("Addresses", address.id, address))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<AddressUpdate>,
) -> Result<StatusCode, AppError> {
    validate_required_text(&req.address_text, "address_text", MAX_ADDRESS_LEN)?;

    match db::addresses::update(&state.pool, id, &req).await? {
        UpdateOutcome::Updated => {
            tracing::info!(address_id = id, user_id = req.user_id, "Address updated");
            Ok(StatusCode::NO_CONTENT)
        }
        UpdateOutcome::AddressMissing => Err(not_found(ErrorCode::AddressNotFound, id)),
        UpdateOutcome::UserMissing => Err(AppError::reference_not_found("user_id", req.user_id)),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if !db::addresses::delete(&state.pool, id).await? {
        return Err(not_found(ErrorCode::AddressNotFound, id));
    }
    tracing::info!(address_id = id, "Address deleted");
    Ok(StatusCode::NO_CONTENT)
}
