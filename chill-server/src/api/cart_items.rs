//! Cart item API handlers
//!
//! A cart holds at most one line per menu item: adding an item that is
//! already in the cart sums the quantities.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use shared::error::{AppError, ErrorCode};
use shared::models::{CartItem, CartItemCreate, CartItemQuery, CartItemUpdate};
use shared::validation::{ensure_same_id, validate_quantity};

use super::{ApiResult, created, not_found};
use crate::db;
use crate::db::cart_items::{AddOutcome, QuantityOutcome};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<CartItemQuery>,
) -> ApiResult<Vec<CartItem>> {
    let items = db::cart_items::list(&state.pool, query.cart_id).await?;
    Ok(Json(items))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<CartItem> {
    let item = db::cart_items::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ErrorCode::CartItemNotFound, id))?;
    Ok(Json(item))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CartItemCreate>,
) -> Result<Response, AppError> {
    validate_quantity(req.quantity)?;

    let outcome =
        db::cart_items::add(&state.pool, req.cart_id, req.menu_item_id, req.quantity).await?;
    let item = match outcome {
        AddOutcome::Created(item) => {
            tracing::info!(cart_id = item.cart_id, item_id = item.id, "Cart item added");
            item
        }
        AddOutcome::Merged(item) => {
            tracing::info!(
                cart_id = item.cart_id,
                item_id = item.id,
                quantity = item.quantity,
                "Cart item merged"
            );
            item
        }
        AddOutcome::CartMissing => {
            return Err(AppError::reference_not_found("cart_id", req.cart_id));
        }
        AddOutcome::MenuItemMissing => {
            return Err(AppError::reference_not_found("menu_item_id", req.menu_item_id));
        }
    };
    Ok(created("CartItems", item.id, item))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<CartItemUpdate>,
) -> Result<StatusCode, AppError> {
    ensure_same_id(id, req.id)?;
    // Zero or less removes the line
    if req.quantity > 0 {
        validate_quantity(req.quantity)?;
    }

    match db::cart_items::set_quantity(&state.pool, id, req.quantity).await? {
        QuantityOutcome::Updated => {
            tracing::info!(item_id = id, quantity = req.quantity, "Cart item quantity changed");
        }
        QuantityOutcome::Removed => {
            tracing::info!(item_id = id, "Cart item removed (quantity <= 0)");
        }
        QuantityOutcome::Missing => return Err(not_found(ErrorCode::CartItemNotFound, id)),
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if !db::cart_items::delete(&state.pool, id).await? {
        return Err(not_found(ErrorCode::CartItemNotFound, id));
    }
    tracing::info!(item_id = id, "Cart item deleted");
    Ok(StatusCode::NO_CONTENT)
}
