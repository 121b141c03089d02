//! Order API handlers
//!
//! POST  /api/Orders             — place an order (server-side prices and total)
//! PATCH /api/Orders/{id}/status — move the order along its lifecycle

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderCreate, OrderQuery, OrderStatus, OrderStatusUpdate};
use shared::validation::validate_quantity;

use super::{ApiResult, created, not_found};
use crate::db;
use crate::state::AppState;

fn parse_status(raw: &str) -> Result<OrderStatus, AppError> {
    raw.parse::<OrderStatus>().map_err(|e| {
        AppError::new(ErrorCode::OrderStatusInvalid)
            .with_field("status")
            .with_detail("status", e.0)
    })
}

fn validate_items(req: &OrderCreate) -> Result<(), AppError> {
    if req.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty).with_field("items"));
    }
    for item in &req.items {
        validate_quantity(item.quantity)
            .map_err(|e| e.with_detail("menu_item_id", item.menu_item_id))?;
    }
    Ok(())
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<OrderQuery>,
) -> ApiResult<Vec<Order>> {
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(parse_status)
        .transpose()?;
    let orders = db::orders::list(&state.pool, query.user_id, status).await?;
    Ok(Json(orders))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Order> {
    let order = db::orders::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ErrorCode::OrderNotFound, id))?;
    Ok(Json(order))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<OrderCreate>,
) -> Result<Response, AppError> {
    validate_items(&req)?;

    let order = db::orders::create(&state.pool, &req).await?;
    Ok(created("Orders", order.id, order))
}

/// Returns the order after the change
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<OrderStatusUpdate>,
) -> ApiResult<Order> {
    let next = parse_status(&req.status)?;

    let previous = db::orders::update_status(&state.pool, id, next).await?;
    tracing::info!(order_id = id, from = %previous, to = %next, "Order status changed");

    let order = db::orders::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ErrorCode::OrderNotFound, id))?;
    Ok(Json(order))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if !db::orders::delete(&state.pool, id).await? {
        return Err(not_found(ErrorCode::OrderNotFound, id));
    }
    tracing::info!(order_id = id, "Order deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::OrderItemCreate;

    fn order(items: Vec<OrderItemCreate>) -> OrderCreate {
        OrderCreate {
            user_id: 1,
            address_id: 1,
            total_price: None,
            items,
        }
    }

    fn line(menu_item_id: i32, quantity: i32) -> OrderItemCreate {
        OrderItemCreate {
            menu_item_id,
            quantity,
            price_at_order: None,
        }
    }

    #[test]
    fn test_empty_order_rejected() {
        let err = validate_items(&order(vec![])).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderEmpty);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let err = validate_items(&order(vec![line(1, 2), line(7, 0)])).unwrap_err();
        assert_eq!(err.code, ErrorCode::QuantityInvalid);
        let details = err.details.unwrap();
        assert_eq!(details["menu_item_id"], 7);
    }

    #[test]
    fn test_parse_status_error_code() {
        assert_eq!(parse_status("Confirmed").unwrap(), OrderStatus::Confirmed);
        assert_eq!(
            parse_status("shipped").unwrap_err().code,
            ErrorCode::OrderStatusInvalid
        );
    }
}
