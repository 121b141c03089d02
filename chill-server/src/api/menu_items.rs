//! Menu item API handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{MenuItem, MenuItemCreate, MenuItemQuery, MenuItemUpdate};
use shared::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, ensure_same_id, validate_optional_text,
    validate_price, validate_required_text,
};

use super::{ApiResult, created, not_found};
use crate::db::{self, Entity, row_exists};
use crate::state::AppState;

fn validate(
    name: &str,
    description: &Option<String>,
    price: Decimal,
    image_url: &Option<String>,
) -> Result<(), AppError> {
    validate_required_text(name, "name", MAX_NAME_LEN)?;
    validate_optional_text(description, "description", MAX_NOTE_LEN)?;
    validate_price(price)?;
    validate_optional_text(image_url, "image_url", MAX_URL_LEN)?;
    Ok(())
}

async fn ensure_category_exists(state: &AppState, category_id: i32) -> Result<(), AppError> {
    if !row_exists(&state.pool, Entity::MenuCategory, category_id).await? {
        return Err(AppError::reference_not_found("category_id", category_id));
    }
    Ok(())
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<MenuItemQuery>,
) -> ApiResult<Vec<MenuItem>> {
    let items = db::menu_items::list(&state.pool, query.category_id).await?;
    Ok(Json(items))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<MenuItem> {
    let item = db::menu_items::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ErrorCode::MenuItemNotFound, id))?;
    Ok(Json(item))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<MenuItemCreate>,
) -> Result<Response, AppError> {
    validate(&req.name, &req.description, req.price, &req.image_url)?;
    ensure_category_exists(&state, req.category_id).await?;

    let item = db::menu_items::create(&state.pool, &req).await?;
    tracing::info!(
        menu_item_id = item.id,
        category_id = item.category_id,
        price = %item.price,
        "Menu item created"
    );
    Ok(created("MenuItems", item.id, item))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<MenuItemUpdate>,
) -> Result<StatusCode, AppError> {
    ensure_same_id(id, req.id)?;
    validate(&req.name, &req.description, req.price, &req.image_url)?;
    ensure_category_exists(&state, req.category_id).await?;

    if !db::menu_items::update(&state.pool, id, &req).await? {
        return Err(not_found(ErrorCode::MenuItemNotFound, id));
    }
    tracing::info!(menu_item_id = id, price = %req.price, "Menu item updated");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if !db::menu_items::delete(&state.pool, id).await? {
        return Err(not_found(ErrorCode::MenuItemNotFound, id));
    }
    tracing::info!(menu_item_id = id, "Menu item deleted");
    Ok(StatusCode::NO_CONTENT)
}
