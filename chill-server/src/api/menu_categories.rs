//! Menu category API handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use shared::error::{AppError, ErrorCode};
use shared::models::{MenuCategory, MenuCategoryCreate, MenuCategoryUpdate};
use shared::validation::{MAX_SHORT_NAME_LEN, ensure_same_id, validate_required_text, validate_slug};

use super::{ApiResult, created, not_found};
use crate::db;
use crate::db::GuardedDelete;
use crate::state::AppState;

fn validate(name: &str, slug: &str) -> Result<(), AppError> {
    validate_required_text(name, "name", MAX_SHORT_NAME_LEN)?;
    validate_slug(slug)?;
    Ok(())
}

async fn ensure_unique(
    state: &AppState,
    name: &str,
    slug: &str,
    except_id: Option<i32>,
) -> Result<(), AppError> {
    let (name_taken, slug_taken) =
        db::menu_categories::find_duplicates(&state.pool, name, slug, except_id).await?;
    if name_taken {
        return Err(AppError::new(ErrorCode::CategoryNameExists)
            .with_field("name")
            .with_detail("name", name));
    }
    if slug_taken {
        return Err(AppError::new(ErrorCode::CategorySlugExists)
            .with_field("slug")
            .with_detail("slug", slug));
    }
    Ok(())
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<MenuCategory>> {
    let categories = db::menu_categories::list(&state.pool).await?;
    Ok(Json(categories))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<MenuCategory> {
    let category = db::menu_categories::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ErrorCode::CategoryNotFound, id))?;
    Ok(Json(category))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<MenuCategoryCreate>,
) -> Result<Response, AppError> {
    let name = req.name.trim();
    let slug = req.slug.trim();
    validate(name, slug)?;
    ensure_unique(&state, name, slug, None).await?;

    let category = db::menu_categories::create(&state.pool, name, slug).await?;
    tracing::info!(category_id = category.id, slug = %category.slug, "Menu category created");
    Ok(created("MenuCategories", category.id, category))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<MenuCategoryUpdate>,
) -> Result<StatusCode, AppError> {
    ensure_same_id(id, req.id)?;
    let name = req.name.trim();
    let slug = req.slug.trim();
    validate(name, slug)?;
    ensure_unique(&state, name, slug, Some(id)).await?;

    if !db::menu_categories::update(&state.pool, id, name, slug).await? {
        return Err(not_found(ErrorCode::CategoryNotFound, id));
    }
    tracing::info!(category_id = id, "Menu category updated");
    Ok(StatusCode::NO_CONTENT)
}

fn category_delete_result(id: i32, outcome: GuardedDelete) -> Result<(), AppError> {
    match outcome {
        GuardedDelete::Deleted => Ok(()),
        GuardedDelete::Missing => Err(not_found(ErrorCode::CategoryNotFound, id)),
        GuardedDelete::InUse(items) => Err(AppError::new(ErrorCode::CategoryHasItems)
            .with_detail("id", id)
            .with_detail("items", items)),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let outcome = db::menu_categories::delete_empty(&state.pool, id).await?;
    if let GuardedDelete::InUse(items) = outcome {
        tracing::warn!(category_id = id, items, "Refusing to delete non-empty category");
    }
    category_delete_result(id, outcome)?;
    tracing::info!(category_id = id, "Menu category deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_category() {
        assert!(validate("Drinks", "drinks").is_ok());
        assert!(validate("Hot dishes", "hot-dishes-2").is_ok());
        assert_eq!(validate("", "x").unwrap_err().code, ErrorCode::ValidationFailed);
        assert_eq!(
            validate("Drinks", "Drinks!").unwrap_err().code,
            ErrorCode::CategorySlugInvalid
        );
    }

    #[test]
    fn test_category_with_items_is_kept() {
        let err = category_delete_result(2, GuardedDelete::InUse(5)).unwrap_err();
        assert_eq!(err.code, ErrorCode::CategoryHasItems);
        assert_eq!(err.http_status(), StatusCode::CONFLICT);
        assert!(category_delete_result(2, GuardedDelete::Deleted).is_ok());
    }
}
