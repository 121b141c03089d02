//! Menu category database operations

use shared::models::MenuCategory;
use sqlx::PgPool;

use super::GuardedDelete;
use crate::error::ServiceResult;

pub async fn list(pool: &PgPool) -> ServiceResult<Vec<MenuCategory>> {
    let rows: Vec<MenuCategory> =
        sqlx::query_as("SELECT id, name, slug FROM menu_categories ORDER BY id")
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> ServiceResult<Option<MenuCategory>> {
    let row: Option<MenuCategory> =
        sqlx::query_as("SELECT id, name, slug FROM menu_categories WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row)
}

/// Which of name/slug are already used by another category
pub async fn find_duplicates(
    pool: &PgPool,
    name: &str,
    slug: &str,
    except_id: Option<i32>,
) -> ServiceResult<(bool, bool)> {
    let row: (bool, bool) = sqlx::query_as(
        r#"
        SELECT
            EXISTS(SELECT 1 FROM menu_categories WHERE name = $1 AND ($3::INT IS NULL OR id <> $3)),
            EXISTS(SELECT 1 FROM menu_categories WHERE slug = $2 AND ($3::INT IS NULL OR id <> $3))
        "#,
    )
    .bind(name)
    .bind(slug)
    .bind(except_id)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &PgPool, name: &str, slug: &str) -> ServiceResult<MenuCategory> {
    let row: MenuCategory = sqlx::query_as(
        "INSERT INTO menu_categories (name, slug) VALUES ($1, $2) RETURNING id, name, slug",
    )
    .bind(name)
    .bind(slug)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update(pool: &PgPool, id: i32, name: &str, slug: &str) -> ServiceResult<bool> {
    let result = sqlx::query("UPDATE menu_categories SET name = $1, slug = $2 WHERE id = $3")
        .bind(name)
        .bind(slug)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete a category without menu items, holding the category row lock
/// so no item can be filed under it meanwhile
pub async fn delete_empty(pool: &PgPool, id: i32) -> ServiceResult<GuardedDelete> {
    let mut tx = pool.begin().await?;

    let category: Option<(i32,)> =
        sqlx::query_as("SELECT id FROM menu_categories WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    if category.is_none() {
        return Ok(GuardedDelete::Missing);
    }

    let (items,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM menu_items WHERE category_id = $1")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    if items > 0 {
        return Ok(GuardedDelete::InUse(items));
    }

    sqlx::query("DELETE FROM menu_categories WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(GuardedDelete::Deleted)
}
