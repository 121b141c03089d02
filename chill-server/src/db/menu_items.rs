//! Menu item database operations

use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use sqlx::PgPool;

use crate::error::ServiceResult;

const MENU_ITEM_SELECT: &str = r#"
    SELECT m.id, m.category_id, c.name AS category_name, m.name, m.description,
           m.price, m.image_url,
           m.created_at AT TIME ZONE 'UTC' AS created_at,
           m.updated_at AT TIME ZONE 'UTC' AS updated_at
    FROM menu_items m
    JOIN menu_categories c ON c.id = m.category_id
"#;

pub async fn list(pool: &PgPool, category_id: Option<i32>) -> ServiceResult<Vec<MenuItem>> {
    let sql = format!(
        "{MENU_ITEM_SELECT} WHERE ($1::INT IS NULL OR m.category_id = $1) ORDER BY m.id"
    );
    let rows: Vec<MenuItem> = sqlx::query_as(&sql).bind(category_id).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> ServiceResult<Option<MenuItem>> {
    let sql = format!("{MENU_ITEM_SELECT} WHERE m.id = $1");
    let row: Option<MenuItem> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row)
}

pub async fn create(pool: &PgPool, data: &MenuItemCreate) -> ServiceResult<MenuItem> {
    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO menu_items (category_id, name, description, price, image_url)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(data.category_id)
    .bind(data.name.trim())
    .bind(&data.description)
    .bind(data.price)
    .bind(&data.image_url)
    .fetch_one(pool)
    .await?;

    let sql = format!("{MENU_ITEM_SELECT} WHERE m.id = $1");
    let item: MenuItem = sqlx::query_as(&sql).bind(id).fetch_one(pool).await?;
    Ok(item)
}

pub async fn update(pool: &PgPool, id: i32, data: &MenuItemUpdate) -> ServiceResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE menu_items SET
            category_id = $1, name = $2, description = $3, price = $4, image_url = $5,
            updated_at = (NOW() AT TIME ZONE 'UTC')
        WHERE id = $6
        "#,
    )
    .bind(data.category_id)
    .bind(data.name.trim())
    .bind(&data.description)
    .bind(data.price)
    .bind(&data.image_url)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Cart lines cascade; order lines keep their price with a NULL menu item
pub async fn delete(pool: &PgPool, id: i32) -> ServiceResult<bool> {
    let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
