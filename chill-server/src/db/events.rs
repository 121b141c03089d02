//! Event database operations

use shared::models::{Event, EventCreate, EventUpdate};
use sqlx::PgPool;

use crate::error::ServiceResult;

const EVENT_COLUMNS: &str = r#"
    id, title, description, image_url,
    created_at AT TIME ZONE 'UTC' AS created_at,
    updated_at AT TIME ZONE 'UTC' AS updated_at
"#;

/// Newest first
pub async fn list(pool: &PgPool) -> ServiceResult<Vec<Event>> {
    let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC, id DESC");
    let rows: Vec<Event> = sqlx::query_as(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> ServiceResult<Option<Event>> {
    let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
    let row: Option<Event> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row)
}

pub async fn create(pool: &PgPool, data: &EventCreate) -> ServiceResult<Event> {
    let sql = format!(
        r#"
        INSERT INTO events (title, description, image_url)
        VALUES ($1, $2, $3)
        RETURNING {EVENT_COLUMNS}
        "#
    );
    let row: Event = sqlx::query_as(&sql)
        .bind(data.title.trim())
        .bind(&data.description)
        .bind(data.image_url.trim())
        .fetch_one(pool)
        .await?;
    Ok(row)
}

pub async fn update(pool: &PgPool, id: i32, data: &EventUpdate) -> ServiceResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE events SET
            title = $1, description = $2, image_url = $3,
            updated_at = (NOW() AT TIME ZONE 'UTC')
        WHERE id = $4
        "#,
    )
    .bind(data.title.trim())
    .bind(&data.description)
    .bind(data.image_url.trim())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &PgPool, id: i32) -> ServiceResult<bool> {
    let result = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
