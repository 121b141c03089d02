//! Dining table database operations

use shared::models::Table;
use sqlx::PgPool;

use crate::error::ServiceResult;

pub async fn list(pool: &PgPool) -> ServiceResult<Vec<Table>> {
    let rows: Vec<Table> = sqlx::query_as("SELECT id, name FROM tables ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> ServiceResult<Option<Table>> {
    let row: Option<Table> = sqlx::query_as("SELECT id, name FROM tables WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Name used by any table other than `except_id`
pub async fn name_taken(pool: &PgPool, name: &str, except_id: Option<i32>) -> ServiceResult<bool> {
    let (taken,): (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM tables WHERE name = $1 AND ($2::INT IS NULL OR id <> $2))",
    )
    .bind(name)
    .bind(except_id)
    .fetch_one(pool)
    .await?;
    Ok(taken)
}

pub async fn create(pool: &PgPool, name: &str) -> ServiceResult<Table> {
    let row: Table = sqlx::query_as("INSERT INTO tables (name) VALUES ($1) RETURNING id, name")
        .bind(name)
        .fetch_one(pool)
        .await?;
    Ok(row)
}

pub async fn update(pool: &PgPool, id: i32, name: &str) -> ServiceResult<bool> {
    let result = sqlx::query("UPDATE tables SET name = $1 WHERE id = $2")
        .bind(name)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Reservations of the table cascade
pub async fn delete(pool: &PgPool, id: i32) -> ServiceResult<bool> {
    let result = sqlx::query("DELETE FROM tables WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
