//! Role database operations

use shared::models::{CLIENT_ROLE_ID, Role};
use sqlx::PgPool;

use super::GuardedDelete;
use crate::error::ServiceResult;

/// All roles except the built-in client role
pub async fn list_visible(pool: &PgPool) -> ServiceResult<Vec<Role>> {
    let rows: Vec<Role> = sqlx::query_as("SELECT id, name FROM roles WHERE id <> $1 ORDER BY id")
        .bind(CLIENT_ROLE_ID)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> ServiceResult<Option<Role>> {
    let row: Option<Role> = sqlx::query_as("SELECT id, name FROM roles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Name used by any role other than `except_id`
pub async fn name_taken(pool: &PgPool, name: &str, except_id: Option<i32>) -> ServiceResult<bool> {
    let (taken,): (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM roles WHERE name = $1 AND ($2::INT IS NULL OR id <> $2))",
    )
    .bind(name)
    .bind(except_id)
    .fetch_one(pool)
    .await?;
    Ok(taken)
}

pub async fn create(pool: &PgPool, name: &str) -> ServiceResult<Role> {
    let role: Role = sqlx::query_as("INSERT INTO roles (name) VALUES ($1) RETURNING id, name")
        .bind(name)
        .fetch_one(pool)
        .await?;
    Ok(role)
}

pub async fn update(pool: &PgPool, id: i32, name: &str) -> ServiceResult<bool> {
    let result = sqlx::query("UPDATE roles SET name = $1 WHERE id = $2")
        .bind(name)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete a role nobody holds.
///
/// The role row is locked first; assigning it to a user needs a key-share
/// lock on the same row, so no user can pick the role up between the
/// count and the delete.
pub async fn delete_unused(pool: &PgPool, id: i32) -> ServiceResult<GuardedDelete> {
    let mut tx = pool.begin().await?;

    let role: Option<(i32,)> = sqlx::query_as("SELECT id FROM roles WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    if role.is_none() {
        return Ok(GuardedDelete::Missing);
    }

    let (users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE role_id = $1")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    if users > 0 {
        return Ok(GuardedDelete::InUse(users));
    }

    sqlx::query("DELETE FROM roles WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(GuardedDelete::Deleted)
}
