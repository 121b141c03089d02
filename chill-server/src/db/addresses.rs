//! Address database operations
//!
//! Writes that set `is_default` run in one transaction: the owning user row
//! is locked first, then every other default (or NULL) flag of that user is
//! cleared before the row itself is written.

use shared::models::{Address, AddressCreate, AddressUpdate};
use shared::rules::address::{DefaultFlag, addresses_to_reset};
use sqlx::{PgConnection, PgPool};

use crate::error::ServiceResult;

const ADDRESS_COLUMNS: &str = r#"
    id, user_id, address_text, COALESCE(is_default, FALSE) AS is_default,
    created_at AT TIME ZONE 'UTC' AS created_at
"#;

pub async fn list(pool: &PgPool, user_id: Option<i32>) -> ServiceResult<Vec<Address>> {
    let sql = format!(
        "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE ($1::INT IS NULL OR user_id = $1) ORDER BY id"
    );
    let rows: Vec<Address> = sqlx::query_as(&sql).bind(user_id).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> ServiceResult<Option<Address>> {
    let sql = format!("SELECT {ADDRESS_COLUMNS} FROM addresses WHERE id = $1");
    let row: Option<Address> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row)
}

/// Lock the user row; `false` if the user does not exist
async fn lock_user(conn: &mut PgConnection, user_id: i32) -> ServiceResult<bool> {
    let row: Option<(i32,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1 FOR UPDATE")
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.is_some())
}

/// Clear the default flag on the user's other addresses
async fn reset_defaults(
    conn: &mut PgConnection,
    user_id: i32,
    keep: Option<i32>,
) -> ServiceResult<Vec<i32>> {
    let flags: Vec<(i32, Option<bool>)> =
        sqlx::query_as("SELECT id, is_default FROM addresses WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&mut *conn)
            .await?;
    let flags: Vec<DefaultFlag> = flags
        .into_iter()
        .map(|(id, is_default)| DefaultFlag { id, is_default })
        .collect();

    let ids = addresses_to_reset(&flags, keep);
    if !ids.is_empty() {
        sqlx::query("UPDATE addresses SET is_default = FALSE WHERE id = ANY($1)")
            .bind(&ids)
            .execute(&mut *conn)
            .await?;
    }
    Ok(ids)
}

/// Insert an address. `None` when the user does not exist.
pub async fn create(pool: &PgPool, data: &AddressCreate) -> ServiceResult<Option<Address>> {
    let mut tx = pool.begin().await?;

    if !lock_user(&mut tx, data.user_id).await? {
        return Ok(None);
    }
    if data.is_default {
        let cleared = reset_defaults(&mut tx, data.user_id, None).await?;
        tracing::debug!(user_id = data.user_id, ?cleared, "Cleared previous default address");
    }

    let sql = format!(
        r#"
        INSERT INTO addresses (user_id, address_text, is_default)
        VALUES ($1, $2, $3)
        RETURNING {ADDRESS_COLUMNS}
        "#
    );
    let address: Address = sqlx::query_as(&sql)
        .bind(data.user_id)
        .bind(data.address_text.trim())
        .bind(data.is_default)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(Some(address))
}

/// Outcome of an address update
#[derive(Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    AddressMissing,
    UserMissing,
}

pub async fn update(pool: &PgPool, id: i32, data: &AddressUpdate) -> ServiceResult<UpdateOutcome> {
    let mut tx = pool.begin().await?;

    let current: Option<(i32,)> = sqlx::query_as("SELECT id FROM addresses WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    if current.is_none() {
        return Ok(UpdateOutcome::AddressMissing);
    }
    if !lock_user(&mut tx, data.user_id).await? {
        return Ok(UpdateOutcome::UserMissing);
    }
    if data.is_default {
        let cleared = reset_defaults(&mut tx, data.user_id, Some(id)).await?;
        tracing::debug!(user_id = data.user_id, ?cleared, "Cleared previous default address");
    }

    let result = sqlx::query(
        "UPDATE addresses SET user_id = $1, address_text = $2, is_default = $3 WHERE id = $4",
    )
    .bind(data.user_id)
    .bind(data.address_text.trim())
    .bind(data.is_default)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if result.rows_affected() == 0 {
        return Ok(UpdateOutcome::AddressMissing);
    }

    tx.commit().await?;
    Ok(UpdateOutcome::Updated)
}

pub async fn delete(pool: &PgPool, id: i32) -> ServiceResult<bool> {
    let result = sqlx::query("DELETE FROM addresses WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Owner of an address, if it exists
pub async fn owner(conn: &mut PgConnection, id: i32) -> ServiceResult<Option<i32>> {
    let row: Option<(i32,)> = sqlx::query_as("SELECT user_id FROM addresses WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.map(|(user_id,)| user_id))
}
