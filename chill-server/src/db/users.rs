//! User database operations

use shared::models::{User, UserCreate, UserUpdate};
use sqlx::PgPool;

use crate::error::ServiceResult;

const USER_COLUMNS: &str = r#"
    u.id, u.login, u.full_name, u.phone, u.email, u.avatar_url, u.birth_date,
    u.role_id, r.name AS role_name,
    u.created_at AT TIME ZONE 'UTC' AS created_at
"#;

pub async fn list(pool: &PgPool) -> ServiceResult<Vec<User>> {
    let sql = format!(
        "SELECT {USER_COLUMNS} FROM users u LEFT JOIN roles r ON r.id = u.role_id ORDER BY u.id"
    );
    let rows: Vec<User> = sqlx::query_as(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> ServiceResult<Option<User>> {
    let sql = format!(
        "SELECT {USER_COLUMNS} FROM users u LEFT JOIN roles r ON r.id = u.role_id WHERE u.id = $1"
    );
    let row: Option<User> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row)
}

/// Stored credentials for a login or email
pub async fn find_credentials(
    pool: &PgPool,
    login_or_email: &str,
) -> ServiceResult<Option<(i32, Option<String>)>> {
    let row: Option<(i32, Option<String>)> = sqlx::query_as(
        r#"
        SELECT id, password_hash
        FROM users
        WHERE login = $1 OR LOWER(email) = LOWER($1)
        ORDER BY (login = $1) DESC
        LIMIT 1
        "#,
    )
    .bind(login_or_email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn login_taken(pool: &PgPool, login: &str) -> ServiceResult<bool> {
    let (taken,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE login = $1)")
        .bind(login)
        .fetch_one(pool)
        .await?;
    Ok(taken)
}

/// Email used by any user other than `except_id`
pub async fn email_taken(
    pool: &PgPool,
    email: &str,
    except_id: Option<i32>,
) -> ServiceResult<bool> {
    let (taken,): (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM users
            WHERE LOWER(email) = LOWER($1) AND ($2::INT IS NULL OR id <> $2)
        )
        "#,
    )
    .bind(email)
    .bind(except_id)
    .fetch_one(pool)
    .await?;
    Ok(taken)
}

pub async fn create(pool: &PgPool, data: &UserCreate, password_hash: &str) -> ServiceResult<User> {
    let sql = format!(
        r#"
        WITH u AS (
            INSERT INTO users (
                login, full_name, phone, email, avatar_url, birth_date, password_hash, role_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
        )
        SELECT {USER_COLUMNS} FROM u LEFT JOIN roles r ON r.id = u.role_id
        "#
    );
    let user: User = sqlx::query_as(&sql)
        .bind(data.login.trim())
        .bind(data.full_name.trim())
        .bind(data.phone.trim())
        .bind(data.email.as_deref().map(str::trim))
        .bind(&data.avatar_url)
        .bind(data.birth_date)
        .bind(password_hash)
        .bind(data.role_id)
        .fetch_one(pool)
        .await?;
    Ok(user)
}

/// Returns `false` when the user does not exist
pub async fn update(pool: &PgPool, id: i32, data: &UserUpdate) -> ServiceResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE users SET
            full_name = $1, phone = $2, email = $3, avatar_url = $4,
            birth_date = $5, role_id = $6
        WHERE id = $7
        "#,
    )
    .bind(data.full_name.trim())
    .bind(data.phone.trim())
    .bind(data.email.as_deref().map(str::trim))
    .bind(&data.avatar_url)
    .bind(data.birth_date)
    .bind(data.role_id)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Owned addresses, carts cascade; orders and reservations keep a NULL user
pub async fn delete(pool: &PgPool, id: i32) -> ServiceResult<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
