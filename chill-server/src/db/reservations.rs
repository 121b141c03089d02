//! Table reservation database operations
//!
//! Writes lock the target table row (`SELECT ... FOR UPDATE`) before the
//! overlap scan, so two requests for the same table cannot both pass the
//! check and insert overlapping slots.

use chrono::{DateTime, NaiveDateTime, Utc};
use shared::error::{AppError, ErrorCode};
use shared::models::TableReservation;
use shared::rules::reservation::{ReservationWindow, conflict_error, find_conflict};
use shared::util::{from_db_time, to_db_time};
use sqlx::{PgConnection, PgPool};

use super::{Entity, row_exists};
use crate::error::ServiceResult;

const RESERVATION_SELECT: &str = r#"
    SELECT r.id, r.table_id, t.name AS table_name, r.user_id,
           r.reservation_time AT TIME ZONE 'UTC' AS reservation_time,
           r.duration_minutes, r.comment,
           r.created_at AT TIME ZONE 'UTC' AS created_at
    FROM table_reservations r
    JOIN tables t ON t.id = r.table_id
"#;

/// Validated reservation fields to store
#[derive(Debug, Clone)]
pub struct ReservationInput<'a> {
    pub table_id: i32,
    pub user_id: Option<i32>,
    pub start: DateTime<Utc>,
    pub duration_minutes: i32,
    pub comment: Option<&'a str>,
}

impl ReservationInput<'_> {
    fn window(&self, id: Option<i32>) -> ReservationWindow {
        ReservationWindow::new(id, self.start, self.duration_minutes)
    }
}

pub async fn list(
    pool: &PgPool,
    table_id: Option<i32>,
    user_id: Option<i32>,
) -> ServiceResult<Vec<TableReservation>> {
    let sql = format!(
        r#"
        {RESERVATION_SELECT}
        WHERE ($1::INT IS NULL OR r.table_id = $1)
          AND ($2::INT IS NULL OR r.user_id = $2)
        ORDER BY r.reservation_time, r.id
        "#
    );
    let rows: Vec<TableReservation> = sqlx::query_as(&sql)
        .bind(table_id)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> ServiceResult<Option<TableReservation>> {
    let sql = format!("{RESERVATION_SELECT} WHERE r.id = $1");
    let row: Option<TableReservation> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row)
}

/// Lock the table and check the referenced rows
async fn lock_references(conn: &mut PgConnection, input: &ReservationInput<'_>) -> ServiceResult<()> {
    let table: Option<(i32,)> = sqlx::query_as("SELECT id FROM tables WHERE id = $1 FOR UPDATE")
        .bind(input.table_id)
        .fetch_optional(&mut *conn)
        .await?;
    if table.is_none() {
        return Err(AppError::reference_not_found("table_id", input.table_id).into());
    }
    if let Some(user_id) = input.user_id
        && !row_exists(&mut *conn, Entity::User, user_id).await?
    {
        return Err(AppError::reference_not_found("user_id", user_id).into());
    }
    Ok(())
}

/// Reject the write if another reservation of the table overlaps it
async fn check_overlap(
    conn: &mut PgConnection,
    input: &ReservationInput<'_>,
    own_id: Option<i32>,
) -> ServiceResult<()> {
    let candidate = input.window(own_id);
    // Only rows starting within MAX_DURATION before the candidate can reach into it
    let scan_from = to_db_time(candidate.scan_from());
    let scan_to = to_db_time(candidate.end());

    let rows: Vec<(i32, NaiveDateTime, i32)> = sqlx::query_as(
        r#"
        SELECT id, reservation_time, duration_minutes
        FROM table_reservations
        WHERE table_id = $1
          AND ($2::INT IS NULL OR id <> $2)
          AND reservation_time < $4
          AND reservation_time >= $3
        "#,
    )
    .bind(input.table_id)
    .bind(own_id)
    .bind(scan_from)
    .bind(scan_to)
    .fetch_all(&mut *conn)
    .await?;

    let existing: Vec<ReservationWindow> = rows
        .into_iter()
        .map(|(id, start, minutes)| ReservationWindow::new(Some(id), from_db_time(start), minutes))
        .collect();

    if let Some(conflict) = find_conflict(&candidate, &existing) {
        tracing::warn!(
            table_id = input.table_id,
            conflict_id = ?conflict.id,
            start = %candidate.start,
            "Reservation overlaps an existing one"
        );
        return Err(conflict_error(conflict).into());
    }
    Ok(())
}

pub async fn create(pool: &PgPool, input: &ReservationInput<'_>) -> ServiceResult<TableReservation> {
    let mut tx = pool.begin().await?;

    lock_references(&mut tx, input).await?;
    check_overlap(&mut tx, input, None).await?;

    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO table_reservations (table_id, user_id, reservation_time, duration_minutes, comment)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(input.table_id)
    .bind(input.user_id)
    .bind(to_db_time(input.start))
    .bind(input.duration_minutes)
    .bind(input.comment)
    .fetch_one(&mut *tx)
    .await?;

    let sql = format!("{RESERVATION_SELECT} WHERE r.id = $1");
    let reservation: TableReservation = sqlx::query_as(&sql).bind(id).fetch_one(&mut *tx).await?;

    tx.commit().await?;
    Ok(reservation)
}

pub async fn update(pool: &PgPool, id: i32, input: &ReservationInput<'_>) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;

    let current: Option<(i32,)> =
        sqlx::query_as("SELECT id FROM table_reservations WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    if current.is_none() {
        return Err(AppError::new(ErrorCode::ReservationNotFound)
            .with_detail("id", id)
            .into());
    }

    lock_references(&mut tx, input).await?;
    check_overlap(&mut tx, input, Some(id)).await?;

    sqlx::query(
        r#"
        UPDATE table_reservations SET
            table_id = $1, user_id = $2, reservation_time = $3,
            duration_minutes = $4, comment = $5
        WHERE id = $6
        "#,
    )
    .bind(input.table_id)
    .bind(input.user_id)
    .bind(to_db_time(input.start))
    .bind(input.duration_minutes)
    .bind(input.comment)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

pub async fn delete(pool: &PgPool, id: i32) -> ServiceResult<bool> {
    let result = sqlx::query("DELETE FROM table_reservations WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
