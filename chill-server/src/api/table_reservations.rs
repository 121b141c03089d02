//! Table reservation API handlers
//!
//! Slot rules run before the database: duration in `(0, 240]` minutes and
//! a start between now and a year ahead. The overlap check runs inside the
//! write transaction (see `db::reservations`).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use chrono::{DateTime, Utc};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    TableReservation, TableReservationCreate, TableReservationQuery, TableReservationUpdate,
};
use shared::rules::reservation::{
    validate_duration, validate_not_in_past, validate_within_horizon,
};
use shared::util::now_utc;
use shared::validation::{MAX_NOTE_LEN, ensure_same_id, validate_optional_text};

use super::{ApiResult, created, not_found};
use crate::db;
use crate::db::reservations::ReservationInput;
use crate::state::AppState;

fn validate_slot(
    start: DateTime<Utc>,
    duration_minutes: i32,
    comment: &Option<String>,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    validate_duration(duration_minutes)?;
    validate_not_in_past(start, now)?;
    validate_within_horizon(start, now)?;
    validate_optional_text(comment, "comment", MAX_NOTE_LEN)?;
    Ok(())
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<TableReservationQuery>,
) -> ApiResult<Vec<TableReservation>> {
    let reservations =
        db::reservations::list(&state.pool, query.table_id, query.user_id).await?;
    Ok(Json(reservations))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<TableReservation> {
    let reservation = db::reservations::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ErrorCode::ReservationNotFound, id))?;
    Ok(Json(reservation))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<TableReservationCreate>,
) -> Result<Response, AppError> {
    validate_slot(req.reservation_time, req.duration_minutes, &req.comment, now_utc())?;

    let input = ReservationInput {
        table_id: req.table_id,
        user_id: req.user_id,
        start: req.reservation_time,
        duration_minutes: req.duration_minutes,
        comment: req.comment.as_deref(),
    };
    let reservation = db::reservations::create(&state.pool, &input).await?;
    tracing::info!(
        reservation_id = reservation.id,
        table_id = reservation.table_id,
        user_id = ?reservation.user_id,
        start = %reservation.reservation_time,
        duration_minutes = reservation.duration_minutes,
        "Table reserved"
    );
    Ok(created("TableReservations", reservation.id, reservation))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<TableReservationUpdate>,
) -> Result<StatusCode, AppError> {
    ensure_same_id(id, req.id)?;
    validate_slot(req.reservation_time, req.duration_minutes, &req.comment, now_utc())?;

    let input = ReservationInput {
        table_id: req.table_id,
        user_id: req.user_id,
        start: req.reservation_time,
        duration_minutes: req.duration_minutes,
        comment: req.comment.as_deref(),
    };
    db::reservations::update(&state.pool, id, &input).await?;
    tracing::info!(
        reservation_id = id,
        table_id = req.table_id,
        start = %req.reservation_time,
        "Reservation updated"
    );
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if !db::reservations::delete(&state.pool, id).await? {
        return Err(not_found(ErrorCode::ReservationNotFound, id));
    }
    tracing::info!(reservation_id = id, "Reservation cancelled");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_slot_rules() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        let later = now + Duration::hours(6);

        assert!(validate_slot(later, 60, &None, now).is_ok());
        assert!(validate_slot(now, 240, &None, now).is_ok());
        assert_eq!(
            validate_slot(later, 0, &None, now).unwrap_err().code,
            ErrorCode::ReservationDurationInvalid
        );
        assert_eq!(
            validate_slot(later, 241, &None, now).unwrap_err().code,
            ErrorCode::ReservationDurationInvalid
        );
        assert_eq!(
            validate_slot(now - Duration::minutes(1), 60, &None, now)
                .unwrap_err()
                .code,
            ErrorCode::ReservationInPast
        );
        assert_eq!(
            validate_slot(now + Duration::days(400), 60, &None, now)
                .unwrap_err()
                .code,
            ErrorCode::ReservationTimeInvalid
        );
        let long_comment = Some("x".repeat(MAX_NOTE_LEN + 1));
        assert_eq!(
            validate_slot(later, 60, &long_comment, now).unwrap_err().code,
            ErrorCode::ValidationFailed
        );
    }
}
