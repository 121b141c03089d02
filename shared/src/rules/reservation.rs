//! Table reservation rules
//!
//! A reservation occupies the half-open interval `[start, start + duration)`.
//! Two reservations of the same table conflict when their intervals
//! intersect; touching intervals (one ends exactly when the next starts)
//! do not.

use chrono::{DateTime, Duration, Utc};

use crate::error::{AppError, ErrorCode};

/// Longest reservation a guest can book, in minutes
pub const MAX_DURATION_MINUTES: i32 = 240;

/// How far ahead a table can be booked, in days
pub const MAX_ADVANCE_DAYS: i64 = 365;

/// Time slot of one reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationWindow {
    /// Reservation id, `None` for a reservation not stored yet
    pub id: Option<i32>,
    pub start: DateTime<Utc>,
    pub duration_minutes: i32,
}

impl ReservationWindow {
    pub fn new(id: Option<i32>, start: DateTime<Utc>, duration_minutes: i32) -> Self {
        Self {
            id,
            start,
            duration_minutes,
        }
    }

    /// Exclusive end of the slot, saturating at the last representable instant
    pub fn end(&self) -> DateTime<Utc> {
        self.start
            .checked_add_signed(Duration::minutes(i64::from(self.duration_minutes)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Earliest start of a stored slot that can still reach into this one
    pub fn scan_from(&self) -> DateTime<Utc> {
        self.start
            .checked_sub_signed(Duration::minutes(i64::from(MAX_DURATION_MINUTES)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// `a.start < b.end && b.start < a.end`
pub fn overlaps(a: &ReservationWindow, b: &ReservationWindow) -> bool {
    a.start < b.end() && b.start < a.end()
}

/// First existing window that collides with `candidate`.
///
/// A window with the same id as the candidate is the row being updated and
/// is skipped.
pub fn find_conflict<'a>(
    candidate: &ReservationWindow,
    existing: &'a [ReservationWindow],
) -> Option<&'a ReservationWindow> {
    existing.iter().find(|other| {
        let same_row = candidate.id.is_some() && other.id == candidate.id;
        !same_row && overlaps(candidate, other)
    })
}

/// Duration must be in `(0, MAX_DURATION_MINUTES]`
pub fn validate_duration(duration_minutes: i32) -> Result<(), AppError> {
    if duration_minutes <= 0 || duration_minutes > MAX_DURATION_MINUTES {
        return Err(AppError::with_message(
            ErrorCode::ReservationDurationInvalid,
            format!(
                "duration_minutes must be between 1 and {}, got {}",
                MAX_DURATION_MINUTES, duration_minutes
            ),
        )
        .with_field("duration_minutes"));
    }
    Ok(())
}

/// Start must not be before `now`
pub fn validate_not_in_past(start: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), AppError> {
    if start < now {
        return Err(AppError::new(ErrorCode::ReservationInPast)
            .with_field("reservation_time")
            .with_detail("reservation_time", start.to_rfc3339()));
    }
    Ok(())
}

/// Start must lie within `MAX_ADVANCE_DAYS` of `now`
pub fn validate_within_horizon(start: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), AppError> {
    let too_far = now
        .checked_add_signed(Duration::days(MAX_ADVANCE_DAYS))
        .is_none_or(|horizon| start > horizon);
    if too_far {
        return Err(AppError::with_message(
            ErrorCode::ReservationTimeInvalid,
            format!("reservation_time must be within {MAX_ADVANCE_DAYS} days from now"),
        )
        .with_field("reservation_time")
        .with_detail("reservation_time", start.to_rfc3339()));
    }
    Ok(())
}

/// Error for a candidate that collides with `conflict`
pub fn conflict_error(conflict: &ReservationWindow) -> AppError {
    let mut err = AppError::new(ErrorCode::ReservationConflict)
        .with_field("reservation_time")
        .with_detail("conflict_start", conflict.start.to_rfc3339())
        .with_detail("conflict_end", conflict.end().to_rfc3339());
    if let Some(id) = conflict.id {
        err = err.with_detail("conflict_id", id);
    }
    err
}
