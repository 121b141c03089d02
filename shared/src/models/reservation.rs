//! Table Reservation Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Table reservation joined with the table name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TableReservation {
    pub id: i32,
    pub table_id: i32,
    pub table_name: String,
    pub user_id: Option<i32>,
    pub reservation_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub comment: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Create reservation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReservationCreate {
    pub table_id: i32,
    pub user_id: Option<i32>,
    #[serde(deserialize_with = "crate::util::deserialize_utc")]
    pub reservation_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub comment: Option<String>,
}

/// Update reservation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReservationUpdate {
    pub id: i32,
    pub table_id: i32,
    pub user_id: Option<i32>,
    #[serde(deserialize_with = "crate::util::deserialize_utc")]
    pub reservation_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub comment: Option<String>,
}

/// Reservation query filter
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableReservationQuery {
    pub table_id: Option<i32>,
    pub user_id: Option<i32>,
}
