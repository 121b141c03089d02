//! Event Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Restaurant event (promo, live music night, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Event {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCreate {
    pub title: String,
    pub description: String,
    pub image_url: String,
}

/// Update event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventUpdate {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub image_url: String,
}
