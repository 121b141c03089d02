//! Address Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Delivery address of a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Address {
    pub id: i32,
    pub user_id: i32,
    pub address_text: String,
    /// NULL in storage reads as `false`
    pub is_default: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// Create address payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressCreate {
    pub user_id: i32,
    pub address_text: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Update address payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressUpdate {
    pub user_id: i32,
    pub address_text: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Address query filter
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressQuery {
    pub user_id: Option<i32>,
}
