//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Table {
    pub id: i32,
    pub name: String,
}

/// Create table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCreate {
    pub name: String,
}

/// Update table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableUpdate {
    pub id: i32,
    pub name: String,
}
