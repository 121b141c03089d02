//! Menu Category Model

use serde::{Deserialize, Serialize};

/// Menu category entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuCategory {
    pub id: i32,
    pub name: String,
    /// URL-friendly key, `[a-z0-9-]+`
    pub slug: String,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuCategoryCreate {
    pub name: String,
    pub slug: String,
}

/// Update category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuCategoryUpdate {
    pub id: i32,
    pub name: String,
    pub slug: String,
}
