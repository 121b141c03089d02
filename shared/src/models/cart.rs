//! Cart Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Shopping cart with its items
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Cart {
    pub id: i32,
    pub user_id: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,

    // -- Relations (populated by application code, skipped by FromRow) --
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub items: Vec<CartItem>,
}

/// Cart line joined with the menu item it points at
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartItem {
    pub id: i32,
    pub cart_id: i32,
    pub menu_item_id: i32,
    pub menu_item_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub menu_item_price: Decimal,
    pub quantity: i32,
    pub created_at: Option<DateTime<Utc>>,
}

/// Create cart payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartCreate {
    pub user_id: i32,
}

/// Update cart payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartUpdate {
    pub id: i32,
    pub user_id: i32,
}

/// Add item to cart payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemCreate {
    pub cart_id: i32,
    pub menu_item_id: i32,
    pub quantity: i32,
}

/// Change item quantity payload; quantity <= 0 removes the line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemUpdate {
    pub id: i32,
    pub quantity: i32,
}

/// Cart query filter
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartQuery {
    pub user_id: Option<i32>,
}

/// Cart item query filter
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemQuery {
    pub cart_id: Option<i32>,
}
