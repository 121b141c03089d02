//! chill-server: REST backend of the ChillAndDrill restaurant
//!
//! Menu, carts, orders, table reservations, events and user accounts over
//! PostgreSQL.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod state;
pub mod util;
