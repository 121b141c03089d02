//! Data models
//!
//! Request payloads and response DTOs shared by the server and its tests.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i32` (PostgreSQL SERIAL).

pub mod address;
pub mod cart;
pub mod category;
pub mod event;
pub mod menu_item;
pub mod order;
pub mod reservation;
pub mod role;
pub mod table;
pub mod user;

// Re-exports
pub use address::*;
pub use cart::*;
pub use category::*;
pub use event::*;
pub use menu_item::*;
pub use order::*;
pub use reservation::*;
pub use role::*;
pub use table::*;
pub use user::*;
