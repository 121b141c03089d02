//! Business rules shared by the request handlers
//!
//! Pure functions only; the server runs them inside its transactions.

pub mod address;
pub mod order;
pub mod reservation;
