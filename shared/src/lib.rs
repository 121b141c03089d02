//! Shared types for the ChillAndDrill backend
//!
//! Request/response models, the unified error system, validation helpers
//! and the pure business rules used by `chill-server`.

pub mod error;
pub mod models;
pub mod rules;
pub mod util;
pub mod validation;
