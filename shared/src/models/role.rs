//! Role Model

use serde::{Deserialize, Serialize};

/// Built-in client role assigned to self-registered users.
///
/// Hidden from the role API: it cannot be read, renamed or deleted.
pub const CLIENT_ROLE_ID: i32 = 1;

/// Role entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Role {
    pub id: i32,
    pub name: String,
}

/// Create role payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleCreate {
    pub name: String,
}

/// Update role payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleUpdate {
    pub id: i32,
    pub name: String,
}
