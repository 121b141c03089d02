//! User Model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// User as returned by the API (never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i32,
    pub login: String,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub role_id: Option<i32>,
    /// Joined from `roles`
    pub role_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Register user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub login: String,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub password: String,
    pub birth_date: Option<NaiveDate>,
    pub avatar_url: Option<String>,
    pub role_id: Option<i32>,
}

/// Update user payload (full replacement of the editable fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserUpdate {
    pub id: i32,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub role_id: Option<i32>,
}

/// Login request; `login` matches either the login or the email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}
