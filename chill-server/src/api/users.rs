//! User API handlers
//!
//! POST /api/Users       — register (argon2 hash, client role by default)
//! POST /api/Users/login — login or email + password → JWT
//! GET  /api/Users/me    — current user from the bearer token

use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use shared::error::{AppError, ErrorCode};
use shared::models::{CLIENT_ROLE_ID, LoginRequest, LoginResponse, User, UserCreate, UserUpdate};
use shared::validation::{
    MAX_LOGIN_LEN, MAX_NAME_LEN, MAX_PHONE_LEN, MAX_URL_LEN, ensure_same_id, validate_email,
    validate_optional_text, validate_password, validate_required_text,
};

use super::{ApiResult, created, not_found};
use crate::auth::UserIdentity;
use crate::auth::user_auth::create_token;
use crate::db::{self, Entity, row_exists};
use crate::state::AppState;
use crate::util::{hash_password, verify_password};

/// Blank email means "no email"
fn normalize_email(email: Option<String>) -> Option<String> {
    email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
}

fn validate_profile(
    full_name: &str,
    phone: &str,
    email: &Option<String>,
    avatar_url: &Option<String>,
) -> Result<(), AppError> {
    validate_required_text(full_name, "full_name", MAX_NAME_LEN)?;
    validate_required_text(phone, "phone", MAX_PHONE_LEN)?;
    validate_email(email)?;
    validate_optional_text(avatar_url, "avatar_url", MAX_URL_LEN)?;
    Ok(())
}

async fn ensure_role_exists(state: &AppState, role_id: Option<i32>) -> Result<(), AppError> {
    if let Some(role_id) = role_id
        && !row_exists(&state.pool, Entity::Role, role_id).await?
    {
        return Err(AppError::reference_not_found("role_id", role_id));
    }
    Ok(())
}

async fn ensure_email_free(
    state: &AppState,
    email: &Option<String>,
    except_id: Option<i32>,
) -> Result<(), AppError> {
    if let Some(email) = email
        && db::users::email_taken(&state.pool, email, except_id).await?
    {
        return Err(AppError::new(ErrorCode::UserEmailExists)
            .with_field("email")
            .with_detail("email", email.as_str()));
    }
    Ok(())
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let users = db::users::list(&state.pool).await?;
    Ok(Json(users))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<User> {
    let user = db::users::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ErrorCode::UserNotFound, id))?;
    Ok(Json(user))
}

pub async fn register(
    State(state): State<AppState>,
    Json(mut req): Json<UserCreate>,
) -> Result<Response, AppError> {
    req.email = normalize_email(req.email);
    validate_required_text(&req.login, "login", MAX_LOGIN_LEN)?;
    validate_profile(&req.full_name, &req.phone, &req.email, &req.avatar_url)?;
    validate_password(&req.password)?;
    let role_id = *req.role_id.get_or_insert(CLIENT_ROLE_ID);

    let login = req.login.trim();
    if db::users::login_taken(&state.pool, login).await? {
        return Err(AppError::new(ErrorCode::UserLoginExists)
            .with_field("login")
            .with_detail("login", login));
    }
    ensure_email_free(&state, &req.email, None).await?;
    ensure_role_exists(&state, Some(role_id)).await?;

    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!(error = %e, "Password hash error");
        AppError::internal("Failed to hash password")
    })?;

    let user = db::users::create(&state.pool, &req, &password_hash).await?;
    tracing::info!(user_id = user.id, login = %user.login, "User registered");
    Ok(created("Users", user.id, user))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(mut req): Json<UserUpdate>,
) -> Result<StatusCode, AppError> {
    ensure_same_id(id, req.id)?;
    req.email = normalize_email(req.email);
    validate_profile(&req.full_name, &req.phone, &req.email, &req.avatar_url)?;

    ensure_email_free(&state, &req.email, Some(id)).await?;
    ensure_role_exists(&state, req.role_id).await?;

    if !db::users::update(&state.pool, id, &req).await? {
        return Err(not_found(ErrorCode::UserNotFound, id));
    }
    tracing::info!(user_id = id, "User updated");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if !db::users::delete(&state.pool, id).await? {
        return Err(not_found(ErrorCode::UserNotFound, id));
    }
    tracing::info!(user_id = id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let login = req.login.trim();
    if login.is_empty() || req.password.is_empty() {
        return Err(AppError::invalid_credentials());
    }

    let credentials = db::users::find_credentials(&state.pool, login).await?;
    let user_id = match credentials {
        Some((user_id, Some(hash))) if verify_password(&req.password, &hash) => user_id,
        _ => {
            tracing::warn!(login = %login, "Failed login attempt");
            return Err(AppError::invalid_credentials());
        }
    };

    let user = db::users::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    let token = create_token(user.id, &user.login, user.role_id, &state.jwt_secret).map_err(|e| {
        tracing::error!(error = %e, "JWT creation error");
        AppError::internal("Failed to create token")
    })?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(LoginResponse { token, user }))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<User> {
    // Token may outlive the account
    let user = db::users::find_by_id(&state.pool, identity.user_id)
        .await?
        .ok_or_else(|| AppError::invalid_token("User no longer exists"))?;
    Ok(Json(user))
}
