//! HTTP API routes
//!
//! Resources live under `/api/{Resource}` with PascalCase names. Creates
//! answer 201 with a `Location` header, updates and deletes answer 204.

pub mod addresses;
pub mod cart_items;
pub mod carts;
pub mod events;
pub mod health;
pub mod menu_categories;
pub mod menu_items;
pub mod orders;
pub mod roles;
pub mod table_reservations;
pub mod tables;
pub mod users;

use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router, middleware};
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::rate_limit::login_rate_limit;
use crate::auth::user_auth::user_auth_middleware;
use crate::state::AppState;

pub type ApiResult<T> = Result<Json<T>, AppError>;

/// 201 Created with `Location: /api/{resource}/{id}`
fn created<T: Serialize>(resource: &str, id: i32, body: T) -> Response {
    (
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/{resource}/{id}"))],
        Json(body),
    )
        .into_response()
}

fn not_found(code: ErrorCode, id: i32) -> AppError {
    AppError::new(code).with_detail("id", id)
}

/// Create the combined router (no CORS / tracing layers)
pub fn create_router(state: AppState) -> Router {
    // Login (rate limited per IP)
    let login = Router::new()
        .route("/api/Users/login", post(users::login))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            login_rate_limit,
        ));

    // Current user (JWT authenticated)
    let me = Router::new()
        .route("/api/Users/me", get(users::me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            user_auth_middleware,
        ));

    let resources = Router::new()
        .route("/api/Users", get(users::list).post(users::register))
        .route(
            "/api/Users/{id}",
            get(users::get).put(users::update).delete(users::delete),
        )
        .route("/api/Roles", get(roles::list).post(roles::create))
        .route(
            "/api/Roles/{id}",
            get(roles::get).put(roles::update).delete(roles::delete),
        )
        .route("/api/Addresses", get(addresses::list).post(addresses::create))
        .route(
            "/api/Addresses/{id}",
            get(addresses::get)
                .put(addresses::update)
                .delete(addresses::delete),
        )
        .route("/api/Carts", get(carts::list).post(carts::create))
        .route(
            "/api/Carts/{id}",
            get(carts::get).put(carts::update).delete(carts::delete),
        )
        .route("/api/CartItems", get(cart_items::list).post(cart_items::create))
        .route(
            "/api/CartItems/{id}",
            get(cart_items::get)
                .put(cart_items::update)
                .delete(cart_items::delete),
        )
        .route(
            "/api/MenuCategories",
            get(menu_categories::list).post(menu_categories::create),
        )
        .route(
            "/api/MenuCategories/{id}",
            get(menu_categories::get)
                .put(menu_categories::update)
                .delete(menu_categories::delete),
        )
        .route("/api/MenuItems", get(menu_items::list).post(menu_items::create))
        .route(
            "/api/MenuItems/{id}",
            get(menu_items::get)
                .put(menu_items::update)
                .delete(menu_items::delete),
        )
        .route("/api/Tables", get(tables::list).post(tables::create))
        .route(
            "/api/Tables/{id}",
            get(tables::get).put(tables::update).delete(tables::delete),
        )
        .route(
            "/api/TableReservations",
            get(table_reservations::list).post(table_reservations::create),
        )
        .route(
            "/api/TableReservations/{id}",
            get(table_reservations::get)
                .put(table_reservations::update)
                .delete(table_reservations::delete),
        )
        .route("/api/Events", get(events::list).post(events::create))
        .route(
            "/api/Events/{id}",
            get(events::get).put(events::update).delete(events::delete),
        )
        .route("/api/Orders", get(orders::list).post(orders::create))
        .route("/api/Orders/{id}", get(orders::get).delete(orders::delete))
        .route("/api/Orders/{id}/status", patch(orders::update_status));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(login)
        .merge(me)
        .merge(resources)
        .with_state(state)
}

/// Router with CORS for the frontend origin and HTTP tracing
pub fn build_app(state: AppState, cors_origin: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let cors = match HeaderValue::from_str(cors_origin) {
        Ok(origin) => cors.allow_origin(AllowOrigin::exact(origin)),
        Err(e) => {
            tracing::warn!(origin = %cors_origin, error = %e, "Invalid CORS origin, cross-origin requests disabled");
            cors
        }
    };

    create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
