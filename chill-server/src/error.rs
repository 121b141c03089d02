//! Unified service-layer error type
//!
//! `ServiceError` bridges the gap between DB-layer errors (`sqlx::Error`, `BoxError`)
//! and the API-layer error (`AppError`). It enables `?` propagation from the
//! `db` functions straight into handlers.
//!
//! Constraint violations (unique, check, foreign key) that slip past the handler pre-checks (two requests
//! racing for the same login, a row deleted mid-request) are translated
//! here into the same client errors the pre-checks produce.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service-layer error
///
/// - `Db`: Database/infrastructure errors (auto-logged, mapped to DatabaseError)
/// - `App`: Business-rule errors (transparent pass-through to client)
#[derive(Debug)]
pub enum ServiceError {
    /// Database or infrastructure error
    Db(BoxError),
    /// Business-rule error (already an AppError with the correct ErrorCode)
    App(AppError),
}

/// Error code registered for a unique constraint
fn unique_constraint_code(constraint: &str) -> ErrorCode {
    match constraint {
        "users_login_key" => ErrorCode::UserLoginExists,
        "users_email_key" => ErrorCode::UserEmailExists,
        "roles_name_key" => ErrorCode::RoleNameExists,
        "tables_name_key" => ErrorCode::TableNameExists,
        "menu_categories_name_key" => ErrorCode::CategoryNameExists,
        "menu_categories_slug_key" => ErrorCode::CategorySlugExists,
        _ => ErrorCode::AlreadyExists,
    }
}

/// Error code registered for a check constraint
fn check_constraint_code(constraint: &str) -> ErrorCode {
    match constraint {
        "table_reservations_duration_check" => ErrorCode::ReservationDurationInvalid,
        "cart_items_quantity_check" | "order_items_quantity_check" => ErrorCode::QuantityInvalid,
        _ => ErrorCode::ValidationFailed,
    }
}

/// Translate constraint violations; `None` for everything else
fn translate_constraint(db_err: &dyn sqlx::error::DatabaseError) -> Option<AppError> {
    let constraint = db_err.constraint().unwrap_or("unknown");
    if db_err.is_unique_violation() {
        let code = unique_constraint_code(constraint);
        return Some(AppError::new(code).with_detail("constraint", constraint));
    }
    if db_err.is_check_violation() {
        let code = check_constraint_code(constraint);
        return Some(AppError::new(code).with_detail("constraint", constraint));
    }
    if db_err.is_foreign_key_violation() {
        return Some(
            AppError::new(ErrorCode::ReferenceNotFound).with_detail("constraint", constraint),
        );
    }
    None
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e
            && let Some(app_err) = translate_constraint(db_err.as_ref())
        {
            tracing::warn!(
                code = %app_err.code,
                error = %db_err,
                "Constraint violation"
            );
            return ServiceError::App(app_err);
        }
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_constraint_codes() {
        assert_eq!(
            unique_constraint_code("users_login_key"),
            ErrorCode::UserLoginExists
        );
        assert_eq!(
            unique_constraint_code("users_email_key"),
            ErrorCode::UserEmailExists
        );
        assert_eq!(
            unique_constraint_code("roles_name_key"),
            ErrorCode::RoleNameExists
        );
        assert_eq!(
            unique_constraint_code("tables_name_key"),
            ErrorCode::TableNameExists
        );
        assert_eq!(
            unique_constraint_code("menu_categories_slug_key"),
            ErrorCode::CategorySlugExists
        );
        assert_eq!(
            unique_constraint_code("something_else_key"),
            ErrorCode::AlreadyExists
        );
    }

    #[test]
    fn test_check_constraint_codes() {
        assert_eq!(
            check_constraint_code("table_reservations_duration_check"),
            ErrorCode::ReservationDurationInvalid
        );
        assert_eq!(
            check_constraint_code("cart_items_quantity_check"),
            ErrorCode::QuantityInvalid
        );
        assert_eq!(
            check_constraint_code("other_check"),
            ErrorCode::ValidationFailed
        );
    }

    #[test]
    fn test_row_not_found_is_database_error() {
        let err: ServiceError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ServiceError::Db(_)));
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn test_app_error_passes_through() {
        let err: ServiceError = AppError::new(ErrorCode::RoleInUse).into();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::RoleInUse);
    }
}
