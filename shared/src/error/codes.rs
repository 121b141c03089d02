//! Unified error codes for the ChillAndDrill backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 4xxx: Order and cart errors
//! - 6xxx: Menu errors
//! - 7xxx: Table and reservation errors
//! - 8xxx: User, role and address errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as a bare `u16` so clients can switch on the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Path id and body id disagree
    IdMismatch = 6,
    /// Referenced row does not exist
    ReferenceNotFound = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (login/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Too many requests from the same client
    TooManyRequests = 1005,

    // ==================== 4xxx: Order / Cart ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4002,
    /// Order status name is unknown
    OrderStatusInvalid = 4003,
    /// Status change not allowed from the current status
    OrderStatusTransition = 4004,
    /// Delivery address does not belong to the ordering user
    OrderAddressMismatch = 4005,
    /// Cart not found
    CartNotFound = 4101,
    /// Cart item not found
    CartItemNotFound = 4102,
    /// Quantity outside 1..=MAX_QUANTITY
    QuantityInvalid = 4103,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Menu item has invalid price
    MenuItemInvalidPrice = 6002,
    /// Menu category not found
    CategoryNotFound = 6101,
    /// Menu category still has items
    CategoryHasItems = 6102,
    /// Menu category name already exists
    CategoryNameExists = 6103,
    /// Menu category slug already exists
    CategorySlugExists = 6104,
    /// Menu category slug has invalid characters
    CategorySlugInvalid = 6105,
    /// Event not found
    EventNotFound = 6201,

    // ==================== 7xxx: Table / Reservation ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table name already exists
    TableNameExists = 7002,
    /// Reservation not found
    ReservationNotFound = 7101,
    /// Reservation overlaps an existing one
    ReservationConflict = 7102,
    /// Reservation duration outside (0, 240] minutes
    ReservationDurationInvalid = 7103,
    /// Reservation starts in the past
    ReservationInPast = 7104,
    /// Reservation time too far ahead to be booked
    ReservationTimeInvalid = 7105,

    // ==================== 8xxx: User / Role / Address ====================
    /// User not found
    UserNotFound = 8001,
    /// Login already taken
    UserLoginExists = 8002,
    /// Email already taken
    UserEmailExists = 8003,
    /// Password too short
    PasswordTooShort = 8004,
    /// Address not found
    AddressNotFound = 8051,
    /// Role not found
    RoleNotFound = 8101,
    /// Role name already exists
    RoleNameExists = 8102,
    /// Role still assigned to users
    RoleInUse = 8103,
    /// Built-in client role cannot be viewed or modified
    RoleIsSystem = 8104,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::IdMismatch => "Id in the URL does not match id in the body",
            ErrorCode::ReferenceNotFound => "Referenced resource does not exist",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid login or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::TooManyRequests => "Too many requests, try again later",

            // Order / Cart
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order must contain at least one item",
            ErrorCode::OrderStatusInvalid => "Unknown order status",
            ErrorCode::OrderStatusTransition => "Order status change is not allowed",
            ErrorCode::OrderAddressMismatch => "Address does not belong to the user",
            ErrorCode::CartNotFound => "Cart not found",
            ErrorCode::CartItemNotFound => "Cart item not found",
            ErrorCode::QuantityInvalid => "Quantity is out of range",

            // Menu
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuItemInvalidPrice => "Menu item price is invalid",
            ErrorCode::CategoryNotFound => "Menu category not found",
            ErrorCode::CategoryHasItems => "Menu category still has items",
            ErrorCode::CategoryNameExists => "Menu category name already exists",
            ErrorCode::CategorySlugExists => "Menu category slug already exists",
            ErrorCode::CategorySlugInvalid => {
                "Slug may only contain lowercase letters, digits and hyphens"
            }
            ErrorCode::EventNotFound => "Event not found",

            // Table / Reservation
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableNameExists => "Table name already exists",
            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::ReservationConflict => {
                "The table is already booked for the specified time range"
            }
            ErrorCode::ReservationDurationInvalid => {
                "Duration must be greater than 0 and at most 240 minutes"
            }
            ErrorCode::ReservationInPast => "Reservation time cannot be in the past",
            ErrorCode::ReservationTimeInvalid => "Reservation time is too far in the future",

            // User / Role / Address
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UserLoginExists => "Login is already taken",
            ErrorCode::UserEmailExists => "Email is already taken",
            ErrorCode::PasswordTooShort => "Password is too short",
            ErrorCode::AddressNotFound => "Address not found",
            ErrorCode::RoleNotFound => "Role not found",
            ErrorCode::RoleNameExists => "Role name already exists",
            ErrorCode::RoleInUse => "Role is assigned to users",
            ErrorCode::RoleIsSystem => "The client role is not available",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::IdMismatch),
            7 => Ok(ErrorCode::ReferenceNotFound),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::TooManyRequests),

            // Order / Cart
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::OrderStatusInvalid),
            4004 => Ok(ErrorCode::OrderStatusTransition),
            4005 => Ok(ErrorCode::OrderAddressMismatch),
            4101 => Ok(ErrorCode::CartNotFound),
            4102 => Ok(ErrorCode::CartItemNotFound),
            4103 => Ok(ErrorCode::QuantityInvalid),

            // Menu
            6001 => Ok(ErrorCode::MenuItemNotFound),
            6002 => Ok(ErrorCode::MenuItemInvalidPrice),
            6101 => Ok(ErrorCode::CategoryNotFound),
            6102 => Ok(ErrorCode::CategoryHasItems),
            6103 => Ok(ErrorCode::CategoryNameExists),
            6104 => Ok(ErrorCode::CategorySlugExists),
            6105 => Ok(ErrorCode::CategorySlugInvalid),
            6201 => Ok(ErrorCode::EventNotFound),

            // Table / Reservation
            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::TableNameExists),
            7101 => Ok(ErrorCode::ReservationNotFound),
            7102 => Ok(ErrorCode::ReservationConflict),
            7103 => Ok(ErrorCode::ReservationDurationInvalid),
            7104 => Ok(ErrorCode::ReservationInPast),
            7105 => Ok(ErrorCode::ReservationTimeInvalid),

            // User / Role / Address
            8001 => Ok(ErrorCode::UserNotFound),
            8002 => Ok(ErrorCode::UserLoginExists),
            8003 => Ok(ErrorCode::UserEmailExists),
            8004 => Ok(ErrorCode::PasswordTooShort),
            8051 => Ok(ErrorCode::AddressNotFound),
            8101 => Ok(ErrorCode::RoleNotFound),
            8102 => Ok(ErrorCode::RoleNameExists),
            8103 => Ok(ErrorCode::RoleInUse),
            8104 => Ok(ErrorCode::RoleIsSystem),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrips_through_u16() {
        for code in [
            ErrorCode::Success,
            ErrorCode::IdMismatch,
            ErrorCode::OrderStatusTransition,
            ErrorCode::CategorySlugExists,
            ErrorCode::ReservationConflict,
            ErrorCode::ReservationTimeInvalid,
            ErrorCode::RoleIsSystem,
            ErrorCode::ConfigError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_unknown_u16_is_rejected() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
        assert_eq!(
            InvalidErrorCode(4242).to_string(),
            "invalid error code: 4242"
        );
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&ErrorCode::ReservationConflict).unwrap();
        assert_eq!(json, "7102");
        let code: ErrorCode = serde_json::from_str("8002").unwrap();
        assert_eq!(code, ErrorCode::UserLoginExists);
        assert!(serde_json::from_str::<ErrorCode>("31337").is_err());
    }

    #[test]
    fn test_success_flag() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::NotFound.is_success());
    }
}
