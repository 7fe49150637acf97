//! Error codes for the coffee backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! Every code is SCREAMING_SNAKE_CASE and maps 1:1 to the string that
//! appears in the `code` field of a problem response.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication
    /// Authentication required (no principal on a protected route)
    Unauthorized,
    /// Login rejected; deliberately does not say which part was wrong
    InvalidCredentials,

    // Request Validation
    /// Request body could not be parsed
    BadRequest,
    InvalidEmail,
    InvalidPassword,
    InvalidFullName,

    // Resource Not Found
    NotFound,

    // Conflicts
    /// An account already uses this email address
    EmailTaken,
    Conflict,

    // System Errors
    DbError,
    DbUnavailable,
    InternalError,
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",

            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::InvalidFullName => "INVALID_FULL_NAME",

            Self::NotFound => "NOT_FOUND",

            Self::EmailTaken => "EMAIL_TAKEN",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const ALL: &[ErrorCode] = &[
        ErrorCode::Unauthorized,
        ErrorCode::InvalidCredentials,
        ErrorCode::BadRequest,
        ErrorCode::InvalidEmail,
        ErrorCode::InvalidPassword,
        ErrorCode::InvalidFullName,
        ErrorCode::NotFound,
        ErrorCode::EmailTaken,
        ErrorCode::Conflict,
        ErrorCode::DbError,
        ErrorCode::DbUnavailable,
        ErrorCode::InternalError,
        ErrorCode::ConfigError,
    ];

    #[test]
    fn test_error_code_strings() {
        assert_eq!(ErrorCode::Unauthorized.as_str(), "UNAUTHORIZED");
        assert_eq!(
            ErrorCode::InvalidCredentials.as_str(),
            "INVALID_CREDENTIALS"
        );
        assert_eq!(ErrorCode::EmailTaken.as_str(), "EMAIL_TAKEN");
        assert_eq!(ErrorCode::InvalidFullName.as_str(), "INVALID_FULL_NAME");
        assert_eq!(ErrorCode::DbUnavailable.as_str(), "DB_UNAVAILABLE");
    }

    #[test]
    fn test_codes_are_unique_and_screaming_snake_case() {
        let mut seen = HashSet::new();
        for code in ALL {
            let s = code.as_str();
            assert!(seen.insert(s), "duplicate error code {s}");
            assert!(
                s.chars().all(|c| c.is_ascii_uppercase() || c == '_'),
                "{s} is not SCREAMING_SNAKE_CASE"
            );
        }
    }

    #[test]
    fn test_display_trait() {
        assert_eq!(format!("{}", ErrorCode::Unauthorized), "UNAUTHORIZED");
        assert_eq!(format!("{}", ErrorCode::BadRequest), "BAD_REQUEST");
    }
}
