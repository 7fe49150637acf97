//! Error handling for the coffee backend.

pub mod error_code;

pub use error_code::ErrorCode;
