//! Integer error codes for logging and monitoring.
//!
//! Clients only ever see the `{"error": <message>}` body; these codes are
//! attached to the structured log line emitted when a response is built, so
//! dashboards can group failures without parsing localized messages.

/// Standardized error codes, organized into ranges:
/// - 1000-1999: client errors
/// - 2000-2999: database errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Request validation failed
    ValidationError,

    /// JSON extraction from the request body failed
    JsonExtraction,

    /// Requested resource was not found
    NotFound,

    /// An unexpected internal server error occurred
    InternalError,

    /// Database connection or query error
    DatabaseError,

    /// Database query returned no results
    DatabaseNotFound,
}

impl ErrorCode {
    /// SCREAMING_SNAKE_CASE identifier for log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::DatabaseNotFound => "DATABASE_NOT_FOUND",
        }
    }

    /// Integer code for metrics and log aggregation.
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::DatabaseNotFound => 2001,
            Self::DatabaseError => 2003,
        }
    }
}
