use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::normalize::ValidationError;

/// Stable error codes shared by the redirect flow and the JSON API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NameMissing,
    InvalidPrice,
    NegativePrice,
    DatabaseError,
    /// Missing item as reported to the HTML pages.
    ItemNotFound,
    /// Missing item as reported by the JSON API.
    NotFound,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 6] = [
        ErrorCode::NameMissing,
        ErrorCode::InvalidPrice,
        ErrorCode::NegativePrice,
        ErrorCode::DatabaseError,
        ErrorCode::ItemNotFound,
        ErrorCode::NotFound,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NameMissing => "name_missing",
            ErrorCode::InvalidPrice => "invalid_price",
            ErrorCode::NegativePrice => "negative_price",
            ErrorCode::DatabaseError => "database_error",
            ErrorCode::ItemNotFound => "item_not_found",
            ErrorCode::NotFound => "not_found",
        }
    }

    /// Looks up a code by its wire name. Unknown names yield `None`.
    pub fn from_code(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.as_str() == raw)
    }

    pub fn is_validation(self) -> bool {
        matches!(
            self,
            ErrorCode::NameMissing | ErrorCode::InvalidPrice | ErrorCode::NegativePrice
        )
    }

    pub fn is_not_found(self) -> bool {
        matches!(self, ErrorCode::ItemNotFound | ErrorCode::NotFound)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{code}: {message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        Self::new(value.code(), value.to_string())
    }
}
