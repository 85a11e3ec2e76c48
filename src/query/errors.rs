//! Query validation errors
//!
//! Every query error is a validation error: it is raised before any
//! lookup runs and never indicates damage to the index.
//!
//! Error codes:
//! - BIDEX_UNKNOWN_OPERATOR
//! - BIDEX_MALFORMED_RANGE
//! - BIDEX_UNSUPPORTED_VALUE
//! - BIDEX_MALFORMED_REQUEST

use thiserror::Error;

pub type QueryResult<T> = Result<T, QueryError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("operator not valid: {0}")]
    UnknownOperator(String),

    #[error("malformed range directive: {0}")]
    MalformedRange(String),

    #[error("value cannot be indexed: {0}")]
    UnsupportedValue(String),

    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

impl QueryError {
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::UnknownOperator(_) => "BIDEX_UNKNOWN_OPERATOR",
            QueryError::MalformedRange(_) => "BIDEX_MALFORMED_RANGE",
            QueryError::UnsupportedValue(_) => "BIDEX_UNSUPPORTED_VALUE",
            QueryError::MalformedRequest(_) => "BIDEX_MALFORMED_REQUEST",
        }
    }

    /// Query errors are all rejected input, surfaced to the caller.
    pub fn is_validation(&self) -> bool {
        true
    }

    pub fn is_fatal(&self) -> bool {
        false
    }
}
