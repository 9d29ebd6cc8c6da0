//! Error handling.
//!
//! This module provides:
//! - Error type definitions for every failure a logical request can surface
//! - The status-carrying `ResponseError`
//! - Error categorization (`ErrorType`) and reclassification of socket errors
//!
//! Nothing is retried: every failure is surfaced to the caller with the
//! redirect chain known at the point of failure.

mod categorization;
mod types;

// Re-export public API
pub use categorization::categorize_request_error;
pub(crate) use categorization::classify_io_error;
pub use types::{Error, ErrorType, InitializationError, RequestError, ResponseError};
