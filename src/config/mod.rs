//! Request configuration and constants.
//!
//! This module provides:
//! - Configuration constants (redirect limits, default user agent, content types)
//! - HTTP header name constants and the hop-by-hop header list
//! - CLI option types and parsing

mod constants;
mod headers;
mod types;

// Re-export all constants
pub use constants::*;
pub use headers::*;
pub use types::{LogFormat, LogLevel, Opt};
