//! hoprequest library: single-request HTTP(S) client with safe redirect handling
//!
//! Issues one logical request over TCP, TLS or a local Unix socket, follows
//! redirects with loop detection and a hop limit, enforces a body-size ceiling
//! and timeouts, and decodes the body according to its content type.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use hoprequest::{request, RequestOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = RequestOptions::new("http://localhost:8080/redirect")
//!     .query("format", "txt")
//!     .follow_redirect(true)
//!     .max_response(1 << 20)
//!     .timeout(Duration::from_secs(5));
//!
//! let response = request(options).await?;
//! println!("{} from {}", response.status, response.final_url());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod app;
pub mod body;
pub mod config;
mod error_handling;
mod fetch;
pub mod initialization;
pub mod location;
mod tls;

// Re-export public API
pub use body::{RequestBody, ResponseData};
pub use error_handling::{
    categorize_request_error, Error, ErrorType, InitializationError, RequestError, ResponseError,
};
pub use fetch::{collect_body, inflate_if_gzip, request, RequestOptions, Response};
pub use location::{QueryValue, ResolvedLocation};
pub use tls::client_config;
