//! HTTP header name constants.
//!
//! Header names are lowercase so they can be turned into
//! `http::HeaderName` values with `from_static`.

/// Connection management header (hop-by-hop).
pub const HEADER_CONNECTION: &str = "connection";
/// Keep-alive parameters header (hop-by-hop).
pub const HEADER_KEEP_ALIVE: &str = "keep-alive";

/// Headers meaningful only for a single connection.
///
/// These are removed from the caller's headers before every dispatch; each
/// attempt opens its own socket, so they can never be honoured.
pub const HOP_BY_HOP_HEADERS: &[&str] = &[HEADER_CONNECTION, HEADER_KEEP_ALIVE];

/// Response header carrying the body's content encoding.
pub const HEADER_CONTENT_ENCODING: &str = "content-encoding";
/// Content encoding that is inflated transparently.
pub const GZIP_ENCODING: &str = "gzip";
