//! Configuration constants.
//!
//! This module defines the defaults applied to every logical request when the
//! caller leaves the corresponding option unset.

// Redirect handling
/// Maximum number of redirect hops followed when `max_redirects` is not set.
///
/// Bounds the number of hops (`locations.len() - 1`), not the number of
/// entries in the location chain.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Default User-Agent string for outgoing requests.
///
/// Injected on every attempt unless the caller sets its own `User-Agent`
/// header or disables the default with `disable_user_agent`.
pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

// Content types
/// Content type assigned to structured (JSON) request bodies without an explicit type.
pub const JSON_TYPE: &str = "application/json; charset=utf-8";
/// Content type assigned to text request bodies without an explicit type.
pub const TEXT_TYPE: &str = "text/plain; charset=utf-8";

/// Host name used for the synthetic origin that `/`-paths are resolved against.
///
/// Also sent as the `Host` header for requests over a local socket.
pub const LOCAL_SOCKET_HOST: &str = "localhost";

/// ALPN protocol advertised on TLS connections (HTTP/1.1 only).
pub const ALPN_HTTP1: &[u8] = b"http/1.1";

// Connect defaults
/// Port used for `http:` URLs without an explicit port.
pub const DEFAULT_HTTP_PORT: u16 = 80;
/// Port used for `https:` URLs without an explicit port.
pub const DEFAULT_HTTPS_PORT: u16 = 443;
