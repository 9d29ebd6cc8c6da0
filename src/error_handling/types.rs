//! Error type definitions.
//!
//! This module defines every failure a logical request can surface, the
//! status-carrying [`ResponseError`], and the outer [`Error`] that attaches the
//! redirect chain to whatever went wrong.

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::body::ResponseData;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// A response that ended the logical request without success.
///
/// Raised for any final status outside `[200, 300)` when `disable_throw` is not
/// set, including a 3xx that is not followed.
#[derive(Debug, Clone)]
pub struct ResponseError {
    /// Status of the final response.
    pub status: StatusCode,
    /// Headers of the final response.
    pub headers: HeaderMap,
    /// Body decoded according to the response content type.
    pub data: ResponseData,
    /// Raw (already inflated) body bytes.
    pub buffer: Bytes,
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request ended with status [{}]", self.status.as_u16())
    }
}

impl std::error::Error for ResponseError {}

/// Failures of a single logical request.
#[derive(Error, Debug)]
pub enum RequestError {
    /// A body was supplied for a `GET` request.
    #[error("cannot send data on method {method}")]
    InvalidUsage {
        /// Lowercased method name.
        method: String,
    },

    /// The URL is neither absolute nor a `/`-path, or resolves to no host and no socket.
    #[error("Bad url {url}")]
    InvalidLocation {
        /// The URL as supplied by the caller (or the redirect).
        url: String,
    },

    /// The URL uses a scheme other than `http:` or `https:`.
    #[error("unknown protocol [{protocol}]")]
    UnsupportedProtocol {
        /// Protocol including the trailing colon, e.g. `ftp:`.
        protocol: String,
    },

    /// The peer actively refused the connection.
    #[error("connection refused: {0}")]
    ConnectionRefused(#[source] std::io::Error),

    /// Headers or the full body did not arrive within the configured timeout.
    #[error("Response Timeout")]
    Timeout(Duration),

    /// The accumulated body exceeded `max_response`.
    #[error("response too big maxResponse {max} < {received}")]
    ResponseTooLarge {
        /// Configured ceiling in bytes.
        max: usize,
        /// Running total at the moment the ceiling was crossed.
        received: usize,
    },

    /// A followed 3xx carried no usable `Location` header.
    #[error("[{}] not valid from {url}", .location.as_deref().unwrap_or_default())]
    InvalidRedirect {
        /// Raw header value, if one was present but unreadable.
        location: Option<String>,
        /// URL of the hop that produced the redirect.
        url: String,
    },

    /// The redirect target was already visited.
    #[error(
        "loop redirect to [{location}] from [{from}][{status}] locations {}",
        .locations.join(",")
    )]
    RedirectLoop {
        /// `Location` header value.
        location: String,
        /// URL of the hop that produced the redirect.
        from: String,
        /// Redirect status code.
        status: u16,
        /// Chain visited before the loop was detected.
        locations: Vec<String>,
    },

    /// Following the redirect would exceed `max_redirects` hops.
    #[error("too many redirects to [{location}] from [{from}][{status}]")]
    TooManyRedirects {
        /// `Location` header value.
        location: String,
        /// URL of the hop that produced the redirect.
        from: String,
        /// Redirect status code.
        status: u16,
        /// Configured hop limit.
        max_redirects: usize,
    },

    /// The final response had a non-success status.
    #[error(transparent)]
    Response(Box<ResponseError>),

    /// A JSON-typed response body could not be parsed.
    #[error("malformed response body: {0}")]
    MalformedResponseBody(#[from] serde_json::Error),

    /// A gzip-encoded response body could not be inflated.
    #[error("failed to inflate gzip response: {0}")]
    Decompress(#[source] std::io::Error),

    /// The caller's cancellation token fired.
    #[error("aborted")]
    Aborted,

    /// A header name or value supplied by the caller is not valid HTTP.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// The request could not be assembled.
    #[error("failed to build request: {0}")]
    Http(#[from] http::Error),

    /// HTTP/1.1 protocol or stream failure.
    #[error("transport error: {0}")]
    Transport(#[from] hyper::Error),

    /// Socket-level failure other than a refused connection.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS configuration or handshake failure reported by rustls.
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    /// The host name cannot be used for TLS server name indication.
    #[error("invalid TLS server name: {0}")]
    InvalidServerName(#[from] rustls::pki_types::InvalidDnsNameError),
}

impl From<ResponseError> for RequestError {
    fn from(err: ResponseError) -> Self {
        RequestError::Response(Box::new(err))
    }
}

/// Error returned by [`crate::request`].
///
/// Wraps the [`RequestError`] together with the redirect chain known at the
/// point of failure: the original request URL, the hop that was being
/// requested (if any redirect happened) and the visited locations.
#[derive(Error, Debug)]
#[error("{kind}")]
pub struct Error {
    kind: RequestError,
    url: String,
    redirected_url: Option<String>,
    locations: Vec<String>,
}

impl Error {
    pub(crate) fn new(kind: RequestError, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            redirected_url: None,
            locations: Vec::new(),
        }
    }

    pub(crate) fn with_chain(
        kind: RequestError,
        url: impl Into<String>,
        redirected_url: Option<String>,
        locations: Vec<String>,
    ) -> Self {
        Self {
            kind,
            url: url.into(),
            redirected_url,
            locations,
        }
    }

    /// The underlying failure.
    pub fn kind(&self) -> &RequestError {
        &self.kind
    }

    /// Consumes the error, returning the underlying failure.
    pub fn into_kind(self) -> RequestError {
        self.kind
    }

    /// Stable category of the failure.
    pub fn error_type(&self) -> ErrorType {
        super::categorization::categorize_request_error(&self.kind)
    }

    /// URL of the original request.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// URL of the hop that failed, when at least one redirect was followed.
    pub fn redirected_url(&self) -> Option<&str> {
        self.redirected_url.as_deref()
    }

    /// Every URL visited before the failure, origin first. Empty when no redirect happened.
    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    /// The status-carrying response, if the failure was a non-success status.
    pub fn response(&self) -> Option<&ResponseError> {
        match &self.kind {
            RequestError::Response(resp) => Some(resp),
            _ => None,
        }
    }

    /// Status of the final response, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        self.response().map(|resp| resp.status)
    }

    /// True when the failure was a header or body timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, RequestError::Timeout(_))
    }

    /// True when the peer refused the connection.
    pub fn is_connection_refused(&self) -> bool {
        matches!(self.kind, RequestError::ConnectionRefused(_))
    }
}

/// Category of a request failure.
///
/// Lets callers branch on the kind of failure without matching on every
/// transport-specific variant of [`RequestError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // Local validation, no I/O performed
    /// Body supplied for `GET`.
    InvalidUsage,
    /// URL is neither absolute nor a socket path.
    InvalidLocation,
    /// Scheme other than `http:`/`https:`.
    UnsupportedProtocol,
    /// Request could not be assembled.
    InvalidRequest,
    // Transport
    /// Nothing listening on the target.
    ConnectionRefused,
    /// Headers or body did not arrive in time.
    Timeout,
    /// Any other socket, TLS or HTTP/1.1 failure.
    Transport,
    /// Cancelled by the caller.
    Aborted,
    // Response handling
    /// Body exceeded `max_response`.
    ResponseTooLarge,
    /// Body did not match its content type.
    MalformedResponseBody,
    /// Non-2xx final status.
    Response,
    // Redirects
    /// 3xx without a usable `Location`.
    InvalidRedirect,
    /// Redirect to an already visited URL.
    RedirectLoop,
    /// Hop limit exceeded.
    TooManyRedirects,
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    /// Human-readable description.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::InvalidUsage => "Invalid usage",
            ErrorType::InvalidLocation => "Invalid location",
            ErrorType::UnsupportedProtocol => "Unsupported protocol",
            ErrorType::InvalidRequest => "Invalid request",
            ErrorType::ConnectionRefused => "Connection refused",
            ErrorType::Timeout => "Response timeout",
            ErrorType::Transport => "Transport error",
            ErrorType::Aborted => "Aborted",
            ErrorType::ResponseTooLarge => "Response too large",
            ErrorType::MalformedResponseBody => "Malformed response body",
            ErrorType::Response => "Response error",
            ErrorType::InvalidRedirect => "Invalid redirect",
            ErrorType::RedirectLoop => "Redirect loop",
            ErrorType::TooManyRedirects => "Too many redirects",
        }
    }

    /// Stable identifier, suitable for logs and for matching in scripts.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorType::InvalidUsage => "InvalidUsageError",
            ErrorType::InvalidLocation => "InvalidLocationError",
            ErrorType::UnsupportedProtocol => "UnsupportedProtocolError",
            ErrorType::InvalidRequest => "InvalidRequestError",
            ErrorType::ConnectionRefused => "ResponseConnectionRefusedError",
            ErrorType::Timeout => "ResponseTimeoutError",
            ErrorType::Transport => "TransportError",
            ErrorType::Aborted => "AbortError",
            ErrorType::ResponseTooLarge => "ResponseTooLargeError",
            ErrorType::MalformedResponseBody => "MalformedResponseBodyError",
            ErrorType::Response => "ResponseError",
            ErrorType::InvalidRedirect => "InvalidRedirectError",
            ErrorType::RedirectLoop => "RedirectLoopError",
            ErrorType::TooManyRedirects => "TooManyRedirectsError",
        }
    }
}
