//! Request options.
//!
//! [`RequestOptions`] describes one logical request. It is consumed by
//! [`request`](super::request); every redirect hop derives a fresh value from
//! the previous one, so nothing the caller passes in is ever mutated.

use std::path::PathBuf;
use std::time::Duration;

use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use tokio_util::sync::CancellationToken;

use crate::body::RequestBody;
use crate::config::{DEFAULT_MAX_REDIRECTS, HOP_BY_HOP_HEADERS};
use crate::error_handling::RequestError;
use crate::location::QueryValue;

/// Options for one logical request, including the redirects it follows.
///
/// Build with [`RequestOptions::new`] and the chained setters:
///
/// ```
/// use std::time::Duration;
/// use hoprequest::RequestOptions;
///
/// let options = RequestOptions::new("http://localhost:8080/hello")
///     .query("format", "txt")
///     .follow_redirect(true)
///     .timeout(Duration::from_secs(5));
/// assert_eq!(options.url, "http://localhost:8080/hello");
/// ```
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Absolute URL, or a `/`-path when `socket_path` is set.
    pub url: String,
    /// HTTP method. Defaults to `GET`.
    pub method: Method,
    /// Extra query parameters, merged into every hop's URL.
    pub query: Vec<(String, QueryValue)>,
    /// Local socket that `/`-paths are sent to.
    pub socket_path: Option<PathBuf>,
    /// Caller headers. Hop-by-hop headers are dropped before sending.
    pub headers: HeaderMap,
    /// Maximum number of redirects followed. Defaults to 10.
    pub max_redirects: usize,
    /// Follow 3xx responses that carry a `Location`.
    pub follow_redirect: bool,
    /// Deadline for the response headers, and again for the body.
    pub timeout: Option<Duration>,
    /// Ceiling on the number of body bytes read.
    pub max_response: Option<usize>,
    /// Return non-2xx responses as results instead of errors.
    pub disable_throw: bool,
    /// Verify server certificates on `https:`. Defaults to `true`.
    pub reject_unauthorized: bool,
    /// Do not send the default `User-Agent`.
    pub disable_user_agent: bool,
    /// URLs visited so far, origin first.
    pub locations: Vec<String>,
    /// Request payload. Not allowed with `GET`.
    pub data: Option<RequestBody>,
    /// Cancels the request when triggered.
    pub cancel_token: Option<CancellationToken>,
}

impl RequestOptions {
    /// Options for a `GET` of `url` with every other setting at its default.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::GET,
            query: Vec::new(),
            socket_path: None,
            headers: HeaderMap::new(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            follow_redirect: false,
            timeout: None,
            max_response: None,
            disable_throw: false,
            reject_unauthorized: true,
            disable_user_agent: false,
            locations: Vec::new(),
            data: None,
            cancel_token: None,
        }
    }

    /// Sets the HTTP method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Adds an extra query parameter. Repeated keys are appended, not replaced.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets a header, replacing any previous value for the same name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets a header from strings.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidHeader`] when the name or value is not a
    /// valid HTTP header.
    pub fn try_header(self, name: &str, value: &str) -> Result<Self, RequestError> {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| RequestError::InvalidHeader(name.to_string()))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| RequestError::InvalidHeader(format!("{name}: {value}")))?;
        Ok(self.header(header_name, header_value))
    }

    /// Sends `/`-paths to the given local socket.
    pub fn socket_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.socket_path = Some(path.into());
        self
    }

    /// Enables or disables following redirects.
    pub fn follow_redirect(mut self, follow: bool) -> Self {
        self.follow_redirect = follow;
        self
    }

    /// Sets the maximum number of redirects followed.
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Sets the header and body deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the ceiling on body bytes.
    pub fn max_response(mut self, max: usize) -> Self {
        self.max_response = Some(max);
        self
    }

    /// Returns non-2xx responses as results.
    pub fn disable_throw(mut self, disable: bool) -> Self {
        self.disable_throw = disable;
        self
    }

    /// Enables or disables certificate verification.
    pub fn reject_unauthorized(mut self, reject: bool) -> Self {
        self.reject_unauthorized = reject;
        self
    }

    /// Suppresses the default `User-Agent` header.
    pub fn disable_user_agent(mut self, disable: bool) -> Self {
        self.disable_user_agent = disable;
        self
    }

    /// Sets the request payload.
    pub fn data(mut self, data: impl Into<RequestBody>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Attaches a cancellation token.
    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = Some(token);
        self
    }

    /// Drops hop-by-hop headers; they describe a single connection and are
    /// never forwarded.
    pub(crate) fn without_hop_by_hop_headers(mut self) -> Self {
        for name in HOP_BY_HOP_HEADERS {
            self.headers.remove(*name);
        }
        self
    }

    /// Options for the next hop of a redirect chain.
    pub(crate) fn for_hop(
        &self,
        url: String,
        socket_path: Option<PathBuf>,
        locations: Vec<String>,
    ) -> Self {
        Self {
            url,
            socket_path,
            locations,
            ..self.clone()
        }
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel_token
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}
