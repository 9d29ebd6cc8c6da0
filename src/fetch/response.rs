//! Result of a logical request.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};

use crate::body::ResponseData;

/// A completed response, after any redirects.
#[derive(Debug, Clone)]
pub struct Response {
    /// URL of the original request.
    pub url: String,
    /// URL of the final hop, when at least one redirect was followed.
    pub redirected_url: Option<String>,
    /// Every URL visited, origin first. Empty when no redirect happened.
    pub locations: Vec<String>,
    /// Status of the final response.
    pub status: StatusCode,
    /// Headers of the final response.
    pub headers: HeaderMap,
    /// Body decoded according to its content type.
    pub data: ResponseData,
    /// Raw body bytes, after gzip inflation.
    pub buffer: Bytes,
}

impl Response {
    /// True for a 2xx status.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// URL the final response came from.
    pub fn final_url(&self) -> &str {
        self.redirected_url.as_deref().unwrap_or(&self.url)
    }

    /// The body as text, if it was decoded as text.
    pub fn text(&self) -> Option<&str> {
        self.data.as_text()
    }

    /// The body as JSON, if it was decoded as JSON.
    pub fn json(&self) -> Option<&serde_json::Value> {
        self.data.as_json()
    }
}
