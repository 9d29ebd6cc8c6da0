//! Request and response body encoding.
//!
//! Outgoing payloads are a tagged union chosen by the caller ([`RequestBody`]);
//! the codec only decides the wire bytes and the default `Content-Type`.
//! Incoming bodies are decoded once, from the response `Content-Type`, into
//! [`ResponseData`].

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::HeaderMap;
use serde::Serialize;

use crate::config::{JSON_TYPE, TEXT_TYPE};
use crate::error_handling::RequestError;

/// Payload of an outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Raw bytes, sent untouched whatever the content type.
    Bytes(Bytes),
    /// Text, sent as UTF-8. Defaults the content type to plain text.
    Text(String),
    /// Structured data, serialized to JSON. Defaults the content type to JSON.
    Json(serde_json::Value),
}

impl RequestBody {
    /// Builds a JSON body from any serializable value.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(RequestBody::Json(serde_json::to_value(value)?))
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        RequestBody::Text(text.to_string())
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Text(text)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        RequestBody::Bytes(Bytes::from(bytes))
    }
}

impl From<Bytes> for RequestBody {
    fn from(bytes: Bytes) -> Self {
        RequestBody::Bytes(bytes)
    }
}

impl From<serde_json::Value> for RequestBody {
    fn from(value: serde_json::Value) -> Self {
        RequestBody::Json(value)
    }
}

/// Wire form of a request body plus the headers it implies.
#[derive(Debug, Clone)]
pub struct EncodedBody {
    /// Caller headers with the default `Content-Type` filled in when needed.
    pub headers: HeaderMap,
    /// Bytes to send.
    pub body: Bytes,
}

impl EncodedBody {
    /// Value for the `Content-Length` header.
    pub fn content_length(&self) -> usize {
        self.body.len()
    }
}

/// Encodes the outgoing payload and fills in the default content type.
///
/// The caller's `Content-Type` always wins. Without one, text defaults to
/// [`TEXT_TYPE`] and structured data to [`JSON_TYPE`]; raw bytes and empty
/// requests get no content type.
pub fn encode_request_body(headers: &HeaderMap, data: Option<&RequestBody>) -> EncodedBody {
    let mut headers = headers.clone();
    let has_type = headers.contains_key(CONTENT_TYPE);

    let body = match data {
        None => Bytes::new(),
        Some(RequestBody::Bytes(bytes)) => bytes.clone(),
        Some(RequestBody::Text(text)) => {
            if !has_type {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_TYPE));
            }
            Bytes::from(text.clone().into_bytes())
        }
        Some(RequestBody::Json(value)) => {
            if !has_type {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_TYPE));
            }
            Bytes::from(value.to_string().into_bytes())
        }
    };

    EncodedBody { headers, body }
}

/// Decoded body of a response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseData {
    /// Parsed JSON document (content type contains `json`).
    Json(serde_json::Value),
    /// UTF-8 text (content type contains `text`).
    Text(String),
    /// Anything else, untouched.
    Bytes(Bytes),
}

impl ResponseData {
    /// The JSON document, if the body was decoded as JSON.
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ResponseData::Json(value) => Some(value),
            _ => None,
        }
    }

    /// The text, if the body was decoded as text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseData::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The raw bytes, if the body was left opaque.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            ResponseData::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }
}

/// Decodes a response body according to its content type.
///
/// `json` takes precedence over `text`; any other (or missing) content type
/// yields the raw bytes. An empty JSON-typed body decodes to `null`.
///
/// # Errors
///
/// Returns [`RequestError::MalformedResponseBody`] when a JSON-typed body does
/// not parse.
pub fn decode_response_body(
    content_type: Option<&str>,
    buffer: &Bytes,
) -> Result<ResponseData, RequestError> {
    let content_type = content_type.map(str::to_ascii_lowercase);
    match content_type.as_deref() {
        Some(ct) if ct.contains("json") => {
            if buffer.is_empty() {
                return Ok(ResponseData::Json(serde_json::Value::Null));
            }
            Ok(ResponseData::Json(serde_json::from_slice(buffer)?))
        }
        Some(ct) if ct.contains("text") => Ok(ResponseData::Text(
            String::from_utf8_lossy(buffer).into_owned(),
        )),
        _ => Ok(ResponseData::Bytes(buffer.clone())),
    }
}
