//! Response body collection.
//!
//! Reads a body frame by frame with a byte ceiling and a deadline, then
//! inflates gzip-encoded payloads.

use std::io::Read;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use flate2::read::GzDecoder;
use http::HeaderMap;
use http_body_util::BodyExt;
use hyper::body::Body;
use log::debug;

use crate::config::{GZIP_ENCODING, HEADER_CONTENT_ENCODING};
use crate::error_handling::RequestError;

/// Reads `body` to the end, bounded by `max_response` bytes and `timeout`.
///
/// The timer starts when this is called, i.e. once headers have arrived.
/// Dropping the body on failure abandons the stream.
///
/// # Errors
///
/// - [`RequestError::ResponseTooLarge`] as soon as the running total exceeds
///   `max_response`
/// - [`RequestError::Timeout`] if the body is not complete before `timeout`
/// - any error raised by the stream itself, unchanged
pub async fn collect_body<B>(
    body: B,
    max_response: Option<usize>,
    timeout: Option<Duration>,
) -> Result<Bytes, RequestError>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: Into<RequestError>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, read_body(body, max_response))
            .await
            .map_err(|_| RequestError::Timeout(limit))?,
        None => read_body(body, max_response).await,
    }
}

async fn read_body<B>(mut body: B, max_response: Option<usize>) -> Result<Bytes, RequestError>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: Into<RequestError>,
{
    let mut chunks: Vec<Bytes> = Vec::new();
    let mut received = 0usize;

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(Into::<RequestError>::into)?;
        let Ok(chunk) = frame.into_data() else {
            continue;
        };
        received += chunk.len();
        if let Some(max) = max_response {
            if received > max {
                return Err(RequestError::ResponseTooLarge { max, received });
            }
        }
        chunks.push(chunk);
    }

    let mut buffer = BytesMut::with_capacity(received);
    for chunk in chunks {
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer.freeze())
}

/// Inflates `buffer` when the response declares `content-encoding: gzip`.
///
/// Any other encoding is passed through untouched. The inflated size is held
/// to the same `max_response` ceiling as the bytes on the wire.
///
/// # Errors
///
/// - [`RequestError::Decompress`] when the payload is not valid gzip
/// - [`RequestError::ResponseTooLarge`] when the inflated body exceeds
///   `max_response`
pub fn inflate_if_gzip(
    headers: &HeaderMap,
    buffer: Bytes,
    max_response: Option<usize>,
) -> Result<Bytes, RequestError> {
    let is_gzip = headers
        .get(HEADER_CONTENT_ENCODING)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim().eq_ignore_ascii_case(GZIP_ENCODING));
    if !is_gzip {
        return Ok(buffer);
    }

    let limit = max_response.map_or(u64::MAX, |max| (max as u64).saturating_add(1));
    let mut inflated = Vec::new();
    GzDecoder::new(buffer.as_ref())
        .take(limit)
        .read_to_end(&mut inflated)
        .map_err(RequestError::Decompress)?;
    if let Some(max) = max_response {
        if inflated.len() > max {
            return Err(RequestError::ResponseTooLarge {
                max,
                received: inflated.len(),
            });
        }
    }
    debug!(
        "inflated gzip body from {} to {} bytes",
        buffer.len(),
        inflated.len()
    );
    Ok(Bytes::from(inflated))
}
