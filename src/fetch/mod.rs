//! Request orchestration.
//!
//! A logical request is a chain of attempts: validate the options, resolve the
//! location, encode the body, dispatch, collect and decode the response, then
//! either stop or follow a redirect and go again. Every failure is returned
//! with the chain it happened on.

mod collect;
mod redirects;
mod request;
mod response;
mod transport;

use http::header::{CONTENT_TYPE, LOCATION};
use http::Method;
use log::debug;

use crate::body::{decode_response_body, encode_request_body};
use crate::error_handling::{Error, RequestError, ResponseError};
use crate::location::{parse_location, ResolvedLocation};

pub use collect::{collect_body, inflate_if_gzip};
pub use request::RequestOptions;
pub use response::Response;

use transport::{dispatch, CollectedResponse, Dispatch};

/// Sends a request and follows redirects according to `options`.
///
/// # Errors
///
/// Returns an [`Error`] carrying the failure kind plus the original URL, the
/// hop that failed (if a redirect was followed) and the visited chain.
/// Non-2xx statuses fail with [`RequestError::Response`] unless
/// `disable_throw` is set; transport failures always fail.
pub async fn request(options: RequestOptions) -> Result<Response, Error> {
    if options.method == Method::GET && options.data.is_some() {
        return Err(Error::new(
            RequestError::InvalidUsage {
                method: options.method.as_str().to_ascii_lowercase(),
            },
            options.url,
        ));
    }

    let original_url = options.url.clone();
    let mut current = options.without_hop_by_hop_headers();
    let mut hops = 0usize;

    loop {
        let (location, collected) = attempt(&current)
            .await
            .map_err(|kind| chain_error(kind, &original_url, &current, hops))?;
        let CollectedResponse {
            status,
            headers,
            buffer,
        } = collected;

        let (data, buffer) = inflate_if_gzip(&headers, buffer, current.max_response)
            .and_then(|buffer| {
                let content_type = headers
                    .get(CONTENT_TYPE)
                    .and_then(|value| value.to_str().ok());
                let data = decode_response_body(content_type, &buffer)?;
                Ok((data, buffer))
            })
            .map_err(|kind| chain_error(kind, &original_url, &current, hops))?;

        if status.is_redirection() && current.follow_redirect {
            let hop = redirects::next_hop(&current, &location, status, headers.get(LOCATION))
                .map_err(|kind| chain_error(kind, &original_url, &current, hops))?;
            current = current.for_hop(hop.url, hop.socket_path, hop.locations);
            hops += 1;
            continue;
        }

        let redirected_url = (hops > 0).then(|| current.url.clone());
        if status.is_success() || current.disable_throw {
            return Ok(Response {
                url: original_url,
                redirected_url,
                locations: current.locations,
                status,
                headers,
                data,
                buffer,
            });
        }

        let failure = ResponseError {
            status,
            headers,
            data,
            buffer,
        };
        return Err(chain_error(failure.into(), &original_url, &current, hops));
    }
}

/// Runs one attempt up to a fully read body.
async fn attempt(
    options: &RequestOptions,
) -> Result<(ResolvedLocation, CollectedResponse), RequestError> {
    let encoded = encode_request_body(&options.headers, options.data.as_ref());
    let location = parse_location(&options.url, &options.query, options.socket_path.as_deref())?;
    if location.hostname.is_none() && location.socket_path.is_none() {
        return Err(RequestError::InvalidLocation {
            url: options.url.clone(),
        });
    }

    if options.is_cancelled() {
        return Err(RequestError::Aborted);
    }

    let stream = dispatch(Dispatch {
        location: &location,
        method: options.method.clone(),
        headers: &encoded.headers,
        body: encoded.body,
        timeout: options.timeout,
        reject_unauthorized: options.reject_unauthorized,
        disable_user_agent: options.disable_user_agent,
        cancel_token: options.cancel_token.as_ref(),
    })
    .await?;
    let collected = stream.collect(options.max_response, options.timeout).await?;

    if options.is_cancelled() {
        return Err(RequestError::Aborted);
    }

    debug!("{} {} -> {}", options.method, location.url, collected.status);
    Ok((location, collected))
}

/// Attaches the chain of the attempt in progress to a failure.
fn chain_error(
    kind: RequestError,
    original_url: &str,
    current: &RequestOptions,
    hops: usize,
) -> Error {
    debug!("request to {} failed: {}", current.url, kind);
    let redirected_url = (hops > 0).then(|| current.url.clone());
    Error::with_chain(kind, original_url, redirected_url, current.locations.clone())
}
