//! Redirect handling.
//!
//! This module decides where a followed 3xx leads: it resolves the `Location`
//! header against the hop that produced it, detects loops and enforces the hop
//! limit. The orchestrator owns the loop; this is the per-hop decision.

use std::path::PathBuf;

use http::header::HeaderValue;
use http::StatusCode;
use log::{debug, warn};

use crate::error_handling::RequestError;
use crate::fetch::request::RequestOptions;
use crate::location::{parse_location, ResolvedLocation};

/// Where the next attempt goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Hop {
    /// URL of the next attempt, with the origin filled in for host-less paths.
    pub url: String,
    /// Socket the next attempt uses, if its URL is a `/`-path.
    pub socket_path: Option<PathBuf>,
    /// Chain including the new URL, origin first.
    pub locations: Vec<String>,
}

/// Computes the next hop for a redirect response.
///
/// # Arguments
///
/// * `current` - Options of the attempt that received the redirect
/// * `previous` - Location that attempt was sent to
/// * `status` - Redirect status code
/// * `location_header` - The response's `Location` header, if any
///
/// # Errors
///
/// - [`RequestError::InvalidRedirect`] when there is no readable `Location`
/// - [`RequestError::InvalidLocation`] when it cannot be resolved
/// - [`RequestError::RedirectLoop`] when the target was already visited
/// - [`RequestError::TooManyRedirects`] when the hop would exceed
///   `max_redirects`
pub(crate) fn next_hop(
    current: &RequestOptions,
    previous: &ResolvedLocation,
    status: StatusCode,
    location_header: Option<&HeaderValue>,
) -> Result<Hop, RequestError> {
    let raw = match location_header {
        Some(value) => value.to_str().map_err(|_| {
            let lossy = String::from_utf8_lossy(value.as_bytes()).into_owned();
            warn!("unreadable location header [{lossy}] from {}", current.url);
            RequestError::InvalidRedirect {
                location: Some(lossy),
                url: current.url.clone(),
            }
        })?,
        None => {
            return Err(RequestError::InvalidRedirect {
                location: None,
                url: current.url.clone(),
            })
        }
    };

    let target = parse_location(raw, &current.query, current.socket_path.as_deref())?;
    let url = match (&target.hostname, &target.socket_path, previous.origin()) {
        (None, None, Some(origin)) => format!("{origin}{}", target.url),
        _ => target.url.clone(),
    };

    if url == current.url || current.locations.contains(&url) {
        return Err(RequestError::RedirectLoop {
            location: raw.to_string(),
            from: current.url.clone(),
            status: status.as_u16(),
            locations: current.locations.clone(),
        });
    }

    let mut locations = if current.locations.is_empty() {
        vec![current.url.clone()]
    } else {
        current.locations.clone()
    };
    locations.push(url.clone());

    if locations.len() - 1 > current.max_redirects {
        return Err(RequestError::TooManyRedirects {
            location: raw.to_string(),
            from: current.url.clone(),
            status: status.as_u16(),
            max_redirects: current.max_redirects,
        });
    }

    debug!(
        "redirecting to [{}] from [{}][{}]",
        url,
        current.url,
        status.as_u16()
    );

    Ok(Hop {
        url,
        socket_path: target.socket_path,
        locations,
    })
}
