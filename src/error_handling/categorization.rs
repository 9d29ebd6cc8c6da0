//! Error categorization.
//!
//! This module maps request failures onto [`ErrorType`] and reclassifies
//! low-level socket errors into the kinds callers branch on.

use std::io;

use super::types::{ErrorType, RequestError};

/// Categorizes a [`RequestError`] into an [`ErrorType`].
///
/// # Arguments
///
/// * `error` - The failure to categorize
///
/// # Returns
///
/// The appropriate `ErrorType` for the error.
pub fn categorize_request_error(error: &RequestError) -> ErrorType {
    match error {
        RequestError::InvalidUsage { .. } => ErrorType::InvalidUsage,
        RequestError::InvalidLocation { .. } => ErrorType::InvalidLocation,
        RequestError::UnsupportedProtocol { .. } => ErrorType::UnsupportedProtocol,
        RequestError::InvalidHeader(_) | RequestError::Http(_) => ErrorType::InvalidRequest,
        RequestError::ConnectionRefused(_) => ErrorType::ConnectionRefused,
        RequestError::Timeout(_) => ErrorType::Timeout,
        RequestError::Aborted => ErrorType::Aborted,
        RequestError::ResponseTooLarge { .. } => ErrorType::ResponseTooLarge,
        RequestError::MalformedResponseBody(_) | RequestError::Decompress(_) => {
            ErrorType::MalformedResponseBody
        }
        RequestError::Response(_) => ErrorType::Response,
        RequestError::InvalidRedirect { .. } => ErrorType::InvalidRedirect,
        RequestError::RedirectLoop { .. } => ErrorType::RedirectLoop,
        RequestError::TooManyRedirects { .. } => ErrorType::TooManyRedirects,
        RequestError::Transport(_)
        | RequestError::Io(_)
        | RequestError::Tls(_)
        | RequestError::InvalidServerName(_) => ErrorType::Transport,
    }
}

/// Reclassifies a socket error.
///
/// A refused connection becomes [`RequestError::ConnectionRefused`] so callers
/// can tell it apart from other transport failures without inspecting OS
/// error codes; everything else stays a plain I/O error.
pub(crate) fn classify_io_error(error: io::Error) -> RequestError {
    match error.kind() {
        io::ErrorKind::ConnectionRefused => RequestError::ConnectionRefused(error),
        _ => RequestError::Io(error),
    }
}
