//! Transport dispatch.
//!
//! Opens one connection per attempt (plain TCP, TLS, or a Unix socket), sends
//! the request with hyper's HTTP/1.1 client connection and hands back the
//! response head together with a body stream that owns the connection.

use std::path::Path;
use std::time::Duration;

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_LENGTH, HOST, USER_AGENT};
use http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::client::conn::http1::{self, SendRequest};
use hyper_util::rt::TokioIo;
use log::{debug, error};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::{
    DEFAULT_HTTPS_PORT, DEFAULT_HTTP_PORT, DEFAULT_USER_AGENT, LOCAL_SOCKET_HOST,
};
use crate::error_handling::{classify_io_error, RequestError};
use crate::location::ResolvedLocation;
use crate::tls;

use super::collect::collect_body;

/// Everything needed to send one attempt.
pub(crate) struct Dispatch<'a> {
    pub location: &'a ResolvedLocation,
    pub method: Method,
    /// Caller headers, with the body's content type already filled in.
    pub headers: &'a HeaderMap,
    pub body: Bytes,
    pub timeout: Option<Duration>,
    pub reject_unauthorized: bool,
    pub disable_user_agent: bool,
    pub cancel_token: Option<&'a CancellationToken>,
}

/// Aborts the spawned connection task when dropped.
struct ConnectionTask(JoinHandle<()>);

impl Drop for ConnectionTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Response head plus the unread body.
///
/// Owns the connection: dropping the stream, whether the body was read or
/// not, closes the socket.
pub(crate) struct ResponseStream {
    status: StatusCode,
    headers: HeaderMap,
    body: Incoming,
    sender: SendRequest<Full<Bytes>>,
    connection: ConnectionTask,
}

/// A fully read response.
#[derive(Debug)]
pub(crate) struct CollectedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub buffer: Bytes,
}

impl ResponseStream {
    /// Reads the body, bounded by `max_response` bytes and `timeout`, then
    /// closes the connection.
    pub(crate) async fn collect(
        self,
        max_response: Option<usize>,
        timeout: Option<Duration>,
    ) -> Result<CollectedResponse, RequestError> {
        let ResponseStream {
            status,
            headers,
            body,
            sender,
            connection,
        } = self;
        let buffer = collect_body(body, max_response, timeout).await;
        drop(sender);
        drop(connection);
        Ok(CollectedResponse {
            status,
            headers,
            buffer: buffer?,
        })
    }
}

/// Sends one attempt and waits for the response headers.
///
/// # Errors
///
/// - [`RequestError::UnsupportedProtocol`] for anything but `http:`/`https:`
/// - [`RequestError::ConnectionRefused`] when nothing listens on the target
/// - [`RequestError::Timeout`] when headers do not arrive within `timeout`;
///   the connection is torn down
/// - [`RequestError::Aborted`] when the cancel token fired while waiting
pub(crate) async fn dispatch(target: Dispatch<'_>) -> Result<ResponseStream, RequestError> {
    let location = target.location;
    let secure = match location.protocol.as_str() {
        "http:" => false,
        "https:" => true,
        other => {
            return Err(RequestError::UnsupportedProtocol {
                protocol: other.to_string(),
            })
        }
    };

    let request = build_request(&target)?;
    debug!(
        "{} {} {}",
        target.method,
        location.url,
        match &location.socket_path {
            Some(path) => format!("via socket {}", path.display()),
            None => format!("via {}", location.protocol),
        }
    );

    let exchange = async {
        let (mut sender, connection) = open(location, secure, target.reject_unauthorized).await?;
        let response = sender.send_request(request).await?;
        Ok::<_, RequestError>((response, sender, connection))
    };

    // The headers timer covers connect, TLS and the request write; the body
    // gets a fresh one.
    let (response, sender, connection) = match target.timeout {
        Some(limit) => tokio::time::timeout(limit, exchange).await.map_err(|_| {
            debug!("no response headers from {} within {:?}", location.url, limit);
            RequestError::Timeout(limit)
        })??,
        None => exchange.await?,
    };

    if target.cancel_token.is_some_and(CancellationToken::is_cancelled) {
        return Err(RequestError::Aborted);
    }

    let (parts, body) = response.into_parts();
    Ok(ResponseStream {
        status: parts.status,
        headers: parts.headers,
        body,
        sender,
        connection,
    })
}

fn build_request(target: &Dispatch<'_>) -> Result<Request<Full<Bytes>>, RequestError> {
    let mut headers = HeaderMap::new();
    if !target.disable_user_agent {
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    }
    headers.extend(target.headers.clone());
    headers.insert(CONTENT_LENGTH, HeaderValue::from(target.body.len()));
    if !headers.contains_key(HOST) {
        headers.insert(HOST, host_header(target.location)?);
    }

    let mut request = Request::builder()
        .method(target.method.clone())
        .uri(target.location.path_and_query())
        .body(Full::new(target.body.clone()))?;
    *request.headers_mut() = headers;
    Ok(request)
}

fn host_header(location: &ResolvedLocation) -> Result<HeaderValue, RequestError> {
    let host = match (&location.hostname, location.port) {
        (Some(hostname), Some(port)) => format!("{hostname}:{port}"),
        (Some(hostname), None) => hostname.clone(),
        (None, _) => LOCAL_SOCKET_HOST.to_string(),
    };
    HeaderValue::from_str(&host).map_err(|_| RequestError::InvalidHeader(format!("host: {host}")))
}

async fn open(
    location: &ResolvedLocation,
    secure: bool,
    reject_unauthorized: bool,
) -> Result<(SendRequest<Full<Bytes>>, ConnectionTask), RequestError> {
    if let Some(hostname) = location.hostname.as_deref() {
        let port = location.port.unwrap_or(if secure {
            DEFAULT_HTTPS_PORT
        } else {
            DEFAULT_HTTP_PORT
        });
        let host = hostname.trim_start_matches('[').trim_end_matches(']');
        let stream = TcpStream::connect((host, port))
            .await
            .map_err(classify_io_error)?;
        if secure {
            let stream = tls::connect(stream, hostname, reject_unauthorized).await?;
            return handshake(stream).await;
        }
        return handshake(stream).await;
    }

    match location.socket_path.as_deref() {
        Some(path) => open_socket(path).await,
        None => Err(RequestError::InvalidLocation {
            url: location.url.clone(),
        }),
    }
}

#[cfg(unix)]
async fn open_socket(
    path: &Path,
) -> Result<(SendRequest<Full<Bytes>>, ConnectionTask), RequestError> {
    let stream = tokio::net::UnixStream::connect(path)
        .await
        .map_err(classify_io_error)?;
    handshake(stream).await
}

#[cfg(not(unix))]
async fn open_socket(
    path: &Path,
) -> Result<(SendRequest<Full<Bytes>>, ConnectionTask), RequestError> {
    Err(RequestError::Io(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        format!("local sockets are not supported here: {}", path.display()),
    )))
}

async fn handshake<T>(io: T) -> Result<(SendRequest<Full<Bytes>>, ConnectionTask), RequestError>
where
    T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (sender, connection) = http1::handshake(TokioIo::new(io)).await?;
    let task = tokio::spawn(async move {
        if let Err(e) = connection.await {
            error!("connection closed with error: {e}");
        }
    });
    Ok((sender, ConnectionTask(task)))
}
