// Shared test server for integration tests.
//
// One axum router is served on a loopback TCP port and on a Unix socket in a
// temporary directory, so every scenario can run over either transport.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::{Path, RawQuery},
    http::{
        header::{CONTENT_ENCODING, CONTENT_TYPE, LOCATION},
        HeaderMap, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::net::{TcpListener, UnixListener};
use url::form_urlencoded;

/// Content type the test server uses for text, as a browser-agnostic server would.
#[allow(dead_code)]
pub const SERVER_TEXT_TYPE: &str = "plain/text; charset=utf-8";

/// Running test server, reachable over TCP and over a Unix socket.
#[allow(dead_code)]
pub struct TestServer {
    pub port: u16,
    pub socket_path: PathBuf,
    _socket_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Absolute URL on the TCP listener.
    pub fn url(&self, path: &str) -> String {
        format!("http://localhost:{}{}", self.port, path)
    }
}

/// Starts the test server on an ephemeral port and a fresh socket path.
#[allow(dead_code)]
pub async fn start_test_server() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let port = listener.local_addr().expect("Failed to get address").port();
    let app = router(port);

    let socket_dir = tempfile::tempdir().expect("Failed to create socket dir");
    let socket_path = socket_dir.path().join("hoprequest.sock");
    let unix_listener = UnixListener::bind(&socket_path).expect("Failed to bind socket");

    let tcp_app = app.clone();
    tokio::spawn(async move {
        axum::serve(listener, tcp_app)
            .await
            .expect("Server failed to start");
    });
    tokio::spawn(async move {
        axum::serve(unix_listener, app)
            .await
            .expect("Socket server failed to start");
    });

    // Give servers time to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer {
        port,
        socket_path,
        _socket_dir: socket_dir,
    }
}

/// A loopback port with nothing listening on it.
#[allow(dead_code)]
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let port = listener.local_addr().expect("Failed to get address").port();
    drop(listener);
    port
}

/// Percent-encodes a value for use in a query string.
#[allow(dead_code)]
pub fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn router(port: u16) -> Router {
    Router::new()
        .route("/hello", get(hello))
        .route("/query", get(echo_query))
        .route("/headers", get(echo_headers))
        .route("/echo", post(echo_body).put(echo_body))
        .route("/post/sum", post(sum))
        .route(
            "/redirect",
            get(move || async move {
                redirect(&format!(
                    "http://localhost:{port}/hello?format=txt&otherQ=2"
                ))
            }),
        )
        .route(
            "/redirectNoHost",
            get(|| async { redirect("/hello?format=txt&otherQ=3") }),
        )
        .route("/redirectLoop", get(|| async { redirect("/redirectLoop") }))
        .route("/redirect400", get(|| async { redirect("/400") }))
        .route(
            "/redirectNoLocation",
            get(|| async { StatusCode::FOUND.into_response() }),
        )
        .route("/redirectTo", get(redirect_to))
        .route("/chain/{hops}", get(chain))
        .route(
            "/400",
            get(|| async { text_with_status(StatusCode::BAD_REQUEST, "BAD REQUEST") }),
        )
        .route("/json", get(|| async { Json(json!({ "ble": 2 })) }))
        .route(
            "/malformedJson",
            get(|| async {
                ([(CONTENT_TYPE, "application/json")], "{nope").into_response()
            }),
        )
        .route("/bytes/{len}", get(bytes_of_len))
        .route("/gzip", get(gzip))
        .route("/slow/{ms}", get(slow_body))
}

fn query_pairs(query: Option<String>) -> Vec<(String, String)> {
    form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .into_owned()
        .collect()
}

fn text_with_status(status: StatusCode, body: impl Into<String>) -> Response {
    (status, [(CONTENT_TYPE, SERVER_TEXT_TYPE)], body.into()).into_response()
}

fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}

async fn hello(RawQuery(query): RawQuery) -> Response {
    let pairs = query_pairs(query);
    let get = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };
    let other = get("otherQ").unwrap_or("1");
    match get("format") {
        Some("txt") => {
            let suffix = if other == "1" { "" } else { other };
            text_with_status(StatusCode::OK, format!("hello{suffix}"))
        }
        Some("json") => Json(json!({ "hello": other })).into_response(),
        _ => text_with_status(StatusCode::BAD_REQUEST, "missing format"),
    }
}

async fn echo_query(RawQuery(query): RawQuery) -> Json<Value> {
    let pairs: Vec<Value> = query_pairs(query)
        .into_iter()
        .map(|(k, v)| json!([k, v]))
        .collect();
    Json(Value::Array(pairs))
}

async fn echo_headers(headers: HeaderMap) -> Json<Value> {
    let map = headers
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                Value::String(value.to_str().unwrap_or_default().to_string()),
            )
        })
        .collect();
    Json(Value::Object(map))
}

async fn echo_body(headers: HeaderMap, body: Bytes) -> Response {
    match headers.get(CONTENT_TYPE) {
        Some(content_type) => ([(CONTENT_TYPE, content_type.clone())], body).into_response(),
        None => body.into_response(),
    }
}

async fn sum(Json(items): Json<Vec<Value>>) -> Json<Value> {
    let total: i64 = items.iter().filter_map(|item| item["val"].as_i64()).sum();
    Json(json!({ "sum": total }))
}

async fn redirect_to(RawQuery(query): RawQuery) -> Response {
    match query_pairs(query).into_iter().find(|(k, _)| k == "to") {
        Some((_, to)) => redirect(&to),
        None => text_with_status(StatusCode::BAD_REQUEST, "missing to"),
    }
}

async fn chain(Path(hops): Path<usize>) -> Response {
    if hops > 0 {
        redirect(&format!("/chain/{}", hops - 1))
    } else {
        text_with_status(StatusCode::OK, "done")
    }
}

async fn bytes_of_len(Path(len): Path<usize>) -> Response {
    (
        [(CONTENT_TYPE, "application/octet-stream")],
        vec![b'a'; len],
    )
        .into_response()
}

async fn gzip() -> Response {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(b"compressed hello")
        .expect("Failed to compress");
    let compressed = encoder.finish().expect("Failed to compress");
    (
        [(CONTENT_TYPE, SERVER_TEXT_TYPE), (CONTENT_ENCODING, "gzip")],
        compressed,
    )
        .into_response()
}

async fn slow_body(Path(ms): Path<u64>) -> Response {
    let stream = futures::stream::once(async move {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Ok::<_, std::convert::Infallible>(Bytes::from_static(b"late"))
    });
    (
        [(CONTENT_TYPE, SERVER_TEXT_TYPE)],
        Body::from_stream(stream),
    )
        .into_response()
}
