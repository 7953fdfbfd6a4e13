//! Local HTTP server for download tests.
//!
//! Routes:
//! - `/bytes/:n` - `n` deterministic bytes with no CR before an LF, so the
//!   saved file is byte-identical to the payload
//! - `/binary` - [`BINARY_BODY`], which does contain CR LF pairs
//! - `/status/:code` - an empty response with that status
//! - `/scripts/*blob` - a CRLF shell script, only for SAS-signed requests
//! - `/locked/*blob` - always 403

use std::net::SocketAddr;

use axum::Router;
use axum::extract::{Path, RawQuery};
use axum::http::StatusCode;
use axum::routing::get;

/// Body served for every blob under `/scripts`.
pub const SCRIPT_BODY: &str = "#!/bin/sh\r\necho hello\r\n";

/// Binary payload with CR LF pairs. Every artifact is normalized, so these
/// bytes do not survive a download unchanged.
pub const BINARY_BODY: &[u8] = b"\x00\x01\r\n\xff\r\r\n\x02\r";

/// Shared key used by blob tests ("foo\n" in base64).
pub const TEST_KEY: &str = "Zm9vCg==";

/// Account used by blob tests.
pub const TEST_ACCOUNT: &str = "acct";

/// Host name blob tests resolve to the local server.
pub const TEST_BLOB_HOST: &str = "acct.blob.test.local";

/// Start the server on an ephemeral port. It runs until the test runtime stops.
pub async fn spawn_server() -> SocketAddr {
    let app = Router::new()
        .route("/bytes/:n", get(bytes))
        .route("/binary", get(|| async { BINARY_BODY }))
        .route("/status/:code", get(status))
        .route("/scripts/*blob", get(script))
        .route("/locked/*blob", get(|| async { StatusCode::FORBIDDEN }));

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

async fn bytes(Path(n): Path<usize>) -> Vec<u8> {
    (0..n).map(|i| (i % 251) as u8).collect()
}

async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}

async fn script(Path(_blob): Path<String>, RawQuery(query): RawQuery) -> (StatusCode, String) {
    let query = query.unwrap_or_default();
    let signed = ["sig=", "se=", "sr=b", "sp=r", "sv="]
        .iter()
        .all(|key| query.contains(key));

    if signed {
        (StatusCode::OK, SCRIPT_BODY.to_string())
    } else {
        (StatusCode::FORBIDDEN, String::new())
    }
}
