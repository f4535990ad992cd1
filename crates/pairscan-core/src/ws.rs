//! WebSocket control-connection helper, ported from `k4_core::ws::client`.
//!
//! The teacher's `WsConnection` subscribes once and streams forever into a
//! callback. C5's validator has a different lifecycle — subscribe a batch,
//! observe for a bounded window, subscribe the next batch on the *same*
//! connection, reconnect with backoff if the connection drops — so this
//! module keeps only the two primitives every one of those steps needs
//! (connect-with-backoff, and a raw connect), and leaves batch orchestration
//! to `pairscan_validate::engine`, the same way the teacher splits "how to
//! hold a socket open" (`k4_core::ws::client`) from "what to do with it"
//! (`k4_md::pipeline`).

use std::collections::HashMap;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::http::Request};
use tracing::{error, info, warn};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connection-level configuration (not batch-level — no subscribe message
/// here, since a single connection is reused across many batches).
#[derive(Debug, Clone)]
pub struct WsConnConfig {
    pub url: String,
    pub extra_headers: HashMap<String, String>,
}

impl WsConnConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), extra_headers: HashMap::new() }
    }
}

/// Establishes a single TLS WebSocket connection, no retry.
pub async fn connect(config: &WsConnConfig) -> anyhow::Result<WsStream> {
    let mut request = Request::builder().uri(&config.url).header("Host", extract_host(&config.url));
    for (key, value) in &config.extra_headers {
        request = request.header(key.as_str(), value.as_str());
    }
    let request = request.body(())?;
    let (stream, _response) = tokio_tungstenite::connect_async(request).await?;
    Ok(stream)
}

/// Connects with up to `max_attempts` tries, exponential backoff starting at
/// `base_backoff` and capped at `max_backoff` between attempts (spec.md
/// §4.5's reconnect policy: "100ms base, cap 30s", `max_attempts = 5`).
pub async fn connect_with_backoff(
    config: &WsConnConfig,
    max_attempts: u32,
    base_backoff: Duration,
    max_backoff: Duration,
) -> anyhow::Result<WsStream> {
    let mut backoff = base_backoff;
    let mut last_err = None;

    for attempt in 1..=max_attempts {
        info!("[ws] connecting to {} (attempt {attempt}/{max_attempts})", config.url);
        match connect(config).await {
            Ok(stream) => {
                info!("[ws] connected to {}", config.url);
                return Ok(stream);
            }
            Err(e) => {
                warn!("[ws] connect to {} failed: {e} (attempt {attempt}/{max_attempts})", config.url);
                last_err = Some(e);
                if attempt < max_attempts {
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(max_backoff);
                }
            }
        }
    }

    error!("[ws] exhausted {max_attempts} connection attempts to {}", config.url);
    Err(last_err.unwrap_or_else(|| anyhow::anyhow!("connection attempts exhausted")))
}

fn extract_host(url: &str) -> String {
    url::Url::parse(url).map(|u| u.host_str().unwrap_or("").to_string()).unwrap_or_default()
}
