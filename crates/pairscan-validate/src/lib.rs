//! # pairscan-validate
//!
//! C5 (Live Validator): per-source control connection, batched subscribe,
//! bounded observation, reconnect-with-backoff. One module per venue
//! supplies the subscribe-message builder and tick parser; `engine` runs
//! the shared batch loop; this crate's root ties a source to its venue
//! module and its connection lifecycle.

pub mod binance;
pub mod bybit;
pub mod engine;
pub mod mexc;
pub mod okx;

use std::collections::BTreeSet;
use std::time::Duration;

use futures::future::join_all;
use pairscan_core::SourceId;
use pairscan_core::types::{InvalidityReason, ValidationResult};
use pairscan_core::ws::{WsConnConfig, connect_with_backoff};
use tokio_tungstenite::tungstenite::Message;
use tracing::warn;

use crate::engine::ParseOutcome;

/// Default public WebSocket URL per source (spec.md §6), before any
/// `exchanges.toml` override.
pub fn default_ws_url(source: SourceId) -> &'static str {
    match source {
        SourceId::BinanceSpot => "wss://stream.binance.com:9443/ws",
        SourceId::BinanceFutures => "wss://fstream.binance.com/ws",
        SourceId::BybitSpot => "wss://stream.bybit.com/v5/public/spot",
        SourceId::BybitFutures => "wss://stream.bybit.com/v5/public/linear",
        SourceId::MexcSpot => "wss://wbs-api.mexc.com/ws",
        SourceId::MexcFutures => "wss://contract.mexc.com/ws",
        SourceId::OkxSpot | SourceId::OkxFutures => "wss://ws.okx.com:8443/ws/v5/public",
    }
}

/// Max reconnect attempts after a mid-source connection drop (spec.md §4.5).
const RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_BASE_BACKOFF: Duration = Duration::from_millis(100);
const RECONNECT_MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Builds the subscribe message(s) for one batch. Every venue but MEXC
/// futures covers the whole batch with a single combined message; MEXC
/// futures needs one message per symbol (`mexc::futures_subscribe_messages`),
/// so this returns a `Vec` uniformly and `engine::run_batch` sends all of it.
fn build_subscribe(source: SourceId, batch: &[(u16, String)]) -> Vec<Message> {
    let symbols: Vec<String> = batch.iter().map(|(_, s)| s.clone()).collect();
    match source {
        SourceId::BinanceSpot | SourceId::BinanceFutures => vec![binance::subscribe_message(&symbols)],
        SourceId::BybitSpot | SourceId::BybitFutures => vec![bybit::subscribe_message(&symbols)],
        SourceId::MexcSpot => vec![mexc::spot_subscribe_message(&symbols)],
        SourceId::MexcFutures => mexc::futures_subscribe_messages(&symbols),
        SourceId::OkxSpot | SourceId::OkxFutures => vec![okx::subscribe_message(&symbols)],
    }
}

fn parse_tick(source: SourceId, msg: &Message) -> ParseOutcome {
    match source {
        SourceId::BinanceSpot | SourceId::BinanceFutures => binance::parse(msg),
        SourceId::BybitSpot | SourceId::BybitFutures => bybit::parse(msg),
        SourceId::MexcSpot => mexc::parse_spot(msg),
        SourceId::MexcFutures => mexc::parse_futures(msg),
        SourceId::OkxSpot | SourceId::OkxFutures => okx::parse(msg),
    }
}

/// Validates every `(id, exchange_symbol)` pair assigned to `source`,
/// batching per `batch_size` and reusing one control connection across
/// batches (spec.md §4.5).
pub async fn validate_source(source: SourceId, ws_url: String, symbols: Vec<(u16, String)>, batch_size: usize) -> ValidationResult {
    let attempted = symbols.len();
    let mut result = ValidationResult { source, attempted, valid: BTreeSet::new(), invalid: Vec::new() };
    if symbols.is_empty() {
        return result;
    }

    let conn_config = WsConnConfig::new(ws_url);
    let mut stream = match connect_with_backoff(&conn_config, RECONNECT_ATTEMPTS, RECONNECT_BASE_BACKOFF, RECONNECT_MAX_BACKOFF).await {
        Ok(s) => s,
        Err(e) => {
            warn!("[c5] {source} initial connection failed: {e}");
            for (id, _) in symbols {
                result.invalid.push((id, InvalidityReason::ConnectionDropped));
            }
            return result;
        }
    };

    let batches: Vec<Vec<(u16, String)>> = symbols.chunks(batch_size.max(1)).map(<[_]>::to_vec).collect();
    let mut iter = batches.into_iter().peekable();

    while let Some(batch) = iter.next() {
        let outcome = engine::run_batch(&mut stream, build_subscribe(source, &batch), &batch, |m| parse_tick(source, m)).await;

        match outcome {
            Ok(outcome) => {
                result.valid.extend(outcome.valid);
                result.invalid.extend(outcome.invalid);
            }
            Err(e) => {
                warn!("[c5] {source} connection dropped mid-batch: {e}, reconnecting");
                match connect_with_backoff(&conn_config, RECONNECT_ATTEMPTS, RECONNECT_BASE_BACKOFF, RECONNECT_MAX_BACKOFF).await {
                    Ok(new_stream) => {
                        stream = new_stream;
                        match engine::run_batch(&mut stream, build_subscribe(source, &batch), &batch, |m| parse_tick(source, m)).await {
                            Ok(outcome) => {
                                result.valid.extend(outcome.valid);
                                result.invalid.extend(outcome.invalid);
                            }
                            Err(_) => {
                                for (id, _) in &batch {
                                    result.invalid.push((*id, InvalidityReason::ConnectionDropped));
                                }
                            }
                        }
                    }
                    Err(_) => {
                        warn!("[c5] {source} exhausted reconnect attempts, concluding source");
                        for (id, _) in &batch {
                            result.invalid.push((*id, InvalidityReason::ConnectionDropped));
                        }
                        for remaining in iter {
                            for (id, _) in remaining {
                                result.invalid.push((id, InvalidityReason::ConnectionDropped));
                            }
                        }
                        return result;
                    }
                }
            }
        }

        if iter.peek().is_some() {
            tokio::time::sleep(engine::INTER_BATCH_PAUSE).await;
        }
    }

    result
}

/// Runs C5 across all sources present in `work` concurrently (spec.md §5
/// "8 concurrent WebSocket flows").
pub async fn validate_all(work: Vec<(SourceId, String, Vec<(u16, String)>, usize)>) -> Vec<ValidationResult> {
    let futures = work.into_iter().map(|(source, ws_url, symbols, batch_size)| validate_source(source, ws_url, symbols, batch_size));
    join_all(futures).await
}
