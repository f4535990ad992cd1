//! C5 batch-observation loop (spec.md §4.5).
//!
//! Shared across all four venues: send one subscribe payload, then read off
//! the same control connection until every symbol in the batch has produced
//! a tick, or one of three clocks expires. This is the generalization of
//! `k4_md::ws_helper`'s single `run_ws_*_stream` read loop to a *bounded*,
//! *batched* lifecycle — the production feed loops forever on one
//! subscription; the validator subscribes many batches in turn on the same
//! connection and must know when to stop waiting on each.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use pairscan_core::types::InvalidityReason;
use pairscan_core::ws::WsStream;
use thiserror::Error;
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

/// Nominal observation window once a batch is subscribed (spec.md §4.5).
pub const COLLECT_DURATION: Duration = Duration::from_secs(30);
/// Hard cap on one batch, regardless of progress.
pub const OVERALL_BATCH_TIMEOUT: Duration = Duration::from_secs(90);
/// Abort a batch early if nothing new arrives for this long.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(10);
/// Per-message read timeout; a timeout here is normal, not an error.
pub const READ_SLICE: Duration = Duration::from_secs(1);
/// Pause between batches on the same connection (spec.md §4.5).
pub const INTER_BATCH_PAUSE: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("connection dropped: {0}")]
    ConnectionDropped(String),
}

/// What one parsed WebSocket message tells the engine.
pub enum ParseOutcome {
    /// A tick for `exchange_symbol`. `bid`/`ask` are `None` when the venue
    /// sent the field but it didn't parse as a positive number.
    Tick { exchange_symbol: String, bid: Option<f64>, ask: Option<f64> },
    /// The venue rejected the subscription outright.
    Rejected,
    /// Anything else (ack, ping, unrelated channel).
    Ignore,
}

pub struct BatchOutcome {
    pub valid: BTreeSet<u16>,
    pub invalid: Vec<(u16, InvalidityReason)>,
}

/// Runs one batch to completion on `stream`. `batch` pairs each symbol id
/// with the exchange-native symbol string the venue will echo back in
/// ticks. `parse` decodes one inbound frame.
///
/// `subscribe_msgs` is sent in full before the read loop starts — most
/// venues cover an entire batch with one combined message, but MEXC futures
/// needs one `sub.ticker` message per symbol, so this accepts however many
/// the venue's subscribe-message builder produces.
pub async fn run_batch(
    stream: &mut WsStream,
    subscribe_msgs: Vec<Message>,
    batch: &[(u16, String)],
    parse: impl Fn(&Message) -> ParseOutcome,
) -> Result<BatchOutcome, EngineError> {
    let symbol_to_id: HashMap<&str, u16> = batch.iter().map(|(id, sym)| (sym.as_str(), *id)).collect();
    let mut remaining: BTreeSet<u16> = batch.iter().map(|(id, _)| *id).collect();
    let mut valid = BTreeSet::new();
    let mut invalid = Vec::new();

    for msg in subscribe_msgs {
        stream.send(msg).await.map_err(|e| EngineError::ConnectionDropped(e.to_string()))?;
    }

    let batch_deadline = Instant::now() + OVERALL_BATCH_TIMEOUT;
    let collect_deadline = Instant::now() + COLLECT_DURATION;
    let mut last_progress = Instant::now();

    while !remaining.is_empty() {
        let now = Instant::now();
        if now >= batch_deadline || now >= collect_deadline || now.duration_since(last_progress) >= IDLE_TIMEOUT {
            break;
        }

        let wait = READ_SLICE.min(batch_deadline - now).min(collect_deadline - now);
        match tokio::time::timeout(wait, stream.next()).await {
            Ok(Some(Ok(msg))) => match parse(&msg) {
                ParseOutcome::Tick { exchange_symbol, bid, ask } => {
                    if let Some(&id) = symbol_to_id.get(exchange_symbol.as_str()) {
                        if remaining.remove(&id) {
                            last_progress = Instant::now();
                            classify(id, bid, ask, &mut valid, &mut invalid);
                        }
                    }
                }
                ParseOutcome::Rejected => {
                    warn!("[c5] subscription rejected for batch of {} symbols", batch.len());
                    for id in remaining.drain() {
                        invalid.push((id, InvalidityReason::SubscribeRejected));
                    }
                    break;
                }
                ParseOutcome::Ignore => {}
            },
            Ok(Some(Err(e))) => return Err(EngineError::ConnectionDropped(e.to_string())),
            Ok(None) => return Err(EngineError::ConnectionDropped("stream closed".into())),
            Err(_) => debug!("[c5] read_slice elapsed, {} symbols still pending", remaining.len()),
        }
    }

    for id in remaining {
        invalid.push((id, InvalidityReason::NoMessage));
    }

    Ok(BatchOutcome { valid, invalid })
}

fn classify(id: u16, bid: Option<f64>, ask: Option<f64>, valid: &mut BTreeSet<u16>, invalid: &mut Vec<(u16, InvalidityReason)>) {
    match (bid, ask) {
        (Some(b), _) if b <= 0.0 => invalid.push((id, InvalidityReason::ZeroOrMissingBid)),
        (None, _) => invalid.push((id, InvalidityReason::ZeroOrMissingBid)),
        (_, Some(a)) if a <= 0.0 => invalid.push((id, InvalidityReason::ZeroOrMissingAsk)),
        (_, None) => invalid.push((id, InvalidityReason::ZeroOrMissingAsk)),
        (Some(b), Some(a)) if b > a => invalid.push((id, InvalidityReason::BidAboveAsk)),
        (Some(_), Some(_)) => {
            valid.insert(id);
        }
    }
}
