//! C1/C2 orchestration: fan out across the eight REST endpoints concurrently,
//! then normalize each source's raw instruments independently (spec.md §4.1,
//! §4.2, §5 "8 concurrent HTTP flows").

use std::time::Duration;

use futures::future::join_all;
use pairscan_core::SourceId;
use pairscan_core::config::ExchangesConfig;
use pairscan_core::types::RawInstrument;
use tracing::{info, warn};

use crate::fetch::FetchError;
use crate::normalize::{self, NormalizationError};
use crate::{binance, bybit, mexc, okx};

/// Outcome of one source's C1 fetch.
pub struct FetchOutcome {
    pub source: SourceId,
    pub result: Result<Vec<RawInstrument>, FetchError>,
}

/// Outcome of running C2 over one source's fetched instruments.
pub struct NormalizeOutcome {
    pub source: SourceId,
    pub symbols: Vec<pairscan_core::types::NormalizedSymbol>,
    pub rejected: usize,
}

fn base_url_for(source: SourceId, exchanges: &ExchangesConfig) -> String {
    let settings = exchanges.settings(source);
    let default = match source {
        SourceId::BinanceSpot | SourceId::BinanceFutures => binance::default_base_url(source),
        SourceId::BybitSpot | SourceId::BybitFutures => bybit::default_base_url(source),
        SourceId::MexcSpot | SourceId::MexcFutures => mexc::default_base_url(source),
        SourceId::OkxSpot | SourceId::OkxFutures => okx::default_base_url(source),
    };
    settings.rest_base_url.unwrap_or_else(|| default.to_string())
}

async fn fetch_one(client: &reqwest::Client, source: SourceId, base_url: &str, timeout: Duration) -> Result<Vec<RawInstrument>, FetchError> {
    match source {
        SourceId::BinanceSpot | SourceId::BinanceFutures => binance::fetch(client, source, base_url, timeout).await,
        SourceId::BybitSpot | SourceId::BybitFutures => bybit::fetch(client, source, base_url, timeout).await,
        SourceId::MexcSpot | SourceId::MexcFutures => mexc::fetch(client, source, base_url, timeout).await,
        SourceId::OkxSpot | SourceId::OkxFutures => okx::fetch(client, source, base_url, timeout).await,
    }
}

/// Runs C1 across all eight sources concurrently and returns one outcome
/// per source, in [`SourceId::ALL`] order.
pub async fn fetch_all(client: &reqwest::Client, exchanges: &ExchangesConfig, timeout: Duration) -> Vec<FetchOutcome> {
    let futures = SourceId::ALL.iter().map(|&source| {
        let base_url = base_url_for(source, exchanges);
        let client = client.clone();
        async move {
            let result = fetch_one(&client, source, &base_url, timeout).await;
            if let Err(ref e) = result {
                warn!("[c1] {source} fetch failed: {e}");
            } else {
                info!("[c1] {source} fetch ok");
            }
            FetchOutcome { source, result }
        }
    });
    join_all(futures).await
}

/// Runs C2 over every source's successful fetch. Failed fetches contribute
/// an empty symbol list, same as the spec's "missing sources yield empty
/// instrument lists" (spec.md §4.1).
pub fn normalize_all(outcomes: &[FetchOutcome]) -> Vec<NormalizeOutcome> {
    outcomes
        .iter()
        .map(|outcome| {
            let raw = match &outcome.result {
                Ok(raw) => raw.as_slice(),
                Err(_) => &[],
            };

            let mut symbols = Vec::new();
            let mut rejected = 0usize;
            for instrument in raw {
                if instrument.status != pairscan_core::types::InstrumentStatus::Trading {
                    continue;
                }
                match normalize::normalize(outcome.source, instrument) {
                    Ok(symbol) => symbols.push(symbol),
                    Err(e) => {
                        rejected += 1;
                        log_rejection(outcome.source, &instrument.symbol, e);
                    }
                }
            }
            NormalizeOutcome { source: outcome.source, symbols, rejected }
        })
        .collect()
}

fn log_rejection(source: SourceId, symbol: &str, reason: NormalizationError) {
    warn!("[c2] {source} rejected {symbol}: {reason}");
}

/// Number of sources whose C1 fetch succeeded.
pub fn success_count(outcomes: &[FetchOutcome]) -> usize {
    outcomes.iter().filter(|o| o.result.is_ok()).count()
}
