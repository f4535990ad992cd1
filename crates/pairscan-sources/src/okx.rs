//! OKX spot/swap inventory fetch (spec.md §4.1).
//!
//! OKX's `instId` already encodes base/quote structurally (`BTC-USDT`,
//! `BTC-USDT-SWAP`), so unlike Binance/Bybit the normalizer derives base and
//! quote purely by splitting `instId` — declared asset fields are not
//! needed here and are left unset on [`RawInstrument`].

use std::time::Duration;

use pairscan_core::SourceId;
use pairscan_core::types::{InstrumentStatus, RawInstrument};
use serde_json::Value;

use crate::fetch::{FetchError, get_json};
use crate::retry::with_retry;

const DEFAULT_BASE_URL: &str = "https://www.okx.com";

pub fn default_base_url(_source: SourceId) -> &'static str {
    DEFAULT_BASE_URL
}

pub async fn fetch(
    client: &reqwest::Client,
    source: SourceId,
    base_url: &str,
    timeout: Duration,
) -> Result<Vec<RawInstrument>, FetchError> {
    let inst_type = match source {
        SourceId::OkxSpot => "SPOT",
        SourceId::OkxFutures => "SWAP",
        _ => unreachable!("okx::fetch called with non-OKX source"),
    };
    let url = format!("{base_url}/api/v5/public/instruments?instType={inst_type}");

    let body = with_retry(source.to_string().as_str(), || get_json(client, &url, timeout), FetchError::is_retryable).await?;

    Ok(parse(&body))
}

fn parse(body: &Value) -> Vec<RawInstrument> {
    let Some(data) = body.get("data").and_then(Value::as_array) else {
        return Vec::new();
    };
    data.iter().filter_map(parse_one).collect()
}

fn parse_one(entry: &Value) -> Option<RawInstrument> {
    let symbol = entry.get("instId")?.as_str()?.to_string();
    let status = if entry.get("state")?.as_str()? == "live" { InstrumentStatus::Trading } else { InstrumentStatus::NotTrading };

    let tick_size = entry.get("tickSz").and_then(Value::as_str).and_then(|s| s.parse().ok());
    let min_qty = entry.get("minSz").and_then(Value::as_str).and_then(|s| s.parse().ok());

    Some(RawInstrument { symbol, base: None, quote: None, status, min_qty, max_qty: None, tick_size, min_notional: None })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_live_spot_instrument() {
        let body = serde_json::json!({
            "data": [{"instId": "BTC-USDT", "state": "live", "tickSz": "0.1", "minSz": "0.00001"}]
        });
        let out = parse(&body);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].symbol, "BTC-USDT");
        assert_eq!(out[0].status, InstrumentStatus::Trading);
        assert_eq!(out[0].tick_size, Some(0.1));
    }

    #[test]
    fn non_live_state_is_not_trading() {
        let body = serde_json::json!({
            "data": [{"instId": "BTC-USDT-SWAP", "state": "suspend"}]
        });
        let out = parse(&body);
        assert_eq!(out[0].status, InstrumentStatus::NotTrading);
    }
}
