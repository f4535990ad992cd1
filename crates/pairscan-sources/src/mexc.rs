//! MEXC spot/futures inventory fetch (spec.md §4.1).
//!
//! MEXC futures is known to deny this endpoint to non-institutional API
//! keys; a permanent 4xx here is expected and tolerated by the aggregate
//! quorum policy, not a bug (spec.md §9 "Partial failure is normal").

use std::time::Duration;

use pairscan_core::SourceId;
use pairscan_core::types::{InstrumentStatus, RawInstrument};
use serde_json::Value;

use crate::fetch::{FetchError, get_json};
use crate::retry::with_retry;

const DEFAULT_SPOT_BASE_URL: &str = "https://api.mexc.com";
const DEFAULT_FUTURES_BASE_URL: &str = "https://contract.mexc.com";

pub fn default_base_url(source: SourceId) -> &'static str {
    match source {
        SourceId::MexcSpot => DEFAULT_SPOT_BASE_URL,
        SourceId::MexcFutures => DEFAULT_FUTURES_BASE_URL,
        _ => unreachable!("mexc::default_base_url called with non-MEXC source"),
    }
}

pub async fn fetch(
    client: &reqwest::Client,
    source: SourceId,
    base_url: &str,
    timeout: Duration,
) -> Result<Vec<RawInstrument>, FetchError> {
    let path = match source {
        SourceId::MexcSpot => "/api/v3/exchangeInfo",
        SourceId::MexcFutures => "/api/v1/contract/detail",
        _ => unreachable!("mexc::fetch called with non-MEXC source"),
    };
    let url = format!("{base_url}{path}");

    let body = with_retry(source.to_string().as_str(), || get_json(client, &url, timeout), FetchError::is_retryable).await?;

    Ok(match source {
        SourceId::MexcSpot => parse_spot(&body),
        SourceId::MexcFutures => parse_futures(&body),
        _ => unreachable!(),
    })
}

fn parse_spot(body: &Value) -> Vec<RawInstrument> {
    let Some(symbols) = body.get("symbols").and_then(Value::as_array) else {
        return Vec::new();
    };
    symbols
        .iter()
        .filter_map(|entry| {
            let symbol = entry.get("symbol")?.as_str()?.to_string();
            let status = if entry.get("status")?.as_str()? == "1" { InstrumentStatus::Trading } else { InstrumentStatus::NotTrading };
            let base = entry.get("baseAsset").and_then(Value::as_str).map(str::to_string);
            let quote = entry.get("quoteAsset").and_then(Value::as_str).map(str::to_string);
            Some(RawInstrument { symbol, base, quote, status, min_qty: None, max_qty: None, tick_size: None, min_notional: None })
        })
        .collect()
}

fn parse_futures(body: &Value) -> Vec<RawInstrument> {
    let Some(data) = body.get("data").and_then(Value::as_array) else {
        return Vec::new();
    };
    data.iter()
        .filter_map(|entry| {
            let symbol = entry.get("symbol")?.as_str()?.to_string();
            let state = entry.get("state")?.as_i64()?;
            let status = if state == 0 { InstrumentStatus::Trading } else { InstrumentStatus::NotTrading };
            let base = entry.get("baseCoin").and_then(Value::as_str).map(str::to_string);
            let quote = entry.get("quoteCoin").and_then(Value::as_str).map(str::to_string);
            let tick_size = entry.get("priceUnit").and_then(Value::as_f64);
            let min_qty = entry.get("minVol").and_then(Value::as_f64);
            let max_qty = entry.get("maxVol").and_then(Value::as_f64);
            Some(RawInstrument { symbol, base, quote, status, min_qty, max_qty, tick_size, min_notional: None })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spot_status_one_is_trading() {
        let body = serde_json::json!({
            "symbols": [{"symbol": "BTC_USDT", "status": "1", "baseAsset": "BTC", "quoteAsset": "USDT"}]
        });
        let out = parse_spot(&body);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].status, InstrumentStatus::Trading);
    }

    #[test]
    fn spot_status_other_is_not_trading() {
        let body = serde_json::json!({
            "symbols": [{"symbol": "BTC_USDT", "status": "2", "baseAsset": "BTC", "quoteAsset": "USDT"}]
        });
        let out = parse_spot(&body);
        assert_eq!(out[0].status, InstrumentStatus::NotTrading);
    }

    #[test]
    fn futures_state_zero_is_trading() {
        let body = serde_json::json!({
            "data": [{"symbol": "BTC_USDT", "state": 0, "baseCoin": "BTC", "quoteCoin": "USDT", "priceUnit": 0.1, "minVol": 1.0}]
        });
        let out = parse_futures(&body);
        assert_eq!(out[0].status, InstrumentStatus::Trading);
        assert_eq!(out[0].tick_size, Some(0.1));
    }
}
