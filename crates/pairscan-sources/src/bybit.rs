//! Bybit spot/linear inventory fetch (spec.md §4.1).
//!
//! Bybit paginates via a cursor: each response page may carry a
//! `result.nextPageCursor` which must be sent back as the `cursor` query
//! parameter to fetch the next page. An empty cursor means the list is
//! exhausted.

use std::time::Duration;

use pairscan_core::SourceId;
use pairscan_core::types::{InstrumentStatus, RawInstrument};
use serde_json::Value;

use crate::fetch::{FetchError, get_json};
use crate::retry::with_retry;

const DEFAULT_BASE_URL: &str = "https://api.bybit.com";

pub fn default_base_url(_source: SourceId) -> &'static str {
    DEFAULT_BASE_URL
}

pub async fn fetch(
    client: &reqwest::Client,
    source: SourceId,
    base_url: &str,
    timeout: Duration,
) -> Result<Vec<RawInstrument>, FetchError> {
    let category = match source {
        SourceId::BybitSpot => "spot",
        SourceId::BybitFutures => "linear",
        _ => unreachable!("bybit::fetch called with non-Bybit source"),
    };

    let mut out = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let mut url = format!("{base_url}/v5/market/instruments-info?category={category}");
        if let Some(ref c) = cursor {
            if !c.is_empty() {
                url.push_str("&cursor=");
                url.push_str(c);
            }
        }

        let page = with_retry(source.to_string().as_str(), || get_json(client, &url, timeout), FetchError::is_retryable).await?;

        let result = page.get("result");
        let list = result.and_then(|r| r.get("list")).and_then(Value::as_array);
        if let Some(list) = list {
            out.extend(list.iter().filter_map(parse_one));
        }

        let next = result.and_then(|r| r.get("nextPageCursor")).and_then(Value::as_str).unwrap_or("");
        if next.is_empty() {
            break;
        }
        cursor = Some(next.to_string());
    }

    Ok(out)
}

fn parse_one(entry: &Value) -> Option<RawInstrument> {
    let symbol = entry.get("symbol")?.as_str()?.to_string();
    let status = if entry.get("status")?.as_str()? == "Trading" { InstrumentStatus::Trading } else { InstrumentStatus::NotTrading };
    let base = entry.get("baseCoin").and_then(Value::as_str).map(str::to_string);
    let quote = entry.get("quoteCoin").and_then(Value::as_str).map(str::to_string);

    let tick_size = entry.get("priceFilter").and_then(|f| f.get("tickSize")).and_then(Value::as_str).and_then(|s| s.parse().ok());
    let lot = entry.get("lotSizeFilter");
    let min_qty = lot.and_then(|f| f.get("minOrderQty")).and_then(Value::as_str).and_then(|s| s.parse().ok());
    let max_qty = lot.and_then(|f| f.get("maxOrderQty")).and_then(Value::as_str).and_then(|s| s.parse().ok());
    let min_notional = lot.and_then(|f| f.get("minOrderAmt")).and_then(Value::as_str).and_then(|s| s.parse().ok());

    Some(RawInstrument { symbol, base, quote, status, min_qty, max_qty, tick_size, min_notional })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trading_instrument() {
        let entry = serde_json::json!({
            "symbol": "BTCUSDT",
            "status": "Trading",
            "baseCoin": "BTC",
            "quoteCoin": "USDT",
            "priceFilter": {"tickSize": "0.1"},
            "lotSizeFilter": {"minOrderQty": "0.00001", "maxOrderQty": "100", "minOrderAmt": "5"}
        });
        let raw = parse_one(&entry).unwrap();
        assert_eq!(raw.status, InstrumentStatus::Trading);
        assert_eq!(raw.tick_size, Some(0.1));
        assert_eq!(raw.min_notional, Some(5.0));
    }

    #[test]
    fn non_trading_status_is_marked() {
        let entry = serde_json::json!({
            "symbol": "XUSDT", "status": "Closed", "baseCoin": "X", "quoteCoin": "USDT"
        });
        let raw = parse_one(&entry).unwrap();
        assert_eq!(raw.status, InstrumentStatus::NotTrading);
    }
}
