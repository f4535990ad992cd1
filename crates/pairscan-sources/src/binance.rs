//! Binance spot/futures inventory fetch (spec.md §4.1).

use std::time::Duration;

use pairscan_core::SourceId;
use pairscan_core::types::{InstrumentStatus, RawInstrument};
use serde_json::Value;

use crate::fetch::{FetchError, get_json};
use crate::retry::with_retry;

const DEFAULT_SPOT_BASE_URL: &str = "https://api.binance.com";
const DEFAULT_FUTURES_BASE_URL: &str = "https://fapi.binance.com";

pub fn default_base_url(source: SourceId) -> &'static str {
    match source {
        SourceId::BinanceSpot => DEFAULT_SPOT_BASE_URL,
        SourceId::BinanceFutures => DEFAULT_FUTURES_BASE_URL,
        _ => unreachable!("binance::default_base_url called with non-Binance source"),
    }
}

/// Fetches and parses one of the two Binance endpoints, retrying transient
/// failures per the shared policy.
pub async fn fetch(
    client: &reqwest::Client,
    source: SourceId,
    base_url: &str,
    timeout: Duration,
) -> Result<Vec<RawInstrument>, FetchError> {
    let path = match source {
        SourceId::BinanceSpot => "/api/v3/exchangeInfo",
        SourceId::BinanceFutures => "/fapi/v1/exchangeInfo",
        _ => unreachable!("binance::fetch called with non-Binance source"),
    };
    let url = format!("{base_url}{path}");

    let body = with_retry(source.to_string().as_str(), || get_json(client, &url, timeout), FetchError::is_retryable).await?;

    Ok(parse_exchange_info(source, &body))
}

fn parse_exchange_info(source: SourceId, body: &Value) -> Vec<RawInstrument> {
    let Some(symbols) = body.get("symbols").and_then(Value::as_array) else {
        return Vec::new();
    };

    symbols
        .iter()
        .filter_map(|entry| parse_one(source, entry))
        .collect()
}

fn parse_one(source: SourceId, entry: &Value) -> Option<RawInstrument> {
    let symbol = entry.get("symbol")?.as_str()?.to_string();
    let status_str = entry.get("status")?.as_str()?;
    let trading = match source {
        SourceId::BinanceSpot => status_str == "TRADING",
        SourceId::BinanceFutures => status_str == "TRADING" && entry.get("contractType").and_then(Value::as_str) == Some("PERPETUAL"),
        _ => unreachable!(),
    };
    let status = if trading { InstrumentStatus::Trading } else { InstrumentStatus::NotTrading };

    let base = entry.get("baseAsset").and_then(Value::as_str).map(str::to_string);
    let quote = entry.get("quoteAsset").and_then(Value::as_str).map(str::to_string);

    let filters = entry.get("filters").and_then(Value::as_array);
    let tick_size = find_filter_field(filters, "PRICE_FILTER", "tickSize");
    let min_qty = find_filter_field(filters, "LOT_SIZE", "minQty");
    let max_qty = find_filter_field(filters, "LOT_SIZE", "maxQty");
    let min_notional =
        find_filter_field(filters, "MIN_NOTIONAL", "minNotional").or_else(|| find_filter_field(filters, "NOTIONAL", "minNotional"));

    Some(RawInstrument { symbol, base, quote, status, min_qty, max_qty, tick_size, min_notional })
}

fn find_filter_field(filters: Option<&Vec<Value>>, filter_type: &str, field: &str) -> Option<f64> {
    filters?
        .iter()
        .find(|f| f.get("filterType").and_then(Value::as_str) == Some(filter_type))
        .and_then(|f| f.get(field))
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_spot_trading_symbol_with_filters() {
        let body = serde_json::json!({
            "symbols": [{
                "symbol": "BTCUSDT",
                "status": "TRADING",
                "baseAsset": "BTC",
                "quoteAsset": "USDT",
                "filters": [
                    {"filterType": "PRICE_FILTER", "tickSize": "0.01000000"},
                    {"filterType": "LOT_SIZE", "minQty": "0.00001000", "maxQty": "9000.00000000"},
                    {"filterType": "MIN_NOTIONAL", "minNotional": "10.00000000"}
                ]
            }]
        });
        let out = parse_exchange_info(SourceId::BinanceSpot, &body);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].symbol, "BTCUSDT");
        assert_eq!(out[0].tick_size, Some(0.01));
        assert_eq!(out[0].min_qty, Some(0.00001));
        assert_eq!(out[0].status, InstrumentStatus::Trading);
    }

    #[test]
    fn futures_requires_perpetual_contract_type() {
        let body = serde_json::json!({
            "symbols": [
                {"symbol": "BTCUSDT", "status": "TRADING", "contractType": "PERPETUAL", "baseAsset": "BTC", "quoteAsset": "USDT"},
                {"symbol": "BTCUSDT_240927", "status": "TRADING", "contractType": "CURRENT_QUARTER", "baseAsset": "BTC", "quoteAsset": "USDT"}
            ]
        });
        let out = parse_exchange_info(SourceId::BinanceFutures, &body);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].status, InstrumentStatus::Trading);
        assert_eq!(out[1].status, InstrumentStatus::NotTrading);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let body = serde_json::json!({
            "timezone": "UTC",
            "symbols": [{"symbol": "ETHUSDT", "status": "TRADING", "baseAsset": "ETH", "quoteAsset": "USDT", "someNewField": 42}]
        });
        let out = parse_exchange_info(SourceId::BinanceSpot, &body);
        assert_eq!(out.len(), 1);
    }
}
