//! Bybit spot/linear subscribe-message builder and tick parser (spec.md
//! §4.5, §6). Ticker channel delivers a snapshot then deltas; either
//! carrying non-empty bid1Price/ask1Price qualifies the symbol.

use serde_json::Value;
use tokio_tungstenite::tungstenite::Message;

use crate::engine::ParseOutcome;

pub fn subscribe_message(exchange_symbols: &[String]) -> Message {
    let args: Vec<String> = exchange_symbols.iter().map(|s| format!("tickers.{s}")).collect();
    let payload = serde_json::json!({"op": "subscribe", "args": args});
    Message::Text(payload.to_string().into())
}

pub fn parse(msg: &Message) -> ParseOutcome {
    let Message::Text(text) = msg else {
        return ParseOutcome::Ignore;
    };
    let Ok(v) = serde_json::from_str::<Value>(text) else {
        return ParseOutcome::Ignore;
    };

    if v.get("success").and_then(Value::as_bool) == Some(false) {
        return ParseOutcome::Rejected;
    }

    let Some(topic) = v.get("topic").and_then(Value::as_str) else {
        return ParseOutcome::Ignore;
    };
    if !topic.starts_with("tickers.") {
        return ParseOutcome::Ignore;
    }
    let Some(data) = v.get("data") else {
        return ParseOutcome::Ignore;
    };
    let Some(symbol) = data.get("symbol").and_then(Value::as_str) else {
        return ParseOutcome::Ignore;
    };

    let parse_field = |field: &str| data.get(field).and_then(Value::as_str).filter(|s| !s.is_empty()).and_then(|s| s.parse::<f64>().ok());

    ParseOutcome::Tick { exchange_symbol: symbol.to_string(), bid: parse_field("bid1Price"), ask: parse_field("ask1Price") }
}
