//! OKX spot/swap subscribe-message builder and tick parser (spec.md §4.5,
//! §6). Spot and swap share both the URL and the message schema; only the
//! `instId` casing differs (`BTC-USDT` vs `BTC-USDT-SWAP`).

use serde_json::Value;
use tokio_tungstenite::tungstenite::Message;

use crate::engine::ParseOutcome;

pub fn subscribe_message(exchange_symbols: &[String]) -> Message {
    let args: Vec<Value> = exchange_symbols.iter().map(|s| serde_json::json!({"channel": "tickers", "instId": s})).collect();
    let payload = serde_json::json!({"op": "subscribe", "args": args});
    Message::Text(payload.to_string().into())
}

pub fn parse(msg: &Message) -> ParseOutcome {
    let Message::Text(text) = msg else {
        return ParseOutcome::Ignore;
    };
    if text.as_str() == "pong" {
        return ParseOutcome::Ignore;
    }
    let Ok(v) = serde_json::from_str::<Value>(text) else {
        return ParseOutcome::Ignore;
    };

    if v.get("event").and_then(Value::as_str) == Some("error") {
        return ParseOutcome::Rejected;
    }

    let channel = v.get("arg").and_then(|a| a.get("channel")).and_then(Value::as_str);
    if channel != Some("tickers") {
        return ParseOutcome::Ignore;
    }
    let Some(entry) = v.get("data").and_then(Value::as_array).and_then(|a| a.first()) else {
        return ParseOutcome::Ignore;
    };
    let Some(symbol) = entry.get("instId").and_then(Value::as_str) else {
        return ParseOutcome::Ignore;
    };

    let parse_field = |field: &str| entry.get(field).and_then(Value::as_str).and_then(|s| s.parse::<f64>().ok());

    ParseOutcome::Tick { exchange_symbol: symbol.to_string(), bid: parse_field("bidPx"), ask: parse_field("askPx") }
}
