//! Binance spot/futures subscribe-message builder and tick parser
//! (spec.md §4.5, §6). Same schema on both the spot and UBase streams.

use serde_json::Value;
use tokio_tungstenite::tungstenite::Message;

use crate::engine::ParseOutcome;

/// Binance requires lowercase symbols on the WS path (spec.md §6).
pub fn subscribe_message(exchange_symbols: &[String]) -> Message {
    let params: Vec<String> = exchange_symbols.iter().map(|s| format!("{}@bookTicker", s.to_lowercase())).collect();
    let payload = serde_json::json!({"method": "SUBSCRIBE", "params": params, "id": 1});
    Message::Text(payload.to_string().into())
}

pub fn parse(msg: &Message) -> ParseOutcome {
    let Message::Text(text) = msg else {
        return ParseOutcome::Ignore;
    };
    let Ok(v) = serde_json::from_str::<Value>(text) else {
        return ParseOutcome::Ignore;
    };

    if v.get("error").is_some() {
        return ParseOutcome::Rejected;
    }

    let (Some(symbol), Some(bid), Some(ask)) = (v.get("s").and_then(Value::as_str), v.get("b"), v.get("a")) else {
        return ParseOutcome::Ignore;
    };

    ParseOutcome::Tick {
        exchange_symbol: symbol.to_string(),
        bid: bid.as_str().and_then(|s| s.parse::<f64>().ok()),
        ask: ask.as_str().and_then(|s| s.parse::<f64>().ok()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_book_ticker() {
        let msg = Message::Text(serde_json::json!({"u": 1, "s": "BTCUSDT", "b": "100.5", "B": "1", "a": "100.6", "A": "1"}).to_string().into());
        match parse(&msg) {
            ParseOutcome::Tick { exchange_symbol, bid, ask } => {
                assert_eq!(exchange_symbol, "BTCUSDT");
                assert_eq!(bid, Some(100.5));
                assert_eq!(ask, Some(100.6));
            }
            _ => panic!("expected Tick"),
        }
    }

    #[test]
    fn error_response_is_rejected() {
        let msg = Message::Text(serde_json::json!({"id": 1, "error": {"code": -1121, "msg": "Invalid symbol."}}).to_string().into());
        assert!(matches!(parse(&msg), ParseOutcome::Rejected));
    }

    #[test]
    fn subscribe_ack_is_ignored() {
        let msg = Message::Text(serde_json::json!({"id": 1, "result": null}).to_string().into());
        assert!(matches!(parse(&msg), ParseOutcome::Ignore));
    }

    #[test]
    fn subscribe_message_lowercases_symbols() {
        let Message::Text(text) = subscribe_message(&["BTCUSDT".to_string()]) else { panic!() };
        assert!(text.contains("btcusdt@bookTicker"));
    }
}
