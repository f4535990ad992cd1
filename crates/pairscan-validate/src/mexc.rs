//! MEXC spot/futures subscribe-message builder and tick parser (spec.md
//! §4.5, §6). Spot ticks arrive as protobuf frames; futures access is
//! known to be denied for non-institutional keys, which the aggregate
//! quorum tolerates (spec.md §9).

use prost::Message as ProstMessage;
use serde_json::Value;
use tokio_tungstenite::tungstenite::Message;

use crate::engine::ParseOutcome;

/// MEXC requires uppercase symbols on the WS path (spec.md §6).
pub fn spot_subscribe_message(exchange_symbols: &[String]) -> Message {
    let params: Vec<String> =
        exchange_symbols.iter().map(|s| format!("spot@public.book_ticker.v3.api.pb@{}", s.to_uppercase())).collect();
    let payload = serde_json::json!({"method": "SUBSCRIPTION", "params": params});
    Message::Text(payload.to_string().into())
}

/// MEXC futures' `sub.ticker` channel takes one symbol per message, unlike
/// every other subscribe path in this module — so the whole batch needs one
/// message per symbol, not one combined message.
pub fn futures_subscribe_messages(exchange_symbols: &[String]) -> Vec<Message> {
    exchange_symbols
        .iter()
        .map(|symbol| {
            let payload = serde_json::json!({"method": "sub.ticker", "param": {"symbol": symbol}});
            Message::Text(payload.to_string().into())
        })
        .collect()
}

/// Reverse-engineered shape of MEXC's `PushDataV3ApiWrapper` protobuf
/// envelope, narrowed to the one field the validator needs
/// (`publicBookTicker`). Hand-declared field tags, no `build.rs`/codegen —
/// `prost::Message` only needs the tag numbers to round-trip the wire
/// format, not the full `.proto` schema.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BookTickerPayload {
    #[prost(string, tag = "1")]
    pub bid_price: String,
    #[prost(string, tag = "2")]
    pub bid_quantity: String,
    #[prost(string, tag = "3")]
    pub ask_price: String,
    #[prost(string, tag = "4")]
    pub ask_quantity: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PushDataWrapper {
    #[prost(string, tag = "1")]
    pub channel: String,
    #[prost(string, tag = "3")]
    pub symbol: String,
    #[prost(message, optional, tag = "314")]
    pub public_book_ticker: Option<BookTickerPayload>,
}

pub fn parse_spot(msg: &Message) -> ParseOutcome {
    match msg {
        Message::Binary(bytes) => match PushDataWrapper::decode(bytes.as_ref()) {
            Ok(wrapper) => match wrapper.public_book_ticker {
                Some(ticker) => ParseOutcome::Tick {
                    exchange_symbol: wrapper.symbol,
                    bid: ticker.bid_price.parse::<f64>().ok(),
                    ask: ticker.ask_price.parse::<f64>().ok(),
                },
                None => ParseOutcome::Ignore,
            },
            Err(_) => ParseOutcome::Ignore,
        },
        Message::Text(text) => parse_spot_ack(text),
        _ => ParseOutcome::Ignore,
    }
}

fn parse_spot_ack(text: &str) -> ParseOutcome {
    let Ok(v) = serde_json::from_str::<Value>(text) else {
        return ParseOutcome::Ignore;
    };
    match v.get("code").and_then(Value::as_i64) {
        Some(0) => ParseOutcome::Ignore,
        Some(_) => ParseOutcome::Rejected,
        None => ParseOutcome::Ignore,
    }
}

pub fn parse_futures(msg: &Message) -> ParseOutcome {
    let Message::Text(text) = msg else {
        return ParseOutcome::Ignore;
    };
    let Ok(v) = serde_json::from_str::<Value>(text) else {
        return ParseOutcome::Ignore;
    };

    if v.get("channel").and_then(Value::as_str) != Some("push.ticker") {
        return ParseOutcome::Ignore;
    }
    let data = v.get("data");
    let Some(symbol) = v.get("symbol").and_then(Value::as_str) else {
        return ParseOutcome::Ignore;
    };

    ParseOutcome::Tick {
        exchange_symbol: symbol.to_string(),
        bid: data.and_then(|d| d.get("bid1")).and_then(Value::as_f64),
        ask: data.and_then(|d| d.get("ask1")).and_then(Value::as_f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_protobuf_book_ticker() {
        let wrapper = PushDataWrapper {
            channel: "spot@public.book_ticker.v3.api.pb@BTCUSDT".to_string(),
            symbol: "BTCUSDT".to_string(),
            public_book_ticker: Some(BookTickerPayload {
                bid_price: "100.1".to_string(),
                bid_quantity: "1".to_string(),
                ask_price: "100.2".to_string(),
                ask_quantity: "1".to_string(),
            }),
        };
        let bytes = wrapper.encode_to_vec();
        match parse_spot(&Message::Binary(bytes.into())) {
            ParseOutcome::Tick { exchange_symbol, bid, ask } => {
                assert_eq!(exchange_symbol, "BTCUSDT");
                assert_eq!(bid, Some(100.1));
                assert_eq!(ask, Some(100.2));
            }
            _ => panic!("expected Tick"),
        }
    }

    #[test]
    fn spot_ack_nonzero_code_is_rejected() {
        let msg = Message::Text(serde_json::json!({"id": 0, "code": 1, "msg": "invalid param"}).to_string().into());
        assert!(matches!(parse_spot(&msg), ParseOutcome::Rejected));
    }

    #[test]
    fn futures_subscribe_builds_one_message_per_symbol() {
        let symbols = vec!["BTC_USDT".to_string(), "ETH_USDT".to_string(), "SOL_USDT".to_string()];
        let messages = futures_subscribe_messages(&symbols);
        assert_eq!(messages.len(), symbols.len());
        for (msg, symbol) in messages.iter().zip(&symbols) {
            let Message::Text(text) = msg else { panic!("expected text message") };
            let v: Value = serde_json::from_str(text).unwrap();
            assert_eq!(v["method"], "sub.ticker");
            assert_eq!(v["param"]["symbol"], symbol.as_str());
        }
    }

    #[test]
    fn futures_ticker_parses_fields() {
        let msg = Message::Text(serde_json::json!({"channel": "push.ticker", "symbol": "BTC_USDT", "data": {"bid1": 100.1, "ask1": 100.2}}).to_string().into());
        match parse_futures(&msg) {
            ParseOutcome::Tick { exchange_symbol, bid, ask } => {
                assert_eq!(exchange_symbol, "BTC_USDT");
                assert_eq!(bid, Some(100.1));
                assert_eq!(ask, Some(100.2));
            }
            _ => panic!("expected Tick"),
        }
    }
}
