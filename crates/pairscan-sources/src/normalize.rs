//! C2 — canonical symbol normalization (spec.md §4.2).
//!
//! Pure, synchronous, no I/O. Dispatches on [`SourceId`] to the grammar that
//! venue's symbols follow, then applies the shared post-parse filters
//! (quote must be USDT, base must not be empty or `"USDT"`).

use pairscan_core::SourceId;
use pairscan_core::types::{NormalizedSymbol, RawInstrument};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationError {
    #[error("symbol does not match declared base/quote")]
    SymbolMismatch,
    #[error("quote asset is not an accepted quote")]
    InvalidQuote,
    #[error("malformed symbol or base asset")]
    InvalidFormat,
}

/// Parses one [`RawInstrument`] from `source` into a [`NormalizedSymbol`].
pub fn normalize(source: SourceId, raw: &RawInstrument) -> Result<NormalizedSymbol, NormalizationError> {
    let (base, quote) = match source {
        SourceId::BinanceSpot | SourceId::BinanceFutures => binance_style(raw)?,
        SourceId::BybitSpot | SourceId::BybitFutures => bybit_style(raw)?,
        SourceId::MexcSpot | SourceId::MexcFutures => underscore_style(&raw.symbol)?,
        SourceId::OkxSpot => hyphen_spot_style(&raw.symbol)?,
        SourceId::OkxFutures => hyphen_swap_style(&raw.symbol)?,
    };

    apply_filters(&base, &quote)?;

    Ok(NormalizedSymbol {
        canonical_name: format!("{base}-{quote}"),
        exchange_symbol: raw.symbol.clone(),
        source,
        min_qty: raw.min_qty,
        max_qty: raw.max_qty,
        tick_size: raw.tick_size,
        min_notional: raw.min_notional,
    })
}

/// Binance-style concatenated symbol: declared base/quote must reassemble
/// (case-insensitively) to the exchange symbol.
fn binance_style(raw: &RawInstrument) -> Result<(String, String), NormalizationError> {
    let base = raw.base.as_deref().unwrap_or_default().to_uppercase();
    let quote = raw.quote.as_deref().unwrap_or_default().to_uppercase();
    let symbol = raw.symbol.to_uppercase();
    if symbol != format!("{base}{quote}") {
        return Err(NormalizationError::SymbolMismatch);
    }
    Ok((base, quote))
}

/// Bybit: same concatenation check as Binance, but base/quote come from
/// declared fields that must independently agree with the symbol.
fn bybit_style(raw: &RawInstrument) -> Result<(String, String), NormalizationError> {
    binance_style(raw)
}

/// MEXC: `BTC_USDT` — split on `_`, require exactly two parts.
fn underscore_style(symbol: &str) -> Result<(String, String), NormalizationError> {
    let parts: Vec<&str> = symbol.split('_').collect();
    match parts.as_slice() {
        [base, quote] => Ok((base.to_uppercase(), quote.to_uppercase())),
        _ => Err(NormalizationError::InvalidFormat),
    }
}

/// OKX spot: `BTC-USDT` — split on `-`, require exactly two parts.
fn hyphen_spot_style(symbol: &str) -> Result<(String, String), NormalizationError> {
    let parts: Vec<&str> = symbol.split('-').collect();
    match parts.as_slice() {
        [base, quote] => Ok((base.to_uppercase(), quote.to_uppercase())),
        _ => Err(NormalizationError::InvalidFormat),
    }
}

/// OKX swap: `BTC-USDT-SWAP` — split on `-`, require exactly three parts
/// with the third equal to `"SWAP"`.
fn hyphen_swap_style(symbol: &str) -> Result<(String, String), NormalizationError> {
    let parts: Vec<&str> = symbol.split('-').collect();
    match parts.as_slice() {
        [base, quote, suffix] if *suffix == "SWAP" => Ok((base.to_uppercase(), quote.to_uppercase())),
        _ => Err(NormalizationError::InvalidFormat),
    }
}

/// Shared post-parse filters (spec.md §4.2): quote must be USDT, base must
/// be non-empty and not itself `"USDT"` (guards degenerate `USDTUSDT` pairs).
fn apply_filters(base: &str, quote: &str) -> Result<(), NormalizationError> {
    if quote != "USDT" {
        return Err(NormalizationError::InvalidQuote);
    }
    if base.is_empty() || base == "USDT" {
        return Err(NormalizationError::InvalidFormat);
    }
    Ok(())
}
