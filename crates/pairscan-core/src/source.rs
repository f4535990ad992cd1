//! The fixed set of (venue, market-type) sources and their static facts.
//!
//! `SourceId` is known entirely at compile time — eight variants, fixed
//! order. The order matters: it is the array index used by every
//! `[Option<T>; SOURCE_COUNT]`-shaped field in [`crate::types`].

use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::{Deserialize, Serialize};

/// Number of sources (venue × market-type combinations).
pub const SOURCE_COUNT: usize = 8;

/// One `(venue, market)` pair. Fixed, known at compile time.
///
/// `#[repr(u8)]` and the `Archive` derive follow the same "wire-stable
/// discriminant" discipline the teacher applies to `ProductType` — this
/// enum is embedded in the archived `DirectionRecord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Archive, RkyvSerialize, RkyvDeserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SourceId {
    BinanceSpot,
    BinanceFutures,
    BybitSpot,
    BybitFutures,
    MexcSpot,
    MexcFutures,
    OkxSpot,
    OkxFutures,
}

impl SourceId {
    /// All eight sources, in the fixed canonical order.
    pub const ALL: [SourceId; SOURCE_COUNT] = [
        SourceId::BinanceSpot,
        SourceId::BinanceFutures,
        SourceId::BybitSpot,
        SourceId::BybitFutures,
        SourceId::MexcSpot,
        SourceId::MexcFutures,
        SourceId::OkxSpot,
        SourceId::OkxFutures,
    ];

    /// This source's fixed array index, `[0, SOURCE_COUNT)`.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Reconstructs a `SourceId` from its array index.
    pub fn from_index(idx: usize) -> Option<SourceId> {
        SourceId::ALL.get(idx).copied()
    }

    /// The venue this source belongs to (Binance, Bybit, MEXC, OKX).
    pub fn venue(self) -> &'static str {
        match self {
            SourceId::BinanceSpot | SourceId::BinanceFutures => "binance",
            SourceId::BybitSpot | SourceId::BybitFutures => "bybit",
            SourceId::MexcSpot | SourceId::MexcFutures => "mexc",
            SourceId::OkxSpot | SourceId::OkxFutures => "okx",
        }
    }

    /// Whether this source is a perpetual-futures market (vs. spot).
    pub fn is_futures(self) -> bool {
        matches!(self, SourceId::BinanceFutures | SourceId::BybitFutures | SourceId::MexcFutures | SourceId::OkxFutures)
    }

    /// Default subscription batch size (spec.md §4.5), before any
    /// `exchanges.toml` override is applied.
    pub fn default_batch_size(self) -> usize {
        match self {
            SourceId::BinanceSpot | SourceId::BinanceFutures => 200,
            SourceId::OkxSpot | SourceId::OkxFutures => 100,
            SourceId::BybitSpot | SourceId::BybitFutures => 50,
            SourceId::MexcSpot | SourceId::MexcFutures => 30,
        }
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SourceId::BinanceSpot => "binance_spot",
            SourceId::BinanceFutures => "binance_futures",
            SourceId::BybitSpot => "bybit_spot",
            SourceId::BybitFutures => "bybit_futures",
            SourceId::MexcSpot => "mexc_spot",
            SourceId::MexcFutures => "mexc_futures",
            SourceId::OkxSpot => "okx_spot",
            SourceId::OkxFutures => "okx_futures",
        };
        write!(f, "{s}")
    }
}
