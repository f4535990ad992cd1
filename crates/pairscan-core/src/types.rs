//! Core data model for the Pair Discovery pipeline (spec.md §3).
//!
//! Entities here flow strictly forward through the pipeline: C1 produces
//! [`RawInstrument`], C2 consumes it and produces [`NormalizedSymbol`], C3
//! consumes all of those and produces a [`Registry`] of [`SymbolRecord`], C4
//! consumes the registry and produces [`DirectionRecord`]s, C5 consumes and
//! prunes both. Nothing here is retained across invocations.

use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::{Deserialize, Serialize};

use crate::source::{SOURCE_COUNT, SourceId};

// ---------------------------------------------------------------------------
// C1 → C2: raw inventory
// ---------------------------------------------------------------------------

/// Trading-status discriminant, already resolved by the venue-specific C1
/// parser from whatever string/enum/code that venue uses (spec.md §4.1's
/// "Trading status" column).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentStatus {
    Trading,
    NotTrading,
}

/// One instrument as reported by a single venue/market REST endpoint.
///
/// Constructed by C1, consumed and discarded by C2.
#[derive(Debug, Clone)]
pub struct RawInstrument {
    /// Exchange-native symbol string (e.g. `"BTCUSDT"`, `"BTC-USDT-SWAP"`).
    pub symbol: String,
    /// Declared base asset, as reported by the venue (may be absent for
    /// venues that only report a concatenated symbol).
    pub base: Option<String>,
    /// Declared quote asset, as reported by the venue.
    pub quote: Option<String>,
    pub status: InstrumentStatus,
    pub min_qty: Option<f64>,
    pub max_qty: Option<f64>,
    pub tick_size: Option<f64>,
    pub min_notional: Option<f64>,
}

// ---------------------------------------------------------------------------
// C2 → C3: normalized per-source symbol
// ---------------------------------------------------------------------------

/// One instrument after C2 has parsed and validated its base/quote pair.
#[derive(Debug, Clone)]
pub struct NormalizedSymbol {
    /// `"{BASE}-USDT"`, both uppercase.
    pub canonical_name: String,
    /// The original exchange-native symbol, needed later for WS subscribe
    /// and feed lookup.
    pub exchange_symbol: String,
    pub source: SourceId,
    pub min_qty: Option<f64>,
    pub max_qty: Option<f64>,
    pub tick_size: Option<f64>,
    pub min_notional: Option<f64>,
}

// ---------------------------------------------------------------------------
// C3: the global registry
// ---------------------------------------------------------------------------

/// One global instrument, identified by a stable 16-bit id.
///
/// `source_names` and the four attribute vectors are always exactly
/// [`SOURCE_COUNT`] elements long, indexed by [`SourceId::index`]. A `None`
/// slot means "not listed on that source" (or "invalidated by C5 and
/// pruned" — see spec.md §4.5's slot-clear/retain-record choice, recorded in
/// DESIGN.md).
#[derive(Debug, Clone, PartialEq, Archive, RkyvSerialize, RkyvDeserialize)]
pub struct SymbolRecord {
    pub id: u16,
    pub canonical_name: String,
    pub source_names: Vec<Option<String>>,
    pub min_qty: Vec<Option<f64>>,
    pub max_qty: Vec<Option<f64>>,
    pub tick_size: Vec<Option<f64>>,
    pub min_notional: Vec<Option<f64>>,
}

impl SymbolRecord {
    /// Builds an empty record (all source slots absent) for `id`/`name`.
    pub fn empty(id: u16, canonical_name: String) -> Self {
        Self {
            id,
            canonical_name,
            source_names: vec![None; SOURCE_COUNT],
            min_qty: vec![None; SOURCE_COUNT],
            max_qty: vec![None; SOURCE_COUNT],
            tick_size: vec![None; SOURCE_COUNT],
            min_notional: vec![None; SOURCE_COUNT],
        }
    }

    /// Whether `source` has a populated slot on this record.
    pub fn has_source(&self, source: SourceId) -> bool {
        self.source_names.get(source.index()).is_some_and(|s| s.is_some())
    }

    /// Clears a source's slot (used by C5 pruning). Leaves the record in
    /// place — "slot-clear, retain record" (spec.md §4.5, DESIGN.md open
    /// question (a)).
    pub fn clear_source(&mut self, source: SourceId) {
        let idx = source.index();
        if let Some(slot) = self.source_names.get_mut(idx) {
            *slot = None;
        }
        for attrs in [&mut self.min_qty, &mut self.max_qty, &mut self.tick_size, &mut self.min_notional] {
            if let Some(slot) = attrs.get_mut(idx) {
                *slot = None;
            }
        }
    }

    /// Whether at least one source slot is populated (invariant 2, spec.md §8).
    pub fn has_any_source(&self) -> bool {
        self.source_names.iter().any(Option::is_some)
    }
}

/// The full collection produced by C3 and pruned in place by C5.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    /// Indexed by id — `records[i].id == i as u16` for all `i`.
    pub records: Vec<SymbolRecord>,
    /// `(source, exchange_symbol) -> id`, total over populated slots.
    pub reverse_map: std::collections::HashMap<(SourceId, String), u16>,
}

impl Registry {
    pub fn get(&self, id: u16) -> Option<&SymbolRecord> {
        self.records.get(id as usize)
    }

    pub fn get_mut(&mut self, id: u16) -> Option<&mut SymbolRecord> {
        self.records.get_mut(id as usize)
    }

    pub fn lookup(&self, source: SourceId, exchange_symbol: &str) -> Option<u16> {
        self.reverse_map.get(&(source, exchange_symbol.to_string())).copied()
    }

    /// Clears a source slot on `id`'s record and removes the corresponding
    /// reverse-map entry, keeping both structures consistent.
    pub fn prune_source_slot(&mut self, id: u16, source: SourceId) {
        if let Some(record) = self.get_mut(id) {
            if let Some(sym) = record.source_names[source.index()].clone() {
                record.clear_source(source);
                self.reverse_map.remove(&(source, sym));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// C4: directions
// ---------------------------------------------------------------------------

/// One configured cross-venue spread direction (input, from `directions.toml`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DirectionConfig {
    pub id: u8,
    pub name: String,
    pub spot_source: SourceId,
    pub futures_source: SourceId,
}

/// One direction's computed symbol intersection (output).
#[derive(Debug, Clone, Archive, RkyvSerialize, RkyvDeserialize)]
pub struct DirectionRecord {
    pub id: u8,
    pub name: String,
    pub spot_source: SourceId,
    pub futures_source: SourceId,
    /// Ids present (and, after C5, validated) on both referenced sources,
    /// sorted ascending.
    pub symbols: Vec<u16>,
}

// ---------------------------------------------------------------------------
// C5: validation
// ---------------------------------------------------------------------------

/// Why a (source, symbol_id) pair failed live validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidityReason {
    NoMessage,
    ZeroOrMissingBid,
    ZeroOrMissingAsk,
    BidAboveAsk,
    SubscribeRejected,
    BatchTimeout,
    ConnectionDropped,
}

impl std::fmt::Display for InvalidityReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            InvalidityReason::NoMessage => "NoMessage",
            InvalidityReason::ZeroOrMissingBid => "ZeroOrMissingBid",
            InvalidityReason::ZeroOrMissingAsk => "ZeroOrMissingAsk",
            InvalidityReason::BidAboveAsk => "BidAboveAsk",
            InvalidityReason::SubscribeRejected => "SubscribeRejected",
            InvalidityReason::BatchTimeout => "BatchTimeout",
            InvalidityReason::ConnectionDropped => "ConnectionDropped",
        };
        write!(f, "{s}")
    }
}

/// Outcome of live-validating every symbol attempted on one source.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub source: SourceId,
    pub attempted: usize,
    pub valid: std::collections::BTreeSet<u16>,
    pub invalid: Vec<(u16, InvalidityReason)>,
}

impl ValidationResult {
    pub fn empty(source: SourceId) -> Self {
        Self { source, attempted: 0, valid: Default::default(), invalid: Vec::new() }
    }

    pub fn is_valid(&self, id: u16) -> bool {
        self.valid.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_has_no_source() {
        let r = SymbolRecord::empty(0, "BTC-USDT".into());
        assert!(!r.has_any_source());
        assert_eq!(r.source_names.len(), SOURCE_COUNT);
    }

    #[test]
    fn clear_source_removes_attributes_too() {
        let mut r = SymbolRecord::empty(1, "ETH-USDT".into());
        let idx = SourceId::BinanceSpot.index();
        r.source_names[idx] = Some("ETHUSDT".into());
        r.tick_size[idx] = Some(0.01);
        r.clear_source(SourceId::BinanceSpot);
        assert!(!r.has_source(SourceId::BinanceSpot));
        assert_eq!(r.tick_size[idx], None);
    }

    #[test]
    fn registry_prune_keeps_reverse_map_consistent() {
        let mut reg = Registry::default();
        let mut rec = SymbolRecord::empty(0, "BTC-USDT".into());
        rec.source_names[SourceId::OkxSpot.index()] = Some("BTC-USDT".into());
        reg.records.push(rec);
        reg.reverse_map.insert((SourceId::OkxSpot, "BTC-USDT".into()), 0);

        reg.prune_source_slot(0, SourceId::OkxSpot);

        assert!(!reg.get(0).unwrap().has_source(SourceId::OkxSpot));
        assert!(reg.lookup(SourceId::OkxSpot, "BTC-USDT").is_none());
    }
}
