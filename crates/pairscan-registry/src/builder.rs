//! C3 — Registry Builder (spec.md §4.3).
//!
//! Maintains one [`SymbolRecord`] builder per canonical name across all
//! eight sources, then assigns ids by sorting canonical names in ascending
//! Unicode code-point order — a `BTreeMap<String, _>` keyed on the
//! canonical name gives us that ordering for free, so enumeration index
//! doubles as the sort.

use std::collections::{BTreeMap, HashMap};

use pairscan_core::SourceId;
use pairscan_core::types::{NormalizedSymbol, Registry, SymbolRecord};
use tracing::warn;

/// Registry size cap (spec.md §3 "Global limits").
pub const MAX_SYMBOLS: usize = 1024;

/// Builds the [`Registry`] from every source's normalized symbols.
///
/// `per_source` need not cover all eight sources, and order does not
/// matter — ids are a pure function of the sorted canonical-name universe,
/// not of arrival order (spec.md §5 "Ordering guarantees").
pub fn build(per_source: &[(SourceId, Vec<NormalizedSymbol>)]) -> Registry {
    let mut builders: BTreeMap<String, SymbolRecord> = BTreeMap::new();

    for (source, symbols) in per_source {
        for symbol in symbols {
            let record =
                builders.entry(symbol.canonical_name.clone()).or_insert_with(|| SymbolRecord::empty(0, symbol.canonical_name.clone()));

            let idx = source.index();
            if record.source_names[idx].is_some() {
                warn!("[c3] duplicate listing of {} on {source}, keeping first", symbol.canonical_name);
                continue;
            }
            record.source_names[idx] = Some(symbol.exchange_symbol.clone());
            record.min_qty[idx] = symbol.min_qty;
            record.max_qty[idx] = symbol.max_qty;
            record.tick_size[idx] = symbol.tick_size;
            record.min_notional[idx] = symbol.min_notional;
        }
    }

    let mut names: Vec<String> = builders.keys().cloned().collect();
    let total = names.len();
    if total > MAX_SYMBOLS {
        warn!("[c3] {total} distinct canonical names exceeds MAX_SYMBOLS={MAX_SYMBOLS}, truncating high end");
        names.truncate(MAX_SYMBOLS);
    }

    let mut records = Vec::with_capacity(names.len());
    let mut reverse_map = HashMap::new();
    for (id, name) in names.into_iter().enumerate() {
        let mut record = builders.remove(&name).expect("name was just read from builders' keys");
        record.id = id as u16;
        for source in SourceId::ALL {
            if let Some(sym) = &record.source_names[source.index()] {
                reverse_map.insert((source, sym.clone()), id as u16);
            }
        }
        records.push(record);
    }

    Registry { records, reverse_map }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(canonical: &str, exchange: &str, source: SourceId) -> NormalizedSymbol {
        NormalizedSymbol {
            canonical_name: canonical.to_string(),
            exchange_symbol: exchange.to_string(),
            source,
            min_qty: None,
            max_qty: None,
            tick_size: None,
            min_notional: None,
        }
    }

    #[test]
    fn ids_assigned_in_ascending_name_order() {
        let per_source = vec![
            (SourceId::BinanceSpot, vec![sym("SOL-USDT", "SOLUSDT", SourceId::BinanceSpot), sym("BTC-USDT", "BTCUSDT", SourceId::BinanceSpot)]),
            (SourceId::OkxSpot, vec![sym("ETH-USDT", "ETH-USDT", SourceId::OkxSpot)]),
        ];
        let registry = build(&per_source);
        assert_eq!(registry.records.len(), 3);
        assert_eq!(registry.records[0].canonical_name, "BTC-USDT");
        assert_eq!(registry.records[1].canonical_name, "ETH-USDT");
        assert_eq!(registry.records[2].canonical_name, "SOL-USDT");
    }

    #[test]
    fn arrival_order_does_not_affect_ids() {
        let forward = vec![(SourceId::BinanceSpot, vec![sym("AAA-USDT", "AAAUSDT", SourceId::BinanceSpot), sym("ZZZ-USDT", "ZZZUSDT", SourceId::BinanceSpot)])];
        let backward = vec![(SourceId::BinanceSpot, vec![sym("ZZZ-USDT", "ZZZUSDT", SourceId::BinanceSpot), sym("AAA-USDT", "AAAUSDT", SourceId::BinanceSpot)])];
        assert_eq!(build(&forward).records[0].canonical_name, build(&backward).records[0].canonical_name);
    }

    #[test]
    fn duplicate_source_listing_keeps_first() {
        let per_source = vec![(
            SourceId::BinanceSpot,
            vec![sym("BTC-USDT", "BTCUSDT", SourceId::BinanceSpot), sym("BTC-USDT", "BTCUSDT2", SourceId::BinanceSpot)],
        )];
        let registry = build(&per_source);
        assert_eq!(registry.records[0].source_names[SourceId::BinanceSpot.index()].as_deref(), Some("BTCUSDT"));
    }

    #[test]
    fn reverse_map_resolves_every_populated_slot() {
        let per_source = vec![(SourceId::OkxSpot, vec![sym("BTC-USDT", "BTC-USDT", SourceId::OkxSpot)])];
        let registry = build(&per_source);
        assert_eq!(registry.lookup(SourceId::OkxSpot, "BTC-USDT"), Some(0));
    }

    #[test]
    fn overflow_truncates_high_end() {
        let mut symbols = Vec::new();
        for i in 0..(MAX_SYMBOLS + 10) {
            let name = format!("SYM{i:05}-USDT");
            symbols.push(sym(&name, &name, SourceId::BinanceSpot));
        }
        let per_source = vec![(SourceId::BinanceSpot, symbols)];
        let registry = build(&per_source);
        assert_eq!(registry.records.len(), MAX_SYMBOLS);
    }
}
