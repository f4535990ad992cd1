//! C4 — Direction Builder (spec.md §4.4). Pure, no network I/O: one
//! intersection per configured direction over the registry's current slot
//! presence. Called again after C5 pruning to rebuild with validated
//! presence (spec.md §4.5 "Rebuild each DirectionRecord's symbols vector").

use pairscan_core::types::{DirectionConfig, DirectionRecord, Registry};

pub fn build(registry: &Registry, configs: &[DirectionConfig]) -> Vec<DirectionRecord> {
    configs
        .iter()
        .map(|cfg| {
            let mut symbols: Vec<u16> = registry
                .records
                .iter()
                .filter(|r| r.has_source(cfg.spot_source) && r.has_source(cfg.futures_source))
                .map(|r| r.id)
                .collect();
            symbols.sort_unstable();
            DirectionRecord { id: cfg.id, name: cfg.name.clone(), spot_source: cfg.spot_source, futures_source: cfg.futures_source, symbols }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairscan_core::SourceId;
    use pairscan_core::types::SymbolRecord;

    fn registry_with(entries: &[(u16, &str, &[SourceId])]) -> Registry {
        let mut registry = Registry::default();
        for &(id, name, sources) in entries {
            let mut record = SymbolRecord::empty(id, name.to_string());
            for &s in sources {
                record.source_names[s.index()] = Some(name.to_string());
            }
            registry.records.push(record);
        }
        registry
    }

    #[test]
    fn intersection_only_includes_ids_present_on_both_sources() {
        let registry = registry_with(&[
            (0, "BTC-USDT", &[SourceId::BinanceSpot, SourceId::BinanceFutures]),
            (1, "ETH-USDT", &[SourceId::BinanceSpot]),
        ]);
        let cfg = DirectionConfig { id: 0, name: "binance-binance".into(), spot_source: SourceId::BinanceSpot, futures_source: SourceId::BinanceFutures };
        let directions = build(&registry, &[cfg]);
        assert_eq!(directions[0].symbols, vec![0]);
    }

    #[test]
    fn empty_source_yields_empty_symbols() {
        let registry = registry_with(&[(0, "BTC-USDT", &[SourceId::BinanceSpot])]);
        let cfg = DirectionConfig { id: 0, name: "d".into(), spot_source: SourceId::MexcSpot, futures_source: SourceId::MexcFutures };
        let directions = build(&registry, &[cfg]);
        assert!(directions[0].symbols.is_empty());
    }
}
