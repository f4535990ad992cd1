//! `metadata.json` (spec.md §4.6, §6) — versioned summary consumed by
//! downstream feeds to detect an update without parsing the binary files.

use std::collections::BTreeMap;

use pairscan_core::types::{DirectionRecord, Registry, ValidationResult};
use serde::Serialize;

use pairscan_core::atomic_io::atomic_write;
use pairscan_core::time_util::now_iso8601;

#[derive(Debug, Serialize)]
pub struct SourceValidationStats {
    pub attempted: usize,
    pub valid: usize,
    pub invalid: usize,
}

#[derive(Debug, Serialize)]
pub struct ValidationStats {
    pub total_attempted: usize,
    pub total_valid: usize,
    pub total_invalid: usize,
    pub per_source: BTreeMap<String, SourceValidationStats>,
}

#[derive(Debug, Serialize)]
pub struct Metadata {
    pub timestamp: String,
    pub config_version: u64,
    pub num_symbols: usize,
    pub per_source_counts: BTreeMap<String, usize>,
    pub per_direction_counts: BTreeMap<String, usize>,
    pub validation_stats: ValidationStats,
}

pub fn build(registry: &Registry, directions: &[DirectionRecord], validation: &[ValidationResult], config_version: u64) -> Metadata {
    let mut per_source_counts = BTreeMap::new();
    for source in pairscan_core::SourceId::ALL {
        let count = registry.records.iter().filter(|r| r.has_source(source)).count();
        per_source_counts.insert(source.to_string(), count);
    }

    let per_direction_counts = directions.iter().map(|d| (d.name.clone(), d.symbols.len())).collect();

    let mut per_source_stats = BTreeMap::new();
    let (mut total_attempted, mut total_valid, mut total_invalid) = (0, 0, 0);
    for v in validation {
        total_attempted += v.attempted;
        total_valid += v.valid.len();
        total_invalid += v.invalid.len();
        per_source_stats
            .insert(v.source.to_string(), SourceValidationStats { attempted: v.attempted, valid: v.valid.len(), invalid: v.invalid.len() });
    }

    Metadata {
        timestamp: now_iso8601(),
        config_version,
        num_symbols: registry.records.len(),
        per_source_counts,
        per_direction_counts,
        validation_stats: ValidationStats { total_attempted, total_valid, total_invalid, per_source: per_source_stats },
    }
}

pub fn write(dir: &std::path::Path, metadata: &Metadata) -> std::io::Result<()> {
    let bytes = serde_json::to_vec_pretty(metadata)?;
    atomic_write(dir, "metadata.json", &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairscan_core::SourceId;
    use pairscan_core::types::SymbolRecord;

    #[test]
    fn counts_reflect_populated_slots() {
        let mut registry = Registry::default();
        let mut record = SymbolRecord::empty(0, "BTC-USDT".into());
        record.source_names[SourceId::BinanceSpot.index()] = Some("BTCUSDT".into());
        registry.records.push(record);

        let metadata = build(&registry, &[], &[], 7);
        assert_eq!(metadata.num_symbols, 1);
        assert_eq!(metadata.per_source_counts["binance_spot"], 1);
        assert_eq!(metadata.per_source_counts["okx_futures"], 0);
        assert_eq!(metadata.config_version, 7);
    }
}
