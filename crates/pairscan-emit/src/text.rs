//! `symbols.txt`, `directions.txt`, `validation_report.txt` — best-effort
//! human-readable mirrors (spec.md §4.6: "human-readable files are
//! best-effort", unlike the three machine-readable artifacts).

use std::path::Path;

use pairscan_core::SourceId;
use pairscan_core::atomic_io::best_effort_write;
use pairscan_core::types::{DirectionRecord, Registry, ValidationResult};
use tracing::warn;

pub fn write_symbols_txt(dir: &Path, registry: &Registry) {
    let mut out = String::from("id\tcanonical_name\t");
    out.push_str(&SourceId::ALL.iter().map(SourceId::to_string).collect::<Vec<_>>().join("\t"));
    out.push('\n');

    for record in &registry.records {
        out.push_str(&format!("{}\t{}", record.id, record.canonical_name));
        for source in SourceId::ALL {
            out.push('\t');
            out.push_str(record.source_names[source.index()].as_deref().unwrap_or("-"));
        }
        out.push('\n');
    }

    if let Err(e) = best_effort_write(dir, "symbols.txt", &out) {
        warn!("symbols.txt write failed (best-effort, ignoring): {e}");
    }
}

pub fn write_directions_txt(dir: &Path, directions: &[DirectionRecord]) {
    let mut out = String::from("id\tname\tspot_source\tfutures_source\tnum_symbols\tsymbol_ids\n");
    for d in directions {
        let ids = d.symbols.iter().map(u16::to_string).collect::<Vec<_>>().join(",");
        out.push_str(&format!("{}\t{}\t{}\t{}\t{}\t{}\n", d.id, d.name, d.spot_source, d.futures_source, d.symbols.len(), ids));
    }
    if let Err(e) = best_effort_write(dir, "directions.txt", &out) {
        warn!("directions.txt write failed (best-effort, ignoring): {e}");
    }
}

pub fn write_validation_report_txt(dir: &Path, registry: &Registry, validation: &[ValidationResult]) {
    let mut out = String::from("source\tattempted\tvalid\tinvalid\tsymbol\treason\n");
    for v in validation {
        for (id, reason) in &v.invalid {
            let name = registry.get(*id).map(|r| r.canonical_name.as_str()).unwrap_or("?");
            out.push_str(&format!("{}\t{}\t{}\t{}\t{}\t{}\n", v.source, v.attempted, v.valid.len(), v.invalid.len(), name, reason));
        }
        if v.invalid.is_empty() {
            out.push_str(&format!("{}\t{}\t{}\t0\t-\t-\n", v.source, v.attempted, v.valid.len()));
        }
    }
    if let Err(e) = best_effort_write(dir, "validation_report.txt", &out) {
        warn!("validation_report.txt write failed (best-effort, ignoring): {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairscan_core::types::SymbolRecord;
    use std::collections::BTreeSet;

    #[test]
    fn symbols_txt_lists_one_row_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = Registry::default();
        registry.records.push(SymbolRecord::empty(0, "BTC-USDT".into()));
        write_symbols_txt(dir.path(), &registry);
        let contents = std::fs::read_to_string(dir.path().join("symbols.txt")).unwrap();
        assert!(contents.contains("BTC-USDT"));
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn validation_report_lists_invalid_entries() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = Registry::default();
        registry.records.push(SymbolRecord::empty(1, "ETH-USDT".into()));
        let validation = vec![ValidationResult {
            source: SourceId::BybitSpot,
            attempted: 1,
            valid: BTreeSet::new(),
            invalid: vec![(1, pairscan_core::types::InvalidityReason::NoMessage)],
        }];
        write_validation_report_txt(dir.path(), &registry, &validation);
        let contents = std::fs::read_to_string(dir.path().join("validation_report.txt")).unwrap();
        assert!(contents.contains("ETH-USDT"));
        assert!(contents.contains("NoMessage"));
    }
}
