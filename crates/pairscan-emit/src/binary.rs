//! C6 machine-readable artifacts: `symbols.bin`, `directions.bin` (spec.md
//! §4.6, §6). rkyv round-trips the same `Archive` derives already used for
//! the wire format in `k4_core::udp`, just serializing a `Vec<T>` instead
//! of a single message.

use std::path::Path;

use pairscan_core::atomic_io::atomic_write;
use pairscan_core::types::{DirectionRecord, SymbolRecord};
use rkyv::rancor::Error as RkyvError;

/// Serializes `records` and atomically publishes them as `symbols.bin`.
///
/// rkyv's `to_bytes` root must be `Sized`, so an owned `Vec` is archived
/// rather than the unsized `[SymbolRecord]` slice — `from_bytes::<Vec<_>>`
/// is the matching read side.
pub fn write_symbols(dir: &Path, records: &[SymbolRecord]) -> std::io::Result<()> {
    let owned = records.to_vec();
    let bytes = rkyv::to_bytes::<RkyvError>(&owned).map_err(|e| std::io::Error::other(format!("rkyv encode symbols.bin: {e}")))?;
    atomic_write(dir, "symbols.bin", &bytes)
}

/// Serializes `records` and atomically publishes them as `directions.bin`.
pub fn write_directions(dir: &Path, records: &[DirectionRecord]) -> std::io::Result<()> {
    let owned = records.to_vec();
    let bytes = rkyv::to_bytes::<RkyvError>(&owned).map_err(|e| std::io::Error::other(format!("rkyv encode directions.bin: {e}")))?;
    atomic_write(dir, "directions.bin", &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairscan_core::SourceId;

    #[test]
    fn symbols_round_trip_through_rkyv() {
        let dir = tempfile::tempdir().unwrap();
        let record = SymbolRecord::empty(0, "BTC-USDT".into());
        write_symbols(dir.path(), &[record]).unwrap();

        let bytes = std::fs::read(dir.path().join("symbols.bin")).unwrap();
        let decoded: Vec<SymbolRecord> = rkyv::from_bytes::<_, RkyvError>(&bytes).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].canonical_name, "BTC-USDT");
    }

    #[test]
    fn directions_round_trip_through_rkyv() {
        let dir = tempfile::tempdir().unwrap();
        let record = DirectionRecord {
            id: 0,
            name: "binance-binance".into(),
            spot_source: SourceId::BinanceSpot,
            futures_source: SourceId::BinanceFutures,
            symbols: vec![0, 1, 2],
        };
        write_directions(dir.path(), &[record]).unwrap();

        let bytes = std::fs::read(dir.path().join("directions.bin")).unwrap();
        let decoded: Vec<DirectionRecord> = rkyv::from_bytes::<_, RkyvError>(&bytes).unwrap();
        assert_eq!(decoded[0].symbols, vec![0, 1, 2]);
    }
}
