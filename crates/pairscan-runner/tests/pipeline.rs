//! Exercises the C3 → C4 → (prune) → C4 rebuild → C6 tail of the pipeline
//! end-to-end without any network I/O, plus config-file loading — the
//! pieces `main.rs` wires together that don't require live REST/WS access.

use std::collections::BTreeSet;

use pairscan_core::SourceId;
use pairscan_core::types::{DirectionConfig, InvalidityReason, NormalizedSymbol, ValidationResult};

fn normalized(name: &str, exchange_symbol: &str, source: SourceId) -> NormalizedSymbol {
    NormalizedSymbol {
        canonical_name: name.to_string(),
        exchange_symbol: exchange_symbol.to_string(),
        source,
        min_qty: None,
        max_qty: None,
        tick_size: None,
        min_notional: None,
    }
}

#[test]
fn registry_direction_and_emit_round_trip() {
    let per_source = vec![
        (
            SourceId::BinanceSpot,
            vec![normalized("BTC-USDT", "BTCUSDT", SourceId::BinanceSpot), normalized("ETH-USDT", "ETHUSDT", SourceId::BinanceSpot)],
        ),
        (SourceId::BinanceFutures, vec![normalized("BTC-USDT", "BTCUSDT", SourceId::BinanceFutures)]),
    ];
    let mut registry = pairscan_registry::builder::build(&per_source);
    assert_eq!(registry.records.len(), 2);

    let direction_cfg =
        DirectionConfig { id: 0, name: "binance-binance".into(), spot_source: SourceId::BinanceSpot, futures_source: SourceId::BinanceFutures };
    let directions = pairscan_registry::direction::build(&registry, &[direction_cfg.clone()]);
    assert_eq!(directions[0].symbols.len(), 1, "only BTC-USDT is listed on both sides");

    // C5: simulate BTC-USDT failing live validation on the futures side.
    let btc_id = registry.lookup(SourceId::BinanceFutures, "BTCUSDT").unwrap();
    registry.prune_source_slot(btc_id, SourceId::BinanceFutures);

    let directions_after_prune = pairscan_registry::direction::build(&registry, &[direction_cfg]);
    assert!(directions_after_prune[0].symbols.is_empty(), "pruned slot must drop the direction's intersection");

    // C6: publish and read back both binary artifacts atomically.
    let dir = tempfile::tempdir().unwrap();
    pairscan_emit::write_symbols(dir.path(), &registry.records).unwrap();
    pairscan_emit::write_directions(dir.path(), &directions_after_prune).unwrap();

    assert!(dir.path().join("symbols.bin").exists());
    assert!(dir.path().join("directions.bin").exists());

    let validation = vec![ValidationResult {
        source: SourceId::BinanceFutures,
        attempted: 1,
        valid: BTreeSet::new(),
        invalid: vec![(btc_id, InvalidityReason::ZeroOrMissingBid)],
    }];
    let metadata = pairscan_emit::build_metadata(&registry, &directions_after_prune, &validation, 1);
    pairscan_emit::metadata::write(dir.path(), &metadata).unwrap();
    let metadata_bytes = std::fs::read(dir.path().join("metadata.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&metadata_bytes).unwrap();
    assert_eq!(parsed["config_version"], 1);

    pairscan_emit::write_symbols_txt(dir.path(), &registry);
    pairscan_emit::write_directions_txt(dir.path(), &directions_after_prune);
    pairscan_emit::write_validation_report_txt(dir.path(), &registry, &validation);
    assert!(dir.path().join("symbols.txt").exists());
    assert!(dir.path().join("validation_report.txt").exists());
}

#[test]
fn insufficient_sources_below_quorum_is_detected() {
    let outcomes: Vec<pairscan_sources::FetchOutcome> = SourceId::ALL
        .iter()
        .take(5)
        .map(|&source| pairscan_sources::FetchOutcome { source, result: Ok(vec![]) })
        .chain(SourceId::ALL.iter().skip(5).map(|&source| pairscan_sources::FetchOutcome {
            source,
            result: Err(pairscan_sources::fetch::FetchError::Permanent("simulated 403".into())),
        }))
        .collect();
    let succeeded = pairscan_sources::success_count(&outcomes);
    assert_eq!(succeeded, 5);
    assert!(succeeded < 6, "five successes must be below the six-source quorum");
}

#[test]
fn loads_all_three_config_files_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "generated_dir = \"/tmp/pairscan-out\"\n").unwrap();
    std::fs::write(
        dir.path().join("exchanges.toml"),
        "[sources.binance_spot]\nbatch_size = 150\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("directions.toml"),
        "[[direction]]\nid = 0\nname = \"binance-binance\"\nspot_source = \"binance_spot\"\nfutures_source = \"binance_futures\"\n",
    )
    .unwrap();

    let app = pairscan_core::config::load_app_config(&dir.path().join("config.toml")).unwrap();
    let exchanges = pairscan_core::config::load_exchanges_config(&dir.path().join("exchanges.toml")).unwrap();
    let directions = pairscan_core::config::load_directions_config(&dir.path().join("directions.toml")).unwrap();

    assert_eq!(app.generated_dir, "/tmp/pairscan-out");
    assert_eq!(exchanges.settings(SourceId::BinanceSpot).batch_size, Some(150));
    assert_eq!(directions.direction.len(), 1);
}
