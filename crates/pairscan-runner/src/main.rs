//! # pairscan-runner
//!
//! Entry point for one Pair Discovery pipeline run: C1 inventory fetch, C2
//! normalize, C3 registry build, C4 direction build, C5 live validation,
//! C5 pruning + direction rebuild, C6 emit. One run, one process, exits
//! (spec.md §6 "Process interface").
//!
//! ```bash
//! pairscan --config ./pairscan.d --output /var/lib/pairscan/generated
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use pairscan_core::PairscanError;
use pairscan_core::types::InvalidityReason;
use tracing::{error, info, warn};

/// Pair Discovery — cross-exchange symbol inventory, registry, and
/// live-validation pipeline.
#[derive(Parser)]
#[command(name = "pairscan", about = "Pair Discovery pipeline runner")]
struct Cli {
    /// Directory holding `config.toml`, `exchanges.toml`, `directions.toml`.
    #[arg(long, default_value = ".")]
    config: PathBuf,

    /// Publication directory. Overrides `config.toml`'s `generated_dir`.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Optional log directory for file output.
    #[arg(long)]
    log_dir: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    pairscan_core::logging::init_logging(&cli.log_level, cli.log_dir.as_deref(), "pairscan");

    let exit_code = match run(&cli).await {
        Ok(()) => 0,
        Err(e) => {
            error!("run failed: {e}");
            e.downcast_ref::<PairscanError>().map(PairscanError::exit_code).unwrap_or(1)
        }
    };
    std::process::exit(exit_code);
}

/// A source "produced validation output" if it never had an attempt (no
/// symbols assigned to it), or its control connection stayed up long
/// enough that at least one attempt got a real answer — valid, or invalid
/// for a reason other than the connection dropping out entirely.
fn produced_output(result: &pairscan_core::types::ValidationResult) -> bool {
    if result.attempted == 0 {
        return true;
    }
    !result.valid.is_empty() || result.invalid.iter().any(|(_, reason)| !matches!(reason, InvalidityReason::ConnectionDropped))
}

async fn run(cli: &Cli) -> Result<()> {
    let mut app_config =
        pairscan_core::config::load_app_config(&cli.config.join("config.toml")).context("loading config.toml")?;
    let exchanges_config = pairscan_core::config::load_exchanges_config(&cli.config.join("exchanges.toml"))
        .context("loading exchanges.toml")?;
    let directions_config = pairscan_core::config::load_directions_config(&cli.config.join("directions.toml"))
        .context("loading directions.toml")?;

    if let Some(output) = &cli.output {
        app_config.generated_dir = output.to_string_lossy().into_owned();
    }

    info!(
        "pairscan starting — generated_dir={}, min_sources={}, min_validated_sources={}, directions={}",
        app_config.generated_dir,
        app_config.min_sources,
        app_config.min_validated_sources,
        directions_config.direction.len(),
    );

    // --- C1: inventory fetch ---------------------------------------------
    let http_client = reqwest::Client::new();
    let rest_timeout = Duration::from_millis(app_config.rest_timeout_ms);
    let fetch_outcomes = pairscan_sources::fetch_all(&http_client, &exchanges_config, rest_timeout).await;
    let fetched = pairscan_sources::success_count(&fetch_outcomes);

    if fetched < app_config.min_sources {
        return Err(PairscanError::InsufficientSources { succeeded: fetched, attempted: fetch_outcomes.len(), required: app_config.min_sources }
            .into());
    }
    info!("[c1] {fetched}/{} sources fetched", fetch_outcomes.len());

    // --- C2: normalize -----------------------------------------------------
    let normalize_outcomes = pairscan_sources::normalize_all(&fetch_outcomes);
    for outcome in &normalize_outcomes {
        info!("[c2] {} — {} normalized, {} rejected", outcome.source, outcome.symbols.len(), outcome.rejected);
    }

    // --- C3: registry build --------------------------------------------
    let per_source: Vec<(pairscan_core::SourceId, Vec<pairscan_core::types::NormalizedSymbol>)> =
        normalize_outcomes.into_iter().map(|o| (o.source, o.symbols)).collect();
    let mut registry = pairscan_registry::builder::build(&per_source);
    info!("[c3] registry built — {} symbols", registry.records.len());

    // --- C5: live validation ---------------------------------------------
    let mut work = Vec::new();
    for source in pairscan_core::SourceId::ALL {
        let settings = exchanges_config.settings(source);
        let ws_url = settings.ws_url.unwrap_or_else(|| pairscan_validate::default_ws_url(source).to_string());
        let batch_size = settings.batch_size.unwrap_or_else(|| source.default_batch_size());
        let symbols: Vec<(u16, String)> = registry
            .records
            .iter()
            .filter_map(|r| r.source_names[source.index()].clone().map(|name| (r.id, name)))
            .collect();
        work.push((source, ws_url, symbols, batch_size));
    }

    let validation_results = pairscan_validate::validate_all(work).await;
    let validated_sources = validation_results.iter().filter(|r| produced_output(r)).count();
    if validated_sources < app_config.min_validated_sources {
        return Err(PairscanError::ValidationFailed {
            succeeded: validated_sources,
            attempted: validation_results.len(),
            required: app_config.min_validated_sources,
        }
        .into());
    }

    // --- C5 pruning: clear invalidated slots --------------------------
    for result in &validation_results {
        for (id, reason) in &result.invalid {
            warn!("[c5] {} symbol {id} invalidated: {reason}", result.source);
            registry.prune_source_slot(*id, result.source);
        }
    }

    // --- C4: direction build (post-validation) --------------------------
    let directions = pairscan_registry::direction::build(&registry, &directions_config.direction);
    let invalidated_total: usize = validation_results.iter().map(|r| r.invalid.len()).sum();
    info!("[c5] {invalidated_total} symbol-slots invalidated across {} sources", validation_results.len());

    // --- C6: emit ---------------------------------------------------------
    let generated_dir = std::path::Path::new(&app_config.generated_dir);
    pairscan_emit::write_symbols(generated_dir, &registry.records).map_err(|e| PairscanError::Emit(e.to_string()))?;
    pairscan_emit::write_directions(generated_dir, &directions).map_err(|e| PairscanError::Emit(e.to_string()))?;

    let config_version = app_config.config_version.unwrap_or_else(pairscan_core::time_util::now_secs);
    let metadata = pairscan_emit::build_metadata(&registry, &directions, &validation_results, config_version);
    pairscan_emit::metadata::write(generated_dir, &metadata).map_err(|e| PairscanError::Emit(e.to_string()))?;

    pairscan_emit::write_symbols_txt(generated_dir, &registry);
    pairscan_emit::write_directions_txt(generated_dir, &directions);
    pairscan_emit::write_validation_report_txt(generated_dir, &registry, &validation_results);

    info!(
        "pairscan finished — {} symbols, {} directions published to {}",
        registry.records.len(),
        directions.len(),
        app_config.generated_dir
    );

    Ok(())
}
