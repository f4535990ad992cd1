//! Configuration parsing for the Pair Discovery system.
//!
//! Three TOML files are read, each into its own `serde`-derived struct
//! (spec.md §6 "Inputs (files)"): `config.toml` (general parameters),
//! `exchanges.toml` (per-venue REST/WS settings), `directions.toml` (the
//! twelve `[[direction]]` tables). The one-struct-per-file,
//! `load_*(path) -> Result<T>` shape follows `k4_core::config::load_config`;
//! only the on-disk format (TOML instead of JSON) differs.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::source::SourceId;
use crate::types::DirectionConfig;

/// `config.toml` — general pipeline parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Directory `symbols.bin`/`directions.bin`/`metadata.json`/the `.txt`
    /// mirrors are published into.
    pub generated_dir: String,

    /// Quote assets accepted by the Normalizer (default `["USDT"]`).
    #[serde(default = "default_quotes")]
    pub quote_filter: Vec<String>,

    /// Minimum number of successful C1 inventory fetches to proceed
    /// (spec.md §4.1 aggregate fault policy; default 6).
    #[serde(default = "default_min_sources")]
    pub min_sources: usize,

    /// Minimum number of sources that must produce any C5 validation output
    /// at all (spec.md §4.5 aggregate fault policy; default 6).
    #[serde(default = "default_min_sources")]
    pub min_validated_sources: usize,

    /// Per-attempt REST request timeout in milliseconds (spec.md §4.1; default 10_000).
    #[serde(default = "default_rest_timeout_ms")]
    pub rest_timeout_ms: u64,

    /// Externally supplied monotonic counter for `metadata.json`'s
    /// `config_version`. Falls back to the wall-clock timestamp if absent.
    pub config_version: Option<u64>,
}

fn default_quotes() -> Vec<String> {
    vec!["USDT".to_string()]
}

fn default_min_sources() -> usize {
    6
}

fn default_rest_timeout_ms() -> u64 {
    10_000
}

/// `exchanges.toml` — per-source REST/WS endpoint overrides.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExchangesConfig {
    #[serde(default)]
    pub sources: HashMap<SourceId, SourceSettings>,
}

/// One source's overridable settings. Any field left unset in
/// `exchanges.toml` falls back to the compiled-in default in
/// `pairscan_core::source`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SourceSettings {
    pub rest_base_url: Option<String>,
    pub ws_url: Option<String>,
    pub batch_size: Option<usize>,
}

impl ExchangesConfig {
    pub fn settings(&self, source: SourceId) -> SourceSettings {
        self.sources.get(&source).cloned().unwrap_or_default()
    }
}

/// `directions.toml` — `[[direction]]` array of tables.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsConfig {
    pub direction: Vec<DirectionConfig>,
}

fn read_and_parse<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, crate::error::PairscanError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| crate::error::PairscanError::Config(format!("reading {}: {e}", path.display())))?;
    toml::from_str(&content).map_err(|e| crate::error::PairscanError::Config(format!("parsing {}: {e}", path.display())))
}

pub fn load_app_config(path: &Path) -> Result<AppConfig, crate::error::PairscanError> {
    read_and_parse(path)
}

pub fn load_exchanges_config(path: &Path) -> Result<ExchangesConfig, crate::error::PairscanError> {
    read_and_parse(path)
}

pub fn load_directions_config(path: &Path) -> Result<DirectionsConfig, crate::error::PairscanError> {
    read_and_parse(path)
}
