//! # pairscan-sources
//!
//! C1 (Inventory Fetcher) and C2 (Normalizer): one REST-parsing module per
//! venue, a shared retry policy, and the fan-out/normalize orchestration
//! consumed by the runner.

pub mod binance;
pub mod bybit;
pub mod fetch;
pub mod inventory;
pub mod mexc;
pub mod normalize;
pub mod okx;
pub mod retry;

pub use inventory::{FetchOutcome, NormalizeOutcome, fetch_all, normalize_all, success_count};
pub use normalize::{NormalizationError, normalize};
