//! # pairscan-core
//!
//! Shared foundation for the Pair Discovery pipeline:
//!
//! - **Types** (`types`) — the data model shared by every stage (spec.md §3)
//! - **Sources** (`source`) — the fixed 8-way `SourceId` table and its
//!   compile-time defaults
//! - **Configuration** (`config`) — TOML deserialization for the three input
//!   files
//! - **Error types** (`error`) — `PairscanError`, mapped to process exit codes
//! - **Atomic I/O** (`atomic_io`) — the write-tmp/fsync/rename publication
//!   primitive
//! - **WebSocket** (`ws`) — control-connection helper with reconnect backoff
//! - **Time utilities** (`time_util`) — timestamps for `metadata.json`
//! - **Logging** (`logging`) — tracing-based structured logging

pub mod atomic_io;
pub mod config;
pub mod error;
pub mod logging;
pub mod source;
pub mod time_util;
pub mod types;
pub mod ws;

pub use error::PairscanError;
pub use source::{SOURCE_COUNT, SourceId};
