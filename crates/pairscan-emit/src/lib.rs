//! C6: writes the published artifact set (spec.md §4.6) — `symbols.bin`,
//! `directions.bin`, `metadata.json` atomically, and the `.txt` mirrors
//! best-effort.

pub mod binary;
pub mod metadata;
pub mod text;

pub use binary::{write_directions, write_symbols};
pub use metadata::{Metadata, SourceValidationStats, ValidationStats, build as build_metadata};
pub use text::{write_directions_txt, write_symbols_txt, write_validation_report_txt};
