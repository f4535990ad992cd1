//! # pairscan-registry
//!
//! C3 (Registry Builder) and C4 (Direction Builder): deterministic id
//! assignment and cross-venue direction intersection. Pure, synchronous,
//! no I/O.

pub mod builder;
pub mod direction;

pub use builder::MAX_SYMBOLS;
