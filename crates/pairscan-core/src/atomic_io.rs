//! Atomic multi-file publication primitive (spec.md §4.6, §6, §8 invariant 5).
//!
//! `atomic_write` guarantees that any reader opening `final_path` by name at
//! any moment observes either the previous run's bytes or this run's bytes —
//! never a partial write. The contract: write to `<final_path>.tmp` in the
//! same directory, `fsync` it, `rename` over the final path (atomic on a
//! POSIX filesystem since both paths share a directory), then best-effort
//! `fsync` the directory so the rename itself is durable.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::{debug, warn};

/// Writes `bytes` to `dir/name` atomically. `name` must not itself end in
/// `.tmp` (the temp file is `dir/{name}.tmp`).
pub fn atomic_write(dir: &Path, name: &str, bytes: &[u8]) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let final_path = dir.join(name);
    let tmp_path = dir.join(format!("{name}.tmp"));

    {
        let mut f = File::create(&tmp_path)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }

    std::fs::rename(&tmp_path, &final_path)?;
    debug!("atomic_write: {} ({} bytes)", final_path.display(), bytes.len());

    // Best-effort: fsync the containing directory so the rename survives a
    // crash. Not all platforms support opening a directory for this; a
    // failure here doesn't undo the rename that already succeeded.
    if let Err(e) = File::open(dir).and_then(|d| d.sync_all()) {
        warn!("atomic_write: directory fsync failed for {}: {e}", dir.display());
    }

    Ok(())
}

/// Writes `contents` to `dir/name` without the tmp/rename dance — used for
/// the spec's best-effort human-readable mirrors.
pub fn best_effort_write(dir: &Path, name: &str, contents: &str) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    std::fs::write(dir.join(name), contents)
}
