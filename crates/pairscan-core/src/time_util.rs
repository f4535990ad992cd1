//! High-precision time utilities, ported from `k4_core::time_util`.
//!
//! Uses `clock_gettime(CLOCK_REALTIME)` on Linux for low-overhead
//! microsecond timestamps; falls back to `SystemTime` elsewhere.

use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(target_os = "linux")]
#[inline]
fn clock_realtime() -> (u64, u64) {
    let mut ts = libc::timespec { tv_sec: 0, tv_nsec: 0 };
    // SAFETY: CLOCK_REALTIME is always a valid clock id; failure leaves ts
    // zeroed (epoch), a safe fallback.
    unsafe {
        libc::clock_gettime(libc::CLOCK_REALTIME, &mut ts);
    }
    (ts.tv_sec as u64, ts.tv_nsec as u64)
}

#[cfg(not(target_os = "linux"))]
#[inline]
fn clock_realtime() -> (u64, u64) {
    let d = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    (d.as_secs(), d.subsec_nanos() as u64)
}

/// Current time as microseconds since Unix epoch.
#[inline]
pub fn now_us() -> u64 {
    let (sec, nsec) = clock_realtime();
    sec * 1_000_000 + nsec / 1_000
}

/// Current time as milliseconds since Unix epoch.
#[inline]
pub fn now_ms() -> u64 {
    let (sec, nsec) = clock_realtime();
    sec * 1_000 + nsec / 1_000_000
}

/// Current time as seconds since Unix epoch (used for the `config_version`
/// wall-clock fallback, spec.md §4.6).
#[inline]
pub fn now_secs() -> u64 {
    let (sec, _) = clock_realtime();
    sec
}

/// Current UTC time as an ISO-8601 string (`metadata.json`'s `timestamp`).
pub fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
