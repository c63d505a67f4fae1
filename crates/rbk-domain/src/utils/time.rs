//! Canonical time utilities — strict, no fallbacks.
//!
//! All functions return `Result` instead of silently defaulting to 0.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Error;

/// Seconds in one day.
pub const SECS_PER_DAY: i64 = 86_400;

/// Returns the current Unix timestamp in seconds as `i64`.
///
/// # Errors
///
/// Returns an error if the system clock is before the Unix epoch (extremely rare,
/// but we refuse to silently return 0).
pub fn epoch_secs_i64() -> Result<i64, Error> {
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Error::internal(format!("system clock is before Unix epoch: {e}")))?;
    i64::try_from(duration.as_secs())
        .map_err(|e| Error::internal(format!("timestamp overflow for i64: {e}")))
}

/// Returns the current Unix timestamp in milliseconds as `u64`.
///
/// # Errors
///
/// Returns an error if the system clock is before the Unix epoch.
pub fn epoch_millis_u64() -> Result<u64, Error> {
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Error::internal(format!("system clock is before Unix epoch: {e}")))?;
    u64::try_from(duration.as_millis())
        .map_err(|e| Error::internal(format!("timestamp overflow for u64: {e}")))
}
