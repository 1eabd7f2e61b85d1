//! Exponential backoff with jitter.

use std::time::Duration;
use rand::Rng;

/// Delay before the next settle probe.
///
/// Used between schema visibility checks and index queries while waiting
/// for a write to propagate.
///
/// Attempt 0 waits nothing; attempt `n` waits `base * 2^(n-1)` capped at
/// `max_ms`, plus up to 10% jitter.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let capped_delay = base_ms.saturating_mul(exponential_base).min(max_ms);

    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}
