//! Timeout enforcement.
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - Every chain call has a deadline; settle waits are not deadlines

use std::future::Future;
use std::time::Duration;

use crate::attestation::types::{AttestationError, AttestationResult};

/// Run `fut` with a deadline, mapping expiry to [`AttestationError::Timeout`].
pub async fn with_timeout<T, F>(
    duration: Duration,
    operation: &'static str,
    fut: F,
) -> AttestationResult<T>
where
    F: Future<Output = AttestationResult<T>>,
{
    match tokio::time::timeout(duration, fut).await {
        Ok(result) => result,
        Err(_) => {
            let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
            tracing::warn!(operation, millis, "Operation timed out");
            Err(AttestationError::Timeout { operation, millis })
        }
    }
}
