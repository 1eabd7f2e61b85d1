//! Waiting for a write to become visible to the next step.
//!
//! A settle is a fixed cooperative sleep followed, when polling is enabled,
//! by a bounded series of confirmation probes spaced with jittered
//! exponential backoff. Probes are reads; nothing here repeats a write.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::config::SettleConfig;
use crate::resilience::calculate_backoff;

/// How long and how persistently to wait between dependent steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlePolicy {
    /// Fixed wait before the first probe.
    pub delay: Duration,
    /// Probe a confirmation signal instead of trusting the fixed wait.
    pub poll: bool,
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

/// Last probe value and whether it satisfied the confirmation check.
#[derive(Debug, Clone, PartialEq)]
pub struct Settled<T> {
    pub value: T,
    pub attempts: u32,
    pub confirmed: bool,
}

impl SettlePolicy {
    /// Fixed wait only, no polling.
    pub fn fixed(delay: Duration) -> Self {
        Self {
            delay,
            poll: false,
            max_attempts: 1,
            base_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    /// No waiting at all.
    pub fn immediate() -> Self {
        Self::fixed(Duration::ZERO)
    }

    /// Sleep for the fixed settle delay.
    pub async fn wait(&self, stage: &'static str) {
        if self.delay.is_zero() {
            return;
        }
        tracing::info!(
            stage,
            delay_ms = self.delay.as_millis() as u64,
            "Waiting for previous step to settle"
        );
        sleep(self.delay).await;
    }

    /// Probe until `confirmed` holds or the attempt budget runs out.
    ///
    /// Without polling exactly one probe is made.
    pub async fn poll_until<T, F, Fut, C>(
        &self,
        stage: &'static str,
        mut probe: F,
        confirmed: C,
    ) -> Settled<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = T>,
        C: Fn(&T) -> bool,
    {
        let max_attempts = if self.poll { self.max_attempts.max(1) } else { 1 };
        let mut attempt = 1;

        loop {
            let value = probe().await;
            if confirmed(&value) {
                tracing::debug!(stage, attempt, "Settle confirmed");
                return Settled {
                    value,
                    attempts: attempt,
                    confirmed: true,
                };
            }
            if attempt >= max_attempts {
                return Settled {
                    value,
                    attempts: attempt,
                    confirmed: false,
                };
            }

            let backoff = calculate_backoff(attempt, self.base_delay_ms, self.max_delay_ms);
            tracing::info!(
                stage,
                attempt,
                max_attempts,
                backoff_ms = backoff.as_millis() as u64,
                "Not visible yet, retrying probe"
            );
            sleep(backoff).await;
            attempt += 1;
        }
    }
}

impl Default for SettlePolicy {
    fn default() -> Self {
        Self::from(&SettleConfig::default())
    }
}

impl From<&SettleConfig> for SettlePolicy {
    fn from(config: &SettleConfig) -> Self {
        Self {
            delay: Duration::from_millis(config.delay_ms),
            poll: config.poll,
            max_attempts: config.max_attempts,
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms,
        }
    }
}
