//! Flaky-safety retry policy with exponential backoff
//!
//! Re-runs an action while its failure keeps matching the retryable kind:
//! - Max attempts: 5 by default
//! - Total wait: bounded by `max_total_wait_time`
//! - Strategy: binary exponential with optional jitter
//! - On exhaustion the last failure is returned unchanged

use crate::interactor::Interactor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Default maximum number of attempts (first run included)
pub const MAX_ATTEMPTS: u32 = 5;

/// Default base delay for exponential backoff
pub const BASE_DELAY_MS: u64 = 100;

/// Default maximum delay cap
pub const MAX_DELAY_MS: u64 = 1600;

/// Backoff parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum attempts, first run included
    pub max_attempts: u32,

    /// Base delay in milliseconds
    pub base_delay_ms: u64,

    /// Maximum delay cap in milliseconds
    pub max_delay_ms: u64,

    /// Enable ±25% jitter
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            base_delay_ms: BASE_DELAY_MS,
            max_delay_ms: MAX_DELAY_MS,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Create policy with custom attempts and base delay
    pub fn with_config(max_attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            max_attempts,
            base_delay_ms,
            ..Self::default()
        }
    }

    /// Disable jitter
    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// Delay before retry number `retry` (1-based)
    pub fn calculate_delay(&self, retry: u32) -> Duration {
        let exponential_delay = self
            .base_delay_ms
            .saturating_mul(2u64.saturating_pow(retry));
        let delay_ms = exponential_delay.min(self.max_delay_ms);

        let final_delay = if self.jitter {
            let jitter = (delay_ms / 4) as f64;
            let random_jitter = (rand::random::<f64>() * 2.0 - 1.0) * jitter;
            ((delay_ms as f64) + random_jitter).max(0.0) as u64
        } else {
            delay_ms
        };

        Duration::from_millis(final_delay)
    }

    /// Worst-case total sleep, including the jitter margin when enabled
    pub fn max_total_wait_time(&self) -> Duration {
        let total_ms = (1..self.max_attempts)
            .map(|retry| {
                let delay_ms = self
                    .base_delay_ms
                    .saturating_mul(2u64.saturating_pow(retry))
                    .min(self.max_delay_ms);
                if self.jitter {
                    delay_ms.saturating_add(delay_ms / 4)
                } else {
                    delay_ms
                }
            })
            .fold(0u64, u64::saturating_add);

        Duration::from_millis(total_ms)
    }
}

/// Retries an action while `is_retryable` accepts its failure
#[derive(Clone)]
pub struct RetryInteractor<P> {
    policy: RetryPolicy,
    is_retryable: P,
}

impl<P> RetryInteractor<P> {
    /// Create retry interactor
    pub fn new(policy: RetryPolicy, is_retryable: P) -> Self {
        Self {
            policy,
            is_retryable,
        }
    }

    /// Get policy
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

impl<P> fmt::Debug for RetryInteractor<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryInteractor")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<C, E, P> Interactor<C, E> for RetryInteractor<P>
where
    C: ?Sized,
    E: fmt::Debug,
    P: Fn(&E) -> bool,
{
    fn interact<R, F>(&self, _context: &C, mut action: F) -> Result<R, E>
    where
        F: FnMut() -> Result<R, E>,
    {
        let mut attempt = 0;

        loop {
            match action() {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if !(self.is_retryable)(&e) {
                        return Err(e);
                    }

                    attempt += 1;

                    if attempt >= self.policy.max_attempts {
                        debug!(attempts = attempt, error = ?e, "retry budget exhausted");
                        return Err(e);
                    }

                    let delay = self.policy.calculate_delay(attempt);
                    debug!(attempt, delay_ms = delay.as_millis() as u64, error = ?e, "retrying flaky action");
                    std::thread::sleep(delay);
                }
            }
        }
    }
}
