use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::services::ServiceError;

/// Retry policy for calls to external services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first one. `0` is treated as `1`.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles for each one after.
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_ms: 500,
        }
    }
}

impl RetryPolicy {
    fn delay_before(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.backoff_ms.saturating_mul(factor))
    }

    /// Run `call` until it succeeds, fails with a non-retryable error, or
    /// the attempts are used up. The last error is returned.
    pub fn run<T>(
        &self,
        operation: &str,
        mut call: impl FnMut() -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match call() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < attempts => {
                    tracing::warn!(
                        operation,
                        attempt,
                        max_attempts = attempts,
                        error = %e,
                        "Service call failed, retrying"
                    );
                    std::thread::sleep(self.delay_before(attempt));
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
