//! Bounded retry with a fixed inter-attempt delay.

use std::time::Duration;

use crate::clock::Clock;
use crate::engine::EngineError;
use crate::status::StatusSink;

/// Retries a fallible engine call up to a fixed attempt count, waiting a
/// fixed delay between attempts. No exponential backoff, no jitter; the
/// delays are per-call-site constants.
///
/// Every non-final failed attempt is reported as a Warning event carrying the
/// attempt number and the bound. Failure on the final attempt propagates to
/// the caller instead, so a bound of B produces at most B-1 warnings.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub const fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    /// Invoke `op` until it succeeds or the attempt bound is exhausted.
    pub async fn run<T, K: Clock>(
        &self,
        clock: &K,
        events: &StatusSink,
        what: &str,
        mut op: impl FnMut() -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let mut attempt = 1u32;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt >= self.attempts {
                        return Err(err);
                    }
                    events.warning(format!(
                        "Retrying {what} (attempt {attempt}/{}): {err}",
                        self.attempts
                    ));
                    clock.sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
