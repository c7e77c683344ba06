/*!
 * Bounded retry around a single translation request.
 *
 * Each attempt reports an explicit outcome. The loop stops on the first
 * success, pauses a fixed delay after each failure, and gives up once the
 * attempt budget is spent, handing the last failure back to the caller.
 */

use log::{debug, warn};
use std::future::Future;
use std::time::Duration;

use crate::app_config::TranslationCommonConfig;
use crate::errors::TranslationError;

/// Result of one attempt
#[derive(Debug)]
pub enum AttemptOutcome {
    /// The service produced a usable translation
    Translated(String),
    /// The attempt failed and may be retried
    Failed(TranslationError),
}

/// Result of the whole retry sequence
#[derive(Debug)]
pub enum RetryResult {
    /// Succeeded on the given attempt (1-based)
    Translated { text: String, attempts: u32 },
    /// Every attempt failed; carries the last failure
    Exhausted { last_error: TranslationError, attempts: u32 },
}

/// Fixed-delay retry policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    /// Pause between a failed attempt and the next one
    pub delay: Duration,
}

impl RetryPolicy {
    /// Create a policy; at least one attempt is always made
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Policy described by the translation config
    pub fn from_config(common: &TranslationCommonConfig) -> Self {
        Self::new(common.retry_count, Duration::from_millis(common.retry_delay_ms))
    }

    /// Run `attempt` until it succeeds or the budget is spent
    pub async fn run<F, Fut>(&self, label: &str, mut attempt: F) -> RetryResult
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = AttemptOutcome>,
    {
        let mut attempt_number = 1;

        loop {
            match attempt(attempt_number).await {
                AttemptOutcome::Translated(text) => {
                    if attempt_number > 1 {
                        debug!("{}: succeeded on attempt {}/{}", label, attempt_number, self.max_attempts);
                    }
                    return RetryResult::Translated { text, attempts: attempt_number };
                }
                AttemptOutcome::Failed(error) => {
                    if attempt_number >= self.max_attempts {
                        warn!("{}: giving up after {} attempts ({})", label, attempt_number, error);
                        return RetryResult::Exhausted { last_error: error, attempts: attempt_number };
                    }

                    debug!(
                        "{}: attempt {}/{} failed ({}), retrying in {:?}",
                        label, attempt_number, self.max_attempts, error, self.delay
                    );
                    if !self.delay.is_zero() {
                        tokio::time::sleep(self.delay).await;
                    }
                    attempt_number += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(700))
    }
}
