use std::time::Duration;

/// The most write requests DynamoDB accepts in one batch.
pub const MAX_BATCH_SIZE: usize = 25;

/// Backoff applied while resubmitting unprocessed write requests.
///
/// The delay before resubmission `n` (0-based) is
/// `min(initial_delay * 2^n, max_delay)`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RetryConfig {
    /// Resubmissions allowed per batch before giving up.
    pub max_retries: usize,
    /// Delay before the first resubmission.
    pub initial_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 10,
            initial_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryConfig {
    /// No delay between resubmissions.
    pub fn immediate(max_retries: usize) -> Self {
        Self {
            max_retries,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    pub(crate) fn delay(&self, attempt: usize) -> Duration {
        let factor = 2u32.saturating_pow(attempt.min(31) as u32);
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// Arguments common to all write operations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WriteArgs {
    /// Log and print the requests instead of sending them.
    pub dry_run: bool,
    /// Backoff for unprocessed batch requests.
    pub retry: RetryConfig,
    /// The name of the table to write to.
    pub table_name: String,
}
