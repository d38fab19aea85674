//! Bounded exponential backoff for network operations

use std::time::Duration;

use backoff::backoff::Backoff;
use serde::Serialize;

/// How often and how patiently to retry a failing push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Delay before the second attempt; doubles after each retry
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Same attempt budget with no waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::ZERO,
        }
    }

    /// Delays between consecutive attempts: 2s, 4s, 8s for the default policy.
    pub fn delays(&self) -> Vec<Duration> {
        let mut backoff = self.backoff();
        std::iter::from_fn(|| backoff.next_backoff()).collect()
    }

    fn backoff(&self) -> BoundedBackoff {
        BoundedBackoff {
            policy: *self,
            next_delay: self.initial_delay,
            retries_left: self.max_attempts.saturating_sub(1),
        }
    }
}

/// Doubling delay that gives up after a fixed number of retries.
#[derive(Debug)]
struct BoundedBackoff {
    policy: RetryPolicy,
    next_delay: Duration,
    retries_left: u32,
}

impl Backoff for BoundedBackoff {
    fn reset(&mut self) {
        self.next_delay = self.policy.initial_delay;
        self.retries_left = self.policy.max_attempts.saturating_sub(1);
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        if self.retries_left == 0 {
            return None;
        }
        self.retries_left -= 1;
        let delay = self.next_delay;
        self.next_delay = delay.saturating_mul(2);
        Some(delay)
    }
}

/// Outcome of a retried operation: the value or last error, plus attempts made.
#[derive(Debug)]
pub struct Attempts<T, E> {
    pub result: Result<T, E>,
    pub attempts: u32,
}

/// Run `op` until it succeeds, returns a permanent error, or the policy is
/// exhausted. Errors for which `is_permanent` holds are not retried.
pub fn retry<T, E, F, P>(policy: &RetryPolicy, what: &str, mut op: F, is_permanent: P) -> Attempts<T, E>
where
    F: FnMut() -> Result<T, E>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let mut attempts = 0u32;

    let result = backoff::retry_notify(
        policy.backoff(),
        || {
            attempts += 1;
            op().map_err(|e| {
                if is_permanent(&e) {
                    backoff::Error::permanent(e)
                } else {
                    backoff::Error::transient(e)
                }
            })
        },
        |err: E, delay: Duration| {
            tracing::warn!(
                operation = what,
                error = %err,
                retry_in = ?delay,
                "Attempt failed, retrying"
            );
        },
    );

    let result = result.map_err(|e| match e {
        backoff::Error::Permanent(err) => err,
        backoff::Error::Transient { err, .. } => err,
    });

    Attempts { result, attempts }
}
