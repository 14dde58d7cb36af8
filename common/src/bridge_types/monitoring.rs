//! Retry and polling drivers for SDK calls
//!
//! `retry_with_backoff` wraps a fallible async operation with the attempt
//! budget of its error class and exponential backoff between attempts.
//! `poll_for` waits a bounded number of checks for a resource to appear.

use std::future::Future;

use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use super::types::{PollConfig, RetryConfig};
use crate::error::BalanceError;

/// Run `attempt_fn` until it succeeds or its error exhausts the attempt budget
///
/// # Arguments
/// * `operation` - Name used in logs and timeout errors
/// * `config` - Retry policy
/// * `attempt_fn` - Called with the 1-based attempt number
///
/// # Returns
/// The first successful value, or the last error
pub async fn retry_with_backoff<T, F, Fut>(
    operation: &str,
    config: &RetryConfig,
    mut attempt_fn: F,
) -> Result<T, BalanceError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, BalanceError>>,
{
    let attempt_timeout = config.attempt_timeout();
    let mut attempt = 1;

    loop {
        let outcome = match timeout(attempt_timeout, attempt_fn(attempt)).await {
            Ok(result) => result,
            Err(_) => Err(BalanceError::Timeout(format!(
                "{} exceeded {:?}",
                operation, attempt_timeout
            ))),
        };

        match outcome {
            Ok(value) => {
                if attempt > 1 {
                    info!("{} succeeded on attempt {}", operation, attempt);
                }
                return Ok(value);
            }
            Err(err) => {
                let budget = err.attempt_budget(config.max_attempts);
                if attempt >= budget {
                    error!("{} failed after {} attempt(s): {}", operation, attempt, err);
                    return Err(err);
                }

                let delay = config.delay_for(attempt);
                warn!(
                    "{} failed: {}. Retrying ({}/{}) in {:?}",
                    operation, err, attempt, budget, delay
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Probe until a value shows up or the attempts run out
pub async fn poll_for<T, F, Fut>(what: &str, config: &PollConfig, mut check: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let attempts = config.max_attempts.max(1);

    for attempt in 1..=attempts {
        if let Some(value) = check().await {
            debug!("{} available after {} check(s)", what, attempt);
            return Some(value);
        }
        if attempt < attempts {
            sleep(config.interval()).await;
        }
    }

    warn!(
        "{} not available after {} check(s) over {:?}",
        what,
        attempts,
        config.budget()
    );
    None
}
