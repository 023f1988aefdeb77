//! Retry loop: drive attempts until success, exhaustion, or a fatal failure.

use std::future::Future;
use tracing::{debug, warn};

use super::attempt::{run_attempt, Attempt, Outcome};
use super::error::TransportError;
use super::policy::RetryPolicy;

/// Runs `call` until it succeeds, a failure classifies as non-retryable, or
/// `policy.max_attempts` attempts have been made, and returns the terminal
/// [`Outcome`]. Attempts run strictly one after another; between failed
/// attempts the loop sleeps for the policy's backoff delay.
///
/// `call` is invoked once per attempt and must produce a fresh future each
/// time. Cancelling the whole logical call is drop-based: this function
/// spawns nothing, so dropping its future aborts the in-flight attempt and
/// any pending backoff sleep with it.
pub async fn run_with_retry<T, F, Fut>(policy: &RetryPolicy, call: F) -> Outcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TransportError>>,
{
    let mut rng = fastrand::Rng::new();
    run_with_retry_rng(policy, &mut rng, call).await
}

/// Like [`run_with_retry`] with a caller-supplied jitter source, so tests
/// can seed the backoff schedule deterministically.
pub async fn run_with_retry_rng<T, F, Fut>(
    policy: &RetryPolicy,
    rng: &mut fastrand::Rng,
    mut call: F,
) -> Outcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TransportError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempts_made = 0u32;
    loop {
        let attempt = Attempt::begin(attempts_made + 1, policy);
        let outcome = run_attempt(&attempt, call()).await;
        attempts_made += 1;

        match &outcome {
            Outcome::Success(_) => {
                debug!(
                    attempt = attempt.number,
                    elapsed_ms = attempt.started_at.elapsed().as_millis() as u64,
                    "call succeeded"
                );
                return outcome;
            }
            Outcome::Failure(error) if error.retryable && attempts_made < max_attempts => {
                let delay = policy.delay_for(attempt.number, rng);
                debug!(
                    attempt = attempt.number,
                    category = ?error.category,
                    delay_ms = delay.as_millis() as u64,
                    "retryable failure, backing off"
                );
                tokio::time::sleep(delay).await;
            }
            Outcome::Failure(error) if error.retryable => {
                warn!(
                    attempts = attempts_made,
                    category = ?error.category,
                    "attempts exhausted, giving up"
                );
                return outcome;
            }
            Outcome::Failure(error) => {
                warn!(
                    attempt = attempt.number,
                    category = ?error.category,
                    "fatal failure, not retrying"
                );
                return outcome;
            }
        }
    }
}
