//! Single attempt execution under a hard deadline.

use std::future::Future;
use tokio::time::{timeout_at, Instant};

use super::classify;
use super::error::{ClassifiedError, TransportError};
use super::policy::RetryPolicy;

/// One execution of the transport call within a retry sequence. Created per
/// loop iteration and discarded once the iteration resolves.
#[derive(Debug, Clone, Copy)]
pub struct Attempt {
    /// 1-based attempt number.
    pub number: u32,
    pub started_at: Instant,
    pub deadline: Instant,
}

impl Attempt {
    /// Starts the clock for attempt `number`; the deadline is derived from
    /// the policy's per-attempt timeout, independently for every attempt.
    pub fn begin(number: u32, policy: &RetryPolicy) -> Self {
        let started_at = Instant::now();
        Self {
            number,
            started_at,
            deadline: started_at + policy.per_attempt_timeout,
        }
    }
}

/// Terminal result of an attempt, and of the whole logical call.
#[derive(Debug)]
pub enum Outcome<T> {
    Success(T),
    Failure(ClassifiedError),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// True when the failure was classified retryable (i.e. the call ended
    /// by exhausting attempts rather than hitting a fatal failure).
    pub fn is_retryable_failure(&self) -> bool {
        matches!(self, Outcome::Failure(e) if e.retryable)
    }

    pub fn into_result(self) -> Result<T, ClassifiedError> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(error) => Err(error),
        }
    }
}

/// Runs one transport attempt under the attempt's deadline.
///
/// A call still pending at the deadline is dropped, which cancels it, and
/// the attempt resolves as a timeout regardless of what the transport would
/// have reported later. Any transport failure is classified here; the
/// caller never sees a raw `TransportError`.
pub async fn run_attempt<T, Fut>(attempt: &Attempt, call: Fut) -> Outcome<T>
where
    Fut: Future<Output = Result<T, TransportError>>,
{
    match timeout_at(attempt.deadline, call).await {
        Ok(Ok(value)) => Outcome::Success(value),
        Ok(Err(error)) => Outcome::Failure(classify::classify(error)),
        Err(_elapsed) => Outcome::Failure(classify::classify(TransportError::DeadlineElapsed)),
    }
}
