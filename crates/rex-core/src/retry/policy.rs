//! Retry policy: attempt ceiling, backoff schedule, per-attempt deadline.

use std::time::Duration;

/// Configuration for one logical call. Immutable for the call's lifetime;
/// the only artifact shared across attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first). Treated as 1 if 0.
    pub max_attempts: u32,
    /// Backoff delay after the first failed attempt.
    pub initial_delay: Duration,
    /// Upper bound on any backoff delay.
    pub max_delay: Duration,
    /// Randomize each delay uniformly in [0, computed delay] to keep
    /// concurrent callers from retrying in lockstep.
    pub jitter: bool,
    /// Hard deadline for a single attempt; an attempt still pending at the
    /// deadline is cancelled and counted as a timeout.
    pub per_attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
            jitter: true,
            per_attempt_timeout: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Backoff delay after attempt `attempt` (1-based), without jitter:
    /// `initial_delay * 2^(attempt-1)`, capped at `max_delay`.
    pub fn base_delay_for(&self, attempt: u32) -> Duration {
        let exp = 1u32 << attempt.saturating_sub(1).min(16);
        self.initial_delay.saturating_mul(exp).min(self.max_delay)
    }

    /// Backoff delay after attempt `attempt`, with jitter applied when the
    /// policy enables it. The RNG is injected so tests can seed it.
    pub fn delay_for(&self, attempt: u32, rng: &mut fastrand::Rng) -> Duration {
        let base = self.base_delay_for(attempt);
        if !self.jitter || base.is_zero() {
            return base;
        }
        Duration::from_nanos(rng.u64(0..=base.as_nanos() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(jitter: bool) -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
            jitter,
            per_attempt_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn doubles_per_attempt_until_capped() {
        let p = fixed(false);
        assert_eq!(p.base_delay_for(1), Duration::from_millis(100));
        assert_eq!(p.base_delay_for(2), Duration::from_millis(200));
        assert_eq!(p.base_delay_for(3), Duration::from_millis(400));
        assert_eq!(p.base_delay_for(4), Duration::from_millis(800));
        assert_eq!(p.base_delay_for(5), Duration::from_secs(1));
        assert_eq!(p.base_delay_for(30), Duration::from_secs(1));
    }

    #[test]
    fn base_delay_is_monotonic_and_bounded() {
        let p = fixed(false);
        let mut previous = Duration::ZERO;
        for attempt in 1..=64 {
            let d = p.base_delay_for(attempt);
            assert!(d >= previous, "delay shrank at attempt {attempt}");
            assert!(d <= p.max_delay);
            previous = d;
        }
    }

    #[test]
    fn jitter_disabled_returns_the_base_delay() {
        let p = fixed(false);
        let mut rng = fastrand::Rng::with_seed(7);
        assert_eq!(p.delay_for(2, &mut rng), p.base_delay_for(2));
    }

    #[test]
    fn jitter_stays_within_the_base_delay() {
        let p = fixed(true);
        let mut rng = fastrand::Rng::with_seed(42);
        for attempt in 1..=10 {
            let base = p.base_delay_for(attempt);
            for _ in 0..100 {
                let d = p.delay_for(attempt, &mut rng);
                assert!(d <= base, "jittered delay {d:?} above base {base:?}");
            }
        }
    }

    #[test]
    fn zero_initial_delay_never_panics() {
        let mut p = fixed(true);
        p.initial_delay = Duration::ZERO;
        p.max_delay = Duration::ZERO;
        let mut rng = fastrand::Rng::with_seed(1);
        assert_eq!(p.delay_for(1, &mut rng), Duration::ZERO);
    }
}
