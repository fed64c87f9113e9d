//! Pacing helpers for the dispatch loop.

use std::time::Duration;

/// Time left of a `budget_ms` slot after `elapsed`; zero once overrun.
///
/// An overrun is never carried into the next slot: late frames are not
/// compensated by shortening later ones.
#[inline]
pub fn remaining(budget_ms: u32, elapsed: Duration) -> Duration {
    Duration::from_millis(u64::from(budget_ms)).saturating_sub(elapsed)
}

/// Next sleep of a polled wait: one poll tick, or less if the wait ends sooner.
#[inline]
pub fn next_tick(poll: Duration, left: Duration) -> Duration {
    poll.max(Duration::from_millis(1)).min(left)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_never_goes_negative() {
        assert_eq!(
            remaining(50, Duration::from_millis(20)),
            Duration::from_millis(30)
        );
        assert_eq!(remaining(50, Duration::from_millis(80)), Duration::ZERO);
    }

    #[test]
    fn tick_is_bounded_by_poll_and_deadline() {
        let poll = Duration::from_millis(10);
        assert_eq!(next_tick(poll, Duration::from_millis(300)), poll);
        assert_eq!(
            next_tick(poll, Duration::from_millis(4)),
            Duration::from_millis(4)
        );
        assert_eq!(
            next_tick(Duration::ZERO, Duration::from_secs(1)),
            Duration::from_millis(1)
        );
    }
}
