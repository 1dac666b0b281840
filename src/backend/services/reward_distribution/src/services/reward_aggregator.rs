use tracing::{debug, warn};

use crate::models::reward::{RewardEvent, RewardPool, RewardWindow};

/// Sums the rewards earned inside `window`.
///
/// The feed may already be bounded by the window, but timestamps are
/// re-checked here. An empty result is a valid zero pool. A reward that
/// would overflow the pool is dropped with a warning.
pub fn aggregate_rewards<I>(events: I, window: &RewardWindow) -> RewardPool
where
    I: IntoIterator<Item = RewardEvent>,
{
    let mut outside = 0usize;
    let mut rejected = 0usize;
    let pool = events
        .into_iter()
        .filter(|event| {
            let inside = window.contains(event.timestamp);
            if !inside {
                outside += 1;
            }
            inside
        })
        .fold(RewardPool::default(), |pool, event| {
            pool.checked_add(event.amount).unwrap_or_else(|| {
                warn!(
                    amount = %event.amount,
                    timestamp = %event.timestamp,
                    "Rejecting reward that overflows the pool"
                );
                rejected += 1;
                pool
            })
        });

    debug!(pool = %pool.amount(), outside, rejected, "Aggregated reward pool");
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rust_decimal::Decimal;

    fn window() -> RewardWindow {
        RewardWindow::ending_at(Utc.with_ymd_and_hms(2019, 3, 31, 0, 0, 0).unwrap(), 7).unwrap()
    }

    fn reward(amount: i64, timestamp: DateTime<Utc>) -> RewardEvent {
        reward_of(Decimal::from(amount), timestamp)
    }

    fn reward_of(amount: Decimal, timestamp: DateTime<Utc>) -> RewardEvent {
        RewardEvent { amount, timestamp }
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let w = window();
        let events = vec![
            reward(1, w.start),
            reward(2, w.end),
            reward(4, w.start - Duration::seconds(1)),
            reward(8, w.end + Duration::seconds(1)),
        ];

        assert_eq!(aggregate_rewards(events, &w).amount(), Decimal::from(3));
    }

    #[test]
    fn test_empty_stream_yields_zero_pool() {
        let pool = aggregate_rewards(Vec::new(), &window());
        assert!(pool.is_empty());
    }

    #[test]
    fn test_order_does_not_matter() {
        let w = window();
        let forward = vec![reward(5, w.start + Duration::days(1)), reward(7, w.end - Duration::days(1))];
        let mut backward = forward.clone();
        backward.reverse();

        assert_eq!(aggregate_rewards(forward, &w), aggregate_rewards(backward, &w));
    }

    #[test]
    fn test_overflowing_reward_is_dropped() {
        let w = window();
        let half = Decimal::MAX / Decimal::from(2) + Decimal::ONE;
        let events = vec![
            reward_of(half, w.end - Duration::days(2)),
            reward_of(half, w.end - Duration::days(1)),
            reward_of(Decimal::ONE, w.end),
        ];

        assert_eq!(aggregate_rewards(events, &w).amount(), half + Decimal::ONE);
    }
}
