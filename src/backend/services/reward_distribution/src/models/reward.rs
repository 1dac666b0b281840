use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AccountName;
use crate::utils::errors::{DistributionError, Result};

// Constants for payout calculation
pub const DEFAULT_PAYOUT_PRECISION: u32 = 3;
pub const DEFAULT_MEMO_PREFIX: &str = "Delegation tip";

/// Payouts at or below this amount are reported but never sent (0.010).
pub fn default_min_dispatch_amount() -> Decimal {
    Decimal::new(10, 3)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardEvent {
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// Lookback period `[start, end]`, both bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl RewardWindow {
    /// Fails when the start would fall before the earliest date chrono can represent.
    pub fn ending_at(end: DateTime<Utc>, days: u32) -> Result<Self> {
        let start = end
            .checked_sub_signed(Duration::days(i64::from(days)))
            .ok_or_else(|| {
                DistributionError::InvalidConfiguration(format!(
                    "a {}-day window ending {} starts before the earliest representable date",
                    days, end
                ))
            })?;
        Ok(Self { start, end })
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }

    /// `start - end` rendered the way transfer memos quote the period.
    pub fn label(&self) -> String {
        const FORMAT: &str = "%Y-%m-%d %H:%M:%S";
        format!("{} - {}", self.start.format(FORMAT), self.end.format(FORMAT))
    }
}

/// Sum of reward amounts over a window, in the ledger's native unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RewardPool(Decimal);

impl RewardPool {
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_zero()
    }

    /// `None` when the sum no longer fits in a `Decimal`.
    pub fn checked_add(self, amount: Decimal) -> Option<RewardPool> {
        self.0.checked_add(amount).map(RewardPool)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutRecord {
    pub delegator: AccountName,
    pub amount: Decimal,
}

/// Rounded payouts ordered by weighted delegation, largest first.
///
/// `pool_value` is the converted pool the payouts were apportioned from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutPlan {
    pub payouts: Vec<PayoutRecord>,
    pub total_payout: Decimal,
    pub pool_value: Decimal,
}

impl PayoutPlan {
    /// Records worth sending; the rest stay in the audit listing only.
    pub fn dispatchable(&self, min_amount: Decimal) -> impl Iterator<Item = &PayoutRecord> {
        self.payouts.iter().filter(move |p| p.amount > min_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_spans_requested_days() {
        let end = Utc.with_ymd_and_hms(2019, 3, 31, 0, 0, 0).unwrap();
        let window = RewardWindow::ending_at(end, 7).unwrap();

        assert_eq!(window.start, Utc.with_ymd_and_hms(2019, 3, 24, 0, 0, 0).unwrap());
        assert_eq!(window.label(), "2019-03-24 00:00:00 - 2019-03-31 00:00:00");
    }

    #[test]
    fn test_window_before_earliest_date_is_rejected() {
        let end = Utc.with_ymd_and_hms(2019, 3, 31, 0, 0, 0).unwrap();
        assert!(matches!(
            RewardWindow::ending_at(end, 100_000_000),
            Err(DistributionError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_pool_addition_stops_at_overflow() {
        let pool = RewardPool::new(Decimal::MAX);
        assert_eq!(pool.checked_add(Decimal::ZERO), Some(pool));
        assert_eq!(pool.checked_add(Decimal::ONE), None);
    }
}
