use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::reward::{default_min_dispatch_amount, DEFAULT_MEMO_PREFIX, DEFAULT_PAYOUT_PRECISION};
use crate::models::AccountName;
use crate::utils::errors::{DistributionError, Result};

/// Parameters of one delegator-return run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionConfig {
    /// Account whose incoming delegations and curation rewards are tracked.
    pub tracked_account: AccountName,
    /// Account the payouts are sent from.
    pub paying_account: AccountName,
    /// Share of the reward pool returned to delegators, strictly inside (0, 1).
    pub return_fraction: Decimal,
    /// Length of the lookback window in days.
    pub window_days: u32,
    #[serde(default = "default_precision")]
    pub payout_precision: u32,
    #[serde(default = "default_min_dispatch_amount")]
    pub min_dispatch_amount: Decimal,
    #[serde(default = "default_memo_prefix")]
    pub memo_prefix: String,
}

fn default_precision() -> u32 {
    DEFAULT_PAYOUT_PRECISION
}

fn default_memo_prefix() -> String {
    DEFAULT_MEMO_PREFIX.to_string()
}

impl DistributionConfig {
    pub fn new(
        tracked_account: impl Into<AccountName>,
        paying_account: impl Into<AccountName>,
        return_fraction: Decimal,
        window_days: u32,
    ) -> Self {
        Self {
            tracked_account: tracked_account.into(),
            paying_account: paying_account.into(),
            return_fraction,
            window_days,
            payout_precision: DEFAULT_PAYOUT_PRECISION,
            min_dispatch_amount: default_min_dispatch_amount(),
            memo_prefix: default_memo_prefix(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.tracked_account.is_empty() {
            return Err(DistributionError::InvalidConfiguration(
                "tracked account must not be empty".to_string(),
            ));
        }
        if self.paying_account.is_empty() {
            return Err(DistributionError::InvalidConfiguration(
                "paying account must not be empty".to_string(),
            ));
        }
        validate_return_fraction(self.return_fraction)?;
        validate_window_days(self.window_days)?;
        if self.min_dispatch_amount.is_sign_negative() && !self.min_dispatch_amount.is_zero() {
            return Err(DistributionError::InvalidConfiguration(format!(
                "minimum dispatch amount {} is negative",
                self.min_dispatch_amount
            )));
        }
        Ok(())
    }
}

pub(crate) fn validate_return_fraction(fraction: Decimal) -> Result<()> {
    if fraction <= Decimal::ZERO || fraction >= Decimal::ONE {
        return Err(DistributionError::InvalidConfiguration(format!(
            "return fraction {} must lie strictly between 0 and 1",
            fraction
        )));
    }
    Ok(())
}

pub(crate) fn validate_window_days(days: u32) -> Result<()> {
    if days == 0 {
        return Err(DistributionError::InvalidConfiguration(
            "window must span at least one day".to_string(),
        ));
    }
    Ok(())
}
