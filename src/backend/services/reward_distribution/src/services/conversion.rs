use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::reward::RewardPool;
use crate::utils::errors::{DistributionError, Result};

/// Converts a pool in the ledger's native unit into the unit payouts are made in.
pub trait UnitConverter {
    fn to_display(&self, pool: RewardPool) -> Decimal;
}

impl<F> UnitConverter for F
where
    F: Fn(RewardPool) -> Decimal,
{
    fn to_display(&self, pool: RewardPool) -> Decimal {
        self(pool)
    }
}

/// Vesting-share to liquid-token rate taken from the ledger's global properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingRate {
    total_vesting_fund: Decimal,
    total_vesting_shares: Decimal,
}

impl VestingRate {
    pub fn new(total_vesting_fund: Decimal, total_vesting_shares: Decimal) -> Result<Self> {
        if total_vesting_shares <= Decimal::ZERO {
            return Err(DistributionError::InvalidConfiguration(format!(
                "total vesting shares {} must be positive",
                total_vesting_shares
            )));
        }
        if total_vesting_fund.is_sign_negative() && !total_vesting_fund.is_zero() {
            return Err(DistributionError::InvalidConfiguration(format!(
                "total vesting fund {} is negative",
                total_vesting_fund
            )));
        }
        Ok(Self {
            total_vesting_fund,
            total_vesting_shares,
        })
    }
}

impl UnitConverter for VestingRate {
    fn to_display(&self, pool: RewardPool) -> Decimal {
        pool.amount() * self.total_vesting_fund / self.total_vesting_shares
    }
}
