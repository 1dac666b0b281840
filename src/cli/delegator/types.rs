use reward_distribution::{RewardPool, UnitConverter, VestingRate};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// How the reward pool is turned into the payout unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolConversion {
    /// Vesting shares to liquid tokens at the ledger's current rate
    Vesting(VestingRate),
    /// Pool is already expressed in the payout unit
    Native,
}

impl UnitConverter for PoolConversion {
    fn to_display(&self, pool: RewardPool) -> Decimal {
        match self {
            PoolConversion::Vesting(rate) => rate.to_display(pool),
            PoolConversion::Native => pool.amount(),
        }
    }
}

/// Fully resolved inputs of a `plan` or `pay` invocation
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub tracked_account: String,
    pub paying_account: String,
    pub return_fraction: Decimal,
    pub window_days: u32,
    pub delegations: PathBuf,
    pub rewards: PathBuf,
    pub balance: Decimal,
    pub conversion: PoolConversion,
    pub output: Option<PathBuf>,
}
