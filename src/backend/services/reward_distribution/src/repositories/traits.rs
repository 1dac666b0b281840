use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::models::feed::{RawDelegationOp, RawRewardOp};
use crate::models::reward::RewardWindow;
use crate::models::AccountName;

/// Chronological delegation history of an account.
///
/// The feed is not required to filter by delegatee.
#[async_trait]
pub trait DelegationFeed: Send + Sync {
    async fn delegation_history(&self, account: &AccountName) -> Result<Vec<RawDelegationOp>>;
}

/// Curation rewards of an account, possibly bounded by the window.
#[async_trait]
pub trait RewardFeed: Send + Sync {
    async fn curation_rewards(
        &self,
        account: &AccountName,
        window: &RewardWindow,
    ) -> Result<Vec<RawRewardOp>>;
}

#[async_trait]
pub trait BalanceOracle: Send + Sync {
    async fn available_balance(&self, account: &AccountName) -> Result<Decimal>;
}

#[async_trait]
pub trait PayoutDispatcher: Send + Sync {
    async fn transfer(
        &self,
        from: &AccountName,
        to: &AccountName,
        amount: Decimal,
        memo: &str,
    ) -> Result<()>;
}
