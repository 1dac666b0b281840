use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::models::AccountName;
use crate::repositories::traits::BalanceOracle;

/// Balance reported by the operator at the start of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBalance(pub Decimal);

#[async_trait]
impl BalanceOracle for FixedBalance {
    async fn available_balance(&self, _account: &AccountName) -> Result<Decimal> {
        Ok(self.0)
    }
}
