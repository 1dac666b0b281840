use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::validate_return_fraction;
use crate::models::delegation::DelegationLedger;
use crate::models::reward::{PayoutPlan, PayoutRecord, RewardPool};
use crate::services::conversion::UnitConverter;
use crate::utils::errors::{DistributionError, Result};

/// Splits `return_fraction` of the converted pool across the ledger in
/// proportion to weighted delegation.
///
/// The pool is converted exactly once and the value used is kept on the
/// plan. Each payout is rounded to `precision` places (round half to even) and
/// the rounded total is checked against `available_balance`. Rounding drift
/// between the total and `return_fraction * pool value` is left as is. An
/// insolvent plan is rejected whole.
pub fn distribute<C>(
    ledger: &DelegationLedger,
    pool: RewardPool,
    return_fraction: Decimal,
    converter: &C,
    available_balance: Decimal,
    precision: u32,
) -> Result<PayoutPlan>
where
    C: UnitConverter + ?Sized,
{
    validate_return_fraction(return_fraction)?;

    let total_delegation = ledger.total()?;
    if total_delegation <= Decimal::ZERO {
        return Err(DistributionError::DegenerateLedger {
            total: total_delegation,
        });
    }

    let pool_value = converter.to_display(pool);
    if pool_value.is_sign_negative() && !pool_value.is_zero() {
        return Err(DistributionError::InvalidConfiguration(format!(
            "converted reward pool {} is negative",
            pool_value
        )));
    }

    let payouts: Vec<PayoutRecord> = ledger
        .records()
        .into_iter()
        .map(|record| {
            let raw_share =
                record.weighted_amount / total_delegation * return_fraction * pool_value;
            debug!(
                delegator = %record.delegator,
                weighted = %record.weighted_amount,
                share = %raw_share,
                "Computed delegator share"
            );
            PayoutRecord {
                delegator: record.delegator,
                amount: raw_share.round_dp(precision),
            }
        })
        .collect();

    let total_payout = payouts
        .iter()
        .try_fold(Decimal::ZERO, |total, p| total.checked_add(p.amount))
        .ok_or(DistributionError::Overflow("summing payouts"))?;

    if total_payout > available_balance {
        return Err(DistributionError::Solvency {
            required: total_payout,
            available: available_balance,
        });
    }

    info!(
        delegators = payouts.len(),
        pool_value = %pool_value,
        total_payout = %total_payout,
        "Computed payout plan"
    );

    Ok(PayoutPlan {
        payouts,
        total_payout,
        pool_value,
    })
}
