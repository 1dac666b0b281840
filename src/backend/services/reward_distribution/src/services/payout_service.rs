use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::DistributionConfig;
use crate::models::delegation::DelegationEvent;
use crate::models::feed::parse_events;
use crate::models::reward::{PayoutPlan, PayoutRecord, RewardEvent, RewardPool, RewardWindow};
use crate::repositories::traits::{BalanceOracle, DelegationFeed, PayoutDispatcher, RewardFeed};
use crate::services::conversion::UnitConverter;
use crate::services::distribution_calculator::distribute;
use crate::services::ledger_builder::build_ledger;
use crate::services::reward_aggregator::aggregate_rewards;
use crate::utils::errors::{DistributionError, Result};

/// Everything computed for one run, before any transfer is made.
#[derive(Debug, Clone, Serialize)]
pub struct PayoutRun {
    pub window: RewardWindow,
    pub pool: RewardPool,
    pub available_balance: Decimal,
    pub plan: PayoutPlan,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DispatchReport {
    pub dispatched: Vec<PayoutRecord>,
    pub skipped: usize,
    pub total_dispatched: Decimal,
}

/// Returns a share of an account's curation rewards to its delegators.
pub struct DelegatorReturnService<C> {
    config: DistributionConfig,
    delegations: Arc<dyn DelegationFeed>,
    rewards: Arc<dyn RewardFeed>,
    balance: Arc<dyn BalanceOracle>,
    dispatcher: Arc<dyn PayoutDispatcher>,
    converter: C,
}

impl<C> DelegatorReturnService<C>
where
    C: UnitConverter + Send + Sync,
{
    /// Validates `config` up front; nothing is fetched until [`Self::plan`].
    pub fn new(
        config: DistributionConfig,
        delegations: Arc<dyn DelegationFeed>,
        rewards: Arc<dyn RewardFeed>,
        balance: Arc<dyn BalanceOracle>,
        dispatcher: Arc<dyn PayoutDispatcher>,
        converter: C,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            delegations,
            rewards,
            balance,
            dispatcher,
            converter,
        })
    }

    pub fn config(&self) -> &DistributionConfig {
        &self.config
    }

    pub async fn plan(&self, now: DateTime<Utc>) -> Result<PayoutRun> {
        let account = &self.config.tracked_account;
        let window = RewardWindow::ending_at(now, self.config.window_days)?;
        info!(%account, window = %window.label(), "Planning delegator payouts");

        let (delegation_ops, reward_ops) = tokio::try_join!(
            self.delegations.delegation_history(account),
            self.rewards.curation_rewards(account, &window),
        )?;

        let ledger = build_ledger(
            parse_events::<_, DelegationEvent>(delegation_ops),
            account,
            now,
            self.config.window_days,
        )?;
        let pool = aggregate_rewards(parse_events::<_, RewardEvent>(reward_ops), &window);
        if pool.is_empty() {
            warn!(%account, "No curation rewards in window, nothing to distribute");
        }

        let available_balance = self
            .balance
            .available_balance(&self.config.paying_account)
            .await?;
        debug!(payer = %self.config.paying_account, balance = %available_balance, "Read payer balance");

        let plan = distribute(
            &ledger,
            pool,
            self.config.return_fraction,
            &self.converter,
            available_balance,
            self.config.payout_precision,
        )?;

        Ok(PayoutRun {
            window,
            pool,
            available_balance,
            plan,
        })
    }

    /// Sends every payout above the dispatch minimum, in plan order.
    pub async fn execute(&self, run: &PayoutRun) -> Result<DispatchReport> {
        let payer = &self.config.paying_account;
        let memo = format!("{} ({})", self.config.memo_prefix, run.window.label());
        let mut report = DispatchReport::default();

        for payout in run.plan.dispatchable(self.config.min_dispatch_amount) {
            self.dispatcher
                .transfer(payer, &payout.delegator, payout.amount, &memo)
                .await
                .map_err(|source| DistributionError::Dispatch {
                    delegator: payout.delegator.clone(),
                    dispatched: report.dispatched.len(),
                    source,
                })?;
            info!(delegator = %payout.delegator, amount = %payout.amount, "Dispatched payout");
            report.total_dispatched += payout.amount;
            report.dispatched.push(payout.clone());
        }
        report.skipped = run.plan.payouts.len() - report.dispatched.len();

        info!(
            dispatched = report.dispatched.len(),
            skipped = report.skipped,
            total = %report.total_dispatched,
            "Dispatch complete"
        );
        Ok(report)
    }

    pub async fn run(
        &self,
        now: DateTime<Utc>,
        dry_run: bool,
    ) -> Result<(PayoutRun, Option<DispatchReport>)> {
        let run = self.plan(now).await?;
        if dry_run {
            return Ok((run, None));
        }
        let report = self.execute(&run).await?;
        Ok((run, Some(report)))
    }
}
