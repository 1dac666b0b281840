use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reward_distribution::{
    repositories::file::{
        FixedBalance, InstructionFileDispatcher, JsonFileDelegationFeed, JsonFileRewardFeed,
    },
    repositories::traits::PayoutDispatcher,
    AccountName, DelegatorReturnService, DispatchReport, DistributionConfig, DistributionError,
    PayoutRun,
};
use rust_decimal::Decimal;
use std::{path::PathBuf, sync::Arc};
use thiserror::Error;

use crate::{
    config::Config,
    types::{PoolConversion, RunArgs},
};

/// Error type for delegator commands
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Distribution(#[from] DistributionError),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Missing {0}: pass it as a flag or set it in {1}")]
    Missing(&'static str, String),
}

/// Commands for delegator payouts
pub struct DelegatorCommands;

impl DelegatorCommands {
    /// Compute the payout plan and print the audit listing
    pub async fn plan(args: &RunArgs, config: &Config, now: DateTime<Utc>) -> Result<PayoutRun, Error> {
        let service = Self::service(args, config, Arc::new(PlanOnly))?;
        let run = service.plan(now).await?;
        print_run(&run, config.min_dispatch_amount);
        Ok(run)
    }

    /// Compute the payout plan and write transfer instructions for it
    pub async fn pay(
        args: &RunArgs,
        config: &Config,
        now: DateTime<Utc>,
    ) -> Result<(PayoutRun, DispatchReport), Error> {
        let output = match &args.output {
            Some(path) => path.clone(),
            None => default_output(config, now)?,
        };
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let dispatcher = Arc::new(InstructionFileDispatcher::new(&output));
        let service = Self::service(args, config, dispatcher)?;
        let (run, report) = service.run(now, false).await?;
        print_run(&run, config.min_dispatch_amount);

        let report = report.unwrap_or_default();
        println!(
            "Wrote {} transfers totalling {} to {} ({} below minimum skipped)",
            report.dispatched.len(),
            report.total_dispatched,
            output.display(),
            report.skipped
        );
        Ok((run, report))
    }

    /// Print the effective configuration
    pub fn show_config(config: &Config) -> Result<(), Error> {
        println!("# {}", Config::path().display());
        print!("{}", config.to_toml()?);
        Ok(())
    }

    fn service(
        args: &RunArgs,
        config: &Config,
        dispatcher: Arc<dyn PayoutDispatcher>,
    ) -> Result<DelegatorReturnService<PoolConversion>, Error> {
        let mut distribution = DistributionConfig::new(
            args.tracked_account.as_str(),
            args.paying_account.as_str(),
            args.return_fraction,
            args.window_days,
        );
        distribution.payout_precision = config.payout_precision;
        distribution.min_dispatch_amount = config.min_dispatch_amount;
        distribution.memo_prefix = config.memo_prefix.clone();

        let service = DelegatorReturnService::new(
            distribution,
            Arc::new(JsonFileDelegationFeed::new(&args.delegations)),
            Arc::new(JsonFileRewardFeed::new(&args.rewards)),
            Arc::new(FixedBalance(args.balance)),
            dispatcher,
            args.conversion,
        )?;
        Ok(service)
    }
}

/// Dispatcher for `plan`, which must never send anything.
struct PlanOnly;

#[async_trait]
impl PayoutDispatcher for PlanOnly {
    async fn transfer(
        &self,
        _from: &AccountName,
        to: &AccountName,
        _amount: Decimal,
        _memo: &str,
    ) -> anyhow::Result<()> {
        anyhow::bail!("refusing transfer to {} while planning", to)
    }
}

fn default_output(config: &Config, now: DateTime<Utc>) -> Result<PathBuf, Error> {
    let dir = config
        .output_dir
        .clone()
        .ok_or_else(|| Error::Missing("--out", Config::path().display().to_string()))?;
    Ok(dir.join(format!("transfers-{}.jsonl", now.format("%Y%m%dT%H%M%S"))))
}

fn print_run(run: &PayoutRun, min_dispatch_amount: Decimal) {
    println!("Reward window: {}", run.window.label());
    println!(
        "Total curation rewards: {} (native), {} (payout unit)",
        run.pool.amount(),
        run.plan.pool_value
    );
    println!("List of delegators");
    for payout in &run.plan.payouts {
        let marker = if payout.amount > min_dispatch_amount { "" } else { "  (below minimum, not sent)" };
        println!("  ** {} will get {}{}", payout.delegator, payout.amount, marker);
    }
    println!(
        "  --> Redistributed rewards: {} of {} available",
        run.plan.total_payout, run.available_balance
    );
}
