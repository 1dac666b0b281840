//! Time-weighted delegation ledger and proportional payout calculator.
//!
//! Delegation history is folded into a weighted ledger, curation rewards are
//! summed over the same lookback window, and a fraction of that pool is split
//! across delegators in proportion to their weight, subject to the payer's
//! balance.

pub mod config;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;

pub use config::DistributionConfig;
pub use models::delegation::{DelegationEvent, DelegationLedger, DelegatorRecord};
pub use models::reward::{PayoutPlan, PayoutRecord, RewardEvent, RewardPool, RewardWindow};
pub use models::AccountName;
pub use services::conversion::{UnitConverter, VestingRate};
pub use services::distribution_calculator::distribute;
pub use services::ledger_builder::{build_ledger, time_weight};
pub use services::payout_service::{DelegatorReturnService, DispatchReport, PayoutRun};
pub use services::reward_aggregator::aggregate_rewards;
pub use utils::errors::{DistributionError, Result};
