pub mod conversion;
pub mod distribution_calculator;
pub mod ledger_builder;
pub mod payout_service;
pub mod reward_aggregator;
