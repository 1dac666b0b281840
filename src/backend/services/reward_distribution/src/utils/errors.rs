use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::AccountName;

#[derive(Error, Debug)]
pub enum DistributionError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Total weighted delegation is {total}, nothing to apportion against")]
    DegenerateLedger { total: Decimal },

    #[error("Payout total {required} exceeds available balance {available}")]
    Solvency { required: Decimal, available: Decimal },

    #[error("Arithmetic overflow while {0}")]
    Overflow(&'static str),

    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),

    #[error("Transfer to {delegator} failed after {dispatched} successful transfers: {source}")]
    Dispatch {
        delegator: AccountName,
        dispatched: usize,
        #[source]
        source: anyhow::Error,
    },
}

pub type Result<T> = std::result::Result<T, DistributionError>;
