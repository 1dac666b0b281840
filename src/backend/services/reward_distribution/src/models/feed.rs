//! Ledger history records as exported by the node, before validation.
//!
//! Everything here is untrusted: a record only becomes a
//! [`DelegationEvent`] or [`RewardEvent`] after its amount and timestamp
//! parse. Records that fail are logged and dropped so that one corrupt
//! entry in years of history does not abort a run.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

use super::delegation::DelegationEvent;
use super::reward::RewardEvent;
use super::AccountName;

const LEDGER_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub const VESTS_SYMBOL: &str = "VESTS";
pub const VESTS_NAI: &str = "@@000000037";

#[derive(Debug, Error)]
pub enum MalformedEvent {
    #[error("invalid amount {value:?}: {reason}")]
    Amount { value: String, reason: String },

    #[error("negative amount {0}")]
    NegativeAmount(Decimal),

    #[error("amount {0} exceeds the 64-bit range of ledger assets")]
    OutOfRange(Decimal),

    #[error("expected {expected} asset, found {found:?}")]
    Asset { expected: &'static str, found: String },

    #[error("invalid timestamp {0:?}")]
    Timestamp(String),

    #[error("unrecognised record shape: {0}")]
    Shape(#[from] serde_json::Error),
}

/// Asset amount in either of the two encodings the ledger has used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAsset {
    /// `"1234.567890 VESTS"`
    Legacy(String),
    /// Integer amount scaled by `precision`, tagged with an asset id.
    Nai {
        amount: String,
        precision: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        nai: Option<String>,
    },
}

impl RawAsset {
    /// Parses a VESTS amount. Any other asset is malformed, as is an amount
    /// whose base units do not fit the ledger's signed 64-bit asset.
    pub fn parse_amount(&self) -> Result<Decimal, MalformedEvent> {
        let amount = match self {
            RawAsset::Legacy(text) => {
                let mut parts = text.split_whitespace();
                let value = parts.next().unwrap_or_default();
                if parts.next() != Some(VESTS_SYMBOL) || parts.next().is_some() {
                    return Err(MalformedEvent::Asset {
                        expected: VESTS_SYMBOL,
                        found: text.clone(),
                    });
                }
                Decimal::from_str(value).map_err(|e| MalformedEvent::Amount {
                    value: text.clone(),
                    reason: e.to_string(),
                })?
            }
            RawAsset::Nai { amount, precision, nai } => {
                if let Some(nai) = nai.as_deref().filter(|nai| *nai != VESTS_NAI) {
                    return Err(MalformedEvent::Asset {
                        expected: VESTS_NAI,
                        found: nai.to_string(),
                    });
                }
                let units = amount.trim().parse::<i128>().map_err(|e| MalformedEvent::Amount {
                    value: amount.clone(),
                    reason: e.to_string(),
                })?;
                Decimal::try_from_i128_with_scale(units, *precision).map_err(|e| {
                    MalformedEvent::Amount {
                        value: amount.clone(),
                        reason: e.to_string(),
                    }
                })?
            }
        };

        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MalformedEvent::NegativeAmount(amount));
        }
        if amount.mantissa() > i128::from(i64::MAX) {
            return Err(MalformedEvent::OutOfRange(amount));
        }
        Ok(amount)
    }
}

/// `delegate_vesting_shares` operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDelegationOp {
    pub delegator: String,
    pub delegatee: String,
    pub vesting_shares: RawAsset,
    pub timestamp: String,
}

/// `curation_reward` operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRewardOp {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curator: Option<String>,
    pub reward: RawAsset,
    pub timestamp: String,
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, MalformedEvent> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, LEDGER_TIMESTAMP_FORMAT) {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| MalformedEvent::Timestamp(value.to_string()))
}

impl TryFrom<RawDelegationOp> for DelegationEvent {
    type Error = MalformedEvent;

    fn try_from(op: RawDelegationOp) -> Result<Self, Self::Error> {
        Ok(DelegationEvent {
            amount: op.vesting_shares.parse_amount()?,
            timestamp: parse_timestamp(&op.timestamp)?,
            delegator: AccountName::from(op.delegator),
            delegatee: AccountName::from(op.delegatee),
        })
    }
}

impl TryFrom<RawRewardOp> for RewardEvent {
    type Error = MalformedEvent;

    fn try_from(op: RawRewardOp) -> Result<Self, Self::Error> {
        Ok(RewardEvent {
            amount: op.reward.parse_amount()?,
            timestamp: parse_timestamp(&op.timestamp)?,
        })
    }
}

/// Lazily validates records, dropping the malformed ones with a warning.
///
/// Feed order is preserved, so the result can be folded directly.
pub fn parse_events<I, E>(records: I) -> impl Iterator<Item = E>
where
    I: IntoIterator,
    E: TryFrom<I::Item, Error = MalformedEvent>,
{
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match E::try_from(record) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!(index, error = %e, "Rejecting malformed feed record");
                None
            }
        })
}

/// Decodes loosely-typed JSON records one by one, dropping those whose
/// shape does not match `T`.
pub fn decode_records<T: DeserializeOwned>(values: Vec<serde_json::Value>) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            match serde_json::from_value::<T>(value).map_err(MalformedEvent::from) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(index, error = %e, "Rejecting malformed feed record");
                    None
                }
            }
        })
        .collect()
}
