use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::AccountName;
use crate::utils::errors::{DistributionError, Result};

pub const SECONDS_PER_DAY: i64 = 86_400;

/// A single change of delegated stake, as recorded on the ledger.
///
/// `amount` is the new total delegated by `delegator` to `delegatee`, not a
/// delta. Zero means the delegation was withdrawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationEvent {
    pub delegator: AccountName,
    pub delegatee: AccountName,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl DelegationEvent {
    pub fn is_withdrawal(&self) -> bool {
        self.amount.is_zero()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatorRecord {
    pub delegator: AccountName,
    pub weighted_amount: Decimal,
}

/// Current time-weighted delegation per delegator.
///
/// Remembers the order in which delegators first appeared so that equal
/// weights always list the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelegationLedger {
    pub(crate) entries: HashMap<AccountName, LedgerEntry>,
    pub(crate) next_seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LedgerEntry {
    pub(crate) weighted_amount: Decimal,
    pub(crate) seq: u64,
}

impl DelegationLedger {
    pub fn get(&self, delegator: &AccountName) -> Option<Decimal> {
        self.entries.get(delegator).map(|entry| entry.weighted_amount)
    }

    pub fn contains(&self, delegator: &AccountName) -> bool {
        self.entries.contains_key(delegator)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> Result<Decimal> {
        self.entries
            .values()
            .try_fold(Decimal::ZERO, |total, entry| total.checked_add(entry.weighted_amount))
            .ok_or(DistributionError::Overflow("summing weighted delegation"))
    }

    /// Records sorted by weighted amount, largest first, ties in insertion order.
    pub fn records(&self) -> Vec<DelegatorRecord> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|(_, a), (_, b)| {
            b.weighted_amount
                .cmp(&a.weighted_amount)
                .then(a.seq.cmp(&b.seq))
        });
        entries
            .into_iter()
            .map(|(delegator, entry)| DelegatorRecord {
                delegator: delegator.clone(),
                weighted_amount: entry.weighted_amount,
            })
            .collect()
    }

    pub(crate) fn insert(&mut self, delegator: AccountName, weighted_amount: Decimal) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(delegator, LedgerEntry { weighted_amount, seq });
    }
}

impl FromIterator<(AccountName, Decimal)> for DelegationLedger {
    fn from_iter<I: IntoIterator<Item = (AccountName, Decimal)>>(iter: I) -> Self {
        let mut ledger = DelegationLedger::default();
        for (delegator, weighted_amount) in iter {
            ledger.insert(delegator, weighted_amount);
        }
        ledger
    }
}
