use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::validate_window_days;
use crate::models::delegation::{DelegationEvent, DelegationLedger, SECONDS_PER_DAY};
use crate::models::AccountName;
use crate::utils::errors::Result;

/// Fraction of the window that has elapsed since `timestamp`, capped at 1.
///
/// Events stamped after `now` have not started earning and weigh 0.
pub fn time_weight(timestamp: DateTime<Utc>, now: DateTime<Utc>, window_days: u32) -> Decimal {
    let window_ms = i64::from(window_days) * SECONDS_PER_DAY * 1_000;
    let elapsed_ms = (now - timestamp).num_milliseconds().max(0);

    if window_ms == 0 || elapsed_ms >= window_ms {
        return Decimal::ONE;
    }
    Decimal::from(elapsed_ms) / Decimal::from(window_ms)
}

impl DelegationLedger {
    /// Applies one delegation change and returns the resulting ledger.
    ///
    /// Withdrawals drop the delegator outright. A lower amount replaces the
    /// weighted amount unweighted; a higher one only time-weights the
    /// increment. An equal amount changes nothing.
    pub fn apply(mut self, event: &DelegationEvent, now: DateTime<Utc>, window_days: u32) -> Self {
        if event.is_withdrawal() {
            if self.entries.remove(&event.delegator).is_some() {
                debug!(delegator = %event.delegator, "Delegation withdrawn");
            }
            return self;
        }

        let weight = time_weight(event.timestamp, now, window_days);

        match self.entries.get_mut(&event.delegator) {
            None => {
                self.insert(event.delegator.clone(), event.amount * weight);
            }
            Some(entry) if event.amount < entry.weighted_amount => {
                // TODO: decreases are credited at full weight while increases are
                // time-weighted; confirm this asymmetry with the payout operators.
                entry.weighted_amount = event.amount;
            }
            Some(entry) if event.amount > entry.weighted_amount => {
                entry.weighted_amount += (event.amount - entry.weighted_amount) * weight;
            }
            Some(_) => {}
        }
        self
    }
}

/// Folds a chronological delegation history into the ledger as of `now`.
///
/// Events addressed to anyone other than `tracked` are ignored. The fold is
/// strictly left to right, so the input may be a lazy stream.
pub fn build_ledger<I>(
    events: I,
    tracked: &AccountName,
    now: DateTime<Utc>,
    window_days: u32,
) -> Result<DelegationLedger>
where
    I: IntoIterator<Item = DelegationEvent>,
{
    validate_window_days(window_days)?;

    let ledger = events
        .into_iter()
        .filter(|event| {
            let relevant = event.delegatee == *tracked;
            if !relevant {
                debug!(
                    delegator = %event.delegator,
                    delegatee = %event.delegatee,
                    "Ignoring delegation to another account"
                );
            }
            relevant
        })
        .fold(DelegationLedger::default(), |ledger, event| {
            ledger.apply(&event, now, window_days)
        });

    debug!(delegators = ledger.len(), "Built delegation ledger");
    Ok(ledger)
}
