use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use reward_distribution::{
    build_ledger, AccountName, DelegationEvent, DelegationLedger, DistributionError,
};

const TRACKED: &str = "curator";

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2019, 3, 31, 12, 0, 0).unwrap()
}

fn delegation(delegator: &str, amount: &str, days_ago: i64) -> DelegationEvent {
    DelegationEvent {
        delegator: AccountName::new(delegator),
        delegatee: AccountName::new(TRACKED),
        amount: Decimal::from_str(amount).unwrap(),
        timestamp: now() - Duration::days(days_ago),
    }
}

fn build(events: Vec<DelegationEvent>, window_days: u32) -> DelegationLedger {
    build_ledger(events, &AccountName::new(TRACKED), now(), window_days).unwrap()
}

#[test]
fn test_old_delegation_counts_in_full() {
    let ledger = build(vec![delegation("alice", "1000", 30)], 7);
    assert_eq!(ledger.get(&AccountName::new("alice")), Some(Decimal::from(1000)));
}

#[test]
fn test_recent_delegation_is_time_weighted() {
    let ledger = build(vec![delegation("bob", "500", 2)], 7);
    let weighted = ledger.get(&AccountName::new("bob")).unwrap();
    assert_eq!(weighted.round_dp(2), Decimal::from_str("142.86").unwrap());
}

#[test]
fn test_withdrawal_removes_delegator_regardless_of_history() {
    let histories = vec![
        vec![delegation("alice", "1000", 30), delegation("alice", "0", 1)],
        vec![
            delegation("alice", "10", 20),
            delegation("alice", "5000", 3),
            delegation("alice", "0", 2),
        ],
        vec![delegation("alice", "0", 5)],
    ];

    for events in histories {
        let ledger = build(events, 7);
        assert!(!ledger.contains(&AccountName::new("alice")));
        assert!(ledger.is_empty());
    }
}

#[test]
fn test_redelegation_after_withdrawal_starts_fresh() {
    let ledger = build(
        vec![
            delegation("alice", "1000", 30),
            delegation("alice", "0", 10),
            delegation("alice", "700", 9),
        ],
        7,
    );
    assert_eq!(ledger.get(&AccountName::new("alice")), Some(Decimal::from(700)));
}

#[test]
fn test_decrease_replaces_with_raw_amount() {
    let ledger = build(
        vec![delegation("alice", "1000", 30), delegation("alice", "400", 1)],
        7,
    );
    assert_eq!(ledger.get(&AccountName::new("alice")), Some(Decimal::from(400)));
}

#[test]
fn test_increase_weights_only_the_increment() {
    // 1000 fully earned, then raised to 1700 halfway through an 8 day window.
    let ledger = build(
        vec![delegation("alice", "1000", 30), delegation("alice", "1700", 4)],
        8,
    );
    assert_eq!(ledger.get(&AccountName::new("alice")), Some(Decimal::from(1350)));
}

#[test]
fn test_other_delegatees_are_ignored() {
    let mut foreign = delegation("mallory", "1000000", 30);
    foreign.delegatee = AccountName::new("someone-else");

    let ledger = build(vec![foreign, delegation("alice", "10", 30)], 7);
    assert_eq!(ledger.len(), 1);
    assert!(!ledger.contains(&AccountName::new("mallory")));
}

#[test]
fn test_empty_history_yields_empty_ledger() {
    let ledger = build(Vec::new(), 7);
    assert!(ledger.is_empty());
    assert_eq!(ledger.total().unwrap(), Decimal::ZERO);
}

#[test]
fn test_replay_is_deterministic() {
    let events = vec![
        delegation("alice", "1000", 30),
        delegation("bob", "500", 2),
        delegation("carol", "250", 6),
        delegation("bob", "800", 1),
        delegation("carol", "0", 1),
        delegation("dave", "250", 3),
    ];

    let first = build(events.clone(), 7);
    for _ in 0..5 {
        let again = build(events.clone(), 7);
        assert_eq!(again, first);
        assert_eq!(again.records(), first.records());
    }
}

#[test]
fn test_order_matters() {
    let forward = build(
        vec![delegation("alice", "1000", 3), delegation("alice", "0", 2)],
        7,
    );
    let reversed = build(
        vec![delegation("alice", "0", 3), delegation("alice", "1000", 2)],
        7,
    );
    assert!(forward.is_empty());
    assert!(!reversed.is_empty());
}

#[test]
fn test_records_sorted_by_weight_then_insertion() {
    let ledger = build(
        vec![
            delegation("small", "10", 30),
            delegation("tie-first", "100", 30),
            delegation("big", "1000", 30),
            delegation("tie-second", "100", 30),
        ],
        7,
    );

    let order: Vec<String> = ledger
        .records()
        .into_iter()
        .map(|r| r.delegator.to_string())
        .collect();
    assert_eq!(order, vec!["big", "tie-first", "tie-second", "small"]);
}

#[test]
fn test_zero_day_window_is_rejected() {
    let result = build_ledger(
        vec![delegation("alice", "1000", 30)],
        &AccountName::new(TRACKED),
        now(),
        0,
    );
    assert!(matches!(result, Err(DistributionError::InvalidConfiguration(_))));
}
