use rust_decimal::Decimal;
use std::str::FromStr;

use reward_distribution::{
    distribute, AccountName, DelegationLedger, DistributionError, PayoutRecord, RewardPool,
};

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

fn ledger(entries: &[(&str, &str)]) -> DelegationLedger {
    entries
        .iter()
        .map(|(name, amount)| (AccountName::new(*name), dec(amount)))
        .collect()
}

fn identity(pool: RewardPool) -> Decimal {
    pool.amount()
}

#[test]
fn test_reference_scenario_payouts() {
    let ledger = ledger(&[("bob", "142.86"), ("alice", "1000")]);
    let plan = distribute(
        &ledger,
        RewardPool::new(dec("100")),
        dec("0.5"),
        &identity,
        dec("1000"),
        3,
    )
    .unwrap();

    assert_eq!(
        plan.payouts,
        vec![
            PayoutRecord { delegator: AccountName::new("alice"), amount: dec("43.750") },
            PayoutRecord { delegator: AccountName::new("bob"), amount: dec("6.250") },
        ]
    );
    assert_eq!(plan.total_payout, dec("50.000"));
}

#[test]
fn test_insolvent_plan_is_rejected_whole() {
    let ledger = ledger(&[("alice", "1000"), ("bob", "142.86")]);
    let result = distribute(
        &ledger,
        RewardPool::new(dec("100")),
        dec("0.5"),
        &identity,
        dec("40"),
        3,
    );

    match result {
        Err(DistributionError::Solvency { required, available }) => {
            assert_eq!(required, dec("50"));
            assert_eq!(available, dec("40"));
        }
        other => panic!("expected solvency error, got {:?}", other),
    }
}

#[test]
fn test_exact_balance_is_enough() {
    let ledger = ledger(&[("alice", "1")]);
    let plan = distribute(&ledger, RewardPool::new(dec("10")), dec("0.5"), &identity, dec("5"), 3)
        .unwrap();
    assert_eq!(plan.total_payout, dec("5"));
}

#[test]
fn test_empty_ledger_is_degenerate() {
    let result = distribute(
        &DelegationLedger::default(),
        RewardPool::new(dec("100")),
        dec("0.5"),
        &identity,
        dec("1000"),
        3,
    );
    assert!(matches!(result, Err(DistributionError::DegenerateLedger { .. })));
}

#[test]
fn test_zero_weight_ledger_is_degenerate() {
    let ledger = ledger(&[("alice", "0"), ("bob", "0")]);
    let result = distribute(&ledger, RewardPool::new(dec("100")), dec("0.5"), &identity, dec("1000"), 3);
    match result {
        Err(DistributionError::DegenerateLedger { total }) => assert_eq!(total, Decimal::ZERO),
        other => panic!("expected degenerate ledger, got {:?}", other),
    }
}

#[test]
fn test_fraction_outside_open_interval_is_rejected() {
    let ledger = ledger(&[("alice", "1000")]);
    for fraction in ["0", "1", "2"] {
        let result = distribute(
            &ledger,
            RewardPool::new(dec("100")),
            dec(fraction),
            &identity,
            dec("1000"),
            3,
        );
        assert!(matches!(result, Err(DistributionError::InvalidConfiguration(_))));
    }
}

#[test]
fn test_zero_pool_distributes_nothing() {
    let ledger = ledger(&[("alice", "1000"), ("bob", "10")]);
    let plan = distribute(&ledger, RewardPool::default(), dec("0.5"), &identity, Decimal::ZERO, 3)
        .unwrap();

    assert_eq!(plan.payouts.len(), 2);
    assert!(plan.payouts.iter().all(|p| p.amount.is_zero()));
    assert_eq!(plan.dispatchable(dec("0.010")).count(), 0);
}

#[test]
fn test_shares_are_proportional_and_sum_to_budget() {
    let cases = [
        (vec![("a", "1"), ("b", "2"), ("c", "3")], "60", "0.25"),
        (vec![("a", "123.456"), ("b", "0.001"), ("c", "98765.4321")], "12.345678", "0.9"),
        (vec![("a", "7"), ("b", "7"), ("c", "7"), ("d", "7")], "1", "0.333"),
    ];

    for (entries, pool, fraction) in cases {
        let ledger = ledger(&entries);
        let budget = dec(fraction) * dec(pool);
        // Unrounded so the sum can be compared against the budget directly.
        let plan = distribute(&ledger, RewardPool::new(dec(pool)), dec(fraction), &identity, budget + Decimal::ONE, 20)
            .unwrap();

        let drift = (plan.total_payout - budget).abs();
        assert!(drift < dec("0.000000000001"), "drift {} for pool {}", drift, pool);

        let total_weight = ledger.total().unwrap();
        for record in &plan.payouts {
            let weight = ledger.get(&record.delegator).unwrap();
            let expected = weight / total_weight * budget;
            assert!((record.amount - expected).abs() < dec("0.000000000001"));
        }
    }
}

#[test]
fn test_rounded_total_drift_is_bounded_and_not_corrected() {
    let ledger = ledger(&[("a", "1"), ("b", "1"), ("c", "1")]);
    let plan = distribute(&ledger, RewardPool::new(dec("1")), dec("0.5"), &identity, dec("1"), 3)
        .unwrap();

    // 0.5 / 3 = 0.1666.. rounds to 0.167 each, so the total overshoots by 0.001.
    assert!(plan.payouts.iter().all(|p| p.amount == dec("0.167")));
    assert_eq!(plan.total_payout, dec("0.501"));
}

#[test]
fn test_converter_is_applied_to_pool() {
    let ledger = ledger(&[("alice", "1")]);
    let halve = |pool: RewardPool| pool.amount() / Decimal::from(2);
    let plan = distribute(&ledger, RewardPool::new(dec("100")), dec("0.5"), &halve, dec("100"), 3)
        .unwrap();
    assert_eq!(plan.pool_value, dec("50"));
    assert_eq!(plan.total_payout, dec("25"));
}

#[test]
fn test_overflowing_ledger_total_is_an_error() {
    let half = Decimal::MAX / Decimal::from(2) + Decimal::ONE;
    let ledger: DelegationLedger = vec![(AccountName::new("a"), half), (AccountName::new("b"), half)]
        .into_iter()
        .collect();

    let result = distribute(&ledger, RewardPool::new(dec("100")), dec("0.5"), &identity, dec("100"), 3);
    assert!(matches!(result, Err(DistributionError::Overflow(_))));
}

#[test]
fn test_dust_is_listed_but_not_dispatchable() {
    let ledger = ledger(&[("whale", "100000"), ("minnow", "1")]);
    let plan = distribute(&ledger, RewardPool::new(dec("10")), dec("0.5"), &identity, dec("10"), 3)
        .unwrap();

    assert_eq!(plan.payouts.len(), 2);
    let dispatchable: Vec<_> = plan.dispatchable(dec("0.010")).collect();
    assert_eq!(dispatchable.len(), 1);
    assert_eq!(dispatchable[0].delegator, AccountName::new("whale"));
}
