//! Budget ledger tests
//!
//! Tests for the reserve/commit/release arithmetic, including:
//! - the ledger invariant: reserved >= 0, used >= 0, reserved + used <= total
//! - reservation failure leaves the ledger untouched

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{BudgetLedger, LedgerError};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_new_ledger_is_fully_available() {
        let ledger = BudgetLedger::new(dec("10000000.00"));
        assert_eq!(ledger.available(), dec("10000000.00"));
        assert_eq!(ledger.used, Decimal::ZERO);
        assert_eq!(ledger.reserved, Decimal::ZERO);
    }

    #[test]
    fn test_reserve_moves_amount_out_of_available() {
        let mut ledger = BudgetLedger::new(dec("1000.00"));
        ledger.reserve(dec("300.00")).unwrap();

        assert_eq!(ledger.reserved, dec("300.00"));
        assert_eq!(ledger.available(), dec("700.00"));
    }

    #[test]
    fn test_reserve_more_than_available_fails() {
        let mut ledger = BudgetLedger::new(dec("1000.00"));
        let err = ledger.reserve(dec("1000.01")).unwrap_err();

        match err {
            LedgerError::Insufficient {
                requested,
                available,
            } => {
                assert_eq!(requested, dec("1000.01"));
                assert_eq!(available, dec("1000.00"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        // Failed reservation leaves the ledger untouched
        assert_eq!(ledger.reserved, Decimal::ZERO);
        assert_eq!(ledger.available(), dec("1000.00"));
    }

    #[test]
    fn test_reserve_exact_available_succeeds() {
        let mut ledger = BudgetLedger::new(dec("1000.00"));
        ledger.reserve(dec("1000.00")).unwrap();
        assert_eq!(ledger.available(), Decimal::ZERO);
    }

    #[test]
    fn test_reserve_rejects_non_positive_amounts() {
        let mut ledger = BudgetLedger::new(dec("1000.00"));
        assert!(matches!(
            ledger.reserve(Decimal::ZERO),
            Err(LedgerError::NonPositiveAmount(_))
        ));
        assert!(matches!(
            ledger.reserve(dec("-5.00")),
            Err(LedgerError::NonPositiveAmount(_))
        ));
    }

    #[test]
    fn test_commit_moves_reservation_into_used() {
        let mut ledger = BudgetLedger::new(dec("1000.00"));
        ledger.reserve(dec("400.00")).unwrap();
        ledger.commit_reserved(dec("400.00")).unwrap();

        assert_eq!(ledger.reserved, Decimal::ZERO);
        assert_eq!(ledger.used, dec("400.00"));
        assert_eq!(ledger.available(), dec("600.00"));
    }

    #[test]
    fn test_release_returns_reservation_to_available() {
        let mut ledger = BudgetLedger::new(dec("1000.00"));
        ledger.reserve(dec("400.00")).unwrap();
        ledger.release(dec("400.00")).unwrap();

        assert_eq!(ledger.reserved, Decimal::ZERO);
        assert_eq!(ledger.used, Decimal::ZERO);
        assert_eq!(ledger.available(), dec("1000.00"));
    }

    #[test]
    fn test_release_clamps_at_zero() {
        let mut ledger = BudgetLedger::new(dec("1000.00"));
        ledger.reserve(dec("100.00")).unwrap();
        // Over-release never drives reserved negative
        ledger.release(dec("150.00")).unwrap();

        assert_eq!(ledger.reserved, Decimal::ZERO);
        assert!(ledger.invariant_holds());
    }

    /// The worked scenario from the department budget playbook:
    /// 10M total, reserve 6M, a 5M reservation must fail, releasing the
    /// 6M must make the 5M succeed, committing leaves 5M available.
    #[test]
    fn test_year_end_crunch_scenario() {
        let mut ledger = BudgetLedger::new(dec("10000000.00"));

        ledger.reserve(dec("6000000.00")).unwrap();
        assert_eq!(ledger.available(), dec("4000000.00"));

        assert!(ledger.reserve(dec("5000000.00")).is_err());

        ledger.release(dec("6000000.00")).unwrap();
        assert_eq!(ledger.available(), dec("10000000.00"));

        ledger.reserve(dec("5000000.00")).unwrap();
        ledger.commit_reserved(dec("5000000.00")).unwrap();

        assert_eq!(ledger.used, dec("5000000.00"));
        assert_eq!(ledger.reserved, Decimal::ZERO);
        assert_eq!(ledger.available(), dec("5000000.00"));
        assert!(ledger.invariant_holds());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    #[derive(Debug, Clone, Copy)]
    enum LedgerOp {
        Reserve(Decimal),
        Commit(Decimal),
        Release(Decimal),
    }

    /// Strategy for generating amounts in satang precision (0.01 THB)
    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=2_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn op_strategy() -> impl Strategy<Value = LedgerOp> {
        prop_oneof![
            amount_strategy().prop_map(LedgerOp::Reserve),
            amount_strategy().prop_map(LedgerOp::Commit),
            amount_strategy().prop_map(LedgerOp::Release),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// The invariant holds after any workflow-shaped sequence of
        /// operations. Commits are capped at the reserved balance, as
        /// the request service only ever commits what it reserved.
        #[test]
        fn prop_invariant_holds_under_any_op_sequence(
            ops in prop::collection::vec(op_strategy(), 1..50)
        ) {
            let mut ledger = BudgetLedger::new(dec("10000.00"));

            for op in ops {
                // Failed reserves are fine; the ledger must stay consistent
                let _ = match op {
                    LedgerOp::Reserve(a) => ledger.reserve(a),
                    LedgerOp::Commit(a) => {
                        let a = a.min(ledger.reserved);
                        if a > Decimal::ZERO {
                            ledger.commit_reserved(a)
                        } else {
                            Ok(())
                        }
                    }
                    LedgerOp::Release(a) => ledger.release(a),
                };
                prop_assert!(ledger.invariant_holds(),
                    "invariant broken: total={} used={} reserved={}",
                    ledger.total, ledger.used, ledger.reserved);
            }
        }

        /// The total allocation never changes; only the split moves.
        #[test]
        fn prop_total_is_conserved(
            ops in prop::collection::vec(op_strategy(), 1..50)
        ) {
            let total = dec("50000.00");
            let mut ledger = BudgetLedger::new(total);

            for op in ops {
                let _ = match op {
                    LedgerOp::Reserve(a) => ledger.reserve(a),
                    LedgerOp::Commit(a) => {
                        let a = a.min(ledger.reserved);
                        if a > Decimal::ZERO {
                            ledger.commit_reserved(a)
                        } else {
                            Ok(())
                        }
                    }
                    LedgerOp::Release(a) => ledger.release(a),
                };
                prop_assert_eq!(ledger.total, total);
            }
        }

        /// A successful reservation reduces available by exactly the amount.
        #[test]
        fn prop_reserve_is_exact(amount in amount_strategy()) {
            let mut ledger = BudgetLedger::new(dec("5000000.00"));
            let before = ledger.available();

            if ledger.reserve(amount).is_ok() {
                prop_assert_eq!(ledger.available(), before - amount);
                prop_assert_eq!(ledger.reserved, amount);
            }
        }

        /// Reserve then release is a no-op on the observable balances.
        #[test]
        fn prop_reserve_release_round_trip(amount in amount_strategy()) {
            let mut ledger = BudgetLedger::new(dec("5000000.00"));

            if ledger.reserve(amount).is_ok() {
                ledger.release(amount).unwrap();
                prop_assert_eq!(ledger.available(), dec("5000000.00"));
                prop_assert_eq!(ledger.used, Decimal::ZERO);
                prop_assert_eq!(ledger.reserved, Decimal::ZERO);
            }
        }
    }
}
