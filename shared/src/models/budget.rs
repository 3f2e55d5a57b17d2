//! Budget ledger model
//!
//! A budget is one bounded counter per (department, fiscal year), split
//! three ways: `total` is the allocated ceiling, `used` is committed
//! spend, `reserved` is the amount earmarked by in-flight purchase
//! requests. The invariant `reserved >= 0 && used >= 0 &&
//! reserved + used <= total` must hold after every operation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by ledger operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("insufficient budget: requested {requested}, available {available}")]
    Insufficient {
        requested: Decimal,
        available: Decimal,
    },

    #[error("ledger amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
}

/// The three-way split of a department's yearly allocation.
///
/// This is a value type: the backend loads the row under a lock, applies
/// the operation here, and writes the result back in the same transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLedger {
    pub total: Decimal,
    pub used: Decimal,
    pub reserved: Decimal,
}

impl BudgetLedger {
    /// A fresh ledger with nothing reserved or used
    pub fn new(total: Decimal) -> Self {
        Self {
            total,
            used: Decimal::ZERO,
            reserved: Decimal::ZERO,
        }
    }

    /// Amount a new purchase request may still draw against
    pub fn available(&self) -> Decimal {
        self.total - self.used - self.reserved
    }

    /// Earmark `amount` for an in-flight request.
    ///
    /// Fails when `amount` exceeds the available balance; the error carries
    /// both figures so the caller can explain the shortfall.
    pub fn reserve(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount(amount));
        }
        let available = self.available();
        if amount > available {
            return Err(LedgerError::Insufficient {
                requested: amount,
                available,
            });
        }
        self.reserved += amount;
        Ok(())
    }

    /// Move a previously reserved `amount` into permanent spend.
    ///
    /// The caller guarantees the amount was reserved; `reserved` is clamped
    /// at zero rather than allowed to go negative.
    pub fn commit_reserved(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount(amount));
        }
        self.reserved = (self.reserved - amount).max(Decimal::ZERO);
        self.used += amount;
        Ok(())
    }

    /// Return a reservation to the available pool, clamped at zero.
    ///
    /// `used` is never decreased: committed spend is permanent.
    pub fn release(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount(amount));
        }
        self.reserved = (self.reserved - amount).max(Decimal::ZERO);
        Ok(())
    }

    /// Check the ledger invariant
    pub fn invariant_holds(&self) -> bool {
        self.reserved >= Decimal::ZERO
            && self.used >= Decimal::ZERO
            && self.reserved + self.used <= self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thb(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn test_reserve_then_commit_conserves_total() {
        let mut ledger = BudgetLedger::new(thb(10_000));
        ledger.reserve(thb(4_000)).unwrap();
        assert_eq!(ledger.reserved, thb(4_000));

        ledger.commit_reserved(thb(4_000)).unwrap();
        assert_eq!(ledger.used, thb(4_000));
        assert_eq!(ledger.reserved, Decimal::ZERO);
        assert_eq!(ledger.total, thb(10_000));
        assert!(ledger.invariant_holds());
    }

    #[test]
    fn test_reserve_insufficient() {
        let mut ledger = BudgetLedger::new(thb(1_000));
        ledger.reserve(thb(700)).unwrap();

        let err = ledger.reserve(thb(500)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::Insufficient {
                requested: thb(500),
                available: thb(300),
            }
        );
        // Failed reserve leaves the ledger untouched
        assert_eq!(ledger.reserved, thb(700));
    }

    #[test]
    fn test_release_clamps_at_zero() {
        let mut ledger = BudgetLedger::new(thb(1_000));
        ledger.reserve(thb(200)).unwrap();
        ledger.release(thb(500)).unwrap();
        assert_eq!(ledger.reserved, Decimal::ZERO);
        assert!(ledger.invariant_holds());
    }

    #[test]
    fn test_reserve_rejects_non_positive() {
        let mut ledger = BudgetLedger::new(thb(1_000));
        assert!(ledger.reserve(Decimal::ZERO).is_err());
        assert!(ledger.reserve(thb(-5)).is_err());
    }

    #[test]
    fn test_example_scenario() {
        // Budget 10M: PR-A reserves 6M, PR-B for 5M fails, reject PR-A,
        // PR-B succeeds, full approval commits 5M.
        let mut ledger = BudgetLedger::new(thb(10_000_000));

        ledger.reserve(thb(6_000_000)).unwrap();
        assert_eq!(ledger.available(), thb(4_000_000));

        assert!(ledger.reserve(thb(5_000_000)).is_err());

        ledger.release(thb(6_000_000)).unwrap();
        assert_eq!(ledger.reserved, Decimal::ZERO);

        ledger.reserve(thb(5_000_000)).unwrap();
        ledger.commit_reserved(thb(5_000_000)).unwrap();
        assert_eq!(ledger.used, thb(5_000_000));
        assert_eq!(ledger.reserved, Decimal::ZERO);
        assert!(ledger.invariant_holds());
    }
}
