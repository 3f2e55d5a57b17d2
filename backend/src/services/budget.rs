//! Budget ledger service
//!
//! Owns the three-way split of a department's yearly allocation and the
//! three money-moving operations. Each operation locks the budget row
//! (`SELECT .. FOR UPDATE`), applies the pure ledger arithmetic from the
//! shared crate, and writes the result back on the caller's connection,
//! so the read-check-write is atomic against concurrent submissions.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{BudgetLedger, LedgerError};

/// Budget service for department/year allocations
#[derive(Clone)]
pub struct BudgetService {
    db: PgPool,
}

/// Budget snapshot returned to callers
#[derive(Debug, Clone, Serialize)]
pub struct BudgetSnapshot {
    pub department_id: Uuid,
    pub department_name: String,
    pub fiscal_year: i32,
    pub total: Decimal,
    pub used: Decimal,
    pub reserved: Decimal,
    pub available: Decimal,
}

/// Row for locked ledger reads
#[derive(Debug, FromRow)]
struct BudgetRow {
    id: Uuid,
    total: Decimal,
    used: Decimal,
    reserved: Decimal,
}

/// Row for snapshot queries
#[derive(Debug, FromRow)]
struct SnapshotRow {
    department_id: Uuid,
    department_name: String,
    fiscal_year: i32,
    total: Decimal,
    used: Decimal,
    reserved: Decimal,
}

impl From<SnapshotRow> for BudgetSnapshot {
    fn from(row: SnapshotRow) -> Self {
        let available = row.total - row.used - row.reserved;
        BudgetSnapshot {
            department_id: row.department_id,
            department_name: row.department_name,
            fiscal_year: row.fiscal_year,
            total: row.total,
            used: row.used,
            reserved: row.reserved,
            available,
        }
    }
}

impl BudgetService {
    /// Create a new BudgetService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get the budget snapshot for a department and fiscal year
    pub async fn get_budget(
        &self,
        department_id: Uuid,
        fiscal_year: i32,
    ) -> AppResult<BudgetSnapshot> {
        let row = sqlx::query_as::<_, SnapshotRow>(
            r#"
            SELECT b.department_id, d.name AS department_name, b.fiscal_year,
                   b.total, b.used, b.reserved
            FROM budgets b
            JOIN departments d ON d.id = b.department_id
            WHERE b.department_id = $1 AND b.fiscal_year = $2
            "#,
        )
        .bind(department_id)
        .bind(fiscal_year)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Budget".to_string()))?;

        Ok(row.into())
    }

    /// List all department budgets for a fiscal year
    pub async fn list_budgets(&self, fiscal_year: i32) -> AppResult<Vec<BudgetSnapshot>> {
        let rows = sqlx::query_as::<_, SnapshotRow>(
            r#"
            SELECT b.department_id, d.name AS department_name, b.fiscal_year,
                   b.total, b.used, b.reserved
            FROM budgets b
            JOIN departments d ON d.id = b.department_id
            WHERE b.fiscal_year = $1
            ORDER BY d.name
            "#,
        )
        .bind(fiscal_year)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Earmark `amount` against a department's budget.
    ///
    /// Fails with InsufficientBudget when the available balance is too
    /// small; the whole surrounding transaction rolls back with it.
    pub async fn reserve(
        conn: &mut PgConnection,
        department_id: Uuid,
        fiscal_year: i32,
        amount: Decimal,
    ) -> AppResult<()> {
        Self::apply(conn, department_id, fiscal_year, |ledger| {
            ledger.reserve(amount)
        })
        .await
    }

    /// Move a previously reserved `amount` into permanent spend
    pub async fn commit_reserved(
        conn: &mut PgConnection,
        department_id: Uuid,
        fiscal_year: i32,
        amount: Decimal,
    ) -> AppResult<()> {
        Self::apply(conn, department_id, fiscal_year, |ledger| {
            ledger.commit_reserved(amount)
        })
        .await
    }

    /// Return a reservation to the available pool
    pub async fn release(
        conn: &mut PgConnection,
        department_id: Uuid,
        fiscal_year: i32,
        amount: Decimal,
    ) -> AppResult<()> {
        Self::apply(conn, department_id, fiscal_year, |ledger| {
            ledger.release(amount)
        })
        .await
    }

    /// Lock the budget row, apply one ledger operation, write it back.
    async fn apply<F>(
        conn: &mut PgConnection,
        department_id: Uuid,
        fiscal_year: i32,
        op: F,
    ) -> AppResult<()>
    where
        F: FnOnce(&mut BudgetLedger) -> Result<(), LedgerError>,
    {
        let row = sqlx::query_as::<_, BudgetRow>(
            r#"
            SELECT id, total, used, reserved
            FROM budgets
            WHERE department_id = $1 AND fiscal_year = $2
            FOR UPDATE
            "#,
        )
        .bind(department_id)
        .bind(fiscal_year)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Budget".to_string()))?;

        let mut ledger = BudgetLedger {
            total: row.total,
            used: row.used,
            reserved: row.reserved,
        };

        op(&mut ledger).map_err(|e| match e {
            LedgerError::Insufficient {
                requested,
                available,
            } => AppError::InsufficientBudget {
                requested,
                available,
            },
            LedgerError::NonPositiveAmount(amount) => {
                AppError::ValidationError(format!("ledger amount must be positive, got {}", amount))
            }
        })?;

        sqlx::query(
            r#"
            UPDATE budgets
            SET used = $1, reserved = $2, updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(ledger.used)
        .bind(ledger.reserved)
        .bind(row.id)
        .execute(conn)
        .await?;

        Ok(())
    }
}
