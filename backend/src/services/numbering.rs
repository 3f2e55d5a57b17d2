//! Sequential document numbering service
//!
//! Numbers come from a dedicated counter row per (kind, period) updated
//! atomically, not from counting existing documents. Two concurrent
//! submissions can therefore never compute the same number; a rolled-back
//! transaction may leave a gap, which is acceptable.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use crate::error::AppResult;
use crate::models::DocumentKind;

/// Issues sequential, human-readable document numbers scoped by period
/// (month for purchase requests, year for purchase orders).
pub struct NumberingService;

impl NumberingService {
    /// Issue the next number for `kind` within the scope period of `now`.
    ///
    /// Runs on the caller's connection so it participates in the
    /// controlling transaction.
    pub async fn next_number(
        conn: &mut PgConnection,
        kind: DocumentKind,
        now: DateTime<Utc>,
    ) -> AppResult<String> {
        let period = kind.period(now.date_naive());

        let sequence: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO document_sequences (document_kind, period, last_value)
            VALUES ($1, $2, 1)
            ON CONFLICT (document_kind, period)
            DO UPDATE SET last_value = document_sequences.last_value + 1
            RETURNING last_value
            "#,
        )
        .bind(kind.prefix())
        .bind(&period)
        .fetch_one(conn)
        .await?;

        Ok(kind.format_number(&period, sequence))
    }
}
