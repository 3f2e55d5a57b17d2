//! Append-only audit sink
//!
//! Every workflow transition appends one activity entry inside the same
//! transaction as the domain operation. The append is an explicit step,
//! never derived from persistence-layer change tracking.

use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::AppResult;

/// Records who did what to which entity
pub struct ActivityLogService;

impl ActivityLogService {
    /// Append one audit entry on the caller's connection
    pub async fn record(
        conn: &mut PgConnection,
        actor_id: Uuid,
        action: &str,
        entity_type: &str,
        entity_id: Uuid,
        details: serde_json::Value,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO activity_logs (actor_id, action, entity_type, entity_id, details)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(actor_id)
        .bind(action)
        .bind(entity_type)
        .bind(entity_id)
        .bind(details)
        .execute(conn)
        .await?;

        Ok(())
    }
}
