//! In-app notification dispatch
//!
//! Notifications are fired after the controlling workflow transaction has
//! committed, from a spawned task. A failed enqueue is logged and never
//! rolls back or retries the workflow transition itself.

use sqlx::PgPool;
use uuid::Uuid;

/// Notification service for workflow events
#[derive(Clone)]
pub struct NotificationService {
    db: PgPool,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Enqueue an in-app notification without blocking the caller
    pub fn dispatch(
        &self,
        user_id: Uuid,
        title: &str,
        title_th: &str,
        body: String,
        body_th: String,
        reference_type: &str,
        reference_id: Uuid,
    ) {
        let db = self.db.clone();
        let title = title.to_string();
        let title_th = title_th.to_string();
        let reference_type = reference_type.to_string();

        tokio::spawn(async move {
            let result = sqlx::query(
                r#"
                INSERT INTO notifications (user_id, title, title_th, body, body_th,
                                           reference_type, reference_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(user_id)
            .bind(&title)
            .bind(&title_th)
            .bind(&body)
            .bind(&body_th)
            .bind(&reference_type)
            .bind(reference_id)
            .execute(&db)
            .await;

            if let Err(e) = result {
                tracing::warn!("Failed to enqueue notification for {}: {}", user_id, e);
            }
        });
    }
}
