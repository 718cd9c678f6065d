use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

/// Append-only per-user message log; the only later mutation is flipping
/// `is_read`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: OffsetDateTime,
}

const NOTIFICATION_COLUMNS: &str = "id, user_id, title, message, is_read, created_at";

impl Notification {
    pub async fn append(
        db: &PgPool,
        user_id: Uuid,
        title: &str,
        message: &str,
    ) -> sqlx::Result<Notification> {
        sqlx::query_as::<_, Notification>(&format!(
            "INSERT INTO notifications (user_id, title, message)
             VALUES ($1, $2, $3)
             RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(user_id)
        .bind(title)
        .bind(message)
        .fetch_one(db)
        .await
    }

    pub async fn list_for_user(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
    ) -> sqlx::Result<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2"
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(db)
        .await
    }

    pub async fn recipient_of(db: &PgPool, notification_id: Uuid) -> sqlx::Result<Option<Uuid>> {
        sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM notifications WHERE id = $1")
            .bind(notification_id)
            .fetch_optional(db)
            .await
    }

    pub async fn mark_read(
        db: &PgPool,
        notification_id: Uuid,
        user_id: Uuid,
    ) -> sqlx::Result<Option<Notification>> {
        sqlx::query_as::<_, Notification>(&format!(
            "UPDATE notifications SET is_read = TRUE
             WHERE id = $1 AND user_id = $2
             RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(notification_id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }
}

/// Fire-and-forget append used by lifecycle side effects. A failed write
/// is logged and swallowed: the triggering mutation already committed and
/// must stay committed.
pub async fn notify(db: &PgPool, user_id: Uuid, title: &str, message: &str) {
    if let Err(e) = Notification::append(db, user_id, title, message).await {
        warn!(error = %e, user_id = %user_id, "notification append failed");
    }
}
