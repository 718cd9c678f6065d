use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Closed set of service categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "service_category", rename_all = "snake_case")]
pub enum ServiceCategory {
    Movers,
    ComputerHelp,
    BeautyHealth,
    Handyman,
    HouseholdHelp,
    Laborers,
    ApplianceRepair,
    Construction,
    Tutoring,
    Plumbing,
    Furniture,
    Cleaning,
    Electrical,
    Legal,
    Other,
}

/// Task lifecycle. Only `open -> in_progress` is driven by the service
/// today; `completed` and `cancelled` are reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
pub enum TaskStatus {
    Open,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: ServiceCategory,
    pub address: String,
    pub scheduled_date: String,
    pub price: f64,
    pub photos: Vec<String>,
    pub status: TaskStatus,
    pub customer_id: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Default)]
pub struct TaskFilter {
    pub owner: Option<Uuid>,
    pub category: Option<ServiceCategory>,
    pub status: Option<TaskStatus>,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<ServiceCategory>,
    pub address: Option<String>,
    pub scheduled_date: Option<String>,
    pub price: Option<f64>,
    pub photos: Option<Vec<String>>,
}

impl TaskChanges {
    /// True when the update carries nothing to apply; callers skip the
    /// UPDATE entirely so `updated_at` only moves when a field does.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.address.is_none()
            && self.scheduled_date.is_none()
            && self.price.is_none()
            && self.photos.is_none()
    }
}

const TASK_COLUMNS: &str = "id, title, description, category, address, scheduled_date, \
     price, photos, status, customer_id, created_at, updated_at";

impl Task {
    pub async fn create(
        db: &PgPool,
        customer_id: Uuid,
        title: &str,
        description: &str,
        category: ServiceCategory,
        address: &str,
        scheduled_date: &str,
        price: f64,
        photos: &[String],
    ) -> sqlx::Result<Task> {
        sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (title, description, category, address, scheduled_date, price, photos, customer_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(title)
        .bind(description)
        .bind(category)
        .bind(address)
        .bind(scheduled_date)
        .bind(price)
        .bind(photos)
        .bind(customer_id)
        .fetch_one(db)
        .await
    }

    /// Conjunctive optional filters, newest-created first.
    pub async fn list(db: &PgPool, filter: &TaskFilter) -> sqlx::Result<Vec<Task>> {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE ($1::uuid IS NULL OR customer_id = $1)
               AND ($2::service_category IS NULL OR category = $2)
               AND ($3::task_status IS NULL OR status = $3)
             ORDER BY created_at DESC"
        ))
        .bind(filter.owner)
        .bind(filter.category)
        .bind(filter.status)
        .fetch_all(db)
        .await
    }

    pub async fn find(db: &PgPool, task_id: Uuid) -> sqlx::Result<Option<Task>> {
        sqlx::query_as::<_, Task>(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"))
            .bind(task_id)
            .fetch_optional(db)
            .await
    }

    pub async fn owner_of(db: &PgPool, task_id: Uuid) -> sqlx::Result<Option<Uuid>> {
        sqlx::query_scalar::<_, Uuid>("SELECT customer_id FROM tasks WHERE id = $1")
            .bind(task_id)
            .fetch_optional(db)
            .await
    }

    /// Ownership-guarded partial update in a single statement; `None` when
    /// no row matched (absent task or foreign owner, the handler tells the
    /// two apart).
    pub async fn update(
        db: &PgPool,
        task_id: Uuid,
        owner_id: Uuid,
        changes: &TaskChanges,
    ) -> sqlx::Result<Option<Task>> {
        sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET
                 title = COALESCE($3, title),
                 description = COALESCE($4, description),
                 category = COALESCE($5::service_category, category),
                 address = COALESCE($6, address),
                 scheduled_date = COALESCE($7, scheduled_date),
                 price = COALESCE($8, price),
                 photos = COALESCE($9, photos),
                 updated_at = now()
             WHERE id = $1 AND customer_id = $2
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(task_id)
        .bind(owner_id)
        .bind(changes.title.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.category)
        .bind(changes.address.as_deref())
        .bind(changes.scheduled_date.as_deref())
        .bind(changes.price)
        .bind(changes.photos.as_deref())
        .fetch_optional(db)
        .await
    }

    /// Ownership-guarded delete; responses go with the task via the FK
    /// cascade, so the whole removal is one atomic statement.
    pub async fn delete(db: &PgPool, task_id: Uuid, owner_id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND customer_id = $2")
            .bind(task_id)
            .bind(owner_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_changes_are_empty() {
        assert!(TaskChanges::default().is_empty());
    }

    #[test]
    fn any_single_field_makes_changes_non_empty() {
        let changes = TaskChanges {
            price: Some(1500.0),
            ..TaskChanges::default()
        };
        assert!(!changes.is_empty());

        let changes = TaskChanges {
            photos: Some(vec![]),
            ..TaskChanges::default()
        };
        assert!(!changes.is_empty());
    }
}
