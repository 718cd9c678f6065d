use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;
use crate::tasks::repo::TaskStatus;

/// Response sub-machine: `pending -> accepted | rejected`, both terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "response_status", rename_all = "snake_case")]
pub enum ResponseStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ResponseStatus {
    /// The only legal targets for a status update. `pending` is where a
    /// response starts, never where it goes back to.
    pub fn is_decision(self) -> bool {
        matches!(self, ResponseStatus::Accepted | ResponseStatus::Rejected)
    }
}

/// A performer's bid against a task.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaskResponse {
    pub id: Uuid,
    pub task_id: Uuid,
    pub performer_id: Uuid,
    pub offer_price: f64,
    pub message: Option<String>,
    pub status: ResponseStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Everything the caller needs after a committed status change: who to
/// notify and which task the response belonged to.
#[derive(Debug)]
pub struct StatusChange {
    pub response: TaskResponse,
    pub task_description: String,
}

#[derive(Debug, FromRow)]
struct ResponseWithTask {
    id: Uuid,
    task_id: Uuid,
    status: ResponseStatus,
    customer_id: Uuid,
    task_status: TaskStatus,
    description: String,
}

/// Transition rules for a decision on a response. A response is decided
/// once (`pending` only), and accepting requires the task to still be
/// `open` — otherwise a second performer could be accepted onto a task
/// already in progress. Rejecting leftover siblings of an accepted
/// response stays allowed.
fn check_transition(
    current: ResponseStatus,
    target: ResponseStatus,
    task_status: TaskStatus,
) -> Result<(), ApiError> {
    if !target.is_decision() {
        return Err(ApiError::InvalidTransition);
    }
    if current != ResponseStatus::Pending {
        return Err(ApiError::InvalidTransition);
    }
    if target == ResponseStatus::Accepted && task_status != TaskStatus::Open {
        return Err(ApiError::InvalidTransition);
    }
    Ok(())
}

const RESPONSE_COLUMNS: &str =
    "id, task_id, performer_id, offer_price, message, status, created_at, updated_at";

impl TaskResponse {
    /// Plain insert; the `(task_id, performer_id)` unique constraint turns
    /// a concurrent duplicate into a database error instead of a second
    /// row.
    pub async fn create(
        db: &PgPool,
        task_id: Uuid,
        performer_id: Uuid,
        offer_price: f64,
        message: Option<&str>,
    ) -> sqlx::Result<TaskResponse> {
        sqlx::query_as::<_, TaskResponse>(&format!(
            "INSERT INTO responses (task_id, performer_id, offer_price, message)
             VALUES ($1, $2, $3, $4)
             RETURNING {RESPONSE_COLUMNS}"
        ))
        .bind(task_id)
        .bind(performer_id)
        .bind(offer_price)
        .bind(message)
        .fetch_one(db)
        .await
    }

    pub async fn list_for_task(db: &PgPool, task_id: Uuid) -> sqlx::Result<Vec<TaskResponse>> {
        sqlx::query_as::<_, TaskResponse>(&format!(
            "SELECT {RESPONSE_COLUMNS} FROM responses
             WHERE task_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(task_id)
        .fetch_all(db)
        .await
    }

    /// Applies an accept/reject decision. Ownership check, transition
    /// check, response update and the task's `open -> in_progress` move
    /// are one transaction, so a competing request sees either all of it
    /// or none of it. Only an `open` task can have a response accepted;
    /// a task in progress already has its accepted performer.
    ///
    /// Accepting does not touch sibling responses on the same task.
    pub async fn set_status(
        db: &PgPool,
        response_id: Uuid,
        requester_id: Uuid,
        new_status: ResponseStatus,
    ) -> Result<StatusChange, ApiError> {
        if !new_status.is_decision() {
            return Err(ApiError::InvalidTransition);
        }

        let mut tx = db.begin().await.map_err(ApiError::from)?;

        let row = sqlx::query_as::<_, ResponseWithTask>(
            "SELECT r.id, r.task_id, r.status, t.customer_id,
                    t.status AS task_status, t.description
             FROM responses r
             JOIN tasks t ON t.id = r.task_id
             WHERE r.id = $1
             FOR UPDATE OF r, t",
        )
        .bind(response_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(ApiError::from)?
        .ok_or(ApiError::NotFound("response"))?;

        if row.customer_id != requester_id {
            return Err(ApiError::Forbidden);
        }
        check_transition(row.status, new_status, row.task_status)?;

        let response = sqlx::query_as::<_, TaskResponse>(&format!(
            "UPDATE responses SET status = $2, updated_at = now()
             WHERE id = $1
             RETURNING {RESPONSE_COLUMNS}"
        ))
        .bind(row.id)
        .bind(new_status)
        .fetch_one(&mut *tx)
        .await
        .map_err(ApiError::from)?;

        if new_status == ResponseStatus::Accepted {
            sqlx::query("UPDATE tasks SET status = $2, updated_at = now() WHERE id = $1")
                .bind(row.task_id)
                .bind(TaskStatus::InProgress)
                .execute(&mut *tx)
                .await
                .map_err(ApiError::from)?;
        }

        tx.commit().await.map_err(ApiError::from)?;

        Ok(StatusChange {
            response,
            task_description: row.description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_accept_and_reject_are_decisions() {
        assert!(ResponseStatus::Accepted.is_decision());
        assert!(ResponseStatus::Rejected.is_decision());
        assert!(!ResponseStatus::Pending.is_decision());
    }

    #[test]
    fn accepting_requires_an_open_task() {
        assert!(check_transition(
            ResponseStatus::Pending,
            ResponseStatus::Accepted,
            TaskStatus::Open
        )
        .is_ok());
        // Second accept on the same task: the first one moved it along
        assert!(matches!(
            check_transition(
                ResponseStatus::Pending,
                ResponseStatus::Accepted,
                TaskStatus::InProgress
            ),
            Err(ApiError::InvalidTransition)
        ));
    }

    #[test]
    fn rejecting_siblings_of_an_accepted_response_is_allowed() {
        assert!(check_transition(
            ResponseStatus::Pending,
            ResponseStatus::Rejected,
            TaskStatus::InProgress
        )
        .is_ok());
    }

    #[test]
    fn decided_responses_are_terminal() {
        for current in [ResponseStatus::Accepted, ResponseStatus::Rejected] {
            assert!(matches!(
                check_transition(current, ResponseStatus::Accepted, TaskStatus::Open),
                Err(ApiError::InvalidTransition)
            ));
            assert!(matches!(
                check_transition(current, ResponseStatus::Rejected, TaskStatus::Open),
                Err(ApiError::InvalidTransition)
            ));
        }
    }

    #[test]
    fn pending_is_never_a_decision_target() {
        assert!(matches!(
            check_transition(
                ResponseStatus::Pending,
                ResponseStatus::Pending,
                TaskStatus::Open
            ),
            Err(ApiError::InvalidTransition)
        ));
    }

    #[test]
    fn status_wire_format_is_snake_case() {
        assert_eq!(
            serde_json::to_string(&ResponseStatus::Accepted).unwrap(),
            "\"accepted\""
        );
        let parsed: ResponseStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(parsed, ResponseStatus::Pending);
    }
}
