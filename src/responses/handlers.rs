use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::jwt::CurrentUser,
    error::ApiError,
    notifications::repo::notify,
    responses::{
        dto::{task_snippet, SubmitResponseRequest, UpdateStatusRequest},
        repo::{ResponseStatus, TaskResponse},
    },
    state::AppState,
    tasks::repo::Task,
};

pub fn response_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/tasks/:id/responses",
            post(submit_response).get(list_responses),
        )
        .route("/responses/:id/status", put(update_status))
}

#[instrument(skip(state, payload, user))]
pub async fn submit_response(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<SubmitResponseRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let task = Task::find(&state.db, task_id)
        .await?
        .ok_or(ApiError::NotFound("task"))?;

    if task.customer_id == user.id {
        return Err(ApiError::SelfResponse);
    }

    let response = TaskResponse::create(
        &state.db,
        task_id,
        user.id,
        payload.offer_price,
        payload.message.as_deref(),
    )
    .await
    .map_err(|e| match ApiError::from(e) {
        ApiError::Conflict(_) => ApiError::Conflict("duplicate response".into()),
        other => other,
    })?;

    // Best-effort: the response stands even if the notification write fails
    notify(
        &state.db,
        task.customer_id,
        "Новый отклик",
        &format!("Новый отклик по заказу {}", task_snippet(&task.description)),
    )
    .await;

    info!(response_id = %response.id, task_id = %task_id, performer_id = %user.id,
          "response submitted");
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(state, user))]
pub async fn list_responses(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(task_id): Path<Uuid>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let owner = Task::owner_of(&state.db, task_id)
        .await?
        .ok_or(ApiError::NotFound("task"))?;
    if owner != user.id {
        return Err(ApiError::Forbidden);
    }

    let responses = TaskResponse::list_for_task(&state.db, task_id).await?;
    Ok(Json(responses))
}

#[instrument(skip(state, payload, user))]
pub async fn update_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(response_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    let change =
        TaskResponse::set_status(&state.db, response_id, user.id, payload.status).await?;

    let snippet = task_snippet(&change.task_description);
    match change.response.status {
        ResponseStatus::Accepted => {
            notify(
                &state.db,
                change.response.performer_id,
                "Отклик принят",
                &format!("Ваш отклик по заказу {snippet} принят!"),
            )
            .await;
        }
        ResponseStatus::Rejected => {
            notify(
                &state.db,
                change.response.performer_id,
                "Отклик отклонен",
                &format!("Ваш отклик по заказу {snippet} отклонен."),
            )
            .await;
        }
        ResponseStatus::Pending => {}
    }

    info!(response_id = %response_id, status = ?change.response.status,
          "response status updated");
    Ok(Json(change.response))
}
