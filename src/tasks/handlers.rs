use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::jwt::CurrentUser,
    error::ApiError,
    state::AppState,
    tasks::{
        dto::{
            derive_title, AvailableQuery, CreateTaskRequest, TaskFilterQuery,
            UpdateTaskRequest, MIN_DESCRIPTION_LEN,
        },
        repo::{Task, TaskChanges, TaskFilter, TaskStatus},
    },
};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_my_tasks).post(create_task))
        .route("/tasks/available", get(list_available))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
}

fn check_description(description: &str) -> Result<(), ApiError> {
    if description.chars().count() < MIN_DESCRIPTION_LEN {
        return Err(ApiError::Validation("description too short".into()));
    }
    Ok(())
}

#[instrument(skip(state, payload, user))]
pub async fn create_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    check_description(&payload.description)?;

    let title = derive_title(&payload.description);
    let task = Task::create(
        &state.db,
        user.id,
        &title,
        &payload.description,
        payload.category,
        &payload.address,
        &payload.scheduled_date,
        payload.price.unwrap_or(0.0),
        &payload.photos,
    )
    .await?;

    info!(task_id = %task.id, customer_id = %user.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

#[instrument(skip(state, user))]
pub async fn list_my_tasks(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(q): Query<TaskFilterQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = Task::list(
        &state.db,
        &TaskFilter {
            owner: Some(user.id),
            category: q.category,
            status: q.status,
        },
    )
    .await?;
    Ok(Json(tasks))
}

/// Open tasks are the public face of the marketplace; no token required.
#[instrument(skip(state))]
pub async fn list_available(
    State(state): State<AppState>,
    Query(q): Query<AvailableQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = Task::list(
        &state.db,
        &TaskFilter {
            owner: None,
            category: q.category,
            status: Some(TaskStatus::Open),
        },
    )
    .await?;
    Ok(Json(tasks))
}

#[instrument(skip_all, fields(task_id = %task_id))]
pub async fn get_task(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(task_id): Path<Uuid>,
) -> Result<Json<Task>, ApiError> {
    let task = Task::find(&state.db, task_id)
        .await?
        .ok_or(ApiError::NotFound("task"))?;
    Ok(Json(task))
}

#[instrument(skip(state, payload, user))]
pub async fn update_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    if let Some(description) = payload.description.as_deref() {
        check_description(description)?;
    }

    let changes = TaskChanges {
        title: payload.description.as_deref().map(derive_title),
        description: payload.description,
        category: payload.category,
        address: payload.address,
        scheduled_date: payload.scheduled_date,
        price: payload.price,
        photos: payload.photos,
    };

    // Nothing to apply: ownership still matters, the timestamp does not
    if changes.is_empty() {
        let task = Task::find(&state.db, task_id)
            .await?
            .ok_or(ApiError::NotFound("task"))?;
        if task.customer_id != user.id {
            return Err(ApiError::Forbidden);
        }
        return Ok(Json(task));
    }

    match Task::update(&state.db, task_id, user.id, &changes).await? {
        Some(task) => {
            info!(task_id = %task.id, "task updated");
            Ok(Json(task))
        }
        None => match Task::owner_of(&state.db, task_id).await? {
            Some(_) => Err(ApiError::Forbidden),
            None => Err(ApiError::NotFound("task")),
        },
    }
}

#[instrument(skip(state, user))]
pub async fn delete_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(task_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if Task::delete(&state.db, task_id, user.id).await? {
        info!(task_id = %task_id, "task deleted");
        return Ok(StatusCode::NO_CONTENT);
    }
    match Task::owner_of(&state.db, task_id).await? {
        Some(_) => Err(ApiError::Forbidden),
        None => Err(ApiError::NotFound("task")),
    }
}
