use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::jwt::CurrentUser,
    error::ApiError,
    notifications::{dto::ListQuery, repo::Notification},
    state::AppState,
};

pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/:id/read", put(mark_read))
}

#[instrument(skip(state, user))]
pub async fn list_notifications(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let notifications = Notification::list_for_user(&state.db, user.id, q.validated_limit()?).await?;
    Ok(Json(notifications))
}

#[instrument(skip(state, user))]
pub async fn mark_read(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<Notification>, ApiError> {
    match Notification::mark_read(&state.db, notification_id, user.id).await? {
        Some(notification) => {
            info!(notification_id = %notification.id, "notification marked read");
            Ok(Json(notification))
        }
        None => match Notification::recipient_of(&state.db, notification_id).await? {
            Some(_) => Err(ApiError::Forbidden),
            None => Err(ApiError::NotFound("notification")),
        },
    }
}
