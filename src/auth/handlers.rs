use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            Ack, AuthResponse, ChangePasswordRequest, LoginRequest, PhoneRequest,
            ProfileResponse, ProfileUpdateRequest, PublicUser, RegisterRequest,
            ResetPasswordRequest, VerifyCodeRequest,
        },
        jwt::{CurrentUser, JwtKeys},
        password::{hash_password, verify_password},
        phone::normalize_phone,
        repo::User,
    },
    error::ApiError,
    state::AppState,
};

const MIN_PASSWORD_LEN: usize = 6;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/request-code", post(request_code))
        .route("/auth/verify-code", post(verify_code))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/reset-password", post(reset_password))
        .route("/auth/change-password", post(change_password))
        .route("/auth/profile", get(get_profile).put(update_profile))
}

fn check_password_len(password: &str) -> Result<(), ApiError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation("password too short".into()));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn request_code(
    State(state): State<AppState>,
    Json(payload): Json<PhoneRequest>,
) -> Result<Json<Ack>, ApiError> {
    let phone = normalize_phone(&payload.phone);
    state.sms.send_code(&phone);
    Ok(Json(Ack::new("SMS code sent")))
}

#[instrument(skip(state, payload))]
pub async fn verify_code(
    State(state): State<AppState>,
    Json(payload): Json<VerifyCodeRequest>,
) -> Result<Json<Ack>, ApiError> {
    let phone = normalize_phone(&payload.phone);
    if !state.sms.verify_code(&phone, &payload.code) {
        warn!(phone = %phone, "invalid sms code");
        return Err(ApiError::Validation("invalid SMS code".into()));
    }
    Ok(Json(Ack::new("code verified")))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    check_password_len(&payload.password)?;
    let phone = normalize_phone(&payload.phone);

    if User::find_by_phone(&state.db, &phone).await?.is_some() {
        warn!(phone = %phone, "phone already registered");
        return Err(ApiError::Conflict("user already exists".into()));
    }

    let hash = hash_password(&payload.password)?;
    // Unique constraint still backs this up if two registrations race
    let user = User::create(
        &state.db,
        &phone,
        &hash,
        payload.name.as_deref(),
        payload.city.as_deref(),
    )
    .await?;

    let token = JwtKeys::from_ref(&state).sign(&user.phone)?;
    info!(user_id = %user.id, phone = %user.phone, "user registered");
    Ok(Json(AuthResponse {
        token,
        user: PublicUser::from(&user),
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let phone = normalize_phone(&payload.phone);

    // Unknown phone and wrong password fail identically
    let user = User::find_by_phone(&state.db, &phone)
        .await?
        .ok_or(ApiError::AuthFailure)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(phone = %phone, "login failed");
        return Err(ApiError::AuthFailure);
    }

    let token = JwtKeys::from_ref(&state).sign(&user.phone)?;
    info!(user_id = %user.id, phone = %user.phone, "user logged in");
    Ok(Json(AuthResponse {
        token,
        user: PublicUser::from(&user),
    }))
}

/// No re-auth before the overwrite: the one-time code step is the only
/// gate in front of this flow.
#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<Ack>, ApiError> {
    check_password_len(&payload.password)?;
    let phone = normalize_phone(&payload.phone);

    let hash = hash_password(&payload.password)?;
    if !User::set_password_by_phone(&state.db, &phone, &hash).await? {
        return Err(ApiError::NotFound("user"));
    }

    info!(phone = %phone, "password reset");
    Ok(Json(Ack::new("password reset")))
}

#[instrument(skip(state, payload, user))]
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<Ack>, ApiError> {
    check_password_len(&payload.new_password)?;

    if !verify_password(&payload.current_password, &user.password_hash)? {
        warn!(user_id = %user.id, "change password: current password mismatch");
        return Err(ApiError::AuthFailure);
    }

    let hash = hash_password(&payload.new_password)?;
    User::set_password_by_id(&state.db, user.id, &hash).await?;

    info!(user_id = %user.id, "password changed");
    Ok(Json(Ack::new("password changed")))
}

#[instrument(skip(user))]
pub async fn get_profile(CurrentUser(user): CurrentUser) -> Json<ProfileResponse> {
    Json(ProfileResponse::from(&user))
}

#[instrument(skip(state, payload, user))]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<ProfileUpdateRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let updated = User::update_profile(
        &state.db,
        user.id,
        payload.name.as_deref(),
        payload.surname.as_deref(),
        payload.email.as_deref(),
        payload.city.as_deref(),
    )
    .await?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(ProfileResponse::from(&updated)))
}
