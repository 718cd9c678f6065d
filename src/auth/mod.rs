use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod jwt;
mod password;
pub mod phone;
pub mod repo;
pub mod sms;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
