use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo::{User, UserRole};

#[derive(Debug, Deserialize)]
pub struct PhoneRequest {
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    pub phone: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub phone: String,
    pub password: String,
    pub name: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Partial profile update. Only the fields present in the payload are
/// applied; unknown JSON keys are dropped by serde, not errors.
#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
    pub message: String,
}

impl Ack {
    pub fn new(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub phone: String,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub city: Option<String>,
    pub role: UserRole,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            phone: u.phone.clone(),
            name: u.name.clone(),
            surname: u.surname.clone(),
            city: u.city.clone(),
            role: u.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub phone: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub role: UserRole,
    pub created_at: OffsetDateTime,
}

impl From<&User> for ProfileResponse {
    fn from(u: &User) -> Self {
        let (first_name, last_name) = match u.name.as_deref() {
            Some(name) => {
                let (first, last) = split_name(name);
                (Some(first), last)
            }
            None => (None, None),
        };
        Self {
            id: u.id,
            phone: u.phone.clone(),
            first_name,
            last_name,
            surname: u.surname.clone(),
            email: u.email.clone(),
            city: u.city.clone(),
            role: u.role,
            created_at: u.created_at,
        }
    }
}

/// Splits a stored name on the first space. Lossy for multi-part names;
/// everything after the first space lands in the last name.
fn split_name(name: &str) -> (String, Option<String>) {
    match name.split_once(' ') {
        Some((first, last)) => (first.to_string(), Some(last.to_string())),
        None => (name.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_name_on_first_space() {
        assert_eq!(
            split_name("Ivan Petrov"),
            ("Ivan".to_string(), Some("Petrov".to_string()))
        );
    }

    #[test]
    fn split_name_keeps_tail_together() {
        assert_eq!(
            split_name("Anna Maria Ivanova"),
            ("Anna".to_string(), Some("Maria Ivanova".to_string()))
        );
    }

    #[test]
    fn split_name_without_space() {
        assert_eq!(split_name("Ivan"), ("Ivan".to_string(), None));
    }

    #[test]
    fn profile_update_ignores_unknown_keys() {
        let req: ProfileUpdateRequest =
            serde_json::from_str(r#"{"name": "Ivan", "hobby": "chess"}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("Ivan"));
        assert!(req.surname.is_none());
    }

    #[test]
    fn ack_serializes_success_flag() {
        let json = serde_json::to_value(Ack::new("ok")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "ok");
    }
}
