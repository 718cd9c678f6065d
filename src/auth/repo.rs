use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum UserRole {
    Customer,
    Performer,
}

/// User record. The canonical phone is the unique lookup key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub role: UserRole,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const USER_COLUMNS: &str =
    "id, phone, password_hash, name, surname, email, city, role, created_at, updated_at";

impl User {
    pub async fn find_by_phone(db: &PgPool, phone: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE phone = $1"
        ))
        .bind(phone)
        .fetch_optional(db)
        .await
    }

    /// Inserts a new user; the unique constraint on `phone` is the real
    /// duplicate guard, the handler pre-check only improves the message.
    pub async fn create(
        db: &PgPool,
        phone: &str,
        password_hash: &str,
        name: Option<&str>,
        city: Option<&str>,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (phone, password_hash, name, city)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(phone)
        .bind(password_hash)
        .bind(name)
        .bind(city)
        .fetch_one(db)
        .await
    }

    /// Unconditional overwrite, used by the reset-password flow. Returns
    /// whether any row matched.
    pub async fn set_password_by_phone(
        db: &PgPool,
        phone: &str,
        password_hash: &str,
    ) -> sqlx::Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = now() WHERE phone = $1",
        )
        .bind(phone)
        .bind(password_hash)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_password_by_id(
        db: &PgPool,
        user_id: Uuid,
        password_hash: &str,
    ) -> sqlx::Result<()> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1")
            .bind(user_id)
            .bind(password_hash)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Applies only the fields present in the update; absent fields keep
    /// their stored value.
    pub async fn update_profile(
        db: &PgPool,
        user_id: Uuid,
        name: Option<&str>,
        surname: Option<&str>,
        email: Option<&str>,
        city: Option<&str>,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET
                 name = COALESCE($2, name),
                 surname = COALESCE($3, surname),
                 email = COALESCE($4, email),
                 city = COALESCE($5, city),
                 updated_at = now()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(name)
        .bind(surname)
        .bind(email)
        .bind(city)
        .fetch_one(db)
        .await
    }
}
