use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// User role enum matching database enum
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema,
)]
#[sqlx(type_name = "user_role")]
pub enum UserRole {
    #[sqlx(rename = "super admin")]
    #[serde(rename = "super admin")]
    SuperAdmin,
    #[sqlx(rename = "admin")]
    #[serde(rename = "admin")]
    Admin,
    #[default]
    #[sqlx(rename = "pengguna")]
    #[serde(rename = "pengguna")]
    Pengguna,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "super admin",
            UserRole::Admin => "admin",
            UserRole::Pengguna => "pengguna",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database model for user
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub work_location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User row joined with the number of reports they submitted
#[derive(Debug, Clone, FromRow)]
pub struct UserWithReportCount {
    #[sqlx(flatten)]
    pub user: User,
    pub report_count: i64,
}

/// Data for creating a new user; the password is already hashed
#[derive(Debug)]
pub struct CreateUser {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub work_location: Option<String>,
}

/// Full overwrite of a user's editable fields
#[derive(Debug)]
pub struct UpdateUser {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub work_location: Option<String>,
    /// New hash, `None` keeps the current password
    pub password_hash: Option<String>,
}
