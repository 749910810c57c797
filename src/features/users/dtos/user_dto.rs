use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::users::models::{User, UserRole, UserWithReportCount};
use crate::shared::validation::USERNAME_REGEX;

/// Request DTO for adding a user account
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(custom(function = "crate::shared::validation::not_blank"))]
    #[validate(length(max = 100, message = "Full name must be at most 100 characters"))]
    pub full_name: String,

    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    #[validate(regex(
        path = *USERNAME_REGEX,
        message = "Username may only contain letters, digits, dots and underscores"
    ))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 100, message = "Email must be at most 100 characters"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[serde(default)]
    pub role: UserRole,

    #[validate(length(max = 100, message = "Work location must be at most 100 characters"))]
    pub work_location: Option<String>,
}

/// Request DTO for editing a user account.
///
/// All fields are overwritten. An empty or missing password keeps the current one.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(custom(function = "crate::shared::validation::not_blank"))]
    #[validate(length(max = 100, message = "Full name must be at most 100 characters"))]
    pub full_name: String,

    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    #[validate(regex(
        path = *USERNAME_REGEX,
        message = "Username may only contain letters, digits, dots and underscores"
    ))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 100, message = "Email must be at most 100 characters"))]
    pub email: String,

    pub role: UserRole,

    #[validate(length(max = 100, message = "Work location must be at most 100 characters"))]
    pub work_location: Option<String>,

    pub password: Option<String>,
}

/// Request DTO for editing the caller's own profile
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(custom(function = "crate::shared::validation::not_blank"))]
    #[validate(length(max = 100, message = "Full name must be at most 100 characters"))]
    pub full_name: String,

    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 100, message = "Email must be at most 100 characters"))]
    pub email: String,

    #[validate(length(max = 100, message = "Work location must be at most 100 characters"))]
    pub work_location: Option<String>,

    pub password: Option<String>,
}

/// Query params for listing users (combine with `PaginationQuery`)
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct UserQueryParams {
    /// Case-insensitive search over full name, username and email
    pub q: Option<String>,
}

/// Response DTO for user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponseDto {
    pub id: Uuid,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub work_location: Option<String>,
    /// Number of TOFS cards the user submitted, present in listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_count: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponseDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            full_name: u.full_name,
            username: u.username,
            email: u.email,
            role: u.role,
            work_location: u.work_location,
            report_count: None,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

impl From<UserWithReportCount> for UserResponseDto {
    fn from(row: UserWithReportCount) -> Self {
        Self {
            report_count: Some(row.report_count),
            ..Self::from(row.user)
        }
    }
}
