use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::users::dtos::UserResponseDto;
use crate::shared::validation::USERNAME_REGEX;

/// Request DTO for self-registration. New accounts get the "pengguna" role.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
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

    #[validate(length(max = 100, message = "Work location must be at most 100 characters"))]
    pub work_location: Option<String>,
}

/// Request DTO for user login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response DTO for authentication (register/login)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponseDto {
    /// Signed access token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiry time in seconds
    pub expires_in: i64,
    pub user: UserResponseDto,
}

impl AuthResponseDto {
    pub fn bearer(access_token: String, expires_in: i64, user: UserResponseDto) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
            user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(email: String) -> RegisterRequestDto {
        RegisterRequestDto {
            full_name: "Siti Aminah".to_string(),
            username: "siti.aminah".to_string(),
            email,
            password: "rahasia-123".to_string(),
            work_location: None,
        }
    }

    #[test]
    fn test_register_accepts_regular_email() {
        assert!(register("siti@example.com".to_string()).validate().is_ok());
    }

    #[test]
    fn test_register_rejects_email_longer_than_column() {
        let email = format!("{}@example.com", "a".repeat(90));
        assert!(email.len() > 100);

        let errors = register(email).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }
}
