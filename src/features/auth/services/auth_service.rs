use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AuthResponseDto, LoginRequestDto, RegisterRequestDto};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::password::{hash_password, verify_password};
use crate::features::auth::services::token_service::TokenService;
use crate::features::users::dtos::UserResponseDto;
use crate::features::users::models::{CreateUser, User, UserRole};
use crate::features::users::services::UserService;
use std::sync::Arc;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Service for authentication operations (register, login)
pub struct AuthService {
    user_service: Arc<UserService>,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(user_service: Arc<UserService>, token_service: Arc<TokenService>) -> Self {
        Self {
            user_service,
            token_service,
        }
    }

    /// Register a new "pengguna" account and sign it in
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthResponseDto> {
        if self
            .user_service
            .find_by_username(&dto.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }

        let user = self
            .user_service
            .insert(CreateUser {
                full_name: dto.full_name,
                username: dto.username,
                email: dto.email,
                password_hash: hash_password(&dto.password)?,
                role: UserRole::Pengguna,
                work_location: dto.work_location,
            })
            .await?;

        self.issue(user)
    }

    /// Login with username and password
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let user = match self.user_service.find_by_username(&dto.username).await? {
            Some(user) if verify_password(&dto.password, &user.password_hash) => user,
            _ => {
                tracing::warn!("Failed login attempt for username {}", dto.username);
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        tracing::info!("User {} logged in", user.username);
        self.issue(user)
    }

    /// Current account, read fresh from the database
    pub async fn me(&self, user: &AuthenticatedUser) -> Result<UserResponseDto> {
        match self.user_service.get_by_id(user.user_id).await {
            Ok(u) => Ok(u.into()),
            Err(AppError::NotFound(_)) => Err(AppError::Unauthorized(
                "User account no longer exists".to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    fn issue(&self, user: User) -> Result<AuthResponseDto> {
        let token = self.token_service.create_token(&user)?;
        Ok(AuthResponseDto::bearer(
            token.access_token,
            token.expires_in,
            user.into(),
        ))
    }
}
