use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::users::models::{User, UserRole};

/// Operations gated by role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ViewReports,
    CreateReports,
    EditReports,
    DeleteReports,
    ManageUsers,
}

impl UserRole {
    /// Flat permission table, roles do not inherit from each other
    pub fn permits(&self, permission: Permission) -> bool {
        use Permission::*;

        match self {
            UserRole::SuperAdmin => matches!(
                permission,
                ViewReports | CreateReports | EditReports | DeleteReports | ManageUsers
            ),
            UserRole::Admin => matches!(
                permission,
                ViewReports | CreateReports | EditReports | DeleteReports
            ),
            UserRole::Pengguna => matches!(permission, ViewReports | CreateReports),
        }
    }
}

/// Request-scoped identity, inserted by the auth middleware
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn can(&self, permission: Permission) -> bool {
        self.role.permits(permission)
    }
}

/// JWT claims issued by [`TokenService`](crate::features::auth::services::TokenService)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub role: UserRole,
    pub iss: String,
    pub iat: u64,
    pub exp: u64,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            role: claims.role,
        }
    }
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}
