//! Role-based authorization guards for the application.
//!
//! These guards extract the authenticated user and verify the role grants the
//! permission the handler needs. Roles are a flat set:
//! - pengguna: view and create reports
//! - admin: additionally edit and delete reports
//! - super admin: additionally manage user accounts
//!
//! Handlers outside the role table, such as logout or the own profile, take
//! [`AuthenticatedUser`] directly.

use crate::core::error::AppError;
use crate::features::auth::model::{AuthenticatedUser, Permission};
use axum::{extract::FromRequestParts, http::request::Parts};

fn require(parts: &Parts, permissions: &[Permission]) -> Result<AuthenticatedUser, AppError> {
    let user = parts
        .extensions
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

    if !permissions.iter().all(|p| user.can(*p)) {
        tracing::warn!(
            "Access denied for user {} (role: {}) to {:?}",
            user.username,
            user.role,
            permissions
        );
        return Err(AppError::Forbidden(
            "You do not have access to this resource".to_string(),
        ));
    }

    Ok(user.clone())
}

/// Guard for reading reports, the export and the dashboard.
///
/// Allows every role.
pub struct RequireReportViewer(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireReportViewer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        require(parts, &[Permission::ViewReports]).map(RequireReportViewer)
    }
}

/// Guard for submitting new reports.
///
/// Allows every role.
pub struct RequireReportCreator(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireReportCreator
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        require(parts, &[Permission::CreateReports]).map(RequireReportCreator)
    }
}

/// Guard for report edit/delete operations.
///
/// Allows "admin" and "super admin".
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireReportEditor(user): RequireReportEditor) { ... }
/// ```
pub struct RequireReportEditor(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireReportEditor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        require(parts, &[Permission::EditReports, Permission::DeleteReports])
            .map(RequireReportEditor)
    }
}

/// Guard for user management.
///
/// Only allows "super admin".
pub struct RequireSuperAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireSuperAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        require(parts, &[Permission::ManageUsers]).map(RequireSuperAdmin)
    }
}
