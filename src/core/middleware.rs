use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::JwtValidator;
use crate::features::users::services::UserService;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::prelude::*;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Custom MakeSpan that includes request_id in the tracing span
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

pub fn cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([header::CONTENT_DISPOSITION]);

    // If origins list contains "*", allow any origin
    if allowed_origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn basic_auth_middleware(
    valid_credentials: Arc<String>,
) -> impl Fn(
    Request,
    Next,
)
    -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, Response>> + Send>>
       + Clone {
    move |req: Request, next: Next| {
        let credentials = valid_credentials.clone();
        Box::pin(async move {
            let auth_header = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|header| header.to_str().ok());

            if let Some(encoded) = auth_header.and_then(|h| h.strip_prefix("Basic ")) {
                let decoded = BASE64_STANDARD
                    .decode(encoded)
                    .ok()
                    .and_then(|bytes| String::from_utf8(bytes).ok());
                if decoded.as_deref() == Some(credentials.as_str()) {
                    return Ok(next.run(req).await);
                }
            }

            Err((
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Basic realm=\"Swagger UI\"")],
                "Unauthorized",
            )
                .into_response())
        })
    }
}

/// State for [`auth_middleware`]
#[derive(Clone)]
pub struct AuthState {
    pub validator: Arc<JwtValidator>,
    pub users: Arc<UserService>,
}

/// Validate the bearer token, then reload the account so role changes and
/// deletions apply to tokens issued earlier.
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Invalid authorization header format".to_string())
    })?;

    let claimed = auth.validator.validate_token(token)?;

    let user = match auth.users.get_by_id(claimed.user_id).await {
        Ok(user) => AuthenticatedUser::from(user),
        Err(AppError::NotFound(_)) => {
            tracing::warn!("Rejected token of deleted user {}", claimed.username);
            return Err(AppError::Unauthorized("Account no longer exists".to_string()));
        }
        Err(e) => return Err(e),
    };

    if user.role != claimed.role {
        tracing::debug!(
            "Role of {} changed since login ({} -> {})",
            user.username,
            claimed.role,
            user.role
        );
    }

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Fallback for unknown routes
pub async fn not_found() -> AppError {
    AppError::NotFound("The page you are looking for was not found.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::services::TokenService;
    use crate::features::reports::{routes as reports_routes, ReportService};
    use crate::features::users::dtos::UpdateUserDto;
    use crate::features::users::models::{User, UserRole};
    use crate::shared::test_helpers::{
        lazy_pool, stored_user, test_auth_config, test_pool, test_user,
    };
    use axum::Router;
    use axum_test::TestServer;
    use sqlx::PgPool;

    fn app(pool: PgPool) -> Router {
        let state = AuthState {
            validator: Arc::new(JwtValidator::new(&test_auth_config())),
            users: Arc::new(UserService::new(pool.clone())),
        };
        reports_routes::routes(Arc::new(ReportService::new(pool)))
            .route_layer(axum::middleware::from_fn_with_state(state, auth_middleware))
    }

    fn token_for(user: &User) -> String {
        TokenService::new(&test_auth_config())
            .create_token(user)
            .unwrap()
            .access_token
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        TestServer::new(app(lazy_pool()))
            .unwrap()
            .get("/api/reports")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_is_unauthorized() {
        TestServer::new(app(lazy_pool()))
            .unwrap()
            .get("/api/reports")
            .add_header(header::AUTHORIZATION, HeaderValue::from_static("Basic YTpi"))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_token_is_rejected_before_user_lookup() {
        TestServer::new(app(lazy_pool()))
            .unwrap()
            .get("/api/reports")
            .authorization_bearer("not-a-jwt")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_role_change_applies_to_issued_token() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let users = UserService::new(pool.clone());
        let admin = stored_user(&users, UserRole::Admin).await;
        let token = token_for(&admin);
        let server = TestServer::new(app(pool)).unwrap();
        let url = format!("/api/reports/{}", Uuid::new_v4());

        // admin passes the editor guard and reaches the lookup
        server
            .delete(&url)
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::NOT_FOUND);

        users
            .update(
                admin.id,
                UpdateUserDto {
                    full_name: admin.full_name.clone(),
                    username: admin.username.clone(),
                    email: admin.email.clone(),
                    role: UserRole::Pengguna,
                    work_location: None,
                    password: None,
                },
            )
            .await
            .unwrap();

        server
            .delete(&url)
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_deleted_user_token_is_unauthorized() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let users = UserService::new(pool.clone());
        let member = stored_user(&users, UserRole::Pengguna).await;
        let token = token_for(&member);
        let server = TestServer::new(app(pool)).unwrap();

        server
            .get("/api/reports")
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        users
            .delete(&test_user(UserRole::SuperAdmin), member.id)
            .await
            .unwrap();

        server
            .get("/api/reports")
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
