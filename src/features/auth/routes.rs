use crate::features::auth::handlers;
use crate::features::auth::services::AuthService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Public auth routes (no authentication required)
pub fn public_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/login", post(handlers::login))
        .with_state(service)
}

/// Protected auth routes (require JWT authentication)
pub fn protected_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/logout", post(handlers::logout))
        .route("/api/auth/me", get(handlers::get_me))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::services::TokenService;
    use crate::features::users::models::UserRole;
    use crate::features::users::services::UserService;
    use crate::shared::test_helpers::{lazy_pool, test_user, with_user};
    use crate::core::config::AuthConfig;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use std::time::Duration;

    fn service() -> Arc<AuthService> {
        let config = AuthConfig {
            jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
            issuer: "tofs-test".to_string(),
            token_ttl: Duration::from_secs(60),
            jwt_leeway: Duration::from_secs(0),
        };
        Arc::new(AuthService::new(
            Arc::new(UserService::new(lazy_pool())),
            Arc::new(TokenService::new(&config)),
        ))
    }

    #[tokio::test]
    async fn test_login_requires_username_and_password() {
        let server = TestServer::new(public_routes(service())).unwrap();
        server
            .post("/api/auth/login")
            .json(&serde_json::json!({ "username": "", "password": "" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_logout_is_stateless() {
        let app = with_user(protected_routes(service()), test_user(UserRole::Pengguna));
        let server = TestServer::new(app).unwrap();

        let response = server.post("/api/auth/logout").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_protected_routes_reject_anonymous() {
        let server = TestServer::new(protected_routes(service())).unwrap();
        server
            .post("/api/auth/logout")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
