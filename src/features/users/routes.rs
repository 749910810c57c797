use crate::features::users::handlers::user_handler;
use crate::features::users::services::UserService;
use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/users/me", put(user_handler::update_profile))
        .route(
            "/api/users",
            get(user_handler::list_users).post(user_handler::create_user),
        )
        .route(
            "/api/users/{id}",
            get(user_handler::get_user)
                .put(user_handler::update_user)
                .delete(user_handler::delete_user),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::UserRole;
    use crate::shared::test_helpers::{lazy_pool, test_user, with_user};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use uuid::Uuid;

    fn server(role: UserRole) -> (TestServer, Uuid) {
        let user = test_user(role);
        let id = user.user_id;
        let app = with_user(routes(Arc::new(UserService::new(lazy_pool()))), user);
        (TestServer::new(app).unwrap(), id)
    }

    #[tokio::test]
    async fn test_pengguna_cannot_list_users() {
        let (server, _) = server(UserRole::Pengguna);
        server
            .get("/api/users")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_cannot_delete_users() {
        let (server, _) = server(UserRole::Admin);
        server
            .delete(&format!("/api/users/{}", Uuid::new_v4()))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_super_admin_cannot_delete_self() {
        let (server, id) = server(UserRole::SuperAdmin);
        let response = server.delete(&format!("/api/users/{}", id)).await;
        response.assert_status(StatusCode::FORBIDDEN);

        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "You cannot delete your own account");
    }

    #[tokio::test]
    async fn test_create_user_validates_before_touching_database() {
        let (server, _) = server(UserRole::SuperAdmin);
        server
            .post("/api/users")
            .json(&serde_json::json!({
                "full_name": "",
                "username": "x",
                "email": "nope",
                "password": "123"
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
