use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;

/// Create routes for the reports feature.
///
/// Every route requires the auth middleware, applied by the caller. Editing
/// and deleting additionally require the admin or super admin role.
pub fn routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_reports).post(handlers::create_report),
        )
        .route(
            "/api/reports/filter-options",
            get(handlers::get_filter_options),
        )
        .route("/api/reports/export", get(handlers::export_reports))
        .route(
            "/api/reports/{id}",
            get(handlers::get_report)
                .put(handlers::update_report)
                .delete(handlers::delete_report),
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
    use serde_json::json;
    use uuid::Uuid;

    fn server(role: UserRole) -> TestServer {
        let app = with_user(
            routes(Arc::new(ReportService::new(lazy_pool()))),
            test_user(role),
        );
        TestServer::new(app).unwrap()
    }

    fn report_body() -> serde_json::Value {
        json!({
            "name": "Budi Santoso",
            "division": "HSE",
            "site": "BRAVO",
            "sub_location": "Workshop",
            "date": "2025-05-20",
            "issue_description": "Ladder without safety feet",
            "status": "Open"
        })
    }

    #[tokio::test]
    async fn test_pengguna_cannot_edit_reports() {
        server(UserRole::Pengguna)
            .put(&format!("/api/reports/{}", Uuid::new_v4()))
            .json(&report_body())
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_pengguna_cannot_delete_reports() {
        server(UserRole::Pengguna)
            .delete(&format!("/api/reports/{}", Uuid::new_v4()))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_required_fields() {
        let mut body = report_body();
        body["issue_description"] = json!("  ");
        server(UserRole::Pengguna)
            .post("/api/reports")
            .json(&body)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_anonymous_request_is_unauthorized() {
        let app = routes(Arc::new(ReportService::new(lazy_pool())));
        TestServer::new(app)
            .unwrap()
            .get("/api/reports")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
