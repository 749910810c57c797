use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::auth::guards::RequireReportViewer;
use crate::features::dashboard::dtos::{DashboardQueryParams, DashboardResponseDto};
use crate::features::dashboard::services::DashboardService;
use crate::shared::types::ApiResponse;
use axum::{extract::State, Json};
use std::sync::Arc;

/// Chart data for the dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    params(DashboardQueryParams),
    responses(
        (status = 200, description = "Dashboard retrieved successfully", body = ApiResponse<DashboardResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "dashboard",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_dashboard(
    RequireReportViewer(_user): RequireReportViewer,
    State(service): State<Arc<DashboardService>>,
    AppQuery(params): AppQuery<DashboardQueryParams>,
) -> Result<Json<ApiResponse<DashboardResponseDto>>> {
    let today = chrono::Local::now().date_naive();
    let dashboard = service.get_dashboard(&params, today).await?;
    Ok(Json(ApiResponse::success(Some(dashboard), None, None)))
}
