use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::guards::{
    RequireReportCreator, RequireReportEditor, RequireReportViewer,
};
use crate::features::reports::dtos::{ReportFilterOptionsDto, ReportResponseDto, SaveReportDto};
use crate::features::reports::export::{export_filename, ExportSheet, XLSX_CONTENT_TYPE};
use crate::features::reports::filter::ReportFilterParams;
use crate::features::reports::services::ReportService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// List reports with filters and pagination
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ReportFilterParams, PaginationQuery),
    responses(
        (status = 200, description = "Reports retrieved successfully", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "reports",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_reports(
    RequireReportViewer(_user): RequireReportViewer,
    State(service): State<Arc<ReportService>>,
    AppQuery(filter): AppQuery<ReportFilterParams>,
    AppQuery(pagination): AppQuery<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let (reports, total) = service.list(&filter, &pagination).await?;
    let items = reports.into_iter().map(ReportResponseDto::from).collect();

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta::paginated(&pagination, total)),
    )))
}

/// Distinct divisions and sites plus the fixed choice lists for the report form
#[utoipa::path(
    get,
    path = "/api/reports/filter-options",
    responses(
        (status = 200, description = "Filter options retrieved successfully", body = ApiResponse<ReportFilterOptionsDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "reports",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_filter_options(
    RequireReportViewer(_user): RequireReportViewer,
    State(service): State<Arc<ReportService>>,
) -> Result<Json<ApiResponse<ReportFilterOptionsDto>>> {
    let options = service.filter_options().await?;
    Ok(Json(ApiResponse::success(Some(options), None, None)))
}

/// Download the filtered reports as an XLSX workbook
#[utoipa::path(
    get,
    path = "/api/reports/export",
    params(ReportFilterParams),
    responses(
        (status = 200, description = "Spreadsheet attachment", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "reports",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn export_reports(
    RequireReportViewer(user): RequireReportViewer,
    State(service): State<Arc<ReportService>>,
    AppQuery(filter): AppQuery<ReportFilterParams>,
) -> Result<impl IntoResponse> {
    let reports = service.list_all(&filter).await?;
    let bytes = ExportSheet::from_reports(&reports).to_xlsx()?;
    let filename = export_filename(&chrono::Local::now());

    tracing::info!(
        "User {} exported {} reports to {}",
        user.username,
        reports.len(),
        filename
    );

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    ))
}

#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report retrieved successfully", body = ApiResponse<ReportResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_report(
    RequireReportViewer(_user): RequireReportViewer,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Submit a new TOFS card; the card number is assigned by the server
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = SaveReportDto,
    responses(
        (status = 201, description = "Report created successfully", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "reports",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_report(
    RequireReportCreator(user): RequireReportCreator,
    State(service): State<Arc<ReportService>>,
    AppJson(dto): AppJson<SaveReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = service.create(&user, dto.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some("Report created successfully".to_string()),
            None,
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/api/reports/{id}",
    params(("id" = Uuid, Path, description = "Report ID")),
    request_body = SaveReportDto,
    responses(
        (status = 200, description = "Report updated successfully", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin or super admin only"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_report(
    RequireReportEditor(_editor): RequireReportEditor,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<SaveReportDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = service.update(id, dto.into()).await?;
    Ok(Json(ApiResponse::success(
        Some(report.into()),
        Some("Report updated successfully".to_string()),
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/reports/{id}",
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report deleted successfully"),
        (status = 403, description = "Admin or super admin only"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_report(
    RequireReportEditor(editor): RequireReportEditor,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id, &editor).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Report deleted successfully".to_string()),
        None,
    )))
}
