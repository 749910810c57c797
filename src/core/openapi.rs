use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::dashboard::{
    dtos as dashboard_dtos, handlers as dashboard_handlers, period as dashboard_period,
};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::features::users::{dtos as users_dtos, handlers::user_handler, models as users_models};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::logout,
        auth::handlers::get_me,
        // Users
        user_handler::list_users,
        user_handler::create_user,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::delete_user,
        user_handler::update_profile,
        // Reports
        reports_handlers::list_reports,
        reports_handlers::get_filter_options,
        reports_handlers::export_reports,
        reports_handlers::get_report,
        reports_handlers::create_report,
        reports_handlers::update_report,
        reports_handlers::delete_report,
        // Dashboard
        dashboard_handlers::get_dashboard,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::dtos::RegisterRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::AuthResponseDto,
            ApiResponse<auth::dtos::AuthResponseDto>,
            // Users
            users_models::UserRole,
            users_dtos::CreateUserDto,
            users_dtos::UpdateUserDto,
            users_dtos::UpdateProfileDto,
            users_dtos::UserResponseDto,
            ApiResponse<users_dtos::UserResponseDto>,
            ApiResponse<Vec<users_dtos::UserResponseDto>>,
            // Reports
            reports_models::ReportStatus,
            reports_models::ClsrCategory,
            reports_models::MandatoryBehavior,
            reports_dtos::SaveReportDto,
            reports_dtos::ReportResponseDto,
            reports_dtos::ReportFilterOptionsDto,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<reports_dtos::ReportFilterOptionsDto>,
            // Dashboard
            dashboard_period::Period,
            dashboard_period::PeriodScope,
            dashboard_dtos::CountEntry,
            dashboard_dtos::DashboardSelectionDto,
            dashboard_dtos::DashboardFilterOptionsDto,
            dashboard_dtos::DashboardResponseDto,
            ApiResponse<dashboard_dtos::DashboardResponseDto>,
        )
    ),
    tags(
        (name = "auth", description = "Login, registration and the current session"),
        (name = "users", description = "User accounts (super admin) and own profile"),
        (name = "reports", description = "TOFS observation cards, filtering and XLSX export"),
        (name = "dashboard", description = "Aggregated counts and monthly trend"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "TOFS API",
        version = "0.1.0",
        description = "API documentation for the TOFS safety observation service",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
