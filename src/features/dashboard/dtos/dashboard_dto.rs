use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::dashboard::period::{Period, PeriodScope};
use crate::features::reports::models::ReportStatus;

/// Query params for the dashboard. `All` or an empty value means no filter.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct DashboardQueryParams {
    /// Exact site
    pub site: Option<String>,
    /// Exact division
    pub division: Option<String>,
    /// `Open` or `Closed`
    pub status: Option<String>,
    /// Observation year, digits only
    pub year: Option<String>,
    /// Indonesian month name (`Januari`..`Desember`) or `1`..`12`
    pub month: Option<String>,
    /// `6_months`, `year_to_date`, `3_years` or `1_year` (default)
    pub period: Option<String>,
}

/// One bar or slice of a chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CountEntry {
    pub label: String,
    pub count: i64,
}

/// The filters actually applied, after normalisation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardSelectionDto {
    pub site: Option<String>,
    pub division: Option<String>,
    pub status: Option<String>,
    pub year: Option<i32>,
    /// Month number, 1 = January
    pub month: Option<u32>,
    pub period: Period,
    pub period_start: NaiveDate,
    pub period_scope: PeriodScope,
}

/// Values for the dashboard filter form
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardFilterOptionsDto {
    pub sites: Vec<String>,
    pub divisions: Vec<String>,
    pub statuses: Vec<ReportStatus>,
    /// Years with at least one report, newest first
    pub years: Vec<i32>,
    /// Indonesian month names, January first
    pub months: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponseDto {
    pub total: i64,
    pub by_site: Vec<CountEntry>,
    pub by_status: Vec<CountEntry>,
    pub by_submitter: Vec<CountEntry>,
    /// Most frequent first, `Unknown` for reports without a category
    pub by_clsr: Vec<CountEntry>,
    /// `Mon YYYY` buckets, oldest first
    pub monthly_trend: Vec<CountEntry>,
    pub filters: DashboardSelectionDto,
    pub options: DashboardFilterOptionsDto,
}
