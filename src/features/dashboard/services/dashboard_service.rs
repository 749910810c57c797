use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::core::database::map_db_error;
use crate::core::error::Result;
use crate::features::dashboard::dtos::{
    DashboardFilterOptionsDto, DashboardQueryParams, DashboardResponseDto, DashboardSelectionDto,
};
use crate::features::dashboard::period::{parse_month, parse_year, Period, PeriodScope, MONTH_NAMES};
use crate::features::dashboard::services::aggregation::{aggregate, DashboardRow};
use crate::features::reports::models::ReportStatus;
use crate::shared::search::{non_blank, Conditions};

/// Dashboard filter value, `None` when blank or `All`
fn selected(value: Option<&str>) -> Option<&str> {
    non_blank(value).filter(|v| !v.eq_ignore_ascii_case("all"))
}

/// Normalised dashboard filters
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardFilter {
    pub site: Option<String>,
    pub division: Option<String>,
    pub status: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub period: Period,
}

impl DashboardFilter {
    pub fn from_params(params: &DashboardQueryParams) -> Self {
        Self {
            site: selected(params.site.as_deref()).map(String::from),
            division: selected(params.division.as_deref()).map(String::from),
            status: selected(params.status.as_deref()).map(String::from),
            year: selected(params.year.as_deref()).and_then(parse_year),
            month: selected(params.month.as_deref()).and_then(parse_month),
            period: Period::parse(params.period.as_deref()),
        }
    }

    /// Append the WHERE clause; `period_start` also cuts rows when given
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>, period_start: Option<NaiveDate>) {
        let mut conditions = Conditions::new(qb);

        if let Some(site) = &self.site {
            conditions.next().push("site = ").push_bind(site.clone());
        }

        if let Some(division) = &self.division {
            conditions
                .next()
                .push("division = ")
                .push_bind(division.clone());
        }

        if let Some(status) = &self.status {
            match status.parse::<ReportStatus>() {
                Ok(status) => {
                    conditions.next().push("status = ").push_bind(status);
                }
                Err(_) => {
                    conditions.next().push("FALSE");
                }
            }
        }

        if let Some(year) = self.year {
            conditions
                .next()
                .push("EXTRACT(YEAR FROM date)::INTEGER = ")
                .push_bind(year);
        }

        if let Some(month) = self.month {
            conditions
                .next()
                .push("EXTRACT(MONTH FROM date)::INTEGER = ")
                .push_bind(month as i32);
        }

        if let Some(start) = period_start {
            conditions.next().push("date >= ").push_bind(start);
        }
    }
}

/// Service for the dashboard charts
pub struct DashboardService {
    pool: PgPool,
    period_scope: PeriodScope,
}

impl DashboardService {
    pub fn new(pool: PgPool, period_scope: PeriodScope) -> Self {
        Self { pool, period_scope }
    }

    pub async fn get_dashboard(
        &self,
        params: &DashboardQueryParams,
        today: NaiveDate,
    ) -> Result<DashboardResponseDto> {
        let filter = DashboardFilter::from_params(params);
        let period_start = filter.period.start(today);

        let query_start = match self.period_scope {
            PeriodScope::WholeQuery => Some(period_start),
            PeriodScope::TrendOnly => None,
        };

        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT site, status, name, clsr_category, date FROM tofs_reports",
        );
        filter.push_where(&mut qb, query_start);
        qb.push(" ORDER BY date DESC, created_at DESC");

        let rows: Vec<DashboardRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        let agg = aggregate(&rows, period_start);
        let options = self.filter_options().await?;

        tracing::debug!(
            "Dashboard aggregated {} reports ({:?}, scope {:?})",
            agg.total,
            filter.period,
            self.period_scope
        );

        Ok(DashboardResponseDto {
            total: agg.total,
            by_site: agg.by_site,
            by_status: agg.by_status,
            by_submitter: agg.by_submitter,
            by_clsr: agg.by_clsr,
            monthly_trend: agg.monthly_trend,
            filters: DashboardSelectionDto {
                site: filter.site,
                division: filter.division,
                status: filter.status,
                year: filter.year,
                month: filter.month,
                period: filter.period,
                period_start,
                period_scope: self.period_scope,
            },
            options,
        })
    }

    pub async fn filter_options(&self) -> Result<DashboardFilterOptionsDto> {
        let sites: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT site FROM tofs_reports ORDER BY site")
                .fetch_all(&self.pool)
                .await
                .map_err(map_db_error)?;

        let divisions: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT division FROM tofs_reports ORDER BY division")
                .fetch_all(&self.pool)
                .await
                .map_err(map_db_error)?;

        let years: Vec<i32> = sqlx::query_scalar(
            "SELECT DISTINCT EXTRACT(YEAR FROM date)::INTEGER AS year FROM tofs_reports ORDER BY year DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(DashboardFilterOptionsDto {
            sites,
            divisions,
            statuses: ReportStatus::ALL.to_vec(),
            years,
            months: MONTH_NAMES.iter().map(|m| m.to_string()).collect(),
        })
    }
}
