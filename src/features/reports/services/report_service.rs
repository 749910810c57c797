use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::database::map_db_error;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::card_number::{format_card_number, next_sequence};
use crate::features::reports::dtos::ReportFilterOptionsDto;
use crate::features::reports::filter::ReportFilterParams;
use crate::features::reports::models::{
    ClsrCategory, MandatoryBehavior, Report, ReportFields, ReportStatus,
};
use crate::shared::types::PaginationQuery;

const REPORT_COLUMNS: &str = r#"
    id, card_number, name, division, site, sub_location, date, issue_description,
    follow_up, clsr_category, status, site_supervisor_ack, site_superintendent_ack,
    mandatory_behaviors, user_id, created_at, updated_at
"#;

const REPORT_ORDER: &str = " ORDER BY date DESC, created_at DESC";

/// Service for TOFS reports
pub struct ReportService {
    pool: PgPool,
}

impl ReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One page of filtered reports, newest observation first
    pub async fn list(
        &self,
        filter: &ReportFilterParams,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<Report>, i64)> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM tofs_reports");
        filter.push_where(&mut count_qb);

        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM tofs_reports",
            REPORT_COLUMNS
        ));
        filter.push_where(&mut qb);
        qb.push(REPORT_ORDER)
            .push(" LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let reports = qb
            .build_query_as::<Report>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok((reports, total))
    }

    /// Every report matching the filter, in listing order
    pub async fn list_all(&self, filter: &ReportFilterParams) -> Result<Vec<Report>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM tofs_reports",
            REPORT_COLUMNS
        ));
        filter.push_where(&mut qb);
        qb.push(REPORT_ORDER);

        qb.build_query_as::<Report>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)
    }

    pub async fn get(&self, id: Uuid) -> Result<Report> {
        let query = format!("SELECT {} FROM tofs_reports WHERE id = $1", REPORT_COLUMNS);

        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    /// Store a new report owned by `owner` under a freshly allocated card number
    pub async fn create(&self, owner: &AuthenticatedUser, fields: ReportFields) -> Result<Report> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let sequence = next_sequence(&mut tx, &fields.site).await?;
        let card_number = format_card_number(&fields.site, fields.date, sequence);

        let query = format!(
            r#"
            INSERT INTO tofs_reports (
                card_number, name, division, site, sub_location, date, issue_description,
                follow_up, clsr_category, status, site_supervisor_ack, site_superintendent_ack,
                mandatory_behaviors, user_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {}
            "#,
            REPORT_COLUMNS
        );

        let report = sqlx::query_as::<_, Report>(&query)
            .bind(&card_number)
            .bind(&fields.name)
            .bind(&fields.division)
            .bind(&fields.site)
            .bind(&fields.sub_location)
            .bind(fields.date)
            .bind(&fields.issue_description)
            .bind(&fields.follow_up)
            .bind(fields.clsr_category.map(|c| c.label()))
            .bind(fields.status)
            .bind(fields.site_supervisor_ack)
            .bind(fields.site_superintendent_ack)
            .bind(MandatoryBehavior::join(&fields.mandatory_behaviors))
            .bind(owner.user_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        tracing::info!(
            "Report {} created by {} ({})",
            report.card_number,
            owner.username,
            report.id
        );
        Ok(report)
    }

    /// Overwrite every mutable field; card number and owner stay as they are
    pub async fn update(&self, id: Uuid, fields: ReportFields) -> Result<Report> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let query = format!(
            r#"
            UPDATE tofs_reports
            SET name = $2,
                division = $3,
                site = $4,
                sub_location = $5,
                date = $6,
                issue_description = $7,
                follow_up = $8,
                clsr_category = $9,
                status = $10,
                site_supervisor_ack = $11,
                site_superintendent_ack = $12,
                mandatory_behaviors = $13,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            REPORT_COLUMNS
        );

        let report = sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .bind(&fields.name)
            .bind(&fields.division)
            .bind(&fields.site)
            .bind(&fields.sub_location)
            .bind(fields.date)
            .bind(&fields.issue_description)
            .bind(&fields.follow_up)
            .bind(fields.clsr_category.map(|c| c.label()))
            .bind(fields.status)
            .bind(fields.site_supervisor_ack)
            .bind(fields.site_superintendent_ack)
            .bind(MandatoryBehavior::join(&fields.mandatory_behaviors))
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

        tx.commit().await.map_err(map_db_error)?;

        tracing::info!("Report {} updated", report.card_number);
        Ok(report)
    }

    pub async fn delete(&self, id: Uuid, by: &AuthenticatedUser) -> Result<()> {
        let card_number: Option<String> =
            sqlx::query_scalar("DELETE FROM tofs_reports WHERE id = $1 RETURNING card_number")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_error)?;

        match card_number {
            Some(card_number) => {
                tracing::info!("Report {} deleted by {}", card_number, by.username);
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Report {} not found", id))),
        }
    }

    /// Distinct values for the listing filter form
    pub async fn filter_options(&self) -> Result<ReportFilterOptionsDto> {
        let divisions: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT division FROM tofs_reports ORDER BY division")
                .fetch_all(&self.pool)
                .await
                .map_err(map_db_error)?;

        let sites: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT site FROM tofs_reports ORDER BY site")
                .fetch_all(&self.pool)
                .await
                .map_err(map_db_error)?;

        Ok(ReportFilterOptionsDto {
            divisions,
            sites,
            statuses: ReportStatus::ALL.to_vec(),
            clsr_categories: ClsrCategory::ALL.to_vec(),
            mandatory_behaviors: MandatoryBehavior::ALL.to_vec(),
        })
    }
}
