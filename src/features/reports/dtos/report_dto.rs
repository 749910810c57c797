use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::reports::models::{
    ClsrCategory, MandatoryBehavior, Report, ReportFields, ReportStatus,
};

/// Request DTO for creating or editing a report.
///
/// Editing overwrites every field below; the card number and owner are kept.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SaveReportDto {
    #[validate(custom(function = "crate::shared::validation::not_blank"))]
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: String,

    #[validate(custom(function = "crate::shared::validation::not_blank"))]
    #[validate(length(max = 100, message = "Division must be at most 100 characters"))]
    pub division: String,

    #[validate(custom(function = "crate::shared::validation::not_blank"))]
    #[validate(custom(function = "crate::shared::validation::no_slash"))]
    #[validate(length(max = 100, message = "Site must be at most 100 characters"))]
    pub site: String,

    #[validate(custom(function = "crate::shared::validation::not_blank"))]
    #[validate(length(max = 100, message = "Sub location must be at most 100 characters"))]
    pub sub_location: String,

    /// Observation date, `YYYY-MM-DD`
    pub date: NaiveDate,

    #[validate(custom(function = "crate::shared::validation::not_blank"))]
    #[validate(length(
        max = 32767,
        message = "Issue description must be at most 32767 characters"
    ))]
    pub issue_description: String,

    #[validate(length(max = 32767, message = "Follow up must be at most 32767 characters"))]
    pub follow_up: Option<String>,

    pub clsr_category: Option<ClsrCategory>,

    pub status: ReportStatus,

    #[serde(default)]
    pub site_supervisor_ack: bool,

    #[serde(default)]
    pub site_superintendent_ack: bool,

    #[serde(default)]
    pub mandatory_behaviors: Vec<MandatoryBehavior>,
}

impl From<SaveReportDto> for ReportFields {
    fn from(dto: SaveReportDto) -> Self {
        Self {
            name: dto.name.trim().to_string(),
            division: dto.division.trim().to_string(),
            site: dto.site.trim().to_string(),
            sub_location: dto.sub_location.trim().to_string(),
            date: dto.date,
            issue_description: dto.issue_description,
            follow_up: dto.follow_up.filter(|f| !f.trim().is_empty()),
            clsr_category: dto.clsr_category,
            status: dto.status,
            site_supervisor_ack: dto.site_supervisor_ack,
            site_superintendent_ack: dto.site_superintendent_ack,
            mandatory_behaviors: dto.mandatory_behaviors,
        }
    }
}

/// Response DTO for report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub card_number: String,
    pub name: String,
    pub division: String,
    pub site: String,
    pub sub_location: String,
    pub date: NaiveDate,
    pub issue_description: String,
    pub follow_up: Option<String>,
    pub clsr_category: Option<String>,
    pub status: ReportStatus,
    pub site_supervisor_ack: bool,
    pub site_superintendent_ack: bool,
    pub mandatory_behaviors: Vec<String>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            mandatory_behaviors: MandatoryBehavior::split(r.mandatory_behaviors.as_deref()),
            id: r.id,
            card_number: r.card_number,
            name: r.name,
            division: r.division,
            site: r.site,
            sub_location: r.sub_location,
            date: r.date,
            issue_description: r.issue_description,
            follow_up: r.follow_up,
            clsr_category: r.clsr_category,
            status: r.status,
            site_supervisor_ack: r.site_supervisor_ack,
            site_superintendent_ack: r.site_superintendent_ack,
            user_id: r.user_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Values for the listing filter form
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportFilterOptionsDto {
    pub divisions: Vec<String>,
    pub sites: Vec<String>,
    pub statuses: Vec<ReportStatus>,
    pub clsr_categories: Vec<ClsrCategory>,
    pub mandatory_behaviors: Vec<MandatoryBehavior>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> serde_json::Value {
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

    #[test]
    fn test_optional_fields_default() {
        let dto: SaveReportDto = serde_json::from_value(payload()).unwrap();
        assert!(dto.validate().is_ok());
        assert!(!dto.site_supervisor_ack);
        assert!(dto.mandatory_behaviors.is_empty());
        assert!(dto.clsr_category.is_none());
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let mut value = payload();
        value.as_object_mut().unwrap().remove("issue_description");
        assert!(serde_json::from_value::<SaveReportDto>(value).is_err());
    }

    #[test]
    fn test_blank_required_field_fails_validation() {
        let mut value = payload();
        value["division"] = json!("   ");
        let dto: SaveReportDto = serde_json::from_value(value).unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("division"));
    }

    #[test]
    fn test_site_with_slash_fails_validation() {
        let mut value = payload();
        value["site"] = json!("BRAVO/2");
        let dto: SaveReportDto = serde_json::from_value(value).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_site_length_limit() {
        let mut value = payload();
        value["site"] = json!("S".repeat(100));
        let dto: SaveReportDto = serde_json::from_value(value.clone()).unwrap();
        assert!(dto.validate().is_ok());

        value["site"] = json!("S".repeat(101));
        let dto: SaveReportDto = serde_json::from_value(value).unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("site"));
    }

    #[test]
    fn test_text_longer_than_spreadsheet_cell_is_rejected() {
        let mut value = payload();
        value["issue_description"] = json!("x".repeat(40_000));
        value["follow_up"] = json!("y".repeat(32_768));
        let dto: SaveReportDto = serde_json::from_value(value).unwrap();

        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("issue_description"));
        assert!(fields.contains_key("follow_up"));
    }

    #[test]
    fn test_unknown_clsr_label_is_rejected() {
        let mut value = payload();
        value["clsr_category"] = json!("11. Something Else");
        assert!(serde_json::from_value::<SaveReportDto>(value).is_err());
    }

    #[test]
    fn test_fields_are_trimmed_and_blank_follow_up_dropped() {
        let mut value = payload();
        value["site"] = json!("  BRAVO ");
        value["follow_up"] = json!("  ");
        let dto: SaveReportDto = serde_json::from_value(value).unwrap();
        let fields = ReportFields::from(dto);
        assert_eq!(fields.site, "BRAVO");
        assert!(fields.follow_up.is_none());
    }
}
