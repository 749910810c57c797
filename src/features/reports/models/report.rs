use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Report status enum matching database enum
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "tofs_status")]
pub enum ReportStatus {
    #[default]
    Open,
    Closed,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 2] = [ReportStatus::Open, ReportStatus::Closed];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Open => "Open",
            ReportStatus::Closed => "Closed",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| format!("Unknown report status: {}", s))
    }
}

/// CLSR hazard category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ClsrCategory {
    #[serde(rename = "1. Tools & Equipment")]
    ToolsAndEquipment,
    #[serde(rename = "2. Line of Fire")]
    LineOfFire,
    #[serde(rename = "3. Hot Work")]
    HotWork,
    #[serde(rename = "4. Confined Space")]
    ConfinedSpace,
    #[serde(rename = "5. Powered System")]
    PoweredSystem,
    #[serde(rename = "6. Lifting Operation")]
    LiftingOperation,
    #[serde(rename = "7. Working at Height")]
    WorkingAtHeight,
    #[serde(rename = "8. Ground-Disturbance Work")]
    GroundDisturbanceWork,
    #[serde(rename = "9. Water-Based Work Activities")]
    WaterBasedWorkActivities,
    #[serde(rename = "10. Land Transportation")]
    LandTransportation,
}

impl ClsrCategory {
    pub const ALL: [ClsrCategory; 10] = [
        ClsrCategory::ToolsAndEquipment,
        ClsrCategory::LineOfFire,
        ClsrCategory::HotWork,
        ClsrCategory::ConfinedSpace,
        ClsrCategory::PoweredSystem,
        ClsrCategory::LiftingOperation,
        ClsrCategory::WorkingAtHeight,
        ClsrCategory::GroundDisturbanceWork,
        ClsrCategory::WaterBasedWorkActivities,
        ClsrCategory::LandTransportation,
    ];

    /// Label as shown on the card and stored in `clsr_category`
    pub fn label(&self) -> &'static str {
        match self {
            ClsrCategory::ToolsAndEquipment => "1. Tools & Equipment",
            ClsrCategory::LineOfFire => "2. Line of Fire",
            ClsrCategory::HotWork => "3. Hot Work",
            ClsrCategory::ConfinedSpace => "4. Confined Space",
            ClsrCategory::PoweredSystem => "5. Powered System",
            ClsrCategory::LiftingOperation => "6. Lifting Operation",
            ClsrCategory::WorkingAtHeight => "7. Working at Height",
            ClsrCategory::GroundDisturbanceWork => "8. Ground-Disturbance Work",
            ClsrCategory::WaterBasedWorkActivities => "9. Water-Based Work Activities",
            ClsrCategory::LandTransportation => "10. Land Transportation",
        }
    }
}

/// Mandatory safety behavior ticked on the card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum MandatoryBehavior {
    #[serde(rename = "Use Correct PPE")]
    UseCorrectPpe,
    #[serde(rename = "Stop Work Authority")]
    StopWorkAuthority,
    #[serde(rename = "Permit to Work")]
    PermitToWork,
    #[serde(rename = "Energy Isolation")]
    EnergyIsolation,
    #[serde(rename = "Seat Belt Use")]
    SeatBeltUse,
    #[serde(rename = "Fit for Work")]
    FitForWork,
}

impl MandatoryBehavior {
    pub const ALL: [MandatoryBehavior; 6] = [
        MandatoryBehavior::UseCorrectPpe,
        MandatoryBehavior::StopWorkAuthority,
        MandatoryBehavior::PermitToWork,
        MandatoryBehavior::EnergyIsolation,
        MandatoryBehavior::SeatBeltUse,
        MandatoryBehavior::FitForWork,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MandatoryBehavior::UseCorrectPpe => "Use Correct PPE",
            MandatoryBehavior::StopWorkAuthority => "Stop Work Authority",
            MandatoryBehavior::PermitToWork => "Permit to Work",
            MandatoryBehavior::EnergyIsolation => "Energy Isolation",
            MandatoryBehavior::SeatBeltUse => "Seat Belt Use",
            MandatoryBehavior::FitForWork => "Fit for Work",
        }
    }

    /// Comma-joined column value, `None` when nothing was selected.
    /// Duplicates are dropped, selection order is kept.
    pub fn join(behaviors: &[MandatoryBehavior]) -> Option<String> {
        let mut labels: Vec<&str> = Vec::with_capacity(behaviors.len());
        for b in behaviors {
            if !labels.contains(&b.label()) {
                labels.push(b.label());
            }
        }

        if labels.is_empty() {
            None
        } else {
            Some(labels.join(", "))
        }
    }

    /// Split a stored column value back into labels
    pub fn split(stored: Option<&str>) -> Vec<String> {
        stored
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Database model for a TOFS report
#[derive(Debug, Clone, FromRow)]
pub struct Report {
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
    pub mandatory_behaviors: Option<String>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mutable fields of a report, written on create and overwritten on edit
#[derive(Debug, Clone)]
pub struct ReportFields {
    pub name: String,
    pub division: String,
    pub site: String,
    pub sub_location: String,
    pub date: NaiveDate,
    pub issue_description: String,
    pub follow_up: Option<String>,
    pub clsr_category: Option<ClsrCategory>,
    pub status: ReportStatus,
    pub site_supervisor_ack: bool,
    pub site_superintendent_ack: bool,
    pub mandatory_behaviors: Vec<MandatoryBehavior>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parses_exact_label() {
        assert_eq!("Open".parse::<ReportStatus>().unwrap(), ReportStatus::Open);
        assert_eq!(
            " Closed ".parse::<ReportStatus>().unwrap(),
            ReportStatus::Closed
        );
        assert!("open".parse::<ReportStatus>().is_err());
        assert!("CLOSED".parse::<ReportStatus>().is_err());
        assert!("Pending".parse::<ReportStatus>().is_err());
    }

    #[test]
    fn test_clsr_serializes_to_label() {
        for category in ClsrCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.label()));
        }
        let parsed: ClsrCategory = serde_json::from_str("\"7. Working at Height\"").unwrap();
        assert_eq!(parsed, ClsrCategory::WorkingAtHeight);
    }

    #[test]
    fn test_mandatory_behaviors_join_and_split() {
        let joined = MandatoryBehavior::join(&[
            MandatoryBehavior::UseCorrectPpe,
            MandatoryBehavior::PermitToWork,
            MandatoryBehavior::UseCorrectPpe,
        ]);
        assert_eq!(joined.as_deref(), Some("Use Correct PPE, Permit to Work"));
        assert_eq!(
            MandatoryBehavior::split(joined.as_deref()),
            vec!["Use Correct PPE", "Permit to Work"]
        );
        assert_eq!(MandatoryBehavior::join(&[]), None);
        assert!(MandatoryBehavior::split(None).is_empty());
    }
}
