//! Report listing filters.
//!
//! Every non-blank parameter adds one predicate and all predicates are AND-ed.
//! `q` is a free-text search that ORs a substring match over eight columns
//! and is AND-ed with the other filters.

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};
use utoipa::IntoParams;

use crate::features::reports::models::ReportStatus;
use crate::shared::constants::DATE_FORMAT;
use crate::shared::search::{contains_pattern, non_blank, Conditions};

/// Columns covered by the free-text search
const SEARCH_COLUMNS: [&str; 8] = [
    "name",
    "division",
    "site",
    "sub_location",
    "issue_description",
    "follow_up",
    "clsr_category",
    "status::TEXT",
];

/// Query params shared by the report listing and the export
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ReportFilterParams {
    /// Case-insensitive substring of the submitter name
    pub name: Option<String>,
    /// Exact division
    pub division: Option<String>,
    /// Exact site
    pub site: Option<String>,
    /// Case-insensitive substring of the sub location
    pub sub_location: Option<String>,
    /// `Open` or `Closed`
    pub status: Option<String>,
    /// Inclusive lower bound, `YYYY-MM-DD`. Malformed values are ignored.
    pub date_from: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD`. Malformed values are ignored.
    pub date_to: Option<String>,
    /// Free-text search
    pub q: Option<String>,
}

/// Parse a `YYYY-MM-DD` bound, `None` for blank or malformed input
pub fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    non_blank(value).and_then(|v| NaiveDate::parse_from_str(v, DATE_FORMAT).ok())
}

impl ReportFilterParams {
    /// Append the WHERE clause for these filters; nothing when all are blank
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        let mut conditions = Conditions::new(qb);

        if let Some(name) = non_blank(self.name.as_deref()) {
            conditions
                .next()
                .push("name ILIKE ")
                .push_bind(contains_pattern(name))
                .push(" ESCAPE '\\'");
        }

        if let Some(division) = non_blank(self.division.as_deref()) {
            conditions
                .next()
                .push("division = ")
                .push_bind(division.to_string());
        }

        if let Some(site) = non_blank(self.site.as_deref()) {
            conditions.next().push("site = ").push_bind(site.to_string());
        }

        if let Some(sub_location) = non_blank(self.sub_location.as_deref()) {
            conditions
                .next()
                .push("sub_location ILIKE ")
                .push_bind(contains_pattern(sub_location))
                .push(" ESCAPE '\\'");
        }

        if let Some(status) = non_blank(self.status.as_deref()) {
            match status.parse::<ReportStatus>() {
                Ok(status) => {
                    conditions.next().push("status = ").push_bind(status);
                }
                Err(_) => {
                    conditions.next().push("FALSE");
                }
            }
        }

        if let Some(from) = parse_date(self.date_from.as_deref()) {
            conditions.next().push("date >= ").push_bind(from);
        }

        if let Some(to) = parse_date(self.date_to.as_deref()) {
            conditions.next().push("date <= ").push_bind(to);
        }

        if let Some(term) = non_blank(self.q.as_deref()) {
            let pattern = contains_pattern(term);
            let qb = conditions.next();
            qb.push("(");
            for (i, column) in SEARCH_COLUMNS.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                qb.push(*column)
                    .push(" ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" ESCAPE '\\'");
            }
            qb.push(")");
        }
    }
}
