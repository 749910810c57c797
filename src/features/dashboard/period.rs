use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Indonesian month names, January first
pub const MONTH_NAMES: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Which aggregates the period preset restricts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PeriodScope {
    /// Only the monthly trend is cut at the period start
    #[default]
    TrendOnly,
    /// Every aggregate is cut at the period start
    WholeQuery,
}

impl std::str::FromStr for PeriodScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trend_only" => Ok(PeriodScope::TrendOnly),
            "whole_query" => Ok(PeriodScope::WholeQuery),
            other => Err(format!(
                "Invalid period scope '{}', expected trend_only or whole_query",
                other
            )),
        }
    }
}

/// Dashboard period preset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Period {
    #[serde(rename = "6_months")]
    SixMonths,
    #[serde(rename = "year_to_date")]
    YearToDate,
    #[serde(rename = "3_years")]
    ThreeYears,
    #[default]
    #[serde(rename = "1_year")]
    OneYear,
}

impl Period {
    /// Parse the query value; anything unrecognised is one year
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("6_months") => Period::SixMonths,
            Some("year_to_date") => Period::YearToDate,
            Some("3_years") => Period::ThreeYears,
            _ => Period::OneYear,
        }
    }

    /// First day included in the period, relative to `today`
    pub fn start(&self, today: NaiveDate) -> NaiveDate {
        match self {
            Period::SixMonths => today.checked_sub_days(Days::new(182)),
            Period::YearToDate => today.with_ordinal(1),
            // chrono clamps Feb 29 to Feb 28
            Period::ThreeYears => today.checked_sub_months(Months::new(36)),
            Period::OneYear => today.checked_sub_days(Days::new(365)),
        }
        .unwrap_or(NaiveDate::MIN)
    }
}

/// Month number from an Indonesian name or `1..=12`; `None` for anything else
pub fn parse_month(value: &str) -> Option<u32> {
    let value = value.trim();
    if let Ok(n) = value.parse::<u32>() {
        return (1..=12).contains(&n).then_some(n);
    }
    MONTH_NAMES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(value))
        .map(|i| i as u32 + 1)
}

/// Year from a digits-only value
pub fn parse_year(value: &str) -> Option<i32> {
    let value = value.trim();
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_unknown_period_is_one_year() {
        assert_eq!(Period::parse(None), Period::OneYear);
        assert_eq!(Period::parse(Some("forever")), Period::OneYear);
        assert_eq!(Period::parse(Some("1_year")), Period::OneYear);
        assert_eq!(Period::parse(Some("6_months")), Period::SixMonths);
    }

    #[test]
    fn test_period_start() {
        let today = date(2025, 6, 15);
        assert_eq!(Period::SixMonths.start(today), date(2024, 12, 15));
        assert_eq!(Period::YearToDate.start(today), date(2025, 1, 1));
        assert_eq!(Period::ThreeYears.start(today), date(2022, 6, 15));
        assert_eq!(Period::OneYear.start(today), date(2024, 6, 15));
    }

    #[test]
    fn test_one_year_across_leap_day() {
        assert_eq!(Period::OneYear.start(date(2024, 3, 1)), date(2023, 3, 2));
    }

    #[test]
    fn test_three_years_from_leap_day_clamps_to_feb_28() {
        assert_eq!(Period::ThreeYears.start(date(2024, 2, 29)), date(2021, 2, 28));
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("Januari"), Some(1));
        assert_eq!(parse_month("desember"), Some(12));
        assert_eq!(parse_month("7"), Some(7));
        assert_eq!(parse_month("13"), None);
        assert_eq!(parse_month("0"), None);
        assert_eq!(parse_month("All"), None);
        assert_eq!(parse_month("January"), None);
    }

    #[test]
    fn test_parse_year_digits_only() {
        assert_eq!(parse_year("2024"), Some(2024));
        assert_eq!(parse_year("All"), None);
        assert_eq!(parse_year("-2024"), None);
        assert_eq!(parse_year(""), None);
    }

    #[test]
    fn test_period_scope_from_str() {
        assert_eq!("trend_only".parse::<PeriodScope>(), Ok(PeriodScope::TrendOnly));
        assert_eq!("WHOLE_QUERY".parse::<PeriodScope>(), Ok(PeriodScope::WholeQuery));
        assert!("sometimes".parse::<PeriodScope>().is_err());
    }
}
