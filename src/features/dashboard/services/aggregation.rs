//! In-memory grouping behind the dashboard charts.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use sqlx::FromRow;

use crate::features::dashboard::dtos::CountEntry;
use crate::features::reports::models::ReportStatus;

pub const UNKNOWN_CLSR: &str = "Unknown";

/// Columns of a report the dashboard groups by
#[derive(Debug, Clone, FromRow)]
pub struct DashboardRow {
    pub site: String,
    pub status: ReportStatus,
    pub name: String,
    pub clsr_category: Option<String>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregates {
    pub total: i64,
    pub by_site: Vec<CountEntry>,
    pub by_status: Vec<CountEntry>,
    pub by_submitter: Vec<CountEntry>,
    pub by_clsr: Vec<CountEntry>,
    pub monthly_trend: Vec<CountEntry>,
}

/// Frequency table in first-encountered order
fn frequencies<'a>(values: impl Iterator<Item = &'a str>) -> Vec<CountEntry> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<CountEntry> = Vec::new();

    for value in values {
        match index.get(value) {
            Some(&i) => entries[i].count += 1,
            None => {
                index.insert(value, entries.len());
                entries.push(CountEntry {
                    label: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    entries
}

/// `Mon YYYY` label for a month bucket
fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|| format!("{:02} {}", month, year))
}

/// Group `rows`. Only rows dated on or after `trend_start` enter the monthly
/// trend; every row enters the other tables.
pub fn aggregate(rows: &[DashboardRow], trend_start: NaiveDate) -> Aggregates {
    let by_site = frequencies(rows.iter().map(|r| r.site.as_str()));
    let by_status = frequencies(rows.iter().map(|r| r.status.as_str()));
    let by_submitter = frequencies(rows.iter().map(|r| r.name.as_str()));

    let mut by_clsr = frequencies(rows.iter().map(|r| {
        r.clsr_category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNKNOWN_CLSR)
    }));
    // stable, so ties keep first-encountered order
    by_clsr.sort_by(|a, b| b.count.cmp(&a.count));

    let mut months: BTreeMap<(i32, u32), i64> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.date >= trend_start) {
        *months.entry((row.date.year(), row.date.month())).or_default() += 1;
    }
    let monthly_trend = months
        .into_iter()
        .map(|((year, month), count)| CountEntry {
            label: month_label(year, month),
            count,
        })
        .collect();

    Aggregates {
        total: rows.len() as i64,
        by_site,
        by_status,
        by_submitter,
        by_clsr,
        monthly_trend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::name::en::Name;
    use fake::Fake;

    const SITES: [&str; 3] = ["ALFA", "BRAVO", "CHARLIE"];
    const CLSR: [Option<&str>; 4] = [
        Some("2. Line of Fire"),
        Some("7. Working at Height"),
        None,
        Some(""),
    ];

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(site: &str, clsr: Option<&str>, date: NaiveDate) -> DashboardRow {
        DashboardRow {
            site: site.to_string(),
            status: ReportStatus::Open,
            name: Name().fake(),
            clsr_category: clsr.map(String::from),
            date,
        }
    }

    fn fake_rows(n: usize) -> Vec<DashboardRow> {
        let base = date(2023, 1, 1);
        (0..n)
            .map(|_| {
                let offset: u64 = (0..900).fake();
                DashboardRow {
                    site: SITES[(0..SITES.len()).fake::<usize>()].to_string(),
                    status: if (0..2).fake::<u8>() == 0 {
                        ReportStatus::Open
                    } else {
                        ReportStatus::Closed
                    },
                    name: Name().fake(),
                    clsr_category: CLSR[(0..CLSR.len()).fake::<usize>()].map(String::from),
                    date: base + chrono::Days::new(offset),
                }
            })
            .collect()
    }

    fn entry(label: &str, count: i64) -> CountEntry {
        CountEntry {
            label: label.to_string(),
            count,
        }
    }

    fn sum(entries: &[CountEntry]) -> i64 {
        entries.iter().map(|e| e.count).sum()
    }

    #[test]
    fn test_every_table_sums_to_total() {
        let rows = fake_rows(250);
        let agg = aggregate(&rows, NaiveDate::MIN);

        assert_eq!(agg.total, 250);
        assert_eq!(sum(&agg.by_site), 250);
        assert_eq!(sum(&agg.by_status), 250);
        assert_eq!(sum(&agg.by_submitter), 250);
        assert_eq!(sum(&agg.by_clsr), 250);
        assert_eq!(sum(&agg.monthly_trend), 250);
    }

    #[test]
    fn test_unknown_bucket_counts_missing_clsr() {
        let rows = fake_rows(120);
        let missing = rows
            .iter()
            .filter(|r| r.clsr_category.as_deref().map_or(true, str::is_empty))
            .count() as i64;

        let agg = aggregate(&rows, NaiveDate::MIN);
        let unknown = agg
            .by_clsr
            .iter()
            .find(|e| e.label == UNKNOWN_CLSR)
            .map_or(0, |e| e.count);
        assert_eq!(unknown, missing);
    }

    #[test]
    fn test_clsr_sorted_desc_with_first_encountered_ties() {
        let d = date(2025, 1, 10);
        let rows = vec![
            row("ALFA", Some("3. Hot Work"), d),
            row("ALFA", Some("2. Line of Fire"), d),
            row("ALFA", None, d),
            row("ALFA", Some("2. Line of Fire"), d),
            row("ALFA", Some("3. Hot Work"), d),
            row("ALFA", Some("5. Powered System"), d),
            row("ALFA", Some("2. Line of Fire"), d),
        ];
        let labels: Vec<String> = aggregate(&rows, NaiveDate::MIN)
            .by_clsr
            .into_iter()
            .map(|e| e.label)
            .collect();
        assert_eq!(
            labels,
            vec!["2. Line of Fire", "3. Hot Work", "Unknown", "5. Powered System"]
        );
    }

    #[test]
    fn test_site_table_keeps_first_encountered_order() {
        let d = date(2025, 1, 10);
        let rows = vec![
            row("CHARLIE", None, d),
            row("ALFA", None, d),
            row("ALFA", None, d),
            row("BRAVO", None, d),
        ];
        let agg = aggregate(&rows, NaiveDate::MIN);
        assert_eq!(
            agg.by_site,
            vec![
                entry("CHARLIE", 1),
                entry("ALFA", 2),
                entry("BRAVO", 1),
            ]
        );
    }

    #[test]
    fn test_monthly_trend_is_chronological() {
        let rows = vec![
            row("ALFA", None, date(2025, 2, 3)),
            row("ALFA", None, date(2024, 12, 31)),
            row("ALFA", None, date(2025, 2, 27)),
            row("ALFA", None, date(2024, 9, 1)),
            row("ALFA", None, date(2025, 1, 15)),
        ];
        let trend = aggregate(&rows, NaiveDate::MIN).monthly_trend;
        assert_eq!(
            trend,
            vec![
                entry("Sep 2024", 1),
                entry("Dec 2024", 1),
                entry("Jan 2025", 1),
                entry("Feb 2025", 2),
            ]
        );
    }

    #[test]
    fn test_trend_start_is_inclusive_and_only_cuts_trend() {
        let start = date(2025, 1, 1);
        let rows = vec![
            row("ALFA", None, date(2024, 12, 31)),
            row("ALFA", None, start),
            row("BRAVO", None, date(2025, 3, 9)),
        ];
        let agg = aggregate(&rows, start);
        assert_eq!(agg.total, 3);
        assert_eq!(sum(&agg.by_site), 3);
        assert_eq!(sum(&agg.monthly_trend), 2);
        assert_eq!(agg.monthly_trend[0].label, "Jan 2025");
    }

    #[test]
    fn test_empty_input() {
        let agg = aggregate(&[], NaiveDate::MIN);
        assert_eq!(agg, Aggregates::default());
    }
}
