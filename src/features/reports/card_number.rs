//! Card numbers: `TOFS/<site>/<MM>/<YY>/<NNNN>`.
//!
//! The sequence is per site and never reused, even after a report is deleted.

use chrono::{Datelike, NaiveDate};
use sqlx::{Postgres, Transaction};

use crate::core::database::map_db_error;
use crate::core::error::Result;

/// Width of the `tofs_reports.card_number` column
pub const CARD_NUMBER_MAX_LEN: usize = 120;

/// Format a card number from the site, the observation date and the site sequence
pub fn format_card_number(site: &str, date: NaiveDate, sequence: i32) -> String {
    format!(
        "TOFS/{}/{:02}/{:02}/{:04}",
        site,
        date.month(),
        date.year().rem_euclid(100),
        sequence
    )
}

/// Advance the site's counter inside `tx` and return the new value.
///
/// The first allocation for a site starts after the reports already stored
/// for it. The row lock taken by the upsert serializes concurrent creators
/// until `tx` ends.
pub async fn next_sequence(tx: &mut Transaction<'_, Postgres>, site: &str) -> Result<i32> {
    sqlx::query_scalar(
        r#"
        INSERT INTO tofs_site_sequences (site, last_value)
        VALUES ($1, (SELECT COUNT(*)::INTEGER FROM tofs_reports WHERE site = $1) + 1)
        ON CONFLICT (site)
        DO UPDATE SET last_value = tofs_site_sequences.last_value + 1
        RETURNING last_value
        "#,
    )
    .bind(site)
    .fetch_one(&mut **tx)
    .await
    .map_err(map_db_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_pads_month_year_and_sequence() {
        assert_eq!(
            format_card_number("BRAVO", date(2025, 3, 14), 7),
            "TOFS/BRAVO/03/25/0007"
        );
        assert_eq!(
            format_card_number("KM 12", date(2009, 11, 1), 1234),
            "TOFS/KM 12/11/09/1234"
        );
    }

    #[test]
    fn test_sequence_wider_than_four_digits_is_kept() {
        assert_eq!(
            format_card_number("BRAVO", date(2030, 1, 1), 12345),
            "TOFS/BRAVO/01/30/12345"
        );
    }

    #[test]
    fn test_longest_site_fits_card_number_column() {
        let site = "S".repeat(100);
        let number = format_card_number(&site, date(2025, 5, 20), 99_999);
        assert!(number.len() <= CARD_NUMBER_MAX_LEN, "{} chars", number.len());
    }

    #[test]
    fn test_consecutive_sequences_increase_by_one() {
        let d = date(2025, 6, 2);
        let numbers: Vec<String> = (1..=3).map(|n| format_card_number("ALFA", d, n)).collect();
        assert_eq!(
            numbers,
            vec![
                "TOFS/ALFA/06/25/0001",
                "TOFS/ALFA/06/25/0002",
                "TOFS/ALFA/06/25/0003"
            ]
        );
    }
}
