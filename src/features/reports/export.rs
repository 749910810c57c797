use chrono::{DateTime, TimeZone};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::core::error::{AppError, Result};
use crate::features::reports::models::Report;
use crate::shared::constants::DATE_FORMAT;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const SHEET_NAME: &str = "TOFS Reports";

pub const HEADERS: [&str; 10] = [
    "Card Number",
    "Name",
    "Division",
    "Site",
    "Sub Location",
    "Date",
    "Issue Description",
    "Follow Up",
    "CLSR Terkait",
    "Status",
];

/// Columns rendered with text wrap
const WRAPPED_COLUMNS: [usize; 2] = [6, 7];

/// Longest string an XLSX cell can hold
pub const CELL_MAX_CHARS: usize = 32_767;

const WIDTH_PADDING: usize = 2;
const MAX_COLUMN_WIDTH: usize = 80;

/// Cell text cut to [`CELL_MAX_CHARS`] characters
fn cell(value: &str) -> String {
    match value.char_indices().nth(CELL_MAX_CHARS) {
        Some((end, _)) => value[..end].to_string(),
        None => value.to_string(),
    }
}

/// Tabular form of the export, one row per report in [`HEADERS`] order
#[derive(Debug, Clone)]
pub struct ExportSheet {
    pub rows: Vec<[String; 10]>,
}

impl ExportSheet {
    pub fn from_reports(reports: &[Report]) -> Self {
        let rows = reports
            .iter()
            .map(|r| {
                [
                    cell(&r.card_number),
                    cell(&r.name),
                    cell(&r.division),
                    cell(&r.site),
                    cell(&r.sub_location),
                    r.date.format(DATE_FORMAT).to_string(),
                    cell(&r.issue_description),
                    cell(r.follow_up.as_deref().unwrap_or_default()),
                    cell(r.clsr_category.as_deref().unwrap_or_default()),
                    r.status.to_string(),
                ]
            })
            .collect();

        Self { rows }
    }

    /// Longest value per column (header included) plus padding, capped
    pub fn column_widths(&self) -> [usize; 10] {
        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &self.rows {
            for (width, value) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(value.chars().count());
            }
        }
        widths.map(|w| (w + WIDTH_PADDING).min(MAX_COLUMN_WIDTH))
    }

    /// Render the sheet as an in-memory XLSX workbook
    pub fn to_xlsx(&self) -> Result<Vec<u8>> {
        self.write_workbook()
            .map_err(|e| AppError::Internal(format!("Failed to build spreadsheet: {}", e)))
    }

    fn write_workbook(&self) -> std::result::Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let wrap_format = Format::new().set_text_wrap();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (col, header) in HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }

        for (i, row) in self.rows.iter().enumerate() {
            let row_num = (i + 1) as u32;
            for (col, value) in row.iter().enumerate() {
                if WRAPPED_COLUMNS.contains(&col) {
                    worksheet.write_string_with_format(row_num, col as u16, value, &wrap_format)?;
                } else {
                    worksheet.write_string(row_num, col as u16, value)?;
                }
            }
        }

        for (col, width) in self.column_widths().iter().enumerate() {
            worksheet.set_column_width(col as u16, *width as f64)?;
        }

        workbook.save_to_buffer()
    }
}

/// `tofs_reports_YYYYmmdd_HHMMSS.xlsx`
pub fn export_filename<Tz: TimeZone>(generated_at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "tofs_reports_{}.xlsx",
        generated_at.format("%Y%m%d_%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::ReportStatus;
    use chrono::{NaiveDate, Utc};
    use fake::faker::lorem::en::Sentence;
    use fake::faker::name::en::Name;
    use calamine::{open_workbook_from_rs, Reader, Xlsx};
    use fake::Fake;
    use std::io::Cursor;
    use uuid::Uuid;

    fn fake_report(n: usize) -> Report {
        Report {
            id: Uuid::new_v4(),
            card_number: format!("TOFS/BRAVO/05/25/{:04}", n),
            name: Name().fake(),
            division: "HSE".to_string(),
            site: "BRAVO".to_string(),
            sub_location: "Workshop".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            issue_description: Sentence(3..12).fake(),
            follow_up: None,
            clsr_category: Some("2. Line of Fire".to_string()),
            status: ReportStatus::Open,
            site_supervisor_ack: false,
            site_superintendent_ack: false,
            mandatory_behaviors: None,
            user_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_one_row_per_report_in_column_order() {
        let reports: Vec<Report> = (1..=5).map(fake_report).collect();
        let sheet = ExportSheet::from_reports(&reports);

        assert_eq!(sheet.rows.len(), 5);
        let first = &sheet.rows[0];
        assert_eq!(first[0], "TOFS/BRAVO/05/25/0001");
        assert_eq!(first[1], reports[0].name);
        assert_eq!(first[5], "2025-05-01");
        assert_eq!(first[7], "");
        assert_eq!(first[8], "2. Line of Fire");
        assert_eq!(first[9], "Open");
    }

    #[test]
    fn test_headers_are_fixed() {
        assert_eq!(HEADERS[0], "Card Number");
        assert_eq!(HEADERS[6], "Issue Description");
        assert_eq!(HEADERS[7], "Follow Up");
        assert_eq!(HEADERS[8], "CLSR Terkait");
        assert_eq!(HEADERS[9], "Status");
    }

    #[test]
    fn test_column_width_from_longest_value() {
        let mut report = fake_report(1);
        report.name = "Ab".to_string();
        report.sub_location = "Gudang Bahan Bakar Utama".to_string();
        report.issue_description = "x".repeat(200);
        let sheet = ExportSheet::from_reports(&[report]);
        let widths = sheet.column_widths();

        // header wins over a short value
        assert_eq!(widths[1], "Name".len() + 2);
        assert_eq!(widths[4], "Gudang Bahan Bakar Utama".len() + 2);
        assert_eq!(widths[6], 80);
    }

    #[test]
    fn test_width_counts_characters_not_bytes() {
        let mut report = fake_report(1);
        report.division = "Pemeliharaan Ütilitas Área".to_string();
        let widths = ExportSheet::from_reports(&[report]).column_widths();
        assert_eq!(widths[2], "Pemeliharaan Ütilitas Área".chars().count() + 2);
    }

    /// Cell text of the export sheet, row by row
    fn read_back(bytes: Vec<u8>) -> Vec<Vec<String>> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        range
            .rows()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_empty_export_still_has_header_only_workbook() {
        let sheet = ExportSheet::from_reports(&[]);
        assert!(sheet.rows.is_empty());
        assert_eq!(sheet.column_widths()[0], "Card Number".len() + 2);

        let rows = read_back(sheet.to_xlsx().unwrap());
        assert_eq!(rows, vec![HEADERS.map(String::from).to_vec()]);
    }

    #[test]
    fn test_workbook_has_header_then_one_row_per_report() {
        let reports: Vec<Report> = (1..=3).map(fake_report).collect();
        let rows = read_back(ExportSheet::from_reports(&reports).to_xlsx().unwrap());

        assert_eq!(rows.len(), 1 + reports.len());
        assert_eq!(rows[0], HEADERS.map(String::from).to_vec());
        for (row, report) in rows[1..].iter().zip(&reports) {
            assert_eq!(row.len(), HEADERS.len());
            assert_eq!(row[0], report.card_number);
            assert_eq!(row[1], report.name);
            assert_eq!(row[3], "BRAVO");
            assert_eq!(row[5], "2025-05-01");
            assert_eq!(row[6], report.issue_description);
            assert_eq!(row[8], "2. Line of Fire");
            assert_eq!(row[9], "Open");
        }
    }

    #[test]
    fn test_oversized_text_is_cut_to_cell_limit() {
        let mut report = fake_report(1);
        report.issue_description = "x".repeat(40_000);
        report.follow_up = Some("é".repeat(CELL_MAX_CHARS + 1));

        let sheet = ExportSheet::from_reports(&[report]);
        assert_eq!(sheet.rows[0][6].chars().count(), CELL_MAX_CHARS);
        assert_eq!(sheet.rows[0][7].chars().count(), CELL_MAX_CHARS);

        let rows = read_back(sheet.to_xlsx().unwrap());
        assert_eq!(rows[1][6].chars().count(), CELL_MAX_CHARS);
    }

    #[test]
    fn test_filename_has_timestamp() {
        let at = Utc.with_ymd_and_hms(2025, 7, 4, 9, 5, 3).unwrap();
        assert_eq!(export_filename(&at), "tofs_reports_20250704_090503.xlsx");
    }
}
