//! Offline processing of the historical statistics CSV.
//!
//! The file is a fixed export whose row layout mirrors the live API series
//! (newest first, one row per day): rows 3..10 hold the most recent
//! complete 7-day case window in the last column, row 1 carries hospital
//! occupancy second from the end, and row 14 carries cumulative deaths
//! third from the end.

use std::path::Path;

const CASE_ROWS: std::ops::Range<usize> = 3..10;
const HOSPITAL_ROW: usize = 1;
const DEATHS_ROW: usize = 14;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed report: {0}")]
    Malformed(String),
}

/// Headline figures extracted from the historical file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportFigures {
    pub last_seven_day_cases: i64,
    pub current_hospital_cases: i64,
    pub total_deaths: i64,
}

/// Read every row of a CSV file, header row included, as raw strings.
pub fn parse_csv_rows(path: impl AsRef<Path>) -> Result<Vec<Vec<String>>, ReportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path.as_ref())?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

fn cell_from_end(rows: &[Vec<String>], row: usize, back: usize) -> Result<i64, ReportError> {
    let cells = rows
        .get(row)
        .ok_or_else(|| ReportError::Malformed(format!("missing row {row}")))?;
    let cell = cells
        .len()
        .checked_sub(back)
        .and_then(|index| cells.get(index))
        .ok_or_else(|| {
            ReportError::Malformed(format!("row {row} has too few columns"))
        })?;
    cell.parse::<i64>().map_err(|_| {
        ReportError::Malformed(format!("row {row} cell '{cell}' is not a number"))
    })
}

/// Extract the three headline figures from parsed rows.
pub fn process_csv_rows(rows: &[Vec<String>]) -> Result<ReportFigures, ReportError> {
    let mut last_seven_day_cases = 0;
    for row in CASE_ROWS {
        last_seven_day_cases += cell_from_end(rows, row, 1)?;
    }

    Ok(ReportFigures {
        last_seven_day_cases,
        current_hospital_cases: cell_from_end(rows, HOSPITAL_ROW, 2)?,
        total_deaths: cell_from_end(rows, DEATHS_ROW, 3)?,
    })
}
