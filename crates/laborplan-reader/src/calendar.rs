//! Working-hours calendar CSV
//!
//! Columns: `month, work_hrs, start_mon, start_day, end_mon, end_day`, one row
//! per calendar month, January first.

use std::path::Path;

use chrono::Month;
use laborplan_core::{MonthHours, WorkingHoursCalendar};
use serde::Deserialize;

use crate::ReadError;

#[derive(Debug, Deserialize)]
struct CalendarRow {
    month: String,
    work_hrs: u32,
    start_mon: String,
    start_day: u32,
    end_mon: String,
    end_day: u32,
}

/// Read and validate the 12-month calendar
pub fn read_calendar(path: &Path) -> Result<WorkingHoursCalendar, ReadError> {
    let csv_err = |source| ReadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let mut months = Vec::new();
    for record in reader.deserialize::<CalendarRow>() {
        let row = record.map_err(csv_err)?;
        let month: Month = row.month.parse().map_err(|_| ReadError::UnknownMonth {
            path: path.to_path_buf(),
            month: row.month.clone(),
        })?;
        months.push(MonthHours::new(
            month,
            row.work_hrs,
            format!("{} {}", row.start_mon, row.start_day),
            format!("{} {}", row.end_mon, row.end_day),
        ));
    }

    let calendar = WorkingHoursCalendar::new(months).map_err(|source| ReadError::Calendar {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(total_hours = calendar.total_hours(), path = %path.display(), "read working-hours calendar");
    Ok(calendar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use laborplan_core::CalendarError;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const HEADER: &str = "month,work_hrs,start_mon,start_day,end_mon,end_day\n";

    fn write_csv(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::with_suffix(".csv").unwrap();
        file.write_all(HEADER.as_bytes()).unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file
    }

    fn fiscal_rows() -> Vec<String> {
        let names = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];
        let mut prev = "Dec";
        names
            .iter()
            .map(|name| {
                let row = format!("{name},160,{prev},27,{name},24");
                prev = *name;
                row
            })
            .collect()
    }

    #[test]
    fn reads_twelve_months() {
        let rows = fiscal_rows();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let file = write_csv(&refs);

        let calendar = read_calendar(file.path()).unwrap();
        assert_eq!(calendar.total_hours(), 1920);
        assert_eq!(calendar.months()[0].span(), "Dec 27-Jan 24");
        assert_eq!(calendar.months()[11].month, Month::December);
    }

    #[test]
    fn full_month_names_accepted() {
        let mut rows = fiscal_rows();
        rows[0] = "January,168,Dec,27,Jan,24".to_string();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let file = write_csv(&refs);

        let calendar = read_calendar(file.path()).unwrap();
        assert_eq!(calendar.months()[0].work_hours, 168);
    }

    #[test]
    fn short_calendar_rejected() {
        let rows = fiscal_rows();
        let refs: Vec<&str> = rows.iter().take(11).map(String::as_str).collect();
        let file = write_csv(&refs);

        let err = read_calendar(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ReadError::Calendar {
                source: CalendarError::Length(11),
                ..
            }
        ));
    }

    #[test]
    fn unknown_month_rejected() {
        let mut rows = fiscal_rows();
        rows[3] = "Aprl,160,Mar,27,Apr,24".to_string();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let file = write_csv(&refs);

        let err = read_calendar(file.path()).unwrap_err();
        assert!(matches!(err, ReadError::UnknownMonth { ref month, .. } if month == "Aprl"));
    }
}
