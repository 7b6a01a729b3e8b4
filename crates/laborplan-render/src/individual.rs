//! Individual workbook: one worksheet per staff member
//!
//! Every project row links to the project's sheet in the projects workbook,
//! so the two workbooks must sit in the same directory.

use laborplan_core::{
    IndividualSchedule, OutputFile, RenderError, ReportRenderer, StagedData, POST_ASSESSMENT_MARKER,
};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::{col, save, workbook_link, write_month_block, xlsx_err, ReportFormats};

const HEADER_ROW: u32 = 4;
const FIRST_ENTRY_ROW: u32 = 8;
const FIRST_MONTH_COL: u16 = 4;

const COLUMN_LABELS: [(&str, &str); 4] = [
    ("PROJECT", "NUMBER"),
    ("FUNDING", "PROBABILITY"),
    ("PROJECT", "DESCRIPTION"),
    ("MANAGER or", "TASK MANAGER"),
];

/// Per-staff schedules of nonzero allocations
#[derive(Clone, Copy, Debug, Default)]
pub struct IndividualReport;

impl ReportRenderer for IndividualReport {
    fn output(&self) -> OutputFile {
        OutputFile::Individual
    }

    fn render(&self, staged: &StagedData) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let formats = ReportFormats::new();

        for schedule in &staged.individuals {
            let sheet = workbook.add_worksheet();
            sheet.set_name(&schedule.sheet_name).map_err(xlsx_err)?;
            write_schedule(sheet, staged, schedule, &formats)?;
        }
        if staged.individuals.is_empty() {
            workbook.add_worksheet();
        }

        save(&mut workbook)
    }
}

fn write_schedule(
    sheet: &mut Worksheet,
    staged: &StagedData,
    schedule: &IndividualSchedule,
    formats: &ReportFormats,
) -> Result<(), RenderError> {
    let layout = &staged.layout;
    let totals = col(FIRST_MONTH_COL, layout.totals_offset());

    sheet.set_column_width(0, 10).ok();
    sheet.set_column_width(1, 10).ok();
    sheet.set_column_width(2, 40).ok();
    sheet.set_column_width(3, 20).ok();
    for offset in 0..layout.month_count() {
        sheet.set_column_width(col(FIRST_MONTH_COL, offset), 15).ok();
    }
    sheet.set_column_width(totals, 30).ok();

    sheet
        .write_string_with_format(0, 0, "Staff Planning", &formats.big_bold)
        .map_err(xlsx_err)?;
    sheet
        .write_string_with_format(2, 0, "Staff Name:", &formats.bold_right)
        .map_err(xlsx_err)?;
    sheet
        .write_string_with_format(2, 1, schedule.staff.replace(POST_ASSESSMENT_MARKER, ""), &formats.big_bold)
        .map_err(xlsx_err)?;

    for (c, (top, bottom)) in COLUMN_LABELS.into_iter().enumerate() {
        sheet
            .write_string_with_format(HEADER_ROW, c as u16, top, &formats.bold)
            .map_err(xlsx_err)?;
        sheet
            .write_string_with_format(HEADER_ROW + 1, c as u16, bottom, &formats.bold)
            .map_err(xlsx_err)?;
    }
    sheet
        .write_string_with_format(HEADER_ROW + 2, 3, "Wkg Hrs Available =", &formats.right)
        .map_err(xlsx_err)?;
    sheet
        .write_string_with_format(HEADER_ROW + 3, 3, "Processing Month =", &formats.right)
        .map_err(xlsx_err)?;

    write_month_block(
        sheet,
        layout,
        HEADER_ROW,
        FIRST_MONTH_COL,
        &formats.merge_border,
        &formats.center,
        false,
    )?;

    for (idx, entry) in schedule.entries.iter().enumerate() {
        let r = FIRST_ENTRY_ROW + idx as u32;
        match staged.registry.get(&entry.project_id) {
            Some(link) => {
                let url = workbook_link(&link.target, &entry.project_id, "Click name to open project workbook.");
                sheet
                    .write_url_with_format(r, 0, url, &formats.link)
                    .map_err(xlsx_err)?;
            }
            None => {
                sheet.write_string(r, 0, &entry.project_id).map_err(xlsx_err)?;
            }
        }
        sheet
            .write_number(r, 1, entry.probability.as_f64())
            .map_err(xlsx_err)?;
        sheet.write_string(r, 2, &entry.title).map_err(xlsx_err)?;
        sheet.write_string(r, 3, &entry.manager).map_err(xlsx_err)?;
        for (offset, hours) in entry.hours.iter().enumerate() {
            sheet
                .write_number(r, col(FIRST_MONTH_COL, offset), *hours as f64)
                .map_err(xlsx_err)?;
        }
        sheet
            .write_number(r, totals, entry.total_hours() as f64)
            .map_err(xlsx_err)?;
    }
    Ok(())
}
