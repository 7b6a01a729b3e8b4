//! Projects workbook: one worksheet per project

use laborplan_core::{OutputFile, ProjectRollup, RenderError, ReportRenderer, StagedData};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::{col, save, write_month_block, xlsx_err, ReportFormats};

/// Row of the quarter headers; month headers, hours and spans follow
pub(crate) const HEADER_ROW: u32 = 8;
/// First staff row below the header block
pub(crate) const FIRST_STAFF_ROW: u32 = 12;
const FIRST_MONTH_COL: u16 = 1;

/// Staff hours of each project, on the sheet assigned by the path registry
#[derive(Clone, Copy, Debug, Default)]
pub struct ProjectsReport;

impl ReportRenderer for ProjectsReport {
    fn output(&self) -> OutputFile {
        OutputFile::Projects
    }

    fn render(&self, staged: &StagedData) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let formats = ReportFormats::new();

        for project in &staged.projects {
            let link = staged.registry.get(&project.id).ok_or_else(|| {
                RenderError::InvalidData(format!("No worksheet assigned to project {}", project.id))
            })?;
            let sheet = workbook.add_worksheet();
            sheet.set_name(&link.sheet).map_err(xlsx_err)?;
            write_project(sheet, staged, project, &formats)?;
        }
        if staged.projects.is_empty() {
            workbook.add_worksheet();
        }

        save(&mut workbook)
    }
}

/// Gray label column of the header block, shared with the rollup sheet
pub(crate) fn write_row_labels(
    sheet: &mut Worksheet,
    formats: &ReportFormats,
    label: &str,
) -> Result<(), RenderError> {
    sheet
        .write_string_with_format(HEADER_ROW, 0, label, &formats.border)
        .map_err(xlsx_err)?;
    sheet.write_blank(HEADER_ROW + 1, 0, &formats.gray).map_err(xlsx_err)?;
    sheet
        .write_string_with_format(HEADER_ROW + 2, 0, "Wkg Hrs Available =", &formats.gray_right)
        .map_err(xlsx_err)?;
    sheet
        .write_string_with_format(HEADER_ROW + 3, 0, "Processing Month =", &formats.gray_right)
        .map_err(xlsx_err)?;
    Ok(())
}

fn write_project(
    sheet: &mut Worksheet,
    staged: &StagedData,
    project: &ProjectRollup,
    formats: &ReportFormats,
) -> Result<(), RenderError> {
    let layout = &staged.layout;
    sheet.set_column_width(0, 20).ok();
    for c in 1..=12 {
        sheet.set_column_width(c, 24).ok();
    }

    sheet
        .write_string_with_format(0, 0, "Staff Planning", &formats.big_bold)
        .map_err(xlsx_err)?;
    sheet
        .write_string_with_format(2, 0, "Project Rollup", &formats.bold)
        .map_err(xlsx_err)?;

    let details = [
        ("Project ID:", project.id.as_str()),
        ("Project Title:", project.title.as_str()),
        ("Project Manager:", project.manager()),
    ];
    for (offset, (label, value)) in details.into_iter().enumerate() {
        let r = 3 + offset as u32;
        sheet.write_string(r, 0, label).map_err(xlsx_err)?;
        sheet.write_string(r, 1, value).map_err(xlsx_err)?;
    }
    sheet.write_string(6, 0, "Funding Probability:").map_err(xlsx_err)?;
    if let Some(probability) = project.probability() {
        sheet
            .write_number(6, 1, probability.as_f64())
            .map_err(xlsx_err)?;
    }

    write_row_labels(sheet, formats, "Technical Group")?;
    write_month_block(
        sheet,
        layout,
        HEADER_ROW,
        FIRST_MONTH_COL,
        &formats.merge_header,
        &formats.gray_center,
        true,
    )?;

    let totals = col(FIRST_MONTH_COL, layout.totals_offset());
    let percent = col(FIRST_MONTH_COL, layout.percent_offset());
    for (idx, member) in project.members.iter().enumerate() {
        let r = FIRST_STAFF_ROW + idx as u32;
        sheet.write_string(r, 0, &member.staff).map_err(xlsx_err)?;
        for (offset, hours) in member.hours.iter().enumerate() {
            sheet
                .write_number(r, col(FIRST_MONTH_COL, offset), *hours as f64)
                .map_err(xlsx_err)?;
        }
        let total = member.total_hours();
        sheet.write_number(r, totals, total as f64).map_err(xlsx_err)?;
        sheet
            .write_number_with_format(r, percent, member.percent_covered, &formats.percent)
            .map_err(xlsx_err)?;
    }
    Ok(())
}
