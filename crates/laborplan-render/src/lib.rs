//! # laborplan-render
//!
//! Report and staff workbook writers for laborplan.
//!
//! Five renderers turn one [`StagedData`] into the output workbooks of a
//! reporting run:
//!
//! - [`OverviewReport`]: percent of FTE covered per staff member, with a stacked column chart
//! - [`ProjectsReport`]: one worksheet per project
//! - [`IndividualReport`]: one worksheet per staff member
//! - [`RollupReport`]: organization rollup with coverage colour bands
//! - [`SummaryReport`]: counts plus staff-per-project and hours-per-project charts
//!
//! [`StaffWorkbookBuilder`] writes the blank per-staff input workbooks that the
//! reader later consumes.
//!
//! ## Example
//!
//! ```rust
//! use laborplan_core::{Design, DesignLayout, ReportRenderer, StagedData, WorkingHoursCalendar};
//! use laborplan_render::RollupReport;
//! # fn empty() -> StagedData {
//! #     StagedData {
//! #         layout: DesignLayout::new(Design::FullYear, &WorkingHoursCalendar::uniform(160), 2018),
//! #         coverage: vec![], post_assessment_hours: 0, individuals: vec![], projects: vec![],
//! #         project_titles: Default::default(), project_probabilities: Default::default(),
//! #         rollup: vec![], registry: Default::default(), staff_per_project: vec![],
//! #         hours_per_project: vec![], staff_count: 0, project_count: 0,
//! #     }
//! # }
//!
//! let bytes = RollupReport.render(&empty()).unwrap();
//! assert!(!bytes.is_empty());
//! ```

pub mod builder;
pub mod formats;
pub mod individual;
pub mod overview;
pub mod projects;
pub mod rollup;
pub mod summary;

pub use builder::{staff_file_name, StaffWorkbookBuilder};
pub use formats::ReportFormats;
pub use individual::IndividualReport;
pub use overview::OverviewReport;
pub use projects::ProjectsReport;
pub use rollup::RollupReport;
pub use summary::SummaryReport;

use laborplan_core::{DesignLayout, OutputFile, RenderError, ReportRenderer, StagedData};
use rust_xlsxwriter::{Format, Url, Workbook, Worksheet, XlsxError};

/// The five report renderers in output order
pub fn renderers() -> Vec<Box<dyn ReportRenderer>> {
    vec![
        Box::new(OverviewReport),
        Box::new(ProjectsReport),
        Box::new(IndividualReport),
        Box::new(RollupReport),
        Box::new(SummaryReport),
    ]
}

/// Render every report workbook of a run
pub fn render_all(staged: &StagedData) -> Result<Vec<(OutputFile, Vec<u8>)>, RenderError> {
    renderers()
        .iter()
        .map(|renderer| {
            let bytes = renderer.render(staged)?;
            tracing::debug!(file = renderer.output().file_name(), bytes = bytes.len(), "rendered report");
            Ok((renderer.output(), bytes))
        })
        .collect()
}

// ============================================================================
// Shared helpers
// ============================================================================

pub(crate) fn xlsx_err(e: XlsxError) -> RenderError {
    RenderError::Format(e.to_string())
}

pub(crate) fn save(workbook: &mut Workbook) -> Result<Vec<u8>, RenderError> {
    workbook
        .save_to_buffer()
        .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))
}

/// Column `offset` places to the right of `first`
pub(crate) fn col(first: u16, offset: usize) -> u16 {
    first + offset as u16
}

/// Spreadsheet column letter (0 -> A, 26 -> AA)
pub(crate) fn col_to_letter(col: u16) -> String {
    let mut result = String::new();
    let mut n = u32::from(col);
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// Link to a location in a sibling workbook, e.g. `projects.xlsx#sheet_0!A1`
pub(crate) fn workbook_link(target: &str, text: &str, tip: &str) -> Url {
    Url::new(format!("file:///{target}")).set_text(text).set_tip(tip)
}

/// Write quarter headers across `top` and the month block on the three rows
/// below it: month names, working hours, processing spans.
///
/// The totals column follows the month columns; with `percent_header` a
/// "Percent Covered" column follows it.
pub(crate) fn write_month_block(
    sheet: &mut Worksheet,
    layout: &DesignLayout,
    top: u32,
    first_col: u16,
    merge: &Format,
    cell: &Format,
    percent_header: bool,
) -> Result<(), RenderError> {
    for quarter in &layout.quarters {
        let first = col(first_col, quarter.first);
        let last = col(first_col, quarter.last);
        if first == last {
            sheet
                .write_string_with_format(top, first, &quarter.label, merge)
                .map_err(xlsx_err)?;
        } else {
            sheet
                .merge_range(top, first, top, last, &quarter.label, merge)
                .map_err(xlsx_err)?;
        }
    }

    for (offset, header) in layout.month_headers.iter().enumerate() {
        let c = col(first_col, offset);
        sheet
            .write_string_with_format(top + 1, c, header, cell)
            .map_err(xlsx_err)?;
        sheet
            .write_number_with_format(top + 2, c, f64::from(layout.working_hours[offset]), cell)
            .map_err(xlsx_err)?;
        sheet
            .write_string_with_format(top + 3, c, &layout.spans[offset], cell)
            .map_err(xlsx_err)?;
    }

    let totals = col(first_col, layout.totals_offset());
    sheet.write_string_with_format(top + 1, totals, "Total", cell).map_err(xlsx_err)?;
    sheet
        .write_number_with_format(top + 2, totals, f64::from(layout.available_hours), cell)
        .map_err(xlsx_err)?;
    sheet
        .write_string_with_format(top + 3, totals, &layout.date_range, cell)
        .map_err(xlsx_err)?;

    if percent_header {
        let percent = col(first_col, layout.percent_offset());
        sheet.write_blank(top + 1, percent, cell).map_err(xlsx_err)?;
        sheet
            .write_string_with_format(top + 2, percent, "Percent Covered", cell)
            .map_err(xlsx_err)?;
        sheet.write_blank(top + 3, percent, cell).map_err(xlsx_err)?;
    }
    Ok(())
}
