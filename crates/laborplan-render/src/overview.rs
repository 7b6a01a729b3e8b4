//! Overview workbook: proportion of FTE covered per staff member

use laborplan_core::{sheet_link_target, OutputFile, RenderError, ReportRenderer, StagedData};
use rust_xlsxwriter::{Chart, ChartType, Workbook};

use crate::{save, workbook_link, xlsx_err, ReportFormats};

/// Worksheet holding the coverage table; the chart ranges refer to it by name
pub const OVERVIEW_SHEET: &str = "Sheet1";

const HEADERS: [&str; 3] = [
    "> 50% Funding Probability",
    "<= 50% Funded Probability",
    "All Projects",
];

const FIRST_DATA_ROW: u32 = 2;

/// Percent covered table with a stacked column chart of the high and low shares
#[derive(Clone, Copy, Debug, Default)]
pub struct OverviewReport;

impl ReportRenderer for OverviewReport {
    fn output(&self) -> OutputFile {
        OutputFile::Overview
    }

    fn render(&self, staged: &StagedData) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let formats = ReportFormats::new();
        let target = OutputFile::Individual.file_name();

        let sheet = workbook.add_worksheet();
        sheet.set_name(OVERVIEW_SHEET).map_err(xlsx_err)?;
        sheet.set_column_width(0, 20).ok();
        for c in 1..=3 {
            sheet.set_column_width(c, 28).ok();
        }

        sheet
            .merge_range(
                0,
                1,
                0,
                3,
                &format!("Proportion of FTE Covered in FY{}", staged.layout.fy()),
                &formats.merge_header,
            )
            .map_err(xlsx_err)?;
        sheet
            .write_string_with_format(1, 0, "Staff Member", &formats.bold)
            .map_err(xlsx_err)?;
        for (c, header) in HEADERS.iter().enumerate() {
            sheet
                .write_string_with_format(1, 1 + c as u16, *header, &formats.bold_center)
                .map_err(xlsx_err)?;
        }

        for (idx, row) in staged.coverage.iter().enumerate() {
            let r = FIRST_DATA_ROW + idx as u32;
            // Staff without nonzero work have no sheet to link to
            match staged.individuals.iter().find(|s| s.staff == row.name) {
                Some(schedule) => {
                    let link = workbook_link(
                        &sheet_link_target(target, &schedule.sheet_name),
                        &row.name,
                        "Click name to open source workbook.",
                    );
                    sheet
                        .write_url_with_format(r, 0, link, &formats.link)
                        .map_err(xlsx_err)?;
                }
                None => {
                    sheet.write_string(r, 0, &row.name).map_err(xlsx_err)?;
                }
            }
            for (c, value) in [row.high, row.low, row.all].into_iter().enumerate() {
                sheet
                    .write_number_with_format(r, 1 + c as u16, value, &formats.percent)
                    .map_err(xlsx_err)?;
            }
        }

        // Series always cover at least one row so an empty table still charts
        let end_row = (staged.chart_end_row() as u32).max(FIRST_DATA_ROW);
        let mut chart = Chart::new(ChartType::ColumnStacked);
        for (name, value_col) in [("Prob > 50%", 1), ("Prob <= 50%", 2)] {
            chart
                .add_series()
                .set_name(name)
                .set_categories((OVERVIEW_SHEET, FIRST_DATA_ROW, 0, end_row, 0))
                .set_values((OVERVIEW_SHEET, FIRST_DATA_ROW, value_col, end_row, value_col));
        }
        chart.title().set_name("Estimated Project Hours");
        chart.y_axis().set_name("Proportion of FTE");
        chart.set_style(18);
        chart.set_width(1200).set_height(576);
        sheet.insert_chart(2, 5, &chart).map_err(xlsx_err)?;

        save(&mut workbook)
    }
}

