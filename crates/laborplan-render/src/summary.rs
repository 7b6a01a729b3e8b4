//! Summary workbook: run counts and per-project bar charts

use laborplan_core::{OutputFile, ProjectSeries, RenderError, ReportRenderer, StagedData};
use rust_xlsxwriter::{Chart, ChartType, Workbook, Worksheet};

use crate::{save, workbook_link, xlsx_err, ReportFormats};

pub const SUMMARY_SHEET: &str = "summary";
pub const STAFF_GRAPH_SHEET: &str = "staff_per_project_graph";
pub const HOURS_GRAPH_SHEET: &str = "hours_per_project_graph";
pub const STAFF_DATA_SHEET: &str = "staff_per_project_data";
pub const HOURS_DATA_SHEET: &str = "hours_per_project_data";

const DATA_HEADERS: [&str; 3] = ["Projects", "Number of Staff", "Number of Hours"];

/// Which column of a data sheet a chart plots
#[derive(Clone, Copy)]
struct ChartSpec {
    data_sheet: &'static str,
    graph_sheet: &'static str,
    title: &'static str,
    axis: &'static str,
    value_col: u16,
}

const STAFF_CHART: ChartSpec = ChartSpec {
    data_sheet: STAFF_DATA_SHEET,
    graph_sheet: STAFF_GRAPH_SHEET,
    title: "Staff Number per Project",
    axis: "Number of Staff",
    value_col: 1,
};

const HOURS_CHART: ChartSpec = ChartSpec {
    data_sheet: HOURS_DATA_SHEET,
    graph_sheet: HOURS_GRAPH_SHEET,
    title: "Hours per Project",
    axis: "Number of Hours",
    value_col: 2,
};

/// Staff and project counts plus staff-per-project and hours-per-project charts
#[derive(Clone, Copy, Debug, Default)]
pub struct SummaryReport;

impl ReportRenderer for SummaryReport {
    fn output(&self) -> OutputFile {
        OutputFile::Summary
    }

    fn render(&self, staged: &StagedData) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let formats = ReportFormats::new();

        let sheet = workbook.add_worksheet();
        sheet.set_name(SUMMARY_SHEET).map_err(xlsx_err)?;
        sheet.set_column_width(0, 25).ok();
        sheet.set_column_width(1, 15).ok();
        sheet
            .write_string_with_format(0, 0, "Staff Planning", &formats.big_bold)
            .map_err(xlsx_err)?;
        sheet
            .write_string_with_format(2, 0, "Labor Planning Summary", &formats.bold)
            .map_err(xlsx_err)?;
        let counts = [
            ("Number of Staff:", staged.staff_count),
            ("Number of Projects:", staged.project_count),
        ];
        for (offset, (label, count)) in counts.into_iter().enumerate() {
            let r = 4 + offset as u32;
            sheet.write_string(r, 0, label).map_err(xlsx_err)?;
            sheet
                .write_number_with_format(r, 1, count as f64, &formats.center)
                .map_err(xlsx_err)?;
        }

        let rows = staged.project_count.max(1) as u32;
        for spec in [STAFF_CHART, HOURS_CHART] {
            let chartsheet = workbook.add_chartsheet();
            chartsheet.set_name(spec.graph_sheet).map_err(xlsx_err)?;
            chartsheet
                .insert_chart(0, 0, &project_chart(spec, rows))
                .map_err(xlsx_err)?;
        }

        for (name, series) in [
            (STAFF_DATA_SHEET, &staged.staff_per_project),
            (HOURS_DATA_SHEET, &staged.hours_per_project),
        ] {
            let sheet = workbook.add_worksheet();
            sheet.set_name(name).map_err(xlsx_err)?;
            sheet.set_column_width(0, 20).ok();
            sheet.set_column_width(1, 18).ok();
            sheet.set_column_width(2, 18).ok();
            for (c, header) in DATA_HEADERS.iter().enumerate() {
                sheet
                    .write_string_with_format(0, c as u16, *header, &formats.bold)
                    .map_err(xlsx_err)?;
            }
            write_series(sheet, staged, series, &formats)?;
        }

        save(&mut workbook)
    }
}

fn project_chart(spec: ChartSpec, rows: u32) -> Chart {
    let mut chart = Chart::new(ChartType::Column);
    chart
        .add_series()
        .set_name(spec.axis)
        .set_categories((spec.data_sheet, 1, 0, rows, 0))
        .set_values((spec.data_sheet, 1, spec.value_col, rows, spec.value_col));
    chart.title().set_name(spec.title);
    chart.y_axis().set_name(spec.axis);
    chart.x_axis().set_name("Projects");
    chart.set_style(18);
    chart
}

fn write_series(
    sheet: &mut Worksheet,
    staged: &StagedData,
    series: &[ProjectSeries],
    formats: &ReportFormats,
) -> Result<(), RenderError> {
    for (idx, bar) in series.iter().enumerate() {
        let r = 1 + idx as u32;
        match staged.registry.get(&bar.project_id) {
            Some(link) => {
                let url = workbook_link(&link.target, &bar.project_id, "Click to open project workbook.");
                sheet
                    .write_url_with_format(r, 0, url, &formats.link)
                    .map_err(xlsx_err)?;
            }
            None => {
                sheet.write_string(r, 0, &bar.project_id).map_err(xlsx_err)?;
            }
        }
        sheet
            .write_number(r, 1, bar.staff_count as f64)
            .map_err(xlsx_err)?;
        sheet.write_number(r, 2, bar.hours as f64).map_err(xlsx_err)?;
    }
    Ok(())
}
