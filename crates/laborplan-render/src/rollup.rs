//! Rollup workbook: organization-wide high-probability hours
//!
//! Each month column carries three colour bands relative to that month's
//! available hours: red at or below 50%, yellow up to 80%, green above.

use laborplan_core::{OutputFile, RenderError, ReportRenderer, StagedData};
use rust_xlsxwriter::{ConditionalFormatCell, ConditionalFormatCellRule, Workbook, Worksheet};

use crate::projects::{write_row_labels, FIRST_STAFF_ROW, HEADER_ROW};
use crate::{col, save, write_month_block, xlsx_err, ReportFormats};

const FIRST_MONTH_COL: u16 = 1;

const LEGEND: [(&str, &str); 3] = [
    ("Trouble", "<= 50% Covered"),
    ("Watch", "51-80% Covered"),
    ("No Worries", "> 81% Covered"),
];

/// Staff rows of high-probability hours with coverage colour bands
#[derive(Clone, Copy, Debug, Default)]
pub struct RollupReport;

impl ReportRenderer for RollupReport {
    fn output(&self) -> OutputFile {
        OutputFile::Rollup
    }

    fn render(&self, staged: &StagedData) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let formats = ReportFormats::new();
        let layout = &staged.layout;
        let totals = col(FIRST_MONTH_COL, layout.totals_offset());
        let percent = col(FIRST_MONTH_COL, layout.percent_offset());

        let sheet = workbook.add_worksheet();
        sheet.set_column_width(0, 28).ok();
        for c in 1..=12 {
            sheet.set_column_width(c, 25).ok();
        }

        sheet
            .write_string_with_format(0, 0, "Staff Planning", &formats.big_bold)
            .map_err(xlsx_err)?;
        sheet
            .write_string_with_format(
                2,
                0,
                "Staff Rollup - Only includes projects that are > 50% funding probability",
                &formats.bold,
            )
            .map_err(xlsx_err)?;
        write_legend(sheet, &formats)?;
        write_row_labels(sheet, &formats, "Technical Group")?;
        write_month_block(
            sheet,
            layout,
            HEADER_ROW,
            FIRST_MONTH_COL,
            &formats.merge_header,
            &formats.gray_center,
            true,
        )?;

        for (idx, row) in staged.rollup.iter().enumerate() {
            let r = FIRST_STAFF_ROW + idx as u32;
            let months = layout.design.window(&row.months[..]);
            sheet.write_string(r, 0, &row.staff).map_err(xlsx_err)?;
            for (offset, hours) in months.iter().enumerate() {
                sheet
                    .write_number(r, col(FIRST_MONTH_COL, offset), *hours as f64)
                    .map_err(xlsx_err)?;
            }
            sheet.write_number(r, totals, row.total as f64).map_err(xlsx_err)?;
            sheet
                .write_number_with_format(r, percent, row.percent_covered, &formats.percent)
                .map_err(xlsx_err)?;
        }

        if !staged.rollup.is_empty() {
            let last_row = FIRST_STAFF_ROW + staged.rollup.len() as u32 - 1;
            let capacities = layout
                .working_hours
                .iter()
                .enumerate()
                .map(|(offset, hours)| (col(FIRST_MONTH_COL, offset), *hours))
                .chain(std::iter::once((totals, layout.available_hours)));
            for (c, capacity) in capacities {
                add_bands(sheet, &formats, c, last_row, capacity)?;
            }
        }

        save(&mut workbook)
    }
}

fn write_legend(sheet: &mut Worksheet, formats: &ReportFormats) -> Result<(), RenderError> {
    sheet.write_string(5, 0, "Key:").map_err(xlsx_err)?;
    sheet.write_string(6, 0, "Key Explanation:").map_err(xlsx_err)?;
    let keys = [&formats.key_red, &formats.key_yellow, &formats.key_green];
    for (c, ((key, explanation), format)) in LEGEND.into_iter().zip(keys).enumerate() {
        let c = 1 + c as u16;
        sheet.write_string_with_format(5, c, key, format).map_err(xlsx_err)?;
        sheet
            .write_string_with_format(6, c, explanation, format)
            .map_err(xlsx_err)?;
    }
    Ok(())
}

/// Thresholds of the three bands for a column with `capacity` available hours
pub fn band_limits(capacity: u32) -> (f64, f64, f64) {
    let capacity = f64::from(capacity);
    (capacity * 0.5, capacity * 0.5 + 0.01, capacity * 0.8)
}

fn add_bands(
    sheet: &mut Worksheet,
    formats: &ReportFormats,
    c: u16,
    last_row: u32,
    capacity: u32,
) -> Result<(), RenderError> {
    let (trouble, watch_from, watch_to) = band_limits(capacity);
    let bands = [
        ConditionalFormatCell::new()
            .set_rule(ConditionalFormatCellRule::LessThanOrEqualTo(trouble))
            .set_format(&formats.band_red),
        ConditionalFormatCell::new()
            .set_rule(ConditionalFormatCellRule::Between(watch_from, watch_to))
            .set_format(&formats.band_yellow),
        ConditionalFormatCell::new()
            .set_rule(ConditionalFormatCellRule::GreaterThan(watch_to))
            .set_format(&formats.band_green),
    ];
    for band in &bands {
        sheet
            .add_conditional_format(FIRST_STAFF_ROW, c, last_row, c, band)
            .map_err(xlsx_err)?;
    }
    Ok(())
}
