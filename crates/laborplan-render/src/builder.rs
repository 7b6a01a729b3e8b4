//! Blank staff workbooks
//!
//! Builder mode writes one input workbook per roster member. Every project
//! worksheet follows [`TemplateLayout`], the same schema the reader extracts
//! from, and lists the whole roster so any staff member can be planned on
//! any project.

use std::fs;
use std::path::{Path, PathBuf};

use laborplan_core::{
    CellPos, Design, DesignLayout, RenderError, StaffName, TemplateLayout, WorkingHoursCalendar,
    MONTHS_PER_YEAR,
};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::{col_to_letter, save, xlsx_err, ReportFormats};

const INSTRUCTIONS: &str = "*Fill in either 1a. for a current project with funding; 1b. for a \
proposal that has not been funded/awarded yet; or 1c. for wp#(s), a task, or WBS that is funded \
from outside your group. If this is a proposal (1b), please enter the probability % of being \
funded/awarded in #6 above.";

/// Workbook file name of a staff member: `"Doe, Jane (JD)"` -> `doe_jane_jd_.xlsx`
pub fn staff_file_name(staff: &str) -> String {
    let name = staff
        .replace([',', ' ', ')', '('], "_")
        .replace("___", "_")
        .replace("__", "_")
        .to_lowercase();
    format!("{name}.xlsx")
}

/// Writes blank per-staff input workbooks
#[derive(Clone, Debug)]
pub struct StaffWorkbookBuilder {
    staff: Vec<StaffName>,
    calendar: WorkingHoursCalendar,
    fiscal_year: u16,
    blank_sheets: u32,
    layout: TemplateLayout,
}

impl StaffWorkbookBuilder {
    /// Builder for `staff` in roster order; every sheet lists them sorted by name
    pub fn new(
        staff: impl IntoIterator<Item = StaffName>,
        calendar: WorkingHoursCalendar,
        fiscal_year: u16,
        blank_sheets: u32,
    ) -> Self {
        Self {
            staff: staff.into_iter().collect(),
            calendar,
            fiscal_year,
            blank_sheets,
            layout: TemplateLayout::V1,
        }
    }

    /// Write one workbook per staff member into `dir`, creating it if needed
    pub fn build(&self, dir: &Path) -> Result<Vec<PathBuf>, RenderError> {
        fs::create_dir_all(dir)?;
        let bytes = self.render_workbook()?;

        let mut written = Vec::with_capacity(self.staff.len());
        for staff in &self.staff {
            let path = dir.join(staff_file_name(staff));
            fs::write(&path, &bytes)?;
            tracing::debug!(staff = %staff, path = %path.display(), "wrote staff workbook");
            written.push(path);
        }
        tracing::info!(
            template = self.layout.version,
            workbooks = written.len(),
            sheets = self.blank_sheets,
            dir = %dir.display(),
            "built staff workbooks"
        );
        Ok(written)
    }

    /// Workbook bytes shared by every staff member
    pub fn render_workbook(&self) -> Result<Vec<u8>, RenderError> {
        if self.blank_sheets == 0 {
            return Err(RenderError::InvalidData(
                "Staff workbooks need at least one project sheet".into(),
            ));
        }
        let mut workbook = Workbook::new();
        let formats = ReportFormats::new();
        let mut roster = self.staff.clone();
        roster.sort();

        for n in 1..=self.blank_sheets {
            let sheet = workbook.add_worksheet();
            sheet.set_name(format!("new_project_{n}")).map_err(xlsx_err)?;
            self.write_sheet(sheet, &formats, &roster)?;
        }
        save(&mut workbook)
    }

    fn write_sheet(
        &self,
        sheet: &mut Worksheet,
        formats: &ReportFormats,
        roster: &[StaffName],
    ) -> Result<(), RenderError> {
        let layout = &self.layout;
        let first_month = layout.first_month_column;
        let totals = layout.totals_column();
        let percent = layout.percent_column();

        sheet.set_column_width(0, 22).ok();
        for c in first_month..=totals {
            sheet.set_column_width(c, 14).ok();
        }
        sheet.set_column_width(percent, 20).ok();

        sheet
            .write_string_with_format(0, 0, "Project Labor Planning", &formats.big_bold)
            .map_err(xlsx_err)?;
        self.write_identification(sheet, formats)?;

        let note_row = layout.comments.row + 1;
        sheet.set_row_height(note_row, 45).map_err(xlsx_err)?;
        sheet
            .merge_range(note_row, 0, note_row, totals, INSTRUCTIONS, &formats.note)
            .map_err(xlsx_err)?;

        self.write_month_header(sheet, formats)?;

        // One row per roster member, banded, with formulas over the month columns
        let first_letter = col_to_letter(first_month);
        let last_letter = col_to_letter(layout.month_column(MONTHS_PER_YEAR - 1));
        let totals_letter = col_to_letter(totals);
        let capacity_row = layout.work_hours_row + 1;
        for (idx, staff) in roster.iter().enumerate() {
            let r = layout.first_staff_row + idx as u32;
            let excel_row = r + 1;
            let (fill, pct) = if idx % 2 == 0 {
                (&formats.row_even, &formats.percent_even)
            } else {
                (&formats.row_odd, &formats.percent_odd)
            };
            sheet
                .write_string_with_format(r, layout.name_column, staff, fill)
                .map_err(xlsx_err)?;
            for slot in 0..MONTHS_PER_YEAR {
                sheet
                    .write_blank(r, layout.month_column(slot), fill)
                    .map_err(xlsx_err)?;
            }
            sheet
                .write_formula_with_format(
                    r,
                    totals,
                    format!("=SUM({first_letter}{excel_row}:{last_letter}{excel_row})").as_str(),
                    fill,
                )
                .map_err(xlsx_err)?;
            sheet
                .write_formula_with_format(
                    r,
                    percent,
                    format!("={totals_letter}{excel_row}/{totals_letter}{capacity_row}").as_str(),
                    pct,
                )
                .map_err(xlsx_err)?;
        }

        let total_row = layout.first_staff_row + roster.len() as u32;
        let first_excel = layout.first_staff_row + 1;
        sheet
            .write_string_with_format(total_row, layout.name_column, "Total", &formats.bold_border)
            .map_err(xlsx_err)?;
        for c in first_month..=totals {
            let letter = col_to_letter(c);
            let formula = if roster.is_empty() {
                "=0".to_string()
            } else {
                format!("=SUM({letter}{first_excel}:{letter}{total_row})")
            };
            sheet
                .write_formula_with_format(total_row, c, formula.as_str(), &formats.bold_border)
                .map_err(xlsx_err)?;
        }
        Ok(())
    }

    /// Numbered labels with their input cells, positioned from the template schema
    fn write_identification(&self, sheet: &mut Worksheet, formats: &ReportFormats) -> Result<(), RenderError> {
        let layout = &self.layout;
        let label_left = |pos: CellPos| CellPos::new(pos.row, pos.col.saturating_sub(1));
        let label_far = |pos: CellPos| CellPos::new(pos.row, pos.col.saturating_sub(2));

        let labels = [
            (label_left(layout.project_number), "1a. Project Number:*"),
            (label_far(layout.proposal_number), "1b. Proposal Number:*"),
            (label_far(layout.wp_number), "1c. WP#(s)/Task/WBS:*"),
            (label_left(layout.title), "2. Title:"),
            (label_left(layout.client), "3. Client:"),
            (label_left(layout.start_date), "4. Start & End Dates:"),
            (label_left(layout.end_date), "through"),
            (label_left(layout.funding_amount), "5. Funding amount:"),
            (label_left(layout.probability), "6. Probability %:"),
            (label_left(layout.manager), "7. Manager:"),
            (label_left(layout.comments), "8. Comments (optional):"),
        ];
        for (pos, label) in labels {
            sheet
                .write_string_with_format(pos.row, pos.col, label, &formats.bold)
                .map_err(xlsx_err)?;
        }

        // Input cells and how many columns each spans
        let inputs = [
            (layout.project_number, 1),
            (layout.proposal_number, 1),
            (layout.wp_number, 2),
            (layout.title, 8),
            (layout.client, 8),
            (layout.start_date, 1),
            (layout.end_date, 1),
            (layout.funding_amount, 1),
            (layout.probability, 1),
            (layout.manager, 3),
            (layout.comments, 11),
        ];
        for (pos, width) in inputs {
            input_cell(sheet, pos, width, &formats.input)?;
        }
        Ok(())
    }

    fn write_month_header(&self, sheet: &mut Worksheet, formats: &ReportFormats) -> Result<(), RenderError> {
        let layout = &self.layout;
        let year = DesignLayout::new(Design::FullYear, &self.calendar, self.fiscal_year);
        let totals = layout.totals_column();
        let percent = layout.percent_column();
        let header = &formats.gray_center_wrap;

        sheet
            .write_string_with_format(layout.quarter_header_row, layout.name_column, "Group Staff", &formats.bold_border)
            .map_err(xlsx_err)?;
        for quarter in &year.quarters {
            sheet
                .merge_range(
                    layout.quarter_header_row,
                    layout.month_column(quarter.first),
                    layout.quarter_header_row,
                    layout.month_column(quarter.last),
                    &quarter.label,
                    &formats.bold_center_border,
                )
                .map_err(xlsx_err)?;
        }
        for c in [totals, percent] {
            sheet
                .write_blank(layout.quarter_header_row, c, &formats.bold_center_border)
                .map_err(xlsx_err)?;
        }

        sheet
            .write_blank(layout.month_header_row, layout.name_column, header)
            .map_err(xlsx_err)?;
        sheet
            .write_string_with_format(layout.work_hours_row, layout.name_column, "Wkg Hrs Available =", header)
            .map_err(xlsx_err)?;
        sheet
            .write_string_with_format(layout.span_row, layout.name_column, "Processing Month =", header)
            .map_err(xlsx_err)?;

        for (slot, month) in year.month_headers.iter().enumerate() {
            let c = layout.month_column(slot);
            sheet
                .write_string_with_format(layout.month_header_row, c, month, header)
                .map_err(xlsx_err)?;
            sheet
                .write_number_with_format(layout.work_hours_row, c, f64::from(year.working_hours[slot]), header)
                .map_err(xlsx_err)?;
            sheet
                .write_string_with_format(layout.span_row, c, &year.spans[slot], header)
                .map_err(xlsx_err)?;
        }

        sheet
            .write_string_with_format(layout.month_header_row, totals, "Total", header)
            .map_err(xlsx_err)?;
        sheet
            .write_number_with_format(layout.work_hours_row, totals, f64::from(year.available_hours), header)
            .map_err(xlsx_err)?;
        sheet.write_blank(layout.span_row, totals, header).map_err(xlsx_err)?;
        sheet
            .merge_range(
                layout.month_header_row,
                percent,
                layout.work_hours_row,
                percent,
                "% of Available Hours Covered",
                header,
            )
            .map_err(xlsx_err)?;
        sheet.write_blank(layout.span_row, percent, header).map_err(xlsx_err)?;
        Ok(())
    }
}

fn input_cell(sheet: &mut Worksheet, pos: CellPos, width: u16, format: &Format) -> Result<(), RenderError> {
    if width <= 1 {
        sheet.write_blank(pos.row, pos.col, format).map_err(xlsx_err)?;
    } else {
        sheet
            .merge_range(pos.row, pos.col, pos.row, pos.col + width - 1, "", format)
            .map_err(xlsx_err)?;
    }
    Ok(())
}
