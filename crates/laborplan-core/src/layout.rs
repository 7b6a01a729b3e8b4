//! Staff workbook template schema
//!
//! The per-staff input workbooks are a structural contract: the reader
//! extracts values from fixed cells and the builder writes the labels and
//! input cells in the same places. Both consume [`TemplateLayout`], so a
//! change to the template is a new layout version rather than a set of edits
//! to magic numbers scattered through extraction code.
//!
//! All coordinates are 0-indexed `(row, column)`.

/// A single cell position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellPos {
    pub row: u32,
    pub col: u16,
}

impl CellPos {
    pub const fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }
}

/// Cell layout of one project worksheet in a staff workbook
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TemplateLayout {
    pub version: u16,

    // Identification block
    pub project_number: CellPos,
    pub proposal_number: CellPos,
    pub wp_number: CellPos,
    pub title: CellPos,
    pub client: CellPos,
    pub start_date: CellPos,
    pub end_date: CellPos,
    pub funding_amount: CellPos,
    pub probability: CellPos,
    pub manager: CellPos,
    pub comments: CellPos,

    // Staff hours table
    pub quarter_header_row: u32,
    pub month_header_row: u32,
    pub work_hours_row: u32,
    pub span_row: u32,
    pub name_column: u16,
    pub first_staff_row: u32,
    pub first_month_column: u16,
}

impl TemplateLayout {
    /// First released template
    pub const V1: TemplateLayout = TemplateLayout {
        version: 1,
        project_number: CellPos::new(2, 1),
        proposal_number: CellPos::new(2, 5),
        wp_number: CellPos::new(2, 9),
        title: CellPos::new(3, 1),
        client: CellPos::new(4, 1),
        start_date: CellPos::new(5, 1),
        end_date: CellPos::new(5, 3),
        funding_amount: CellPos::new(6, 1),
        probability: CellPos::new(7, 1),
        manager: CellPos::new(8, 1),
        comments: CellPos::new(9, 1),
        quarter_header_row: 11,
        month_header_row: 12,
        work_hours_row: 13,
        span_row: 14,
        name_column: 0,
        first_staff_row: 15,
        first_month_column: 1,
    };

    /// Column holding the hours of a zero-based month slot
    pub const fn month_column(&self, slot: usize) -> u16 {
        self.first_month_column + slot as u16
    }

    /// Column of the per-row total after the twelve month columns
    pub const fn totals_column(&self) -> u16 {
        self.first_month_column + 12
    }

    pub const fn percent_column(&self) -> u16 {
        self.first_month_column + 13
    }
}

impl Default for TemplateLayout {
    fn default() -> Self {
        Self::V1
    }
}
