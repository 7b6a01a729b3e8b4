//! # laborplan-core
//!
//! Core domain model and traits for the laborplan labor forecast aggregator.
//!
//! This crate provides:
//! - Domain types: `WorkingHoursCalendar`, `StaffRoster`, `FundingProbability`,
//!   `AllocationRecord`, `StagedData`
//! - The reporting window: `Design` and `DesignLayout`
//! - The staff workbook cell schema: `TemplateLayout`
//! - Project identifier resolution
//! - Core traits: `ReportRenderer`
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use laborplan_core::{resolve_project_id, Design, DesignLayout, WorkingHoursCalendar};
//!
//! let calendar = WorkingHoursCalendar::uniform(160);
//! let layout = DesignLayout::new(Design::Quarter2To3, &calendar, 2018);
//! assert_eq!(layout.available_hours, 960);
//!
//! assert_eq!(resolve_project_id("", "", "", "Doe, Jane", 2), "Doe_Jane_2");
//! ```

pub mod design;
pub mod layout;

pub use design::{available_hours, short_year, Design, DesignLayout, QuarterHeader, MONTHS_PER_YEAR};
pub use layout::{CellPos, TemplateLayout};

use chrono::Month;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Resolved key of a project worksheet
pub type ProjectId = String;

/// Full staff name as synthesized from the roster ("Last, First")
pub type StaffName = String;

/// Substring marking post-graduate assessment staff
pub const POST_ASSESSMENT_MARKER: &str = "**";

/// Placeholder for worksheets without a title
pub const NO_TITLE: &str = "No Title Listed";

// ============================================================================
// Working Hours Calendar
// ============================================================================

/// Working-hours capacity of one calendar month
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthHours {
    pub month: Month,
    /// Available working hours (the capacity of one FTE)
    pub work_hours: u32,
    /// First day of the processing month, e.g. "Dec 27"
    pub start: String,
    /// Last day of the processing month, e.g. "Jan 24"
    pub end: String,
}

impl MonthHours {
    pub fn new(month: Month, work_hours: u32, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            month,
            work_hours,
            start: start.into(),
            end: end.into(),
        }
    }

    /// Three-letter month name
    pub fn abbreviation(&self) -> &'static str {
        &self.month.name()[..3]
    }

    /// Human-readable processing span, e.g. "Dec 27-Jan 24"
    pub fn span(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }
}

/// Twelve months of working-hours capacity, January through December
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkingHoursCalendar {
    months: Vec<MonthHours>,
}

impl WorkingHoursCalendar {
    /// Build a calendar, enforcing exactly 12 months in calendar order
    pub fn new(months: Vec<MonthHours>) -> Result<Self, CalendarError> {
        if months.len() != MONTHS_PER_YEAR {
            return Err(CalendarError::Length(months.len()));
        }
        for (idx, entry) in months.iter().enumerate() {
            let expected = idx as u32 + 1;
            if entry.month.number_from_month() != expected {
                return Err(CalendarError::OutOfOrder {
                    position: idx + 1,
                    found: entry.month.name().to_string(),
                });
            }
        }
        Ok(Self { months })
    }

    /// Calendar with the same capacity every month
    pub fn uniform(work_hours: u32) -> Self {
        let mut months = Vec::with_capacity(MONTHS_PER_YEAR);
        let mut month = Month::January;
        for _ in 0..MONTHS_PER_YEAR {
            let abbrev = &month.name()[..3];
            months.push(MonthHours::new(
                month,
                work_hours,
                format!("{abbrev} 1"),
                format!("{abbrev} 28"),
            ));
            month = month.succ();
        }
        Self { months }
    }

    pub fn months(&self) -> &[MonthHours] {
        &self.months
    }

    pub fn work_hours(&self) -> Vec<u32> {
        self.months.iter().map(|m| m.work_hours).collect()
    }

    pub fn spans(&self) -> Vec<String> {
        self.months.iter().map(MonthHours::span).collect()
    }

    pub fn total_hours(&self) -> u32 {
        self.months.iter().map(|m| m.work_hours).sum()
    }
}

// ============================================================================
// Staff Roster
// ============================================================================

/// One row of the staff roster
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub last_name: String,
    pub first_name: String,
    #[serde(default)]
    pub middle_initial: Option<String>,
}

impl StaffMember {
    pub fn new(last_name: impl Into<String>, first_name: impl Into<String>) -> Self {
        Self {
            last_name: last_name.into(),
            first_name: first_name.into(),
            middle_initial: None,
        }
    }

    /// Synthesized full name.
    ///
    /// The middle initial is parsed but deliberately left out: names in the
    /// staff workbooks are written as "Last, First".
    pub fn full_name(&self) -> StaffName {
        format!("{}, {}", self.last_name.trim(), self.first_name.trim())
    }
}

/// The universe of people whose hours are tracked
#[derive(Clone, Debug, Default)]
pub struct StaffRoster {
    names: Vec<StaffName>,
    index: HashSet<StaffName>,
}

impl StaffRoster {
    /// Roster from full names; duplicates keep their first position
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StaffName>,
    {
        let mut roster = Self::default();
        for name in names {
            let name = name.into();
            if roster.index.insert(name.clone()) {
                roster.names.push(name);
            }
        }
        roster
    }

    pub fn from_members<'a>(members: impl IntoIterator<Item = &'a StaffMember>) -> Self {
        Self::from_names(members.into_iter().map(StaffMember::full_name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains(name)
    }

    /// Names in roster order
    pub fn names(&self) -> &[StaffName] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ============================================================================
// Funding Probability
// ============================================================================

/// Likelihood (0.00–1.00) that an allocation is realized
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FundingProbability(Decimal);

impl FundingProbability {
    /// Allocations above this value are "high" probability
    pub fn threshold() -> Decimal {
        Decimal::new(5, 1)
    }

    /// 100% funded
    pub fn certain() -> Self {
        Self(Decimal::ONE)
    }

    /// Normalize a raw spreadsheet value.
    ///
    /// Values up to 1 are fractions and values above 1 are percentages;
    /// either way the result is rounded to two decimal places. Returns
    /// `None` for values that cannot be a probability (negative, above 100,
    /// or not finite).
    pub fn from_raw(value: f64) -> Option<Self> {
        if !(0.0..=100.0).contains(&value) {
            return None;
        }
        let raw = Decimal::try_from(value).ok()?;
        let percent = if raw <= Decimal::ONE {
            raw * Decimal::ONE_HUNDRED
        } else {
            raw
        };
        let fraction = (percent / Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Some(Self(fraction))
    }

    /// Strictly above 0.5; exactly 0.5 is low
    pub fn is_high(self) -> bool {
        self.0 > Self::threshold()
    }

    pub fn value(self) -> Decimal {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0.to_f64().unwrap_or(1.0)
    }
}

impl std::fmt::Display for FundingProbability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Project Identity
// ============================================================================

/// Staff name reduced to a worksheet/identifier-safe token.
///
/// Strips `*`, trims, turns spaces into underscores and drops parentheses
/// and commas: `"Doe, Jane"` becomes `"Doe_Jane"`.
pub fn sanitize_staff_name(name: &str) -> String {
    name.replace('*', "")
        .trim()
        .replace(' ', "_")
        .replace(['(', ')', ','], "")
}

/// Hyperlink target of cell A1 on `sheet` inside `workbook`.
///
/// Sheet names with anything beyond letters, digits and underscores, or
/// starting with a digit, are quoted with embedded apostrophes doubled:
/// `O'Neil_Mary` -> `'O''Neil_Mary'!A1`.
pub fn sheet_link_target(workbook: &str, sheet: &str) -> String {
    let plain = sheet
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !sheet.starts_with(|c: char| c.is_ascii_digit());
    if plain && !sheet.is_empty() {
        format!("{workbook}#{sheet}!A1")
    } else {
        format!("{workbook}#'{}'!A1", sheet.replace('\'', "''"))
    }
}

/// Resolve the key of a project worksheet.
///
/// Priority: project number, then proposal number, then work-package
/// number, then `{sanitized staff}_{sheet index}`. Blank identifiers count as
/// missing.
pub fn resolve_project_id(
    project_number: &str,
    proposal_number: &str,
    wp_number: &str,
    staff_name: &str,
    sheet_index: usize,
) -> ProjectId {
    [project_number, proposal_number, wp_number]
        .into_iter()
        .map(str::trim)
        .find(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}_{}", sanitize_staff_name(staff_name), sheet_index))
}

// ============================================================================
// Allocation Records
// ============================================================================

/// Hours one staff member forecasts on one project worksheet
#[derive(Clone, Debug, PartialEq)]
pub struct AllocationRecord {
    pub staff: StaffName,
    pub project_id: ProjectId,
    pub title: String,
    pub manager: String,
    pub probability: FundingProbability,
    /// One entry per month in the active design window
    pub hours: Vec<i64>,
}

impl AllocationRecord {
    pub fn total_hours(&self) -> i64 {
        self.hours.iter().sum()
    }

    /// Zero-sum records stay out of the individual and project views
    pub fn has_hours(&self) -> bool {
        self.total_hours() != 0
    }

    pub fn is_high_probability(&self) -> bool {
        self.probability.is_high()
    }

    pub fn is_post_assessment(&self) -> bool {
        self.staff.contains(POST_ASSESSMENT_MARKER)
    }
}

// ============================================================================
// Staged Data
// ============================================================================

/// Output workbooks of a reporting run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputFile {
    Overview,
    Projects,
    Individual,
    Rollup,
    Summary,
}

impl OutputFile {
    pub const ALL: [OutputFile; 5] = [
        OutputFile::Overview,
        OutputFile::Projects,
        OutputFile::Individual,
        OutputFile::Rollup,
        OutputFile::Summary,
    ];

    pub const fn file_name(self) -> &'static str {
        match self {
            OutputFile::Overview => "overview_chart.xlsx",
            OutputFile::Projects => "projects.xlsx",
            OutputFile::Individual => "individual_staff_summary.xlsx",
            OutputFile::Rollup => "rollup.xlsx",
            OutputFile::Summary => "summary.xlsx",
        }
    }
}

/// Percent of available hours covered for one staff member
#[derive(Clone, Debug, PartialEq)]
pub struct CoverageRow {
    pub name: StaffName,
    /// Probability > 0.5 only
    pub high: f64,
    /// Probability <= 0.5 only
    pub low: f64,
    /// All allocations
    pub all: f64,
}

/// One project line on a staff member's individual schedule
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleEntry {
    pub project_id: ProjectId,
    pub manager: String,
    pub hours: Vec<i64>,
    pub title: String,
    pub probability: FundingProbability,
}

impl ScheduleEntry {
    pub fn total_hours(&self) -> i64 {
        self.hours.iter().sum()
    }
}

/// Nonzero allocations of one staff member
#[derive(Clone, Debug, PartialEq)]
pub struct IndividualSchedule {
    pub staff: StaffName,
    /// Worksheet name in the individual workbook (sanitized staff name)
    pub sheet_name: String,
    pub entries: Vec<ScheduleEntry>,
}

/// One staff member's hours on a project
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectMember {
    /// Sanitized staff name
    pub staff: String,
    pub manager: String,
    pub hours: Vec<i64>,
    pub probability: FundingProbability,
    /// Total hours over available hours, rounded to two places
    pub percent_covered: f64,
}

impl ProjectMember {
    pub fn total_hours(&self) -> i64 {
        self.hours.iter().sum()
    }
}

/// All staff with nonzero hours on one project
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectRollup {
    pub id: ProjectId,
    pub title: String,
    pub members: Vec<ProjectMember>,
}

impl ProjectRollup {
    /// Manager as reported by the first staff row
    pub fn manager(&self) -> &str {
        self.members.first().map(|m| m.manager.as_str()).unwrap_or("")
    }

    /// Probability as reported by the first staff row
    pub fn probability(&self) -> Option<FundingProbability> {
        self.members.first().map(|m| m.probability)
    }

    pub fn staff_count(&self) -> usize {
        self.members.len()
    }

    pub fn total_hours(&self) -> i64 {
        self.members.iter().map(ProjectMember::total_hours).sum()
    }
}

/// High-probability hours of one staff member for the organizational rollup
#[derive(Clone, Debug, PartialEq)]
pub struct RollupRow {
    pub staff: StaffName,
    /// Position-aligned: slot 0 is month position 1
    pub months: [i64; MONTHS_PER_YEAR],
    /// Hours inside the design window
    pub total: i64,
    /// `total` over available hours, rounded to two places
    pub percent_covered: f64,
}

/// Project bar of the summary charts
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectSeries {
    pub project_id: ProjectId,
    pub staff_count: usize,
    pub hours: i64,
}

/// Worksheet handle assigned to a project in the projects workbook
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectLink {
    /// Worksheet name, e.g. "sheet_0"
    pub sheet: String,
    /// Hyperlink target, e.g. "projects.xlsx#sheet_0!A1"
    pub target: String,
}

/// Unique worksheet handle per project id
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectPathRegistry {
    links: HashMap<ProjectId, ProjectLink>,
    order: Vec<ProjectId>,
}

impl ProjectPathRegistry {
    /// Assign `sheet_{n}` handles in iteration order.
    ///
    /// Project ids are unique keys by construction, so a repeat means the
    /// upstream mapping is broken.
    pub fn build<I, S>(workbook: &str, ids: I) -> Result<Self, StageError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::default();
        for (idx, id) in ids.into_iter().enumerate() {
            let id = id.as_ref();
            if registry.links.contains_key(id) {
                return Err(StageError::DuplicateProjectId(id.to_string()));
            }
            let sheet = format!("sheet_{idx}");
            let target = sheet_link_target(workbook, &sheet);
            registry.links.insert(id.to_string(), ProjectLink { sheet, target });
            registry.order.push(id.to_string());
        }
        Ok(registry)
    }

    pub fn get(&self, id: &str) -> Option<&ProjectLink> {
        self.links.get(id)
    }

    /// Project ids in assignment order
    pub fn ids(&self) -> &[ProjectId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Everything the report writers consume, derived once per run
#[derive(Clone, Debug, PartialEq)]
pub struct StagedData {
    pub layout: DesignLayout,
    /// Sorted by name; post-assessment staff excluded
    pub coverage: Vec<CoverageRow>,
    /// Total hours of post-assessment staff
    pub post_assessment_hours: i64,
    /// Sorted by name
    pub individuals: Vec<IndividualSchedule>,
    /// First-seen order over the sorted individual schedules
    pub projects: Vec<ProjectRollup>,
    pub project_titles: BTreeMap<ProjectId, String>,
    pub project_probabilities: BTreeMap<ProjectId, Vec<FundingProbability>>,
    /// Sorted by name
    pub rollup: Vec<RollupRow>,
    pub registry: ProjectPathRegistry,
    /// Descending staff count
    pub staff_per_project: Vec<ProjectSeries>,
    /// Descending hours
    pub hours_per_project: Vec<ProjectSeries>,
    /// Staff with at least one nonzero record
    pub staff_count: usize,
    pub project_count: usize,
}

impl StagedData {
    /// Last data row of the overview chart range, as used by the chart series
    pub fn chart_end_row(&self) -> usize {
        self.coverage.len() + 1
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Output workbook rendering
pub trait ReportRenderer {
    /// Workbook this renderer produces
    fn output(&self) -> OutputFile;

    /// Render the staged data to workbook bytes
    fn render(&self, staged: &StagedData) -> Result<Vec<u8>, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Invalid reporting design keyword
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DesignError {
    #[error("Unknown design '{0}'; expected one of full_year, quarter_2, quarter_2_3, quarter_2_3_4, quarter_3_4, quarter_3_4_1")]
    Unknown(String),

    #[error("Design '{0}' is not supported")]
    Unsupported(String),
}

/// Malformed working-hours calendar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("Working-hours calendar must have 12 months, found {0}")]
    Length(usize),

    #[error("Working-hours calendar out of order: row {position} is {found}")]
    OutOfOrder { position: usize, found: String },
}

/// Staging error
#[derive(Debug, Error)]
pub enum StageError {
    #[error("Division by zero: no available working hours for {0}")]
    DivisionByZero(String),

    #[error("Duplicate project IDs detected for: {0}")]
    DuplicateProjectId(ProjectId),
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================
