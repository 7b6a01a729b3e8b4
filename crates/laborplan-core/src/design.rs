//! Reporting windows
//!
//! A [`Design`] selects which months of the fiscal year appear in every
//! aggregate and every output workbook. Month positions are 1-indexed from
//! the first month of fiscal Quarter 2 (January):
//!
//! | positions | quarter |
//! |-----------|---------|
//! | 1..=3     | Quarter 2 |
//! | 4..=6     | Quarter 3 |
//! | 7..=9     | Quarter 4 |
//! | 10..=12   | Quarter 1 of the next fiscal year |
//!
//! [`DesignLayout`] is the single place where a design is turned into
//! headers, column offsets and the available-hours denominator. Report
//! writers read it and never slice month lists themselves.

use std::fmt;
use std::ops::{Range, RangeInclusive};
use std::str::FromStr;

use crate::{DesignError, WorkingHoursCalendar};

/// Number of month slots in a fiscal year
pub const MONTHS_PER_YEAR: usize = 12;

/// Reporting time window
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Design {
    /// Quarters 2, 3, 4 and 1 (positions 1–12)
    FullYear,
    /// Quarter 2 (positions 1–3)
    Quarter2,
    /// Quarters 2 and 3 (positions 1–6)
    Quarter2To3,
    /// Quarters 2, 3 and 4 (positions 1–9)
    Quarter2To4,
    /// Quarters 3 and 4 (positions 4–9)
    Quarter3To4,
    /// Quarters 3, 4 and 1 (positions 4–12)
    Quarter3To1,
}

impl Design {
    /// Every supported design
    pub const ALL: [Design; 6] = [
        Design::FullYear,
        Design::Quarter2,
        Design::Quarter2To3,
        Design::Quarter2To4,
        Design::Quarter3To4,
        Design::Quarter3To1,
    ];

    /// Configuration keyword
    pub const fn as_str(self) -> &'static str {
        match self {
            Design::FullYear => "full_year",
            Design::Quarter2 => "quarter_2",
            Design::Quarter2To3 => "quarter_2_3",
            Design::Quarter2To4 => "quarter_2_3_4",
            Design::Quarter3To4 => "quarter_3_4",
            Design::Quarter3To1 => "quarter_3_4_1",
        }
    }

    /// Zero-based slot range into a 12-month list
    pub const fn month_range(self) -> Range<usize> {
        match self {
            Design::FullYear => 0..12,
            Design::Quarter2 => 0..3,
            Design::Quarter2To3 => 0..6,
            Design::Quarter2To4 => 0..9,
            Design::Quarter3To4 => 3..9,
            Design::Quarter3To1 => 3..12,
        }
    }

    /// One-based month positions
    pub fn positions(self) -> RangeInclusive<usize> {
        let range = self.month_range();
        (range.start + 1)..=range.end
    }

    pub fn month_count(self) -> usize {
        self.month_range().len()
    }

    /// Sub-list of a 12-month list selected by this design.
    ///
    /// A list shorter than the window yields an empty slice rather than a
    /// partial one.
    pub fn window<T>(self, months: &[T]) -> &[T] {
        months.get(self.month_range()).unwrap_or_default()
    }
}

impl fmt::Display for Design {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Design {
    type Err = DesignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        if let Some(design) = Design::ALL.iter().find(|d| d.as_str() == key) {
            return Ok(*design);
        }
        match key {
            // Offered to operators historically but never given a window
            "quarter_4_1" => Err(DesignError::Unsupported(key.to_string())),
            _ => Err(DesignError::Unknown(key.to_string())),
        }
    }
}

/// Fiscal quarter of a 1-based month position: (quarter, years after the fiscal year)
fn quarter_of(position: usize) -> (u8, u16) {
    match (position - 1) / 3 {
        0 => (2, 0),
        1 => (3, 0),
        2 => (4, 0),
        _ => (1, 1),
    }
}

/// Available working hours in the months selected by `design`
pub fn available_hours(design: Design, calendar: &WorkingHoursCalendar) -> u32 {
    design.window(calendar.months()).iter().map(|m| m.work_hours).sum()
}

/// Two-digit fiscal year label ("2018" -> "18")
pub fn short_year(fiscal_year: u16) -> String {
    format!("{:02}", fiscal_year % 100)
}

/// Merged quarter header spanning a run of month columns
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuarterHeader {
    /// e.g. "Quarter 2 - FY18"
    pub label: String,
    /// Offset of the first month column, relative to the first month in the window
    pub first: usize,
    /// Offset of the last month column (inclusive)
    pub last: usize,
}

/// Everything a writer needs to lay out the months of one design
#[derive(Clone, Debug, PartialEq)]
pub struct DesignLayout {
    pub design: Design,
    pub fiscal_year: u16,
    /// Month headers, e.g. "Jan-18"
    pub month_headers: Vec<String>,
    /// Working hours per month in the window
    pub working_hours: Vec<u32>,
    /// Processing-month spans, e.g. "Dec 27-Jan 24"
    pub spans: Vec<String>,
    /// Sum of `working_hours`; the denominator of every percent-covered value
    pub available_hours: u32,
    /// Span of the whole window, e.g. "Dec 27 - Dec 25"
    pub date_range: String,
    pub quarters: Vec<QuarterHeader>,
}

impl DesignLayout {
    pub fn new(design: Design, calendar: &WorkingHoursCalendar, fiscal_year: u16) -> Self {
        let fy = short_year(fiscal_year);
        let months = design.window(calendar.months());

        let month_headers = months
            .iter()
            .map(|m| format!("{}-{}", m.abbreviation(), fy))
            .collect();
        let working_hours: Vec<u32> = months.iter().map(|m| m.work_hours).collect();
        let spans = months.iter().map(|m| m.span()).collect();
        let available_hours = available_hours(design, calendar);

        let date_range = match (months.first(), months.last()) {
            (Some(first), Some(last)) => format!("{} - {}", first.start, last.end),
            _ => String::new(),
        };

        let mut quarters: Vec<QuarterHeader> = Vec::new();
        for (offset, position) in design.positions().enumerate() {
            let (quarter, years_after) = quarter_of(position);
            let label = format!(
                "Quarter {} - FY{}",
                quarter,
                short_year(fiscal_year + years_after)
            );
            let continues = quarters.last().is_some_and(|q| q.label == label);
            if continues {
                if let Some(current) = quarters.last_mut() {
                    current.last = offset;
                }
            } else {
                quarters.push(QuarterHeader {
                    label,
                    first: offset,
                    last: offset,
                });
            }
        }

        Self {
            design,
            fiscal_year,
            month_headers,
            working_hours,
            spans,
            available_hours,
            date_range,
            quarters,
        }
    }

    pub fn month_count(&self) -> usize {
        self.working_hours.len()
    }

    /// Offset of the totals column, relative to the first month column
    pub fn totals_offset(&self) -> usize {
        self.month_count()
    }

    /// Offset of the percent-covered column, relative to the first month column
    pub fn percent_offset(&self) -> usize {
        self.month_count() + 1
    }

    /// Two-digit fiscal year label
    pub fn fy(&self) -> String {
        short_year(self.fiscal_year)
    }
}
