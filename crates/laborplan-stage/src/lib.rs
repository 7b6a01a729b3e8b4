//! # laborplan-stage
//!
//! Aggregation and staging engine.
//!
//! Records from the workbook reader are folded once into [`RawAggregates`],
//! then [`stage`] derives every view the report writers consume, including
//! every percent-covered value, so all five reports agree on the same
//! percentages. The denominator comes from [`available_hours`] through the
//! run's [`DesignLayout`].
//!
//! ## Example
//!
//! ```rust
//! use laborplan_core::{AllocationRecord, Design, FundingProbability, WorkingHoursCalendar};
//! use laborplan_stage::{stage, RawAggregates};
//!
//! let records = vec![AllocationRecord {
//!     staff: "Smith, Ann".into(),
//!     project_id: "123".into(),
//!     title: "Ocean Model".into(),
//!     manager: "Boss, Pat".into(),
//!     probability: FundingProbability::certain(),
//!     hours: vec![80; 12],
//! }];
//! let raw = RawAggregates::from_records(&records, Design::FullYear);
//! let staged = stage(&raw, &WorkingHoursCalendar::uniform(160), Design::FullYear, 2018).unwrap();
//! assert_eq!(staged.coverage[0].all, 0.5);
//! ```

pub mod aggregate;

pub use aggregate::RawAggregates;
pub use laborplan_core::available_hours;

use std::collections::{BTreeMap, HashMap};

use laborplan_core::{
    sanitize_staff_name, CoverageRow, Design, DesignLayout, IndividualSchedule, OutputFile,
    ProjectMember, ProjectPathRegistry, ProjectRollup, ProjectSeries, RollupRow, StageError,
    StagedData, WorkingHoursCalendar, POST_ASSESSMENT_MARKER,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Longest worksheet name a workbook accepts
pub const MAX_SHEET_NAME: usize = 31;

/// `hours / available`, rounded to two places.
///
/// `context` names the ratio in the error raised for zero available hours.
pub fn percent_covered(hours: i64, available: u32, context: &str) -> Result<f64, StageError> {
    if available == 0 {
        return Err(StageError::DivisionByZero(context.to_string()));
    }
    let ratio = (Decimal::from(hours) / Decimal::from(available))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    Ok(ratio.to_f64().unwrap_or_default())
}

/// Worksheet name of a staff member in the individual workbook
pub fn staff_sheet_name(staff: &str) -> String {
    sanitize_staff_name(staff).chars().take(MAX_SHEET_NAME).collect()
}

fn sum(hours: &[i64]) -> i64 {
    hours.iter().sum()
}

/// Derive the staged views of one run
pub fn stage(
    raw: &RawAggregates,
    calendar: &WorkingHoursCalendar,
    design: Design,
    fiscal_year: u16,
) -> Result<StagedData, StageError> {
    let layout = DesignLayout::new(design, calendar, fiscal_year);
    let available = layout.available_hours;

    // Percent covered; post-assessment staff only feed their own sum
    let mut coverage = Vec::new();
    let mut post_assessment_hours = 0;
    for (name, hours) in &raw.staff_totals {
        if name.contains(POST_ASSESSMENT_MARKER) {
            post_assessment_hours += sum(hours);
            continue;
        }
        let subset = |map: &BTreeMap<String, Vec<i64>>| {
            map.get(name)
                .map_or(Ok(0.0), |h| percent_covered(sum(h), available, name))
        };
        coverage.push(CoverageRow {
            name: name.clone(),
            high: subset(&raw.staff_high)?,
            low: subset(&raw.staff_low)?,
            all: percent_covered(sum(hours), available, name)?,
        });
    }

    let individuals: Vec<IndividualSchedule> = raw
        .individuals
        .iter()
        .map(|(staff, entries)| IndividualSchedule {
            staff: staff.clone(),
            sheet_name: staff_sheet_name(staff),
            entries: entries.clone(),
        })
        .collect();

    // Projects in first-seen order over the sorted schedules
    let mut projects: Vec<ProjectRollup> = Vec::new();
    let mut position: HashMap<&str, usize> = HashMap::new();
    for schedule in &individuals {
        for entry in &schedule.entries {
            let idx = *position.entry(entry.project_id.as_str()).or_insert_with(|| {
                projects.push(ProjectRollup {
                    id: entry.project_id.clone(),
                    title: raw
                        .project_titles
                        .get(&entry.project_id)
                        .unwrap_or(&entry.title)
                        .clone(),
                    members: Vec::new(),
                });
                projects.len() - 1
            });
            let context = format!("{} on project {}", schedule.staff, entry.project_id);
            projects[idx].members.push(ProjectMember {
                staff: sanitize_staff_name(&schedule.staff),
                manager: entry.manager.clone(),
                hours: entry.hours.clone(),
                probability: entry.probability,
                percent_covered: percent_covered(entry.total_hours(), available, &context)?,
            });
        }
    }

    let registry = ProjectPathRegistry::build(
        OutputFile::Projects.file_name(),
        projects.iter().map(|p| p.id.as_str()),
    )?;

    let mut rollup = Vec::with_capacity(raw.rollup.len());
    for (staff, months) in &raw.rollup {
        let total = sum(design.window(&months[..]));
        rollup.push(RollupRow {
            staff: staff.clone(),
            months: *months,
            total,
            percent_covered: percent_covered(total, available, staff)?,
        });
    }

    let series: Vec<ProjectSeries> = projects
        .iter()
        .map(|p| ProjectSeries {
            project_id: p.id.clone(),
            staff_count: p.staff_count(),
            hours: p.total_hours(),
        })
        .collect();
    let mut staff_per_project = series.clone();
    staff_per_project.sort_by(|a, b| b.staff_count.cmp(&a.staff_count));
    let mut hours_per_project = series;
    hours_per_project.sort_by(|a, b| b.hours.cmp(&a.hours));

    let staged = StagedData {
        coverage,
        post_assessment_hours,
        staff_count: individuals.len(),
        project_count: projects.len(),
        individuals,
        projects,
        project_titles: raw.project_titles.clone(),
        project_probabilities: raw.project_probabilities.clone(),
        rollup,
        registry,
        staff_per_project,
        hours_per_project,
        layout,
    };

    tracing::info!(
        design = %design,
        available_hours = available,
        staff = staged.staff_count,
        projects = staged.project_count,
        post_assessment_hours = staged.post_assessment_hours,
        "staged aggregates"
    );
    Ok(staged)
}
