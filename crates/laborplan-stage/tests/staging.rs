//! Staging engine scenarios

use laborplan_core::{
    AllocationRecord, Design, FundingProbability, StageError, WorkingHoursCalendar,
};
use laborplan_stage::{stage, RawAggregates};
use pretty_assertions::assert_eq;

fn record(staff: &str, id: &str, probability: f64, hours: Vec<i64>) -> AllocationRecord {
    AllocationRecord {
        staff: staff.into(),
        project_id: id.into(),
        title: format!("Project {id}"),
        manager: "Boss, Pat".into(),
        probability: FundingProbability::from_raw(probability).unwrap(),
        hours,
    }
}

fn run(records: &[AllocationRecord], design: Design, calendar: &WorkingHoursCalendar) -> Result<laborplan_core::StagedData, StageError> {
    let raw = RawAggregates::from_records(records, design);
    stage(&raw, calendar, design, 2018)
}

// =============================================================================
// Percent covered
// =============================================================================

#[test]
fn half_year_of_high_probability_work() {
    let calendar = WorkingHoursCalendar::uniform(160);
    let records = vec![
        record("Smith, Ann", "100", 0.6, vec![40; 12]),
        record("Smith, Ann", "200", 0.6, vec![40; 12]),
    ];
    let staged = run(&records, Design::FullYear, &calendar).unwrap();

    assert_eq!(staged.layout.available_hours, 1920);
    assert_eq!(staged.coverage.len(), 1);
    let row = &staged.coverage[0];
    assert_eq!(row.name, "Smith, Ann");
    assert_eq!(row.all, 0.5);
    assert_eq!(row.high, 0.5);
    assert_eq!(row.low, 0.0);
}

#[test]
fn half_probability_counts_as_low() {
    let calendar = WorkingHoursCalendar::uniform(100);
    let records = vec![record("Doe, Jane", "1", 0.5, vec![50, 50, 50])];
    let staged = run(&records, Design::Quarter2, &calendar).unwrap();

    let row = &staged.coverage[0];
    assert_eq!(row.low, 0.5);
    assert_eq!(row.high, 0.0);
    assert_eq!(staged.rollup[0].months, [0; 12]);
}

#[test]
fn post_assessment_staff_excluded_from_percentages() {
    let calendar = WorkingHoursCalendar::uniform(160);
    let records = vec![
        record("**Grad, Pat", "1", 1.0, vec![10; 12]),
        record("Doe, Jane", "1", 1.0, vec![16; 12]),
    ];
    let staged = run(&records, Design::FullYear, &calendar).unwrap();

    let names: Vec<&str> = staged.coverage.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Doe, Jane"]);
    assert_eq!(staged.post_assessment_hours, 120);
    assert_eq!(staged.chart_end_row(), 2);
}

#[test]
fn coverage_sorted_with_defaults() {
    let calendar = WorkingHoursCalendar::uniform(100);
    let records = vec![
        record("Zed, Al", "1", 0.2, vec![100; 6]),
        record("Adams, Bo", "2", 0.9, vec![50; 6]),
        record("Lee, Cy", "3", 1.0, vec![0; 6]),
    ];
    let staged = run(&records, Design::Quarter3To4, &calendar).unwrap();

    let rows: Vec<(&str, f64, f64, f64)> = staged
        .coverage
        .iter()
        .map(|r| (r.name.as_str(), r.high, r.low, r.all))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Adams, Bo", 0.5, 0.0, 0.5),
            ("Lee, Cy", 0.0, 0.0, 0.0),
            ("Zed, Al", 0.0, 1.0, 1.0),
        ]
    );
    assert_eq!(staged.chart_end_row(), 4);
}

// =============================================================================
// Projects
// =============================================================================

#[test]
fn projects_in_first_seen_order_over_sorted_staff() {
    let calendar = WorkingHoursCalendar::uniform(160);
    let records = vec![
        record("Zed, Al", "B", 1.0, vec![1; 12]),
        record("Zed, Al", "C", 1.0, vec![1; 12]),
        record("Adams, Bo", "A", 1.0, vec![2; 12]),
        record("Adams, Bo", "B", 0.3, vec![3; 12]),
        record("Adams, Bo", "Z", 1.0, vec![0; 12]),
    ];
    let staged = run(&records, Design::FullYear, &calendar).unwrap();

    let ids: Vec<&str> = staged.projects.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B", "C"]);
    assert_eq!(staged.registry.get("A").unwrap().sheet, "sheet_0");
    assert_eq!(staged.registry.get("C").unwrap().target, "projects.xlsx#sheet_2!A1");
    assert!(staged.registry.get("Z").is_none());

    let b = &staged.projects[1];
    let members: Vec<&str> = b.members.iter().map(|m| m.staff.as_str()).collect();
    assert_eq!(members, vec!["Adams_Bo", "Zed_Al"]);
    assert_eq!(b.title, "Project B");
    assert_eq!(b.total_hours(), 48);

    assert_eq!(staged.project_count, 3);
    assert_eq!(staged.staff_count, 2);
    // zero-sum records still carry a probability history entry
    assert_eq!(staged.project_probabilities["Z"].len(), 1);
    assert_eq!(staged.project_probabilities["B"].len(), 2);
}

#[test]
fn series_sorted_descending_and_stable() {
    let calendar = WorkingHoursCalendar::uniform(160);
    let records = vec![
        record("Adams, Bo", "A", 1.0, vec![1; 12]),
        record("Adams, Bo", "B", 1.0, vec![5; 12]),
        record("Lee, Cy", "B", 1.0, vec![5; 12]),
        record("Lee, Cy", "C", 1.0, vec![1; 12]),
    ];
    let staged = run(&records, Design::FullYear, &calendar).unwrap();

    let by_staff: Vec<(&str, usize)> = staged
        .staff_per_project
        .iter()
        .map(|s| (s.project_id.as_str(), s.staff_count))
        .collect();
    assert_eq!(by_staff, vec![("B", 2), ("A", 1), ("C", 1)]);

    let by_hours: Vec<(&str, i64)> = staged
        .hours_per_project
        .iter()
        .map(|s| (s.project_id.as_str(), s.hours))
        .collect();
    assert_eq!(by_hours, vec![("B", 120), ("A", 12), ("C", 12)]);
}

// =============================================================================
// Edge cases
// =============================================================================

#[test]
fn empty_input_stages_cleanly() {
    let calendar = WorkingHoursCalendar::uniform(160);
    let staged = run(&[], Design::FullYear, &calendar).unwrap();

    assert!(staged.coverage.is_empty());
    assert!(staged.projects.is_empty());
    assert!(staged.registry.is_empty());
    assert_eq!(staged.staff_count, 0);
    assert_eq!(staged.project_count, 0);
    assert_eq!(staged.chart_end_row(), 1);
}

#[test]
fn empty_input_with_zero_calendar_is_fine() {
    let calendar = WorkingHoursCalendar::uniform(0);
    assert!(run(&[], Design::FullYear, &calendar).is_ok());
}

#[test]
fn zero_calendar_with_hours_is_division_error() {
    let calendar = WorkingHoursCalendar::uniform(0);
    let records = vec![record("Doe, Jane", "1", 1.0, vec![8; 12])];
    let err = run(&records, Design::FullYear, &calendar).unwrap_err();
    assert!(matches!(err, StageError::DivisionByZero(_)));
}

#[test]
fn zero_calendar_with_only_post_assessment_staff_is_division_error() {
    let calendar = WorkingHoursCalendar::uniform(0);
    let records = vec![record("**Grad, Pat", "1", 1.0, vec![40; 12])];
    let err = run(&records, Design::FullYear, &calendar).unwrap_err();
    assert!(matches!(err, StageError::DivisionByZero(ref who) if who.contains("Grad, Pat")));
}

#[test]
fn project_and_rollup_percents_are_rounded_in_staging() {
    let calendar = WorkingHoursCalendar::uniform(160);
    let records = vec![
        record("Doe, Jane", "1", 1.0, vec![100, 100, 100]),
        record("Doe, Jane", "2", 0.3, vec![10, 10, 10]),
    ];
    let staged = run(&records, Design::Quarter2, &calendar).unwrap();

    // 300 / 480 and 30 / 480
    let percents: Vec<f64> = staged
        .projects
        .iter()
        .map(|p| p.members[0].percent_covered)
        .collect();
    assert_eq!(percents, vec![0.63, 0.06]);

    let row = &staged.rollup[0];
    assert_eq!(row.total, 300);
    assert_eq!(row.percent_covered, 0.63);
    assert_eq!(staged.coverage[0].high, row.percent_covered);
}

#[test]
fn rollup_total_stays_inside_window() {
    let calendar = WorkingHoursCalendar::uniform(100);
    let records = vec![record("Doe, Jane", "1", 1.0, vec![10, 20, 30, 40, 50, 60])];
    let staged = run(&records, Design::Quarter3To4, &calendar).unwrap();

    let row = &staged.rollup[0];
    assert_eq!(row.total, 210);
    assert_eq!(row.percent_covered, 0.35);
}

#[test]
fn staging_is_idempotent() {
    let calendar = WorkingHoursCalendar::uniform(160);
    let records = vec![
        record("Zed, Al", "B", 0.4, vec![3; 9]),
        record("Adams, Bo", "A", 0.8, vec![7; 9]),
        record("Adams, Bo", "B", 1.0, vec![2; 9]),
    ];
    let raw = RawAggregates::from_records(&records, Design::Quarter2To4);
    let first = stage(&raw, &calendar, Design::Quarter2To4, 2018).unwrap();
    let second = stage(&raw, &calendar, Design::Quarter2To4, 2018).unwrap();
    assert_eq!(first, second);
}
