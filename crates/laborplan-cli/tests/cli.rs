//! End-to-end runs of the laborplan binary
//!
//! ## Exit Code Contract
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Workbooks built or reports written |
//! | 1 | Configuration, input or output error |

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

const REPORTS: [&str; 5] = [
    "overview_chart.xlsx",
    "projects.xlsx",
    "individual_staff_summary.xlsx",
    "rollup.xlsx",
    "summary.xlsx",
];

// =============================================================================
// Fixtures
// =============================================================================

/// Input directory with roster, calendar, workbook dir and output dir
fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("admin")).unwrap();
    fs::write(
        root.join("admin/staff.csv"),
        "last_name,first_name,middle_initial\nSmith,Ann,\nDoe,Jane,Q\n",
    )
    .unwrap();

    let names = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];
    let mut calendar = String::from("month,work_hrs,start_mon,start_day,end_mon,end_day\n");
    for (idx, name) in names.iter().enumerate() {
        let prev = names[(idx + 11) % 12];
        calendar.push_str(&format!("{name},160,{prev},27,{name},24\n"));
    }
    fs::write(root.join("admin/hours.csv"), calendar).unwrap();
    fs::create_dir_all(root.join("outputs")).unwrap();
    dir
}

fn write_config(root: &Path, build: bool, plan: bool) -> PathBuf {
    let path = root.join("labor.yml");
    fs::write(
        &path,
        format!(
            "project:
  input_directory: .
  staff_file: admin/staff.csv
  work_hours_csv: admin/hours.csv
  fiscal_year: 2018
  staff_workbook_dir: FY_2018
  build_workbooks: {build}
  run_labor_planner: {plan}
builder:
  num_blank_wksheets: 2
planner:
  output_directory: outputs
  run_design: full_year
"
        ),
    )
    .unwrap();
    path
}

/// One staff workbook with a single project sheet
fn write_staff_workbook(root: &Path, probability: f64) {
    let dir = root.join("FY_2018");
    fs::create_dir_all(&dir).unwrap();
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Ocean Model").unwrap();
    sheet.write_number(2, 1, 12345.0).unwrap();
    sheet.write_string(3, 1, "Ocean Model").unwrap();
    sheet.write_number(7, 1, probability).unwrap();
    sheet.write_string(8, 1, "Boss, Pat").unwrap();
    sheet.write_string(15, 0, "Smith, Ann").unwrap();
    for slot in 0..12u16 {
        sheet.write_number(15, 1 + slot, 80.0).unwrap();
    }
    workbook.save(dir.join("smith_ann.xlsx")).unwrap();
}

fn laborplan(config: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_laborplan"))
        .arg(config)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to execute laborplan")
}

// =============================================================================
// Builder mode
// =============================================================================

#[test]
fn build_mode_creates_staff_workbooks() {
    let dir = workspace();
    let config = write_config(dir.path(), true, false);

    let output = laborplan(&config);
    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));

    let built = dir.path().join("FY_2018");
    assert!(built.join("smith_ann.xlsx").is_file());
    assert!(built.join("doe_jane.xlsx").is_file());
}

#[test]
fn built_workbooks_feed_the_planner() {
    let dir = workspace();
    let output = laborplan(&write_config(dir.path(), true, false));
    assert_eq!(output.status.code(), Some(0));

    let output = laborplan(&write_config(dir.path(), false, true));
    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));
    for report in REPORTS {
        assert!(dir.path().join("outputs").join(report).is_file(), "missing {report}");
    }
}

// =============================================================================
// Planner mode
// =============================================================================

#[test]
fn plan_mode_writes_five_reports() {
    let dir = workspace();
    write_staff_workbook(dir.path(), 0.6);
    let config = write_config(dir.path(), false, true);

    let output = laborplan(&config);
    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));

    let mut overview = open_workbook_auto(dir.path().join("outputs/overview_chart.xlsx")).unwrap();
    let sheet = overview.worksheet_range("Sheet1").unwrap();
    assert_eq!(sheet.get_value((2, 0)), Some(&Data::String("Smith, Ann".into())));
    assert_eq!(sheet.get_value((2, 3)), Some(&Data::Float(0.5)));

    let mut projects = open_workbook_auto(dir.path().join("outputs/projects.xlsx")).unwrap();
    assert_eq!(projects.sheet_names().to_vec(), vec!["sheet_0".to_string()]);
}

#[test]
fn bad_probability_names_workbook_and_sheet() {
    let dir = workspace();
    write_staff_workbook(dir.path(), 250.0);
    let config = write_config(dir.path(), false, true);

    let output = laborplan(&config);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("smith_ann.xlsx"), "{stderr}");
    assert!(stderr.contains("Ocean Model"), "{stderr}");
}

// =============================================================================
// Configuration failures
// =============================================================================

#[test]
fn conflicting_modes_exit_1() {
    let dir = workspace();
    let config = write_config(dir.path(), true, true);

    let output = laborplan(&config);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid configuration"));
}

#[test]
fn missing_config_exit_1() {
    let dir = tempfile::tempdir().unwrap();
    let output = laborplan(&dir.path().join("absent.yml"));
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn missing_workbook_dir_in_plan_mode_exit_1() {
    let dir = workspace();
    let config = write_config(dir.path(), false, true);

    let output = laborplan(&config);
    assert_eq!(output.status.code(), Some(1));
    assert!(!dir.path().join("outputs/overview_chart.xlsx").exists());
}
