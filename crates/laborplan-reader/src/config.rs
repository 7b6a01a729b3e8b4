//! YAML run configuration
//!
//! ```yaml
//! project:
//!   input_directory: /data/labor
//!   staff_file: admin/staff_list.csv
//!   work_hours_csv: admin/work_hours.csv
//!   fiscal_year: 2018
//!   staff_workbook_dir: FY_2018
//!   build_workbooks: false
//!   run_labor_planner: true
//! builder:
//!   num_blank_wksheets: 5
//! planner:
//!   output_directory: outputs
//!   run_design: full_year
//! ```
//!
//! Relative paths resolve against `input_directory`; a relative
//! `input_directory` resolves against the directory holding the config file.
//! Every check runs here, before any workbook is opened.

use std::fs;
use std::path::{Path, PathBuf};

use laborplan_core::{short_year, Design, DesignError, OutputFile};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

const PROJECT_KEY: &str = "project";
const BUILDER_KEY: &str = "builder";
const PLANNER_KEY: &str = "planner";

const PROJECT_KEYS: [&str; 7] = [
    "input_directory",
    "staff_file",
    "work_hours_csv",
    "fiscal_year",
    "staff_workbook_dir",
    "build_workbooks",
    "run_labor_planner",
];
const BUILDER_KEYS: [&str; 1] = ["num_blank_wksheets"];
const PLANNER_KEYS: [&str; 2] = ["output_directory", "run_design"];

/// Accepted fiscal years
const FISCAL_YEARS: std::ops::RangeInclusive<u16> = 1900..=2999;

// ============================================================================
// Errors
// ============================================================================

/// Invalid configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read configuration file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration file must be a YAML mapping")]
    NotAMapping,

    #[error("Missing the \"{0}\" category in the configuration file")]
    MissingSection(String),

    #[error("Missing the following subcategories for the \"{section}\" category in the configuration file: {keys:?}")]
    MissingKeys { section: String, keys: Vec<String> },

    #[error("Fiscal year must be a number, got {0}")]
    FiscalYearType(String),

    #[error("Fiscal year must be a four digit year between 1900 and 2999, got {0}")]
    FiscalYearValue(String),

    #[error("`build_workbooks` and `run_labor_planner` cannot both be true; workbooks must be populated before running the planner")]
    ConflictingModes,

    #[error("Neither `build_workbooks` nor `run_labor_planner` is true; nothing to do")]
    NoMode,

    #[error(transparent)]
    Design(#[from] DesignError),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
}

// ============================================================================
// Raw sections
// ============================================================================

#[derive(Debug, Deserialize)]
struct ProjectSection {
    input_directory: PathBuf,
    staff_file: PathBuf,
    work_hours_csv: PathBuf,
    fiscal_year: Value,
    staff_workbook_dir: PathBuf,
    build_workbooks: bool,
    run_labor_planner: bool,
}

#[derive(Debug, Deserialize)]
struct BuilderSection {
    num_blank_wksheets: u32,
}

#[derive(Debug, Deserialize)]
struct PlannerSection {
    output_directory: PathBuf,
    run_design: String,
}

// ============================================================================
// Validated configuration
// ============================================================================

/// What a run does
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunMode {
    /// Generate blank staff workbooks
    Build { blank_sheets: u32 },
    /// Aggregate staff workbooks into the five reports
    Plan { output_dir: PathBuf, design: Design },
}

/// Validated run configuration with resolved paths
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub input_dir: PathBuf,
    pub staff_file: PathBuf,
    pub work_hours_file: PathBuf,
    pub fiscal_year: u16,
    pub staff_workbook_dir: PathBuf,
    pub mode: RunMode,
}

impl Config {
    /// Read and validate a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_yaml_str(&text, base)
    }

    /// Validate configuration text; a relative `input_directory` resolves against `base`
    pub fn from_yaml_str(text: &str, base: &Path) -> Result<Self, ConfigError> {
        let doc: Value = serde_yaml::from_str(text)?;
        let doc = doc.as_mapping().ok_or(ConfigError::NotAMapping)?;

        let project: ProjectSection = section(doc, PROJECT_KEY, &PROJECT_KEYS)?;
        let fiscal_year = check_fiscal_year(&project.fiscal_year)?;

        let mode = match (project.build_workbooks, project.run_labor_planner) {
            (true, true) => return Err(ConfigError::ConflictingModes),
            (false, false) => return Err(ConfigError::NoMode),
            (true, false) => {
                let builder: BuilderSection = section(doc, BUILDER_KEY, &BUILDER_KEYS)?;
                RunMode::Build {
                    blank_sheets: builder.num_blank_wksheets,
                }
            }
            (false, true) => {
                let planner: PlannerSection = section(doc, PLANNER_KEY, &PLANNER_KEYS)?;
                let design: Design = planner.run_design.parse()?;
                RunMode::Plan {
                    output_dir: planner.output_directory,
                    design,
                }
            }
        };

        let input_dir = base.join(&project.input_directory);
        let mut config = Self {
            staff_file: input_dir.join(&project.staff_file),
            work_hours_file: input_dir.join(&project.work_hours_csv),
            staff_workbook_dir: input_dir.join(&project.staff_workbook_dir),
            input_dir,
            fiscal_year,
            mode,
        };
        if let RunMode::Plan { output_dir, .. } = &mut config.mode {
            *output_dir = config.input_dir.join(&*output_dir);
        }

        config.check_paths()?;
        Ok(config)
    }

    fn check_paths(&self) -> Result<(), ConfigError> {
        check_directory(&self.input_dir)?;
        check_file(&self.staff_file)?;
        check_file(&self.work_hours_file)?;
        if let RunMode::Plan { output_dir, .. } = &self.mode {
            check_directory(&self.staff_workbook_dir)?;
            check_directory(output_dir)?;
        }
        Ok(())
    }

    /// Two-digit fiscal year label
    pub fn fy(&self) -> String {
        short_year(self.fiscal_year)
    }

    /// Location of an output workbook; `None` outside planner mode
    pub fn output_path(&self, file: OutputFile) -> Option<PathBuf> {
        match &self.mode {
            RunMode::Plan { output_dir, .. } => Some(output_dir.join(file.file_name())),
            RunMode::Build { .. } => None,
        }
    }
}

/// Check a section exists with all its keys, then deserialize it
fn section<T: serde::de::DeserializeOwned>(
    doc: &Mapping,
    name: &str,
    required: &[&str],
) -> Result<T, ConfigError> {
    let value = doc
        .get(name)
        .filter(|v| v.is_mapping())
        .ok_or_else(|| ConfigError::MissingSection(name.to_string()))?;

    let missing: Vec<String> = required
        .iter()
        .filter(|key| value.get(**key).is_none())
        .map(|key| (*key).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::MissingKeys {
            section: name.to_string(),
            keys: missing,
        });
    }

    Ok(serde_yaml::from_value(value.clone())?)
}

fn check_fiscal_year(value: &Value) -> Result<u16, ConfigError> {
    let year = match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
    .ok_or_else(|| ConfigError::FiscalYearType(describe(value)))?;

    let in_range = f64::from(*FISCAL_YEARS.start()) <= year && year <= f64::from(*FISCAL_YEARS.end());
    if year.fract() != 0.0 || !in_range {
        return Err(ConfigError::FiscalYearValue(year.to_string()));
    }
    Ok(year as u16)
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'"),
        Value::Null => "nothing".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

fn check_file(path: &Path) -> Result<(), ConfigError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ConfigError::FileNotFound(path.to_path_buf()))
    }
}

fn check_directory(path: &Path) -> Result<(), ConfigError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(ConfigError::DirectoryNotFound(path.to_path_buf()))
    }
}
