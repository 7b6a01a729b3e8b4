//! # laborplan-reader
//!
//! Readers for everything a laborplan run consumes.
//!
//! This crate provides:
//! - YAML configuration loading and validation (`Config`)
//! - Staff roster CSV (`read_roster`)
//! - Working-hours calendar CSV (`read_calendar`)
//! - Staff workbook extraction into `AllocationRecord`s (`WorkbookReader`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use laborplan_core::StaffRoster;
//! use laborplan_reader::{read_calendar, read_roster, Config, RunMode, WorkbookReader};
//!
//! let config = Config::load("labor.yml".as_ref())?;
//! let roster = StaffRoster::from_members(&read_roster(&config.staff_file)?);
//! let calendar = read_calendar(&config.work_hours_file)?;
//! if let RunMode::Plan { design, .. } = config.mode {
//!     let extraction = WorkbookReader::new(&roster, design).read_directory(&config.staff_workbook_dir)?;
//!     println!("{} records", extraction.records.len());
//! }
//! ```

pub mod calendar;
pub mod config;
pub mod roster;
pub mod workbook;

pub use calendar::read_calendar;
pub use config::{Config, ConfigError, RunMode};
pub use roster::read_roster;
pub use workbook::{list_workbooks, Extraction, WorkbookReader, WORKBOOK_EXTENSIONS};

use laborplan_core::CalendarError;
use std::path::PathBuf;
use thiserror::Error;

/// Error reading an input file
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Unknown month '{month}' in {}", .path.display())]
    UnknownMonth { path: PathBuf, month: String },

    #[error("Invalid working-hours calendar {}: {source}", .path.display())]
    Calendar {
        path: PathBuf,
        #[source]
        source: CalendarError,
    },

    #[error("The following file is either open by another user or cannot be opened: {}: {message}", .path.display())]
    Workbook { path: PathBuf, message: String },

    #[error("Failed to read sheet '{sheet}' in {}: {message}", .path.display())]
    Sheet {
        path: PathBuf,
        sheet: String,
        message: String,
    },

    #[error("Probability '{value}' is not a number for file {file} on sheet {sheet}")]
    UnparseableProbability {
        file: String,
        sheet: String,
        value: String,
    },
}
