//! laborplan CLI - Labor Forecast Aggregation
//!
//! Reads a YAML configuration and either builds blank staff workbooks or
//! rolls the filled-in staff workbooks up into the five report workbooks.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use laborplan_core::{Design, StaffRoster, WorkingHoursCalendar};
use laborplan_reader::{read_calendar, read_roster, Config, RunMode, WorkbookReader};
use laborplan_render::{render_all, StaffWorkbookBuilder};
use laborplan_stage::{stage, RawAggregates};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "laborplan")]
#[command(author, version, about = "Labor forecast aggregation", long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match run(&cli.config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)
        .with_context(|| format!("Invalid configuration {}", config_path.display()))?;

    let members = read_roster(&config.staff_file).context("Failed to read staff roster")?;
    let roster = StaffRoster::from_members(&members);
    let calendar =
        read_calendar(&config.work_hours_file).context("Failed to read working hours")?;
    tracing::info!(staff = roster.len(), fiscal_year = config.fiscal_year, "loaded inputs");

    match &config.mode {
        RunMode::Build { blank_sheets } => {
            let builder = StaffWorkbookBuilder::new(
                roster.names().iter().cloned(),
                calendar,
                config.fiscal_year,
                *blank_sheets,
            );
            builder
                .build(&config.staff_workbook_dir)
                .context("Failed to build staff workbooks")?;
        }
        RunMode::Plan { design, .. } => {
            plan(&config, &roster, &calendar, *design)?;
        }
    }
    Ok(())
}

fn plan(
    config: &Config,
    roster: &StaffRoster,
    calendar: &WorkingHoursCalendar,
    design: Design,
) -> Result<()> {
    let extraction = WorkbookReader::new(roster, design)
        .read_directory(&config.staff_workbook_dir)
        .context("Failed to read staff workbooks")?;
    let raw = RawAggregates::from_records(&extraction.records, design);
    let staged = stage(&raw, calendar, design, config.fiscal_year)
        .context("Failed to stage aggregates")?;

    for (output, bytes) in render_all(&staged).context("Failed to render reports")? {
        let path = config
            .output_path(output)
            .context("No output directory outside planner mode")?;
        fs::write(&path, bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote report");
    }
    Ok(())
}
