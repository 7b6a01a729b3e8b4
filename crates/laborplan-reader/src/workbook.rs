//! Staff workbook extraction
//!
//! Each staff member keeps one workbook with one worksheet per project. For
//! every worksheet, rows whose name column holds a roster name become one
//! [`AllocationRecord`]; everything else on the sheet is ignored. Workbooks
//! are opened one at a time and closed before the next is read.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Range, Reader};
use laborplan_core::{
    resolve_project_id, AllocationRecord, CellPos, Design, FundingProbability, StaffRoster,
    TemplateLayout, NO_TITLE,
};

use crate::ReadError;

/// Recognized workbook extensions (compared case-insensitively)
pub const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// Prefix of office lock files sitting next to an open workbook
const LOCK_FILE_PREFIX: &str = "~$";

/// Everything extracted from a directory of staff workbooks
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Extraction {
    /// In file order, then sheet order, then row order
    pub records: Vec<AllocationRecord>,
    pub files: usize,
    pub sheets: usize,
}

/// Staff workbooks in a directory, sorted by file name
pub fn list_workbooks(dir: &Path) -> Result<Vec<PathBuf>, ReadError> {
    let io_err = |source| ReadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with(LOCK_FILE_PREFIX) {
            continue;
        }
        let recognized = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| WORKBOOK_EXTENSIONS.iter().any(|w| w.eq_ignore_ascii_case(ext)));
        if recognized {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

// ============================================================================
// Cell coercion
// ============================================================================

fn number_text(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        let whole = value as i64;
        whole.to_string()
    } else {
        value.to_string()
    }
}

/// Trimmed text of a label cell (names, titles, managers)
pub fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        None | Some(Data::Empty) => String::new(),
        Some(Data::String(s)) => s.trim().to_string(),
        Some(Data::Float(f)) => number_text(*f),
        Some(Data::Int(i)) => i.to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

/// Identifier cell text; integer literals are normalized ("012" and 12.0 both read "12")
pub fn identifier_text(cell: Option<&Data>) -> String {
    let text = cell_text(cell);
    match text.parse::<i64>() {
        Ok(number) => number.to_string(),
        Err(_) => text,
    }
}

/// Whole hours in a month cell.
///
/// Empty cells are 0. Returns `None` for content that is not a number; the
/// caller records those as 0 as well.
pub fn cell_hours(cell: Option<&Data>) -> Option<i64> {
    match cell {
        None | Some(Data::Empty) => Some(0),
        Some(Data::Int(i)) => Some(*i),
        Some(Data::Float(f)) if f.is_finite() => Some(f.trunc() as i64),
        Some(Data::String(s)) if s.trim().is_empty() => Some(0),
        Some(Data::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    }
}

/// Funding probability of a worksheet.
///
/// Empty cells and non-numeric text mean fully funded. Error cells and
/// out-of-range numbers are returned as `Err` with their display text.
pub fn cell_probability(cell: Option<&Data>) -> Result<FundingProbability, String> {
    let raw = match cell {
        None | Some(Data::Empty | Data::Bool(_)) => return Ok(FundingProbability::certain()),
        Some(Data::Float(f)) => *f,
        Some(Data::Int(i)) => *i as f64,
        Some(Data::String(s)) => match s.trim().trim_end_matches('%').trim_end().parse::<f64>() {
            Ok(value) => value,
            Err(_) => return Ok(FundingProbability::certain()),
        },
        Some(other) => return Err(other.to_string()),
    };
    FundingProbability::from_raw(raw).ok_or_else(|| raw.to_string())
}

// ============================================================================
// Reader
// ============================================================================

/// Worksheet-level values shared by every staff row on the sheet
struct SheetHeader {
    project_number: String,
    proposal_number: String,
    wp_number: String,
    title: String,
    manager: String,
    probability: Result<FundingProbability, String>,
}

/// Extracts allocation records from staff workbooks
#[derive(Clone, Copy, Debug)]
pub struct WorkbookReader<'a> {
    roster: &'a StaffRoster,
    design: Design,
    layout: TemplateLayout,
}

impl<'a> WorkbookReader<'a> {
    pub fn new(roster: &'a StaffRoster, design: Design) -> Self {
        Self {
            roster,
            design,
            layout: TemplateLayout::V1,
        }
    }

    /// Read every staff workbook in `dir`. Any unreadable workbook aborts the run.
    pub fn read_directory(&self, dir: &Path) -> Result<Extraction, ReadError> {
        let mut extraction = Extraction::default();
        for path in list_workbooks(dir)? {
            let (records, sheets) = self.read_workbook(&path)?;
            extraction.files += 1;
            extraction.sheets += sheets;
            extraction.records.extend(records);
        }
        tracing::info!(
            template = self.layout.version,
            files = extraction.files,
            sheets = extraction.sheets,
            records = extraction.records.len(),
            "extracted staff workbooks"
        );
        Ok(extraction)
    }

    /// Records of one workbook and its worksheet count
    pub fn read_workbook(&self, path: &Path) -> Result<(Vec<AllocationRecord>, usize), ReadError> {
        let mut workbook = open_workbook_auto(path).map_err(|e| ReadError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let file = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
        let mut records = Vec::new();
        for (index, sheet) in sheet_names.iter().enumerate() {
            let range = workbook.worksheet_range(sheet).map_err(|e| ReadError::Sheet {
                path: path.to_path_buf(),
                sheet: sheet.clone(),
                message: e.to_string(),
            })?;
            let found = self.read_sheet(&file, sheet, index, &range)?;
            tracing::debug!(file = %file, sheet = %sheet, records = found.len(), "read worksheet");
            records.extend(found);
        }
        Ok((records, sheet_names.len()))
    }

    fn header(&self, range: &Range<Data>) -> SheetHeader {
        let layout = &self.layout;
        let title = cell_text(cell(range, layout.title));
        SheetHeader {
            project_number: identifier_text(cell(range, layout.project_number)),
            proposal_number: identifier_text(cell(range, layout.proposal_number)),
            wp_number: identifier_text(cell(range, layout.wp_number)),
            title: if title.is_empty() { NO_TITLE.to_string() } else { title },
            manager: cell_text(cell(range, layout.manager)),
            probability: cell_probability(cell(range, layout.probability)),
        }
    }

    /// Records of one worksheet. A name repeated on the sheet counts once.
    fn read_sheet(
        &self,
        file: &str,
        sheet: &str,
        index: usize,
        range: &Range<Data>,
    ) -> Result<Vec<AllocationRecord>, ReadError> {
        let Some((last_row, _)) = range.end() else {
            return Ok(Vec::new());
        };
        let layout = &self.layout;
        let mut header: Option<SheetHeader> = None;
        let mut seen = HashSet::new();
        let mut records = Vec::new();

        for row in layout.first_staff_row..=last_row {
            let name = cell_text(cell(range, CellPos::new(row, layout.name_column)));
            if !self.roster.contains(&name) {
                continue;
            }
            if !seen.insert(name.clone()) {
                tracing::debug!(file, sheet, staff = %name, "repeated staff row ignored");
                continue;
            }

            let header = header.get_or_insert_with(|| self.header(range));
            let probability =
                header
                    .probability
                    .clone()
                    .map_err(|value| ReadError::UnparseableProbability {
                        file: file.to_string(),
                        sheet: sheet.to_string(),
                        value,
                    })?;

            let hours = self
                .design
                .month_range()
                .map(|slot| {
                    let pos = CellPos::new(row, layout.month_column(slot));
                    cell_hours(cell(range, pos)).unwrap_or_else(|| {
                        tracing::warn!(file, sheet, staff = %name, slot, "non-numeric hours read as 0");
                        0
                    })
                })
                .collect();

            records.push(AllocationRecord {
                project_id: resolve_project_id(
                    &header.project_number,
                    &header.proposal_number,
                    &header.wp_number,
                    &name,
                    index,
                ),
                title: header.title.clone(),
                manager: header.manager.clone(),
                probability,
                hours,
                staff: name,
            });
        }
        Ok(records)
    }
}

fn cell(range: &Range<Data>, pos: CellPos) -> Option<&Data> {
    range.get_value((pos.row, u32::from(pos.col)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn identifiers_render_as_integers() {
        assert_eq!(identifier_text(Some(&Data::Float(12345.0))), "12345");
        assert_eq!(identifier_text(Some(&Data::Int(77))), "77");
        assert_eq!(identifier_text(Some(&Data::String(" 0042 ".into()))), "42");
        assert_eq!(identifier_text(Some(&Data::String("P-9".into()))), "P-9");
        assert_eq!(identifier_text(Some(&Data::String("   ".into()))), "");
        assert_eq!(identifier_text(None), "");
    }

    #[test]
    fn hours_truncate_and_coerce() {
        assert_eq!(cell_hours(Some(&Data::Float(40.9))), Some(40));
        assert_eq!(cell_hours(Some(&Data::Int(8))), Some(8));
        assert_eq!(cell_hours(Some(&Data::String("16".into()))), Some(16));
        assert_eq!(cell_hours(Some(&Data::Empty)), Some(0));
        assert_eq!(cell_hours(Some(&Data::String("TBD".into()))), None);
        assert_eq!(cell_hours(Some(&Data::Bool(true))), None);
    }

    #[test]
    fn probability_defaults_to_certain() {
        assert_eq!(cell_probability(None), Ok(FundingProbability::certain()));
        assert_eq!(
            cell_probability(Some(&Data::String("unknown".into()))),
            Ok(FundingProbability::certain())
        );
    }

    #[test]
    fn probability_parses_numbers_and_text() {
        assert_eq!(cell_probability(Some(&Data::Float(0.6))).unwrap().value(), dec!(0.60));
        assert_eq!(cell_probability(Some(&Data::Int(75))).unwrap().value(), dec!(0.75));
        assert_eq!(
            cell_probability(Some(&Data::String("40%".into()))).unwrap().value(),
            dec!(0.40)
        );
    }

    #[test]
    fn probability_rejects_errors_and_out_of_range() {
        let err = cell_probability(Some(&Data::Error(calamine::CellErrorType::Ref)));
        assert!(err.is_err());
        assert_eq!(cell_probability(Some(&Data::Float(250.0))), Err("250".to_string()));
    }
}
