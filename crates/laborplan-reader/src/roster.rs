//! Staff roster CSV
//!
//! Columns: `last_name, first_name, middle_initial`. The middle initial may
//! be blank or the column may be absent.

use std::path::Path;

use laborplan_core::StaffMember;

use crate::ReadError;

/// Read roster rows in file order. Rows without any name are skipped.
pub fn read_roster(path: &Path) -> Result<Vec<StaffMember>, ReadError> {
    let csv_err = |source| ReadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let mut members = Vec::new();
    for record in reader.deserialize::<StaffMember>() {
        let member = record.map_err(csv_err)?;
        if member.last_name.is_empty() && member.first_name.is_empty() {
            continue;
        }
        members.push(member);
    }

    tracing::debug!(count = members.len(), path = %path.display(), "read staff roster");
    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::with_suffix(".csv").unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_names_in_order() {
        let file = write_csv(
            "last_name,first_name,middle_initial\nSmith,Ann,\nDoe,Jane,Q\n",
        );
        let members = read_roster(file.path()).unwrap();

        let names: Vec<String> = members.iter().map(StaffMember::full_name).collect();
        assert_eq!(names, vec!["Smith, Ann", "Doe, Jane"]);
        assert_eq!(members[0].middle_initial, None);
        assert_eq!(members[1].middle_initial.as_deref(), Some("Q"));
    }

    #[test]
    fn middle_initial_column_optional() {
        let file = write_csv("last_name,first_name\nLee, Al\n");
        let members = read_roster(file.path()).unwrap();
        assert_eq!(members[0].full_name(), "Lee, Al");
    }

    #[test]
    fn blank_rows_skipped() {
        let file = write_csv("last_name,first_name,middle_initial\n,,\nLee,Al,\n");
        assert_eq!(read_roster(file.path()).unwrap().len(), 1);
    }

    #[test]
    fn missing_file_is_error() {
        let err = read_roster(Path::new("/nonexistent/staff.csv")).unwrap_err();
        assert!(matches!(err, ReadError::Csv { .. }));
    }
}
