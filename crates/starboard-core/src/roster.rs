//! Roster import
//!
//! Spreadsheet decoding happens upstream; this module receives rows of cells
//! and turns them into [`NewStudent`]s. Invalid rows are skipped and counted,
//! never fatal.

use crate::NewStudent;
use serde::{Deserialize, Serialize};

/// Placeholder spreadsheet readers emit for an empty cell
const MISSING_CELL: &str = "nan";
const HEADER_MARKERS: [&str; 2] = ["Name", "姓名"];

/// One decoded spreadsheet row: first cell name, second cell dorm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRow {
    pub name: String,
    #[serde(default)]
    pub dorm: Option<String>,
}

impl RosterRow {
    pub fn new(name: impl Into<String>, dorm: Option<&str>) -> Self {
        Self {
            name: name.into(),
            dorm: dorm.map(str::to_string),
        }
    }

    /// Build a row from raw cells; extra cells are ignored.
    pub fn from_cells<S: AsRef<str>>(cells: &[S]) -> Option<Self> {
        let name = cells.first()?.as_ref();
        let dorm = cells.get(1).map(|c| c.as_ref());
        Some(Self::new(name, dorm))
    }

    fn is_header(&self) -> bool {
        HEADER_MARKERS.iter().any(|m| self.name.contains(m))
    }

    fn to_student(&self) -> Option<NewStudent> {
        let name = clean_cell(&self.name)?;
        Some(NewStudent {
            name,
            dorm_number: self.dorm.as_deref().and_then(clean_cell),
        })
    }
}

fn clean_cell(cell: &str) -> Option<String> {
    let cell = cell.trim();
    if cell.is_empty() || cell == MISSING_CELL {
        None
    } else {
        Some(cell.to_string())
    }
}

/// Outcome of parsing a roster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterImport {
    pub students: Vec<NewStudent>,
    /// Rows dropped for a missing name
    pub skipped: usize,
    pub had_header: bool,
}

impl RosterImport {
    /// Parse rows in order. A first row whose name cell contains a header
    /// marker is skipped.
    pub fn from_rows(rows: &[RosterRow]) -> Self {
        let had_header = rows.first().is_some_and(RosterRow::is_header);
        let body = if had_header { &rows[1..] } else { rows };

        let mut import = RosterImport {
            had_header,
            ..Default::default()
        };
        for row in body {
            match row.to_student() {
                Some(student) => import.students.push(student),
                None => import.skipped += 1,
            }
        }
        import
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_names_are_skipped() {
        let rows = [
            RosterRow::new("Alice", Some("101")),
            RosterRow::new("Bob", Some("101")),
            RosterRow::new("nan", Some("102")),
        ];
        let import = RosterImport::from_rows(&rows);
        assert_eq!(import.len(), 2);
        assert_eq!(import.skipped, 1);
        assert_eq!(import.students[1].name, "Bob");
        assert_eq!(import.students[1].dorm_number.as_deref(), Some("101"));
    }

    #[test]
    fn test_header_row_detection() {
        let rows = [
            RosterRow::new("Student Name", Some("Dorm")),
            RosterRow::new("Alice", None),
        ];
        let import = RosterImport::from_rows(&rows);
        assert!(import.had_header);
        assert_eq!(import.len(), 1);

        let rows = [RosterRow::new("姓名", Some("宿舍")), RosterRow::new("李雷", Some("3"))];
        assert_eq!(RosterImport::from_rows(&rows).len(), 1);

        // Only the first row can be a header
        let rows = [RosterRow::new("Alice", None), RosterRow::new("Name", None)];
        let import = RosterImport::from_rows(&rows);
        assert!(!import.had_header);
        assert_eq!(import.len(), 2);
    }

    #[test]
    fn test_cells_are_trimmed_and_dorms_normalized() {
        let rows = [
            RosterRow::from_cells(&["  Alice ", " nan "]).unwrap(),
            RosterRow::from_cells(&["Bob", ""]).unwrap(),
            RosterRow::from_cells(&["Cara"]).unwrap(),
            RosterRow::from_cells(&["   ", "101"]).unwrap(),
        ];
        let import = RosterImport::from_rows(&rows);
        assert_eq!(import.len(), 3);
        assert_eq!(import.skipped, 1);
        assert_eq!(import.students[0].name, "Alice");
        assert!(import.students.iter().all(|s| s.dorm_number.is_none()));
    }

    #[test]
    fn test_empty_cells() {
        let none: [&str; 0] = [];
        assert_eq!(RosterRow::from_cells(&none), None);
        assert!(RosterImport::from_rows(&[]).is_empty());
    }
}
