//! Position catalog — the read-only table behind position selection.
//!
//! Loaded once at startup from an xlsx workbook. Each row holds a position
//! name, its job description, and one question guide per interview level.

use std::collections::HashMap;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Interview levels. The manager-track levels were added after the original
/// four-level guide; workbooks from that era simply leave them empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "Level 1")]
    Level1,
    #[serde(rename = "Level 2")]
    Level2,
    #[serde(rename = "Level 3")]
    Level3,
    #[serde(rename = "Level 4")]
    Level4,
    #[serde(rename = "Level 3 (Manager Track)")]
    Level3Manager,
    #[serde(rename = "Level 4 (Manager Track)")]
    Level4Manager,
}

impl Level {
    pub const ALL: [Level; 6] = [
        Level::Level1,
        Level::Level2,
        Level::Level3,
        Level::Level4,
        Level::Level3Manager,
        Level::Level4Manager,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Level::Level1 => "Level 1",
            Level::Level2 => "Level 2",
            Level::Level3 => "Level 3",
            Level::Level4 => "Level 4",
            Level::Level3Manager => "Level 3 (Manager Track)",
            Level::Level4Manager => "Level 4 (Manager Track)",
        }
    }

    /// Header candidates for this level's question column, newest scheme
    /// first. The legacy four-level sheets have no manager-track columns.
    fn column_candidates(self) -> &'static [&'static str] {
        match self {
            Level::Level1 => &["question_lv1", "q_lv1"],
            Level::Level2 => &["question_lv2", "q_lv2"],
            Level::Level3 => &["question_lv3", "q_lv3"],
            Level::Level4 => &["question_lv4", "q_lv4"],
            Level::Level3Manager => &["question_lv3_mgr"],
            Level::Level4Manager => &["question_lv4_mgr"],
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Header candidates for the position-name column, newest scheme first.
const POSITION_COLUMNS: &[&str] = &["position", "job_title"];
/// Header candidates for the job-description column, newest scheme first.
const JD_COLUMNS: &[&str] = &["job_description", "jd"];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unable to open the position workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("the workbook does not contain any worksheets")]
    NoWorksheet,

    #[error("the worksheet has no header row")]
    EmptySheet,

    #[error("missing required position column (expected one of {0:?})")]
    MissingPositionColumn(&'static [&'static str]),
}

/// One workbook row: a job description plus the per-level question guide.
/// The question map always carries all six levels; an empty string stands in
/// for columns the workbook does not have.
#[derive(Debug, Clone)]
pub struct PositionRecord {
    pub jd: String,
    pub questions: HashMap<Level, String>,
}

impl PositionRecord {
    pub fn question(&self, level: Level) -> &str {
        self.questions.get(&level).map(String::as_str).unwrap_or("")
    }
}

/// Immutable position-name lookup, preserving workbook row order.
#[derive(Debug, Default)]
pub struct PositionCatalog {
    records: HashMap<String, PositionRecord>,
    order: Vec<String>,
}

impl PositionCatalog {
    pub fn get(&self, position: &str) -> Option<&PositionRecord> {
        self.records.get(position)
    }

    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Reads the first worksheet of the workbook into a catalog.
///
/// Row 1 is the header row; header cells are trimmed and matched
/// case-insensitively against the known column schemes. Blank rows and rows
/// without a position name are skipped. Null-like cells become empty strings.
pub fn load(path: &Path) -> Result<PositionCatalog, LoadError> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(LoadError::NoWorksheet)?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let header_row = rows.next().ok_or(LoadError::EmptySheet)?;
    let headers: Vec<String> = header_row.iter().map(cell_to_string).collect();

    let position_col = resolve_column(&headers, POSITION_COLUMNS)
        .ok_or(LoadError::MissingPositionColumn(POSITION_COLUMNS))?;
    let jd_col = resolve_column(&headers, JD_COLUMNS);

    let mut catalog = PositionCatalog::default();
    for row in rows {
        let cells: Vec<String> = row.iter().map(cell_to_string).collect();
        if cells.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let name = cell_at(&cells, Some(position_col));
        if name.is_empty() {
            continue;
        }

        let questions = Level::ALL
            .iter()
            .map(|&level| {
                let col = resolve_column(&headers, level.column_candidates());
                (level, cell_at(&cells, col))
            })
            .collect();

        let record = PositionRecord {
            jd: cell_at(&cells, jd_col),
            questions,
        };

        if !catalog.records.contains_key(&name) {
            catalog.order.push(name.clone());
        }
        catalog.records.insert(name, record);
    }

    Ok(catalog)
}

/// First-match-wins lookup across the historical header schemes.
fn resolve_column(headers: &[String], candidates: &[&str]) -> Option<usize> {
    candidates
        .iter()
        .find_map(|&candidate| headers.iter().position(|h| h.eq_ignore_ascii_case(candidate)))
}

fn cell_at(cells: &[String], col: Option<usize>) -> String {
    col.and_then(|i| cells.get(i)).cloned().unwrap_or_default()
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    fn write_workbook(dir: &TempDir, headers: &[&str], rows: &[&[&str]]) -> std::path::PathBuf {
        let path = dir.path().join("data.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, header) in headers.iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        for (r, row) in rows.iter().enumerate() {
            for (col, cell) in row.iter().enumerate() {
                sheet.write_string(r as u32 + 1, col as u16, *cell).unwrap();
            }
        }
        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn test_load_current_scheme() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(
            &dir,
            &[
                "position",
                "job_description",
                "question_lv1",
                "question_lv2",
                "question_lv3",
                "question_lv4",
                "question_lv3_mgr",
                "question_lv4_mgr",
            ],
            &[
                &["Data Analyst", "Own reporting.", "Q1", "Q2", "Q3", "Q4", "M3", "M4"],
                &["Backend Engineer", "Build services.", "B1", "B2", "B3", "B4", "BM3", "BM4"],
            ],
        );

        let catalog = load(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.names().to_vec(),
            vec!["Data Analyst", "Backend Engineer"]
        );

        let record = catalog.get("Data Analyst").unwrap();
        assert_eq!(record.jd, "Own reporting.");
        assert_eq!(record.question(Level::Level2), "Q2");
        assert_eq!(record.question(Level::Level4Manager), "M4");
    }

    #[test]
    fn test_load_legacy_scheme_leaves_manager_levels_empty() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(
            &dir,
            &["job_title", "jd", "q_lv1", "q_lv2", "q_lv3", "q_lv4"],
            &[&["Data Analyst", "Legacy JD", "L1", "L2", "L3", "L4"]],
        );

        let catalog = load(&path).unwrap();
        let record = catalog.get("Data Analyst").unwrap();
        assert_eq!(record.jd, "Legacy JD");
        assert_eq!(record.question(Level::Level1), "L1");
        assert_eq!(record.question(Level::Level3Manager), "");
        assert_eq!(record.question(Level::Level4Manager), "");
    }

    #[test]
    fn test_question_map_always_has_all_levels() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(
            &dir,
            &["position", "job_description", "question_lv1"],
            &[&["Data Analyst", "JD", "only one"]],
        );

        let catalog = load(&path).unwrap();
        let record = catalog.get("Data Analyst").unwrap();
        for level in Level::ALL {
            assert!(record.questions.contains_key(&level));
        }
        assert_eq!(record.question(Level::Level4), "");
    }

    #[test]
    fn test_headers_are_trimmed_and_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(
            &dir,
            &["  Position ", " JOB_DESCRIPTION", "Question_Lv1 "],
            &[&["Data Analyst", "JD", "Q1"]],
        );

        let catalog = load(&path).unwrap();
        let record = catalog.get("Data Analyst").unwrap();
        assert_eq!(record.jd, "JD");
        assert_eq!(record.question(Level::Level1), "Q1");
    }

    #[test]
    fn test_blank_rows_and_nameless_rows_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(
            &dir,
            &["position", "job_description", "question_lv1"],
            &[
                &["Data Analyst", "JD", "Q1"],
                &["", "", ""],
                &["", "orphan jd", "orphan question"],
            ],
        );

        let catalog = load(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.names().to_vec(), vec!["Data Analyst"]);
    }

    #[test]
    fn test_duplicate_position_keeps_single_distinct_key() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(
            &dir,
            &["position", "job_description", "question_lv1"],
            &[
                &["Data Analyst", "first", "Q1"],
                &["Data Analyst", "second", "Q1b"],
            ],
        );

        let catalog = load(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.names().to_vec(), vec!["Data Analyst"]);
        // later rows overwrite earlier ones, matching the original table build
        assert_eq!(catalog.get("Data Analyst").unwrap().jd, "second");
    }

    #[test]
    fn test_missing_position_column_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(
            &dir,
            &["job_description", "question_lv1"],
            &[&["JD", "Q1"]],
        );

        let err = load(&path).unwrap_err();
        assert!(matches!(err, LoadError::MissingPositionColumn(_)));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = load(&dir.path().join("absent.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::Workbook(_)));
    }

    #[test]
    fn test_level_serde_round_trip() {
        let level: Level = serde_json::from_str(r#""Level 4 (Manager Track)""#).unwrap();
        assert_eq!(level, Level::Level4Manager);
        assert_eq!(
            serde_json::to_string(&Level::Level2).unwrap(),
            r#""Level 2""#
        );
    }
}
