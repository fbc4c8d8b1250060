//! Interview result report export.
//!
//! Assembles a docx with a fixed section layout from the facts of one
//! interview. Pure in its inputs aside from the embedded generation
//! timestamp.

use std::io::Cursor;

use chrono::{Local, NaiveDate};
use docx_rs::{Docx, Paragraph, Run};
use serde::Deserialize;
use thiserror::Error;

use crate::catalog::Level;

/// MIME type of the exported document.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Maximum number of résumé characters carried into the report.
const RESUME_EXCERPT_LIMIT: usize = 500;

/// Run sizes in half-points.
const TITLE_SIZE: usize = 40;
const HEADING_SIZE: usize = 32;

/// Final hiring decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Decision {
    Pass,
    Fail,
}

impl Decision {
    pub fn label(self) -> &'static str {
        match self {
            Decision::Pass => "Hire Recommended (Pass)",
            Decision::Fail => "Hold / Reject (Fail)",
        }
    }
}

/// Everything the report needs, assembled at export time and discarded after.
#[derive(Debug)]
pub struct ReportInput<'a> {
    pub position: &'a str,
    pub level: Level,
    pub comments: &'a str,
    pub decision: Decision,
    pub question: &'a str,
    pub resume_excerpt: Option<&'a str>,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to assemble the report document: {0}")]
    Docx(#[from] docx_rs::DocxError),
}

/// Builds the report document.
///
/// Sections, in order: title, basic information, competency evaluation,
/// interviewer comments, final result. A résumé summary section is appended
/// only when a non-empty excerpt is supplied.
pub fn build(input: &ReportInput<'_>) -> Result<Vec<u8>, ReportError> {
    let mut docx = Docx::new()
        .add_paragraph(heading("Interview Result Report", TITLE_SIZE))
        .add_paragraph(heading("1. Basic Information", HEADING_SIZE))
        .add_paragraph(body(&format!(
            "Interview date: {}",
            Local::now().format("%Y-%m-%d %H:%M")
        )))
        .add_paragraph(body(&format!("Position: {}", input.position)))
        .add_paragraph(heading("2. Competency Evaluation", HEADING_SIZE))
        .add_paragraph(body(&format!("Evaluated level: {}", input.level)))
        .add_paragraph(body(&format!("Question guide: {}", input.question)))
        .add_paragraph(heading("3. Interviewer Comments", HEADING_SIZE))
        .add_paragraph(body(input.comments))
        .add_paragraph(heading("4. Final Result", HEADING_SIZE))
        .add_paragraph(body(input.decision.label()));

    if let Some(excerpt) = input.resume_excerpt.filter(|e| !e.is_empty()) {
        docx = docx
            .add_paragraph(heading("5. Résumé Summary", HEADING_SIZE))
            .add_paragraph(body(&truncate_excerpt(excerpt)));
    }

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(docx_rs::DocxError::from)?;
    Ok(buffer.into_inner())
}

/// Download file name for an export generated on `date`.
pub fn file_name(position: &str, date: NaiveDate) -> String {
    format!("interview-result_{}_{}.docx", position, date.format("%Y%m%d"))
}

fn heading(text: &str, size: usize) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text).bold().size(size))
}

fn body(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text))
}

/// First 500 characters of the résumé text, with an ellipsis when cut.
fn truncate_excerpt(text: &str) -> String {
    let mut excerpt: String = text.chars().take(RESUME_EXCERPT_LIMIT).collect();
    if text.chars().count() > RESUME_EXCERPT_LIMIT {
        excerpt.push('…');
    }
    excerpt
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::extractor;

    fn sample_input<'a>(resume_excerpt: Option<&'a str>) -> ReportInput<'a> {
        ReportInput {
            position: "Data Analyst",
            level: Level::Level2,
            comments: "Strong SQL",
            decision: Decision::Pass,
            question: "Explain INNER vs LEFT JOIN.",
            resume_excerpt,
        }
    }

    #[test]
    fn test_truncate_excerpt_cuts_at_limit_with_ellipsis() {
        let long: String = "a".repeat(600);
        let excerpt = truncate_excerpt(&long);
        assert_eq!(excerpt.chars().count(), 501);
        assert!(excerpt.ends_with('…'));
    }

    #[test]
    fn test_truncate_excerpt_leaves_short_text_alone() {
        let excerpt = truncate_excerpt("short résumé");
        assert_eq!(excerpt, "short résumé");
    }

    #[test]
    fn test_report_has_fixed_sections_in_order() {
        let bytes = build(&sample_input(None)).unwrap();
        let text = extractor::extract(&bytes, "report.docx");

        let sections = [
            "Interview Result Report",
            "1. Basic Information",
            "2. Competency Evaluation",
            "3. Interviewer Comments",
            "4. Final Result",
        ];
        let mut cursor = 0;
        for section in sections {
            let at = text[cursor..]
                .find(section)
                .unwrap_or_else(|| panic!("missing section {section:?}"));
            cursor += at + section.len();
        }

        assert!(text.contains("Strong SQL"));
        assert!(text.contains("Hire Recommended (Pass)"));
        assert!(text.contains("Evaluated level: Level 2"));
        assert!(text.contains("Explain INNER vs LEFT JOIN."));
    }

    #[test]
    fn test_resume_section_absent_without_excerpt() {
        for input in [sample_input(None), sample_input(Some(""))] {
            let bytes = build(&input).unwrap();
            let text = extractor::extract(&bytes, "report.docx");
            assert!(!text.contains("5. Résumé Summary"));
        }
    }

    #[test]
    fn test_resume_section_present_and_truncated() {
        let long: String = "r".repeat(700);
        let bytes = build(&sample_input(Some(&long))).unwrap();
        let text = extractor::extract(&bytes, "report.docx");

        assert!(text.contains("5. Résumé Summary"));
        let truncated = format!("{}…", "r".repeat(500));
        assert!(text.contains(&truncated));
        assert!(!text.contains(&"r".repeat(501)));
    }

    #[test]
    fn test_file_name_pattern() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(
            file_name("Data Analyst", date),
            "interview-result_Data Analyst_20250309.docx"
        );
    }

    #[test]
    fn test_decision_labels_and_deserialization() {
        assert_eq!(Decision::Pass.label(), "Hire Recommended (Pass)");
        assert_eq!(Decision::Fail.label(), "Hold / Reject (Fail)");

        let decision: Decision = serde_json::from_str(r#""Pass""#).unwrap();
        assert_eq!(decision, Decision::Pass);
    }
}
