//! Best-effort text extraction from uploaded résumé files.
//!
//! The caller always gets displayable text: parse failures are converted to
//! descriptive strings at this boundary, never propagated as errors.

use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};

/// Fixed notice for image uploads.
pub const IMAGE_NOTICE: &str =
    "Text cannot be extracted from image files. Review the attachment manually.";

/// Fixed notice for anything that is not a PDF, Word document, or image.
pub const UNSUPPORTED_NOTICE: &str =
    "Unsupported file format. Upload a PDF or Word (.docx) document.";

/// The closed set of upload types, decided by file-name suffix alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Pdf,
    Word,
    Image,
    Unsupported,
}

impl UploadKind {
    /// Classifies a declared file name by its suffix, case-insensitively.
    pub fn from_name(name: &str) -> Self {
        let suffix = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match suffix.as_deref() {
            Some("pdf") => UploadKind::Pdf,
            Some("docx") => UploadKind::Word,
            Some("png") | Some("jpg") | Some("jpeg") => UploadKind::Image,
            _ => UploadKind::Unsupported,
        }
    }
}

/// Extracts text from an uploaded file.
///
/// Returns the extracted text for PDFs and Word documents, a fixed notice
/// for images and unsupported formats, and a descriptive message when the
/// underlying parser fails. Never empty for a failed parse.
pub fn extract(data: &[u8], declared_name: &str) -> String {
    let result = match UploadKind::from_name(declared_name) {
        UploadKind::Pdf => extract_pdf_text(data),
        UploadKind::Word => extract_docx_text(data),
        UploadKind::Image => return IMAGE_NOTICE.to_string(),
        UploadKind::Unsupported => return UNSUPPORTED_NOTICE.to_string(),
    };

    result.unwrap_or_else(|err| format!("Could not extract text from '{declared_name}': {err}"))
}

/// Concatenates the text of every page. pdf-extract separates pages with
/// form feeds; those become newlines.
fn extract_pdf_text(data: &[u8]) -> Result<String, String> {
    pdf_extract::extract_text_from_mem(data)
        .map(|text| text.replace('\x0c', "\n").trim().to_string())
        .map_err(|err| err.to_string())
}

/// Joins the text of every paragraph in the document body with newlines.
fn extract_docx_text(data: &[u8]) -> Result<String, String> {
    let package = read_docx(data).map_err(|err| err.to_string())?;

    let mut paragraphs = Vec::new();
    for child in &package.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            let mut text = String::new();
            for child in &paragraph.children {
                if let ParagraphChild::Run(run) = child {
                    for child in &run.children {
                        if let RunChild::Text(t) = child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            let text = text.trim();
            if !text.is_empty() {
                paragraphs.push(text.to_string());
            }
        }
    }

    Ok(paragraphs.join("\n"))
}
