//! PDF intake: filename validation and text-layer extraction.

use crate::error::{InsightError, Result};
use std::path::{Path, PathBuf};

/// Whether an uploaded filename is acceptable: a `pdf` extension,
/// case-insensitive
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("pdf"))
}

/// Make a filename safe to join onto the upload directory. Path separators
/// and other unsafe characters collapse to underscores, leading dots and
/// dashes are stripped. May return an empty string; callers reject that.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned.trim_start_matches(['.', '-']).to_string()
}

/// Extract the text layer from a PDF on disk
pub fn extract_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| InsightError::Io {
        message: format!("failed to read {}: {}", path.display(), e),
    })?;
    extract_text_from_bytes(&bytes)
}

/// Extract the text layer from in-memory PDF bytes
pub fn extract_text_from_bytes(bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| InsightError::Pdf {
        message: e.to_string(),
    })
}

/// Extract a PDF and keep a plain-text copy beside it for inspection.
/// Returns the text and the path of the `.txt` copy.
pub fn extract_to_text(pdf_path: &Path, out_dir: &Path) -> Result<(String, PathBuf)> {
    let text = extract_text(pdf_path)?;
    let stem = pdf_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let txt_path = out_dir.join(format!("{stem}.txt"));
    std::fs::write(&txt_path, &text).map_err(|e| InsightError::Io {
        message: format!("failed to write {}: {}", txt_path.display(), e),
    })?;
    Ok((text, txt_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_file_extensions() {
        assert!(allowed_file("report.pdf"));
        assert!(allowed_file("REPORT.PDF"));
        assert!(allowed_file("archive.tar.pdf"));
        assert!(allowed_file(".pdf"));
        assert!(!allowed_file("report.txt"));
        assert!(!allowed_file("pdf"));
        assert!(!allowed_file("report."));
        assert!(!allowed_file("report.pdf.txt"));
    }

    #[test]
    fn test_sanitize_strips_traversal() {
        let sanitized = sanitize_filename("../../etc/passwd.pdf");
        assert!(!sanitized.contains('/'));
        assert!(!sanitized.starts_with('.'));
        assert!(sanitized.ends_with("passwd.pdf"));

        assert_eq!(sanitize_filename("annual report.pdf"), "annual_report.pdf");
        assert_eq!(sanitize_filename("..."), "");
    }

    #[test]
    fn test_garbage_bytes_report_pdf_error() {
        let err = extract_text_from_bytes(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, InsightError::Pdf { .. }));
    }

    #[test]
    fn test_missing_file_reports_io_error() {
        let err = extract_text(Path::new("/nonexistent/input.pdf")).unwrap_err();
        assert!(matches!(err, InsightError::Io { .. }));
    }
}
