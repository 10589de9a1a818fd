//! Plain-text extraction from uploaded documents.
//!
//! - `pdf`: text layer of a PDF via `pdf-extract`
//! - `docx`: paragraphs of `word/document.xml` inside the DOCX zip container

pub mod docx;
pub mod pdf;

use botsmith_core::import::{ImportSource, TextExtractor};
use botsmith_types::error::ImportError;

/// Low-level extraction failures. Mapped to user-facing [`ImportError`]s.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX archive error: {0}")]
    Archive(String),

    #[error("DOCX XML error: {0}")]
    Xml(String),

    #[error("{0} is not an extractable document type")]
    NotADocument(ImportSource),
}

impl From<ExtractError> for ImportError {
    fn from(e: ExtractError) -> Self {
        match e {
            ExtractError::Pdf(msg) => ImportError::Pdf(msg),
            ExtractError::Archive(msg) | ExtractError::Xml(msg) => ImportError::Docx(msg),
            ExtractError::NotADocument(source) => ImportError::UnsupportedFileType(source.to_string()),
        }
    }
}

/// [`TextExtractor`] backed by the PDF and DOCX readers in this module.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentExtractor;

impl TextExtractor for DocumentExtractor {
    fn extract(&self, source: ImportSource, bytes: &[u8]) -> Result<String, ImportError> {
        let text = match source {
            ImportSource::Pdf => pdf::extract_text(bytes),
            ImportSource::Docx => docx::extract_text(bytes),
            other => Err(ExtractError::NotADocument(other)),
        };
        text.map_err(|e| {
            tracing::warn!(%source, error = %e, "document extraction failed");
            ImportError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_map_to_user_messages() {
        let err: ImportError = ExtractError::Pdf("bad xref".into()).into();
        assert!(err.to_string().starts_with("Failed to parse PDF file."));

        let err: ImportError = ExtractError::Archive("not a zip".into()).into();
        assert!(err.to_string().contains("not legacy .doc"));
    }

    #[test]
    fn test_garbage_pdf_is_rejected() {
        let err = DocumentExtractor
            .extract(ImportSource::Pdf, b"definitely not a pdf")
            .unwrap_err();
        assert!(matches!(err, ImportError::Pdf(_)));
    }

    #[test]
    fn test_non_document_sources_are_refused() {
        let err = DocumentExtractor.extract(ImportSource::Csv, b"a,b").unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFileType(_)));
    }
}
