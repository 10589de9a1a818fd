//! File import: structured intents or raw text for generation.
//!
//! JSON and CSV files carry intents directly; the two modes differ on
//! purpose. JSON keeps every valid entry as-is, CSV groups rows by intent
//! name. Text, PDF and DOCX files yield plain text that is handed to the
//! intent generator. An import that fails never touches stored state.

pub mod csv;
pub mod json;

use std::fmt;

use botsmith_types::bot::IntentDraft;
use botsmith_types::error::ImportError;

pub use self::csv::import_csv;
pub use self::json::import_json;

/// Kind of file being imported, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportSource {
    Text,
    Json,
    Csv,
    Pdf,
    Docx,
}

impl ImportSource {
    /// Classify a file by its (case-insensitive) extension.
    pub fn from_file_name(name: &str) -> Result<Self, ImportError> {
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "txt" => Ok(ImportSource::Text),
            "json" => Ok(ImportSource::Json),
            "csv" => Ok(ImportSource::Csv),
            "pdf" => Ok(ImportSource::Pdf),
            "docx" => Ok(ImportSource::Docx),
            _ => Err(ImportError::UnsupportedFileType(extension)),
        }
    }

    /// Whether this source yields intents directly (as opposed to text).
    pub fn is_structured(self) -> bool {
        matches!(self, ImportSource::Json | ImportSource::Csv)
    }
}

impl fmt::Display for ImportSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportSource::Text => write!(f, "txt"),
            ImportSource::Json => write!(f, "json"),
            ImportSource::Csv => write!(f, "csv"),
            ImportSource::Pdf => write!(f, "pdf"),
            ImportSource::Docx => write!(f, "docx"),
        }
    }
}

/// What an import produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Intents ready to append to a bot.
    Intents(Vec<IntentDraft>),
    /// Plain text to feed the intent generator.
    Text(String),
}

/// Extracts plain text from binary documents (PDF, DOCX).
///
/// Implemented in botsmith-infra.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, source: ImportSource, bytes: &[u8]) -> Result<String, ImportError>;
}

/// Import file contents already read into memory.
pub fn import_bytes(
    source: ImportSource,
    bytes: &[u8],
    extractor: &dyn TextExtractor,
) -> Result<ImportOutcome, ImportError> {
    match source {
        ImportSource::Json => import_json(&utf8(bytes)?).map(ImportOutcome::Intents),
        ImportSource::Csv => import_csv(&utf8(bytes)?).map(ImportOutcome::Intents),
        ImportSource::Text => Ok(ImportOutcome::Text(utf8(bytes)?)),
        ImportSource::Pdf | ImportSource::Docx => {
            extractor.extract(source, bytes).map(ImportOutcome::Text)
        }
    }
}

fn utf8(bytes: &[u8]) -> Result<String, ImportError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| ImportError::Io(e.to_string()))
}
