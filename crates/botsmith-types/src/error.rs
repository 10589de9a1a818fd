use thiserror::Error;

/// Errors from key-value persistence (used by trait definitions in botsmith-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors related to bot lifecycle operations.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("bot not found")]
    NotFound,

    #[error("intent not found")]
    IntentNotFound,

    #[error("{0}")]
    InvalidSetting(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

impl From<RepositoryError> for BotError {
    fn from(e: RepositoryError) -> Self {
        BotError::StorageError(e.to_string())
    }
}

/// Errors surfaced to the user when importing intents or text from a file.
///
/// Messages are user-facing; an import that fails never touches stored
/// configuration.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Unsupported file type. Please upload a .txt, .json, .pdf, .docx, or .csv file.")]
    UnsupportedFileType(String),

    #[error(
        "Failed to parse JSON. Please ensure it's a valid JSON array. Expected format: [{{name, trainingPhrases?, response}}]"
    )]
    InvalidJson,

    #[error("CSV parsing error: {0}")]
    CsvParse(String),

    #[error(
        "No valid intents found in CSV. Expected format: [intent_name, training_phrase, response] or [training_phrase, response]."
    )]
    NoValidCsvIntents,

    #[error("Failed to parse PDF file. It may be corrupted or protected.")]
    Pdf(String),

    #[error("Failed to parse DOCX file. Only .docx format is supported, not legacy .doc.")]
    Docx(String),

    #[error("failed to read file: {0}")]
    Io(String),
}

/// Reasons an embed token cannot be turned into a bot configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmbedError {
    #[error("token is empty")]
    Empty,

    #[error("token is not valid base64: {0}")]
    Base64(String),

    #[error("token payload is not valid UTF-8")]
    Utf8,

    #[error("token payload is not valid JSON: {0}")]
    Json(String),

    #[error("token payload is missing required field '{0}'")]
    MissingField(&'static str),
}

/// Errors from LLM-driven intent generation. Shown to the user as-is.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(
        "Failed to generate intents. The AI model may have had an issue processing the content. Please try again with different or simplified text."
    )]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_error_messages_are_user_facing() {
        assert!(
            ImportError::UnsupportedFileType("xls".into())
                .to_string()
                .starts_with("Unsupported file type")
        );
        assert!(ImportError::InvalidJson.to_string().contains("[{name, trainingPhrases?, response}]"));
        assert_eq!(
            ImportError::CsvParse("bad quote".into()).to_string(),
            "CSV parsing error: bad quote"
        );
    }

    #[test]
    fn test_embed_error_display() {
        let err = EmbedError::MissingField("intents");
        assert_eq!(err.to_string(), "token payload is missing required field 'intents'");
    }

    #[test]
    fn test_repository_error_converts_to_bot_error() {
        let err: BotError = RepositoryError::Query("locked".into()).into();
        assert_eq!(err.to_string(), "storage error: query error: locked");
    }
}
