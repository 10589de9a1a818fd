//! Data directory layout and file reading for imports.

use std::path::{Path, PathBuf};

use botsmith_core::import::{ImportOutcome, ImportSource, import_bytes};
use botsmith_types::error::ImportError;

use crate::extract::DocumentExtractor;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "BOTSMITH_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `BOTSMITH_DATA_DIR` environment variable
/// 2. `~/.botsmith`
/// 3. `./.botsmith`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".botsmith");
    }

    PathBuf::from(".botsmith")
}

/// Create the data directory if it does not exist yet.
pub async fn ensure_data_dir(data_dir: &Path) -> Result<(), std::io::Error> {
    tokio::fs::create_dir_all(data_dir).await
}

/// Read and import a file from disk.
///
/// The extension picks the import mode; unsupported extensions fail before
/// the file is read. PDF and DOCX extraction runs on the blocking pool.
pub async fn import_file(path: &Path) -> Result<ImportOutcome, ImportError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let source = ImportSource::from_file_name(&name)?;

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ImportError::Io(format!("{}: {e}", path.display())))?;
    tracing::debug!(file = %path.display(), %source, bytes = bytes.len(), "importing file");

    tokio::task::spawn_blocking(move || import_bytes(source, &bytes, &DocumentExtractor))
        .await
        .map_err(|e| ImportError::Io(e.to_string()))?
}
