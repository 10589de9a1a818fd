use super::ExtractError;

/// Extract the text layer of an in-memory PDF.
///
/// Scanned PDFs without a text layer yield an empty string.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))?;
    Ok(text.trim().to_string())
}
