//! CSV intent import.
//!
//! Rows are `[name, phrase, response]` or `[phrase, response]` (the phrase
//! doubles as the name). Rows sharing a name collapse into one intent whose
//! phrases are deduplicated; the first response seen for a name wins.

use botsmith_types::bot::IntentDraft;
use botsmith_types::error::ImportError;

pub fn import_csv(text: &str) -> Result<Vec<IntentDraft>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut intents: Vec<IntentDraft> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ImportError::CsvParse(e.to_string()))?;
        let cells: Vec<&str> = record.iter().collect();
        let Some((name, phrase, response)) = split_row(&cells) else {
            continue;
        };

        match intents.iter_mut().find(|i| i.name == name) {
            Some(existing) => {
                if !existing.training_phrases.iter().any(|p| p == phrase) {
                    existing.training_phrases.push(phrase.to_string());
                }
            }
            None => intents.push(IntentDraft::new(name, vec![phrase.to_string()], response)),
        }
    }

    if intents.is_empty() {
        return Err(ImportError::NoValidCsvIntents);
    }
    Ok(intents)
}

/// (name, phrase, response) for a usable row.
fn split_row<'a>(cells: &[&'a str]) -> Option<(&'a str, &'a str, &'a str)> {
    let (first, last) = (cells.first()?, cells.last()?);
    if cells.len() < 2 || first.trim().is_empty() || last.trim().is_empty() {
        return None;
    }
    if cells.len() >= 3 {
        Some((cells[0].trim(), cells[1].trim(), cells[2].trim()))
    } else {
        let phrase = cells[0].trim();
        Some((phrase, phrase, cells[1].trim()))
    }
}
