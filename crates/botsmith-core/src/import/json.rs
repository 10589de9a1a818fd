//! JSON intent import.
//!
//! Expects an array of `{name, response, trainingPhrases?}` objects. Entries
//! without a non-empty `name` and `response` are skipped. Names are not
//! deduplicated: two entries with the same name become two intents.

use botsmith_types::bot::IntentDraft;
use botsmith_types::error::ImportError;
use serde_json::Value;

pub fn import_json(text: &str) -> Result<Vec<IntentDraft>, ImportError> {
    let value: Value = serde_json::from_str(text).map_err(|_| ImportError::InvalidJson)?;
    let Value::Array(items) = value else {
        return Err(ImportError::InvalidJson);
    };

    Ok(items.iter().filter_map(draft_from_entry).collect())
}

fn draft_from_entry(entry: &Value) -> Option<IntentDraft> {
    let name = non_empty_str(entry.get("name"))?;
    let response = non_empty_str(entry.get("response"))?;
    let phrases = entry
        .get("trainingPhrases")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    Some(IntentDraft::new(name, phrases, response))
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_entries_are_kept_in_order() {
        let drafts = import_json(
            r#"[
                {"name":"Greeting","trainingPhrases":["hi","hello"],"response":"Hello!"},
                {"name":"Hours","response":"9 to 5"},
                {"name":"","response":"skipped"},
                {"name":"NoResponse"},
                {"name":"Greeting","response":"Hi again"}
            ]"#,
        )
        .unwrap();

        let names: Vec<&str> = drafts.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Greeting", "Hours", "Greeting"]);
        assert_eq!(drafts[0].training_phrases, vec!["hi", "hello"]);
        assert!(drafts[1].training_phrases.is_empty());
    }

    #[test]
    fn test_non_array_is_rejected() {
        assert!(matches!(
            import_json(r#"{"name":"Greeting","response":"Hi"}"#),
            Err(ImportError::InvalidJson)
        ));
        assert!(matches!(import_json("not json"), Err(ImportError::InvalidJson)));
    }

    #[test]
    fn test_empty_array_imports_nothing() {
        assert!(import_json("[]").unwrap().is_empty());
    }
}
