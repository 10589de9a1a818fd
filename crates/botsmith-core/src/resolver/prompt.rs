//! Prompt text for intent classification.

/// System instruction for the classification call.
pub const CLASSIFIER_SYSTEM_PROMPT: &str = r#"You are an expert intent classification engine for a chatbot. Your task is to analyze the user's input and determine which of the predefined intents it matches.
- You will be given a list of intents, each with a name, training phrases, and a specific response.
- You will also be given a default response to use when no intent matches confidently.
- Analyze the `userInput`.
- Compare it against the `trainingPhrases` for each intent.
- If you find a clear match, return a JSON object with the `intentName` and `response` of the matched intent.
- If there is no clear match, or if the input is ambiguous, return a JSON object containing the `intentName` as 'default' and the provided `defaultResponse` as the `response`.
- Your entire output must be ONLY the JSON object specified in the schema, with no additional text, explanations, or markdown formatting."#;

/// Intent name the classifier uses when nothing matched.
pub const DEFAULT_INTENT_NAME: &str = "default";

/// Wrap the user's question with retrieved context.
///
/// Blank context leaves the input untouched.
pub fn augment_query(user_input: &str, context: &str) -> String {
    if context.trim().is_empty() {
        return user_input.to_string();
    }
    format!(
        "Use the following private context when answering. If the context is unrelated, \
         say you don't know and ask a follow-up.\n\n[CONTEXT]\n{context}\n\n[QUESTION]\n{user_input}"
    )
}
