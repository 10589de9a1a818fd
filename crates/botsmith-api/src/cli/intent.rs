//! Intent editing commands.

use anyhow::Result;
use console::style;
use dialoguer::Input;

use botsmith_types::bot::IntentDraft;
use botsmith_types::error::BotError;

use crate::cli::bot::print_intents;
use crate::state::AppState;

pub async fn list_intents(state: &AppState, bot: Option<&str>, json: bool) -> Result<()> {
    let bot = state.resolve_bot(bot).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&bot.intents)?);
        return Ok(());
    }

    println!();
    println!("  {} intents", style(&bot.name).cyan().bold());
    println!();
    print_intents(&bot);
    Ok(())
}

/// Add an intent, prompting for the name and response when not given.
pub async fn add_intent(
    state: &AppState,
    bot: Option<&str>,
    name: Option<String>,
    phrases: Vec<String>,
    response: Option<String>,
    json: bool,
) -> Result<()> {
    let mut bot = state.resolve_bot(bot).await?;

    let name = match name {
        Some(n) => n,
        None => Input::<String>::new().with_prompt("Intent name").interact_text()?,
    };
    let response = match response {
        Some(r) => r,
        None => Input::<String>::new().with_prompt("Response").interact_text()?,
    };
    let name = name.trim();
    let response = response.trim();
    if name.is_empty() || response.is_empty() {
        anyhow::bail!("An intent needs a name and a response.");
    }

    let phrases = clean_phrases(phrases);
    let intent = bot
        .add_intent(IntentDraft::new(name, phrases, response))
        .clone();
    state.bot_service.update(&state.owner(), bot).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&intent)?);
    } else {
        println!(
            "  {} Added intent '{}' ({}).",
            style("✓").green().bold(),
            style(&intent.name).cyan(),
            style(&intent.id).dim()
        );
    }
    Ok(())
}

pub async fn remove_intent(state: &AppState, bot: Option<&str>, id: &str, json: bool) -> Result<()> {
    let mut bot = state.resolve_bot(bot).await?;
    if !bot.remove_intent(id) {
        return Err(BotError::IntentNotFound.into());
    }
    state.bot_service.update(&state.owner(), bot).await?;

    if json {
        println!("{}", serde_json::json!({ "removed": id }));
    } else {
        println!("  {} Removed intent {}.", style("✓").green().bold(), style(id).dim());
    }
    Ok(())
}

/// Trim phrases and drop blank or repeated ones.
fn clean_phrases(phrases: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(phrases.len());
    for phrase in phrases {
        let phrase = phrase.trim();
        if !phrase.is_empty() && !cleaned.iter().any(|p| p == phrase) {
            cleaned.push(phrase.to_string());
        }
    }
    cleaned
}
