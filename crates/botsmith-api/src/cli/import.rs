//! `botsmith import`: merge intents from a file into a bot.
//!
//! JSON and CSV files carry intents directly. Text sources (txt, pdf, docx)
//! either become a knowledge-base document or, with `--generate`, are sent
//! to the model to draft intents, which the user then picks from on an
//! interactive terminal. Nothing is saved when an import fails.

use std::path::Path;

use anyhow::Result;
use console::{Term, style};
use dialoguer::MultiSelect;

use botsmith_core::import::ImportOutcome;
use botsmith_infra::filesystem::import_file;
use botsmith_types::bot::{BotConfig, IntentDraft};

use crate::cli::bot::{pluralize, truncate};
use crate::cli::spinner;
use crate::state::AppState;

pub async fn import(
    state: &AppState,
    file: &Path,
    bot: Option<&str>,
    generate: bool,
    json: bool,
) -> Result<()> {
    let bot = state.resolve_bot(bot).await?;
    let outcome = import_file(file).await?;

    match outcome {
        ImportOutcome::Intents(drafts) => merge_intents(state, bot, drafts, json).await,
        ImportOutcome::Text(text) if generate => {
            let generator = state.intent_generator()?;
            let progress = (!json).then(|| spinner("Generating intents..."));
            let generated = generator.generate(&text).await;
            if let Some(progress) = progress {
                progress.finish_and_clear();
            }
            let drafts = generated?;
            if drafts.is_empty() {
                anyhow::bail!("The model found no intents in {}.", file.display());
            }
            let drafts = if json || !Term::stdout().is_term() {
                drafts
            } else {
                choose_drafts(drafts)?
            };
            if drafts.is_empty() {
                println!("  No intents selected. Nothing was added.");
                return Ok(());
            }
            merge_intents(state, bot, drafts, json).await
        }
        ImportOutcome::Text(text) => {
            let mut knowledge = state.knowledge(&bot.id).await?;
            let Some(document) = knowledge.add(&text).await? else {
                anyhow::bail!("{} contains no text.", file.display());
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&document)?);
            } else {
                println!(
                    "  {} Added {} to the knowledge base of '{}' ({}).",
                    style("✓").green().bold(),
                    file.display(),
                    style(&bot.name).cyan(),
                    style(&document.id).dim()
                );
                println!(
                    "  Use {} to draft intents from it instead.",
                    style("--generate").yellow()
                );
            }
            Ok(())
        }
    }
}

/// Let the user pick which generated intents to keep. All start checked.
fn choose_drafts(drafts: Vec<IntentDraft>) -> Result<Vec<IntentDraft>> {
    let labels: Vec<String> = drafts.iter().map(draft_label).collect();
    let picked = MultiSelect::new()
        .with_prompt("Select intents to add (space toggles, enter confirms)")
        .items(&labels)
        .defaults(&vec![true; labels.len()])
        .interact()?;
    Ok(keep_selected(drafts, &picked))
}

fn draft_label(draft: &IntentDraft) -> String {
    format!(
        "{} ({}) -> {}",
        draft.name,
        pluralize(draft.training_phrases.len(), "phrase"),
        truncate(&draft.response, 50)
    )
}

fn keep_selected(drafts: Vec<IntentDraft>, picked: &[usize]) -> Vec<IntentDraft> {
    drafts
        .into_iter()
        .enumerate()
        .filter(|(i, _)| picked.contains(i))
        .map(|(_, draft)| draft)
        .collect()
}

async fn merge_intents(
    state: &AppState,
    mut bot: BotConfig,
    drafts: Vec<IntentDraft>,
    json: bool,
) -> Result<()> {
    let added = bot.append_intents(drafts);
    let first_new = bot.intents.len() - added;
    let bot = state.bot_service.update(&state.owner(), bot).await?;
    tracing::info!(bot_id = %bot.id, added, "imported intents");

    if json {
        println!("{}", serde_json::to_string_pretty(&bot.intents[first_new..])?);
        return Ok(());
    }

    println!(
        "  {} Imported {} into '{}'.",
        style("✓").green().bold(),
        pluralize(added, "intent"),
        style(&bot.name).cyan()
    );
    for intent in &bot.intents[first_new..] {
        println!("    {} {}", style("•").dim(), intent.name);
    }
    Ok(())
}
