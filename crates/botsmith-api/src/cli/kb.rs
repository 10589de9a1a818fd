//! Knowledge base commands: add, list, remove, clear, search.

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;

use botsmith_core::knowledge::retriever::{LexicalRetriever, Retriever};
use botsmith_infra::config::effective_top_k;

use crate::cli::bot::{pluralize, truncate};
use crate::state::AppState;

pub async fn add_document(
    state: &AppState,
    bot: Option<&str>,
    text: Option<String>,
    file: Option<&Path>,
    json: bool,
) -> Result<()> {
    let bot = state.resolve_bot(bot).await?;
    let text = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => anyhow::bail!("Provide the document text or --file."),
    };

    let mut knowledge = state.knowledge(&bot.id).await?;
    let Some(document) = knowledge.add(&text).await? else {
        anyhow::bail!("Document text cannot be empty.");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        println!(
            "  {} Added {} to '{}' ({} total).",
            style("✓").green().bold(),
            style(&document.id).dim(),
            style(&bot.name).cyan(),
            knowledge.len()
        );
    }
    Ok(())
}

pub async fn list_documents(state: &AppState, bot: Option<&str>, json: bool) -> Result<()> {
    let bot = state.resolve_bot(bot).await?;
    let knowledge = state.knowledge(&bot.id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(knowledge.list())?);
        return Ok(());
    }

    if knowledge.is_empty() {
        println!();
        println!(
            "  {} '{}' has no documents. Add one with: {}",
            style("i").blue().bold(),
            bot.name,
            style("botsmith kb add \"...\"").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Text").fg(Color::White),
    ]);
    for document in knowledge.list() {
        table.add_row(vec![
            Cell::new(&document.id).fg(Color::DarkGrey),
            Cell::new(truncate(&document.text, 80)),
        ]);
    }

    println!();
    println!(
        "  {} knowledge base ({})",
        style(&bot.name).cyan().bold(),
        pluralize(knowledge.len(), "document")
    );
    println!("{table}");
    println!();
    Ok(())
}

pub async fn remove_document(state: &AppState, bot: Option<&str>, id: &str, json: bool) -> Result<()> {
    let bot = state.resolve_bot(bot).await?;
    let mut knowledge = state.knowledge(&bot.id).await?;
    if !knowledge.remove(id).await? {
        anyhow::bail!("No document with id '{id}'.");
    }

    if json {
        println!("{}", serde_json::json!({ "removed": id }));
    } else {
        println!("  {} Removed {}.", style("✓").green().bold(), style(id).dim());
    }
    Ok(())
}

pub async fn clear_documents(state: &AppState, bot: Option<&str>, force: bool, json: bool) -> Result<()> {
    let bot = state.resolve_bot(bot).await?;
    let mut knowledge = state.knowledge(&bot.id).await?;
    let count = knowledge.len();

    if !force && !json && count > 0 {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Remove {} from '{}'?",
                pluralize(count, "document"),
                bot.name
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    knowledge.clear().await?;
    if json {
        println!("{}", serde_json::json!({ "removed": count }));
    } else {
        println!(
            "  {} Cleared {}.",
            style("✓").green().bold(),
            pluralize(count, "document")
        );
    }
    Ok(())
}

/// Run the chat retrieval step alone and print what it would inject.
pub async fn search_documents(
    state: &AppState,
    bot: Option<&str>,
    query: &str,
    top_k: Option<usize>,
    json: bool,
) -> Result<()> {
    let bot = state.resolve_bot(bot).await?;
    let knowledge = state.knowledge(&bot.id).await?;
    let top_k = top_k.unwrap_or_else(|| effective_top_k(&state.config));
    let results = LexicalRetriever::new().search(query, top_k, knowledge.list());

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("  {} No documents contain \"{query}\".", style("i").blue().bold());
        return Ok(());
    }
    println!();
    for result in &results {
        println!("  {} {}", style("•").cyan(), style(&result.document.id).dim());
        println!("    {}", truncate(&result.document.text, 200));
    }
    println!();
    Ok(())
}
