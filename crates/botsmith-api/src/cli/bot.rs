//! Bot lifecycle CLI commands: create, list, show, update, delete, select.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::{Confirm, Input};

use botsmith_types::bot::{BotConfig, BotSettings};

use crate::state::AppState;

/// Create a new bot with the starter intents and make it active.
pub async fn create_bot(state: &AppState, name: Option<String>, json: bool) -> Result<()> {
    let name = match name {
        Some(n) => n,
        None => Input::<String>::new()
            .with_prompt("Bot name")
            .interact_text()?,
    };

    let Some(bot) = state.bot_service.create(&state.owner(), &name).await? else {
        anyhow::bail!("Bot name cannot be empty.");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&bot)?);
        return Ok(());
    }

    println!();
    println!("  {} Bot created and selected!", style("✓").green().bold());
    println!();
    println!("  {}  {}", style("Name:").bold(), style(&bot.name).cyan());
    println!("  {}    {}", style("ID:").bold(), style(&bot.id).dim());
    println!(
        "  {}  {} starter intents",
        style("Intents:").bold(),
        bot.intents.len()
    );
    println!();
    println!(
        "  Try it: {}",
        style(format!("botsmith chat --bot \"{}\"", bot.name)).yellow()
    );
    println!();

    Ok(())
}

/// List all bots in a table, marking the active one.
pub async fn list_bots(state: &AppState, json: bool) -> Result<()> {
    let owner = state.owner();
    let bots = state.bot_service.list(&owner).await?;
    let active_id = state.bot_service.active(&owner).await?.map(|b| b.id);

    if json {
        println!("{}", serde_json::to_string_pretty(&bots)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("").fg(Color::White),
        Cell::new("Name").fg(Color::White),
        Cell::new("ID").fg(Color::White),
        Cell::new("Intents").fg(Color::White),
        Cell::new("Theme").fg(Color::White),
    ]);

    for bot in &bots {
        let marker = if active_id.as_deref() == Some(bot.id.as_str()) {
            Cell::new("●").fg(Color::Green)
        } else {
            Cell::new("")
        };
        table.add_row(vec![
            marker,
            Cell::new(&bot.name).fg(Color::Cyan),
            Cell::new(&bot.id).fg(Color::DarkGrey),
            Cell::new(bot.intents.len()),
            Cell::new(&bot.theme_color),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

/// Show a bot's settings and intents.
pub async fn show_bot(state: &AppState, bot: Option<&str>, json: bool) -> Result<()> {
    let bot = state.resolve_bot(bot).await?;
    let documents = state.knowledge(&bot.id).await?.len();

    if json {
        println!("{}", serde_json::to_string_pretty(&bot)?);
        return Ok(());
    }

    println!();
    println!("  {}", style(&bot.name).cyan().bold());
    println!();
    println!("  {}        {}", style("ID:").bold(), style(&bot.id).dim());
    println!("  {}     {}", style("Theme:").bold(), bot.theme_color);
    println!("  {}  {}", style("Fallback:").bold(), bot.default_response);
    println!("  {} {}", style("Knowledge:").bold(), pluralize(documents, "document"));
    println!();
    print_intents(&bot);
    Ok(())
}

/// Change a bot's own settings. Intents and documents are untouched.
pub async fn update_bot(
    state: &AppState,
    bot: Option<&str>,
    settings: BotSettings,
    json: bool,
) -> Result<()> {
    let mut bot = state.resolve_bot(bot).await?;
    if settings.is_empty() {
        anyhow::bail!("Nothing to change. Pass --name, --default-response or --theme-color.");
    }
    settings.apply(&mut bot)?;
    let bot = state.bot_service.update(&state.owner(), bot).await?;
    tracing::info!(bot_id = %bot.id, "updated bot settings");

    if json {
        println!("{}", serde_json::to_string_pretty(&bot)?);
        return Ok(());
    }

    println!("  {} Updated '{}'.", style("✓").green().bold(), style(&bot.name).cyan());
    println!("  {}     {}", style("Theme:").bold(), bot.theme_color);
    println!("  {}  {}", style("Fallback:").bold(), bot.default_response);
    Ok(())
}

/// Delete a bot after confirmation.
pub async fn delete_bot(state: &AppState, bot: &str, force: bool, json: bool) -> Result<()> {
    let bot = state.resolve_bot(Some(bot)).await?;

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete '{}' and its intents?", bot.name))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let owner = state.owner();
    state.bot_service.delete(&owner, &bot.id).await?;
    let mut knowledge = state.knowledge(&bot.id).await?;
    if !knowledge.is_empty() {
        knowledge.clear().await?;
    }

    if json {
        println!("{}", serde_json::json!({ "deleted": bot.id }));
    } else {
        println!("  {} Deleted '{}'.", style("✓").green().bold(), bot.name);
    }
    Ok(())
}

/// Make a bot active, or clear the selection.
pub async fn select_bot(state: &AppState, bot: Option<&str>, clear: bool, json: bool) -> Result<()> {
    let owner = state.owner();
    if clear || bot.is_none() {
        state.bot_service.select(&owner, None).await?;
        if json {
            println!("{}", serde_json::json!({ "active": null }));
        } else {
            println!("  {} Active bot cleared.", style("✓").green().bold());
        }
        return Ok(());
    }

    let bot = state.resolve_bot(bot).await?;
    state.bot_service.select(&owner, Some(&bot.id)).await?;
    if json {
        println!("{}", serde_json::json!({ "active": bot.id }));
    } else {
        println!(
            "  {} '{}' is now the active bot.",
            style("✓").green().bold(),
            style(&bot.name).cyan()
        );
    }
    Ok(())
}

/// Print a bot's intents as a table.
pub(crate) fn print_intents(bot: &BotConfig) {
    if bot.intents.is_empty() {
        println!(
            "  {} No intents yet. Add one with: {}",
            style("i").blue().bold(),
            style("botsmith intent add").yellow()
        );
        println!();
        return;
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Intent").fg(Color::White),
        Cell::new("Training phrases").fg(Color::White),
        Cell::new("Response").fg(Color::White),
        Cell::new("ID").fg(Color::White),
    ]);
    for intent in &bot.intents {
        table.add_row(vec![
            Cell::new(&intent.name).fg(Color::Cyan),
            Cell::new(intent.training_phrases.join("\n")),
            Cell::new(truncate(&intent.response, 60)),
            Cell::new(&intent.id).fg(Color::DarkGrey),
        ]);
    }
    println!("{table}");
    println!();
}

pub(crate) fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Shorten text to at most `max` characters, adding an ellipsis.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
