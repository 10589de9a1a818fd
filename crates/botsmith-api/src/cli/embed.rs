//! Embed commands: publish a bot as a link, and open one.

use anyhow::Result;
use console::style;

use botsmith_core::embed::codec::{encode, token_from_url, try_decode};
use botsmith_core::embed::snippet::{EmbedOptions, embed_url, iframe_snippet};
use botsmith_core::knowledge::store::DocumentStore;

use crate::cli::EmbedArgs;
use crate::cli::chat::loop_runner::run_chat_loop;
use crate::state::AppState;

impl EmbedArgs {
    fn options(&self) -> EmbedOptions {
        EmbedOptions {
            width: self.width,
            height: self.height,
            show_border: !self.no_border,
            border_radius: self.border_radius,
            show_shadow: !self.no_shadow,
        }
    }
}

/// Print the token, the shareable link and the iframe snippet.
pub async fn embed(state: &AppState, args: &EmbedArgs, json: bool) -> Result<()> {
    let bot = state.resolve_bot(args.bot.as_deref()).await?;
    let base = args
        .base_url
        .as_deref()
        .unwrap_or(&state.config.embed.base_url);
    let options = args.options();

    let token = encode(&bot);
    let url = embed_url(base, &bot);
    let snippet = iframe_snippet(&url, &format!("{} chatbot", bot.name), &options);

    if json {
        let out = serde_json::json!({
            "botId": bot.id,
            "token": token,
            "url": url,
            "iframe": snippet,
            "options": options,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("  {} Embed '{}'", style("⧉").bold(), style(&bot.name).cyan());
    println!();
    println!("  {}", style("Link:").bold());
    println!("  {}", style(&url).yellow());
    println!();
    println!("  {}", style("Iframe:").bold());
    for line in snippet.lines() {
        println!("  {line}");
    }
    println!();
    println!(
        "  {}",
        style("The link carries the full bot configuration. Knowledge documents are not included.").dim()
    );
    println!();
    Ok(())
}

/// Decode an embed token or link and chat with the bot it carries.
pub async fn open(state: &AppState, token: &str) -> Result<()> {
    let bot = try_decode(token_from_url(token)).map_err(|e| {
        tracing::debug!(error = %e, "embed token rejected");
        anyhow::anyhow!("No deployed bot configuration found in that link ({e}).")
    })?;

    let chat = state.chat_service()?;
    let knowledge = DocumentStore::ephemeral();
    run_chat_loop(&chat, &bot, &knowledge, "embedded").await
}
