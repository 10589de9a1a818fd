//! Main chat loop.
//!
//! Reads lines, runs each one through [`ChatService`], and lets a renderer
//! task subscribed to the session print the bot's replies.

use std::io::Write;

use console::style;
use rustyline_async::SharedWriter;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::debug;

use botsmith_core::chat::service::ChatService;
use botsmith_core::chat::session::ConversationSession;
use botsmith_core::knowledge::store::DocumentStore;
use botsmith_core::storage::kv_store::KvStore;
use botsmith_types::bot::BotConfig;
use botsmith_types::chat::{ChatMessage, Sender};

use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};

/// Run an interactive conversation until the user exits.
///
/// `origin` is shown in the banner ("saved", "embedded").
pub async fn run_chat_loop<K: KvStore>(
    chat: &ChatService,
    bot: &BotConfig,
    knowledge: &DocumentStore<K>,
    origin: &str,
) -> anyhow::Result<()> {
    print_banner(bot, knowledge.len(), chat.resolver().provider().model(), origin);

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, writer) =
        ChatInput::new(prompt).map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    let mut session = ConversationSession::new();
    let mut renderer = spawn_renderer(&session, bot, writer.clone());
    debug!(session_id = session.id(), bot_id = %bot.id, "chat session started");

    loop {
        match chat_input.read_line().await {
            InputEvent::Eof => break,
            InputEvent::Interrupted => {
                write_line(&writer, &style("Press Ctrl+D or type /exit to leave.").dim().to_string());
            }
            InputEvent::Message(text) if text.is_empty() => {}
            InputEvent::Message(text) => match commands::parse(&text) {
                Some(ChatCommand::Help) => write_line(&writer, &commands::help_text()),
                Some(ChatCommand::Clear) => chat_input.clear(),
                Some(ChatCommand::Exit) => break,
                Some(ChatCommand::New) => {
                    renderer.abort();
                    session = ConversationSession::new();
                    renderer = spawn_renderer(&session, bot, writer.clone());
                    write_line(&writer, &style("Started a new conversation.").dim().to_string());
                }
                Some(ChatCommand::History) => {
                    write_line(&writer, &format_history(&session.snapshot(), &bot.name));
                }
                Some(ChatCommand::Intents) => {
                    let names: Vec<&str> = bot.intents.iter().map(|i| i.name.as_str()).collect();
                    write_line(&writer, &format!("  {}", names.join(", ")));
                }
                Some(ChatCommand::Unknown(name)) => write_line(
                    &writer,
                    &format!(
                        "  {} Unknown command: {}. Type /help for available commands.",
                        style("?").yellow().bold(),
                        style(name).dim()
                    ),
                ),
                None => {
                    chat.send(&mut session, bot, knowledge, &text).await;
                }
            },
        }
    }

    // Let the renderer print anything still queued before tearing it down.
    tokio::task::yield_now().await;
    renderer.abort();
    chat_input.flush();
    println!("\n  {}", style("Session ended.").dim());
    Ok(())
}

/// Print bot replies as they are appended to `session`.
fn spawn_renderer(session: &ConversationSession, bot: &BotConfig, writer: SharedWriter) -> JoinHandle<()> {
    let mut events = session.subscribe();
    let name = bot.name.clone();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(message) if message.sender == Sender::Bot => {
                    write_line(&writer, &format!("\n  {} {}\n", style(&name).cyan().bold(), message.text));
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "chat renderer lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

fn write_line(writer: &SharedWriter, text: &str) {
    let mut writer = writer.clone();
    let _ = writeln!(writer, "{text}");
}

fn format_history(messages: &[ChatMessage], bot_name: &str) -> String {
    if messages.is_empty() {
        return format!("  {}", style("No messages yet.").dim());
    }
    messages
        .iter()
        .map(|m| {
            let who = match m.sender {
                Sender::User => style("You".to_string()).green().bold(),
                Sender::Bot => style(bot_name.to_string()).cyan().bold(),
            };
            format!("  {who} {}", m.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn print_banner(bot: &BotConfig, documents: usize, model: &str, origin: &str) {
    println!();
    println!("  {} {}", style("●").color256(208), style(&bot.name).cyan().bold());
    println!(
        "  {}",
        style(format!(
            "{} intents, {} knowledge documents ({origin})",
            bot.intents.len(),
            documents
        ))
        .dim()
    );
    println!();
    println!("  {}  {}", style("Model:").bold(), style(model).dim());
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}
