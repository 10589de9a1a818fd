//! Slash commands available inside the chat loop.

use console::style;

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    Clear,
    Exit,
    /// Drop the conversation and start over with the same bot.
    New,
    History,
    /// List the bot's intents.
    Intents,
    Unknown(String),
}

/// Parse input as a slash command. `None` when it is a normal message.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or(trimmed)
        .to_lowercase();
    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/new" | "/reset" => Some(ChatCommand::New),
        "/history" => Some(ChatCommand::History),
        "/intents" => Some(ChatCommand::Intents),
        _ => Some(ChatCommand::Unknown(cmd)),
    }
}

pub fn help_text() -> String {
    let rows = [
        ("/help", "Show this help message"),
        ("/clear", "Clear the screen"),
        ("/new", "Start a fresh conversation"),
        ("/history", "Show this conversation"),
        ("/intents", "List the intents the bot can match"),
        ("/exit", "End the chat session"),
    ];
    let mut out = format!("\n  {}\n\n", style("Available commands:").bold());
    for (cmd, description) in rows {
        out.push_str(&format!("  {} {description}\n", style(format!("{cmd:<10}")).cyan()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(parse("what are your hours?"), None);
        assert_eq!(parse("  "), None);
    }

    #[test]
    fn test_parse_aliases_and_case() {
        assert_eq!(parse("/QUIT"), Some(ChatCommand::Exit));
        assert_eq!(parse("/reset now"), Some(ChatCommand::New));
        assert_eq!(parse(" /? "), Some(ChatCommand::Help));
    }

    #[test]
    fn test_unknown_command_keeps_name() {
        assert_eq!(parse("/dance fast"), Some(ChatCommand::Unknown("/dance".to_string())));
    }
}
