//! CLI command definitions and dispatch for the `botsmith` binary.
//!
//! Uses clap derive macros for argument parsing. Commands are grouped by the
//! resource they act on (e.g., `botsmith bot create`, `botsmith kb add`).

pub mod bot;
pub mod chat;
pub mod embed;
pub mod import;
pub mod intent;
pub mod kb;
pub mod theme;

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};
use clap_complete::Shell;
use indicatif::{ProgressBar, ProgressStyle};

/// Build intent-driven chatbots and embed them anywhere.
#[derive(Parser)]
#[command(name = "botsmith", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit log lines as JSON.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Act as this user. Without it, bots live in the shared guest space.
    #[arg(long, global = true, env = "BOTSMITH_USER")]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage bots (create, list, show, delete, select).
    Bot {
        #[command(subcommand)]
        action: BotCommand,
    },

    /// Manage a bot's intents.
    Intent {
        #[command(subcommand)]
        action: IntentCommand,
    },

    /// Import intents from a .json/.csv file, or text from .txt/.pdf/.docx.
    Import {
        /// File to import.
        file: PathBuf,

        /// Bot id or name (default: the active bot).
        #[arg(long)]
        bot: Option<String>,

        /// Turn text documents into intents with the model instead of adding
        /// them to the knowledge base.
        #[arg(long)]
        generate: bool,
    },

    /// Manage a bot's knowledge base.
    #[command(alias = "knowledge")]
    Kb {
        #[command(subcommand)]
        action: KbCommand,
    },

    /// Start an interactive chat session with a bot.
    Chat {
        /// Bot id or name (default: the active bot).
        #[arg(long)]
        bot: Option<String>,
    },

    /// Print the embed token, link and iframe snippet for a bot.
    Embed(EmbedArgs),

    /// Chat with a bot from an embed token or link.
    Open {
        /// Token, `#token` fragment, or full embed URL.
        token: String,
    },

    /// Show or change the light/dark preference.
    Theme {
        #[command(subcommand)]
        action: Option<ThemeCommand>,
    },

    /// Host embedded bots over HTTP.
    Serve {
        /// Port to listen on (default from config.toml).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (default from config.toml).
        #[arg(long)]
        host: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum BotCommand {
    /// Create a new bot with the starter intents.
    Create {
        /// Bot name (prompted if omitted).
        #[arg(long)]
        name: Option<String>,
    },

    /// List all bots.
    #[command(alias = "ls")]
    List,

    /// Show a bot and its intents.
    Show {
        /// Bot id or name (default: the active bot).
        bot: Option<String>,
    },

    /// Change a bot's name, default response or theme color.
    #[command(group(
        ArgGroup::new("changes")
            .required(true)
            .multiple(true)
            .args(["name", "default_response", "theme_color"])
    ))]
    Update {
        /// Bot id or name (default: the active bot).
        bot: Option<String>,

        /// New bot name.
        #[arg(long)]
        name: Option<String>,

        /// Reply used when no intent matches or the model fails.
        #[arg(long)]
        default_response: Option<String>,

        /// Widget color as #rgb or #rrggbb.
        #[arg(long)]
        theme_color: Option<String>,
    },

    /// Delete a bot permanently.
    #[command(alias = "rm")]
    Delete {
        /// Bot id or name.
        bot: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Make a bot the active one.
    Select {
        /// Bot id or name.
        bot: Option<String>,

        /// Clear the active bot instead.
        #[arg(long, conflicts_with = "bot")]
        clear: bool,
    },
}

#[derive(Subcommand)]
pub enum IntentCommand {
    /// List a bot's intents.
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        bot: Option<String>,
    },

    /// Add an intent.
    Add {
        #[arg(long)]
        bot: Option<String>,

        /// Intent name (prompted if omitted).
        #[arg(long)]
        name: Option<String>,

        /// Training phrase; repeat for several.
        #[arg(short = 'p', long = "phrase")]
        phrases: Vec<String>,

        /// Reply sent when this intent matches (prompted if omitted).
        #[arg(long)]
        response: Option<String>,
    },

    /// Remove an intent by id.
    #[command(alias = "rm")]
    Remove {
        #[arg(long)]
        bot: Option<String>,

        /// Intent id.
        id: String,
    },
}

#[derive(Subcommand)]
pub enum KbCommand {
    /// Add a document (text argument, or --file).
    Add {
        #[arg(long)]
        bot: Option<String>,

        /// Document text.
        #[arg(required_unless_present = "file")]
        text: Option<String>,

        /// Read the document text from a file.
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },

    /// List documents.
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        bot: Option<String>,
    },

    /// Remove a document by id.
    #[command(alias = "rm")]
    Remove {
        #[arg(long)]
        bot: Option<String>,

        /// Document id.
        id: String,
    },

    /// Remove every document.
    Clear {
        #[arg(long)]
        bot: Option<String>,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Show which documents a query would inject as context.
    Search {
        #[arg(long)]
        bot: Option<String>,

        query: String,

        /// Maximum documents returned (default from config.toml).
        #[arg(long)]
        top_k: Option<usize>,
    },
}

#[derive(Args)]
pub struct EmbedArgs {
    /// Bot id or name (default: the active bot).
    #[arg(long)]
    pub bot: Option<String>,

    /// Page hosting the widget (default from config.toml).
    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long, default_value_t = 400)]
    pub width: u32,

    #[arg(long, default_value_t = 600)]
    pub height: u32,

    #[arg(long, default_value_t = 12)]
    pub border_radius: u32,

    #[arg(long)]
    pub no_border: bool,

    #[arg(long)]
    pub no_shadow: bool,
}

#[derive(Subcommand)]
pub enum ThemeCommand {
    /// Print the current theme.
    Show,
    /// Switch between light and dark.
    Toggle,
    /// Set the theme explicitly.
    Set {
        /// `light` or `dark`.
        theme: String,
    },
}

/// Spinner shown while waiting on the model.
pub(crate) fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_import_with_flags() {
        let cli = Cli::try_parse_from([
            "botsmith", "--user", "u1", "import", "faq.csv", "--bot", "Helper",
        ])
        .unwrap();
        assert_eq!(cli.user.as_deref(), Some("u1"));
        match cli.command {
            Commands::Import { file, bot, generate } => {
                assert_eq!(file, PathBuf::from("faq.csv"));
                assert_eq!(bot.as_deref(), Some("Helper"));
                assert!(!generate);
            }
            _ => panic!("expected import"),
        }
    }

    #[test]
    fn test_parse_intent_add_repeated_phrases() {
        let cli = Cli::try_parse_from([
            "botsmith", "intent", "add", "--name", "Hours", "-p", "when open", "-p", "hours",
            "--response", "9 to 5",
        ])
        .unwrap();
        match cli.command {
            Commands::Intent {
                action: IntentCommand::Add { phrases, .. },
            } => assert_eq!(phrases, vec!["when open", "hours"]),
            _ => panic!("expected intent add"),
        }
    }

    #[test]
    fn test_bot_update_needs_a_change() {
        assert!(Cli::try_parse_from(["botsmith", "bot", "update", "Helper"]).is_err());

        let cli = Cli::try_parse_from([
            "botsmith", "bot", "update", "Helper", "--default-response", "Ask again?",
        ])
        .unwrap();
        match cli.command {
            Commands::Bot {
                action: BotCommand::Update { bot, default_response, name, .. },
            } => {
                assert_eq!(bot.as_deref(), Some("Helper"));
                assert_eq!(default_response.as_deref(), Some("Ask again?"));
                assert!(name.is_none());
            }
            _ => panic!("expected bot update"),
        }
    }

    #[test]
    fn test_kb_add_requires_text_or_file() {
        assert!(Cli::try_parse_from(["botsmith", "kb", "add"]).is_err());
        assert!(Cli::try_parse_from(["botsmith", "kb", "add", "--file", "notes.txt"]).is_ok());
    }
}
