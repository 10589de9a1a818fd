//! Botsmith CLI and embed host entry point.
//!
//! Binary name: `botsmith`
//!
//! Parses CLI arguments, sets up tracing, opens the data directory and
//! dispatches to the command handlers or starts the HTTP host.

mod cli;
mod http;
mod state;

use std::time::Duration;

use clap::Parser;
use clap_complete::generate;
use console::style;

use botsmith_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};
use botsmith_types::bot::BotSettings;

use cli::{BotCommand, Cli, Commands, IntentCommand, KbCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&TracingOptions {
        verbosity: cli.verbose,
        quiet: cli.quiet,
        json: cli.log_json,
        otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "botsmith", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(cli.user.clone()).await?;
    let json = cli.json;

    match cli.command {
        Commands::Bot { action } => match action {
            BotCommand::Create { name } => cli::bot::create_bot(&state, name, json).await?,
            BotCommand::List => cli::bot::list_bots(&state, json).await?,
            BotCommand::Show { bot } => cli::bot::show_bot(&state, bot.as_deref(), json).await?,
            BotCommand::Update {
                bot,
                name,
                default_response,
                theme_color,
            } => {
                let settings = BotSettings {
                    name,
                    default_response,
                    theme_color,
                };
                cli::bot::update_bot(&state, bot.as_deref(), settings, json).await?
            }
            BotCommand::Delete { bot, force } => {
                cli::bot::delete_bot(&state, &bot, force, json).await?
            }
            BotCommand::Select { bot, clear } => {
                cli::bot::select_bot(&state, bot.as_deref(), clear, json).await?
            }
        },

        Commands::Intent { action } => match action {
            IntentCommand::List { bot } => {
                cli::intent::list_intents(&state, bot.as_deref(), json).await?
            }
            IntentCommand::Add {
                bot,
                name,
                phrases,
                response,
            } => {
                cli::intent::add_intent(&state, bot.as_deref(), name, phrases, response, json)
                    .await?
            }
            IntentCommand::Remove { bot, id } => {
                cli::intent::remove_intent(&state, bot.as_deref(), &id, json).await?
            }
        },

        Commands::Import {
            file,
            bot,
            generate,
        } => cli::import::import(&state, &file, bot.as_deref(), generate, json).await?,

        Commands::Kb { action } => match action {
            KbCommand::Add { bot, text, file } => {
                cli::kb::add_document(&state, bot.as_deref(), text, file.as_deref(), json).await?
            }
            KbCommand::List { bot } => cli::kb::list_documents(&state, bot.as_deref(), json).await?,
            KbCommand::Remove { bot, id } => {
                cli::kb::remove_document(&state, bot.as_deref(), &id, json).await?
            }
            KbCommand::Clear { bot, force } => {
                cli::kb::clear_documents(&state, bot.as_deref(), force, json).await?
            }
            KbCommand::Search { bot, query, top_k } => {
                cli::kb::search_documents(&state, bot.as_deref(), &query, top_k, json).await?
            }
        },

        Commands::Chat { bot } => {
            let bot = state.resolve_bot(bot.as_deref()).await?;
            let knowledge = state.knowledge(&bot.id).await?;
            let chat = state.chat_service()?;
            cli::chat::loop_runner::run_chat_loop(&chat, &bot, &knowledge, "saved").await?;
        }

        Commands::Embed(args) => cli::embed::embed(&state, &args, json).await?,

        Commands::Open { token } => cli::embed::open(&state, &token).await?,

        Commands::Theme { action } => cli::theme::theme(&state, action, json).await?,

        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);
            let embed_host = http::sessions::EmbedHost::new(state.chat_service()?)
                .with_idle_ttl(Duration::from_secs(state.config.server.session_idle_secs));
            let sweeper = embed_host.spawn_sweeper();

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Botsmith embed host listening on {}",
                style("⚡").bold(),
                style(format!("http://{addr}")).cyan()
            );
            println!("  {}", style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(embed_host);
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if let Some(sweeper) = sweeper {
                sweeper.abort();
            }
            println!("\n  Server stopped.");
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
