//! Light/dark preference commands.

use anyhow::Result;
use console::style;

use botsmith_types::theme::Theme;

use crate::cli::ThemeCommand;
use crate::state::AppState;

pub async fn theme(state: &AppState, action: Option<ThemeCommand>, json: bool) -> Result<()> {
    let mut context = state.app_context().await?;

    let theme = match action.unwrap_or(ThemeCommand::Show) {
        ThemeCommand::Show => context.theme(),
        ThemeCommand::Toggle => context.toggle_theme().await?,
        ThemeCommand::Set { theme } => {
            let theme = theme.parse::<Theme>().map_err(|e| anyhow::anyhow!(e))?;
            context.set_theme(theme).await?;
            theme
        }
    };

    if json {
        println!("{}", serde_json::json!({ "theme": theme }));
    } else {
        let icon = match theme {
            Theme::Light => "☀",
            Theme::Dark => "☾",
        };
        println!("  {icon} {}", style(theme).bold());
    }
    Ok(())
}
