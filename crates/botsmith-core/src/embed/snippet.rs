//! Embed URL and iframe markup.

use botsmith_types::bot::BotConfig;
use serde::{Deserialize, Serialize};

use super::codec::encode;

/// Presentation options for the generated iframe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedOptions {
    pub width: u32,
    pub height: u32,
    pub show_border: bool,
    pub border_radius: u32,
    pub show_shadow: bool,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            width: 400,
            height: 600,
            show_border: true,
            border_radius: 12,
            show_shadow: true,
        }
    }
}

impl EmbedOptions {
    /// Inline CSS for the iframe.
    pub fn style(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        if self.show_border {
            parts.push("border: 1px solid #fed7aa;".to_string());
        }
        parts.push(format!("border-radius: {}px;", self.border_radius));
        if self.show_shadow {
            parts.push("box-shadow: 0 4px 12px rgba(249, 115, 22, 0.1);".to_string());
        }
        parts.join(" ")
    }
}

/// `<base>#<token>`. Any fragment already on `base` is replaced.
pub fn embed_url(base: &str, config: &BotConfig) -> String {
    let base = base.split_once('#').map_or(base, |(b, _)| b);
    format!("{base}#{}", encode(config))
}

/// Copy-paste iframe markup for `url`.
pub fn iframe_snippet(url: &str, title: &str, options: &EmbedOptions) -> String {
    format!(
        "<iframe\n  src=\"{}\"\n  width=\"{}\"\n  height=\"{}\"\n  style=\"{}\"\n  title=\"{}\"\n  allow=\"microphone\"\n></iframe>",
        escape_attr(url),
        options.width,
        options.height,
        options.style(),
        escape_attr(title),
    )
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::codec::{decode, token_from_url};

    #[test]
    fn test_default_snippet() {
        let snippet = iframe_snippet("http://localhost:3000/#abc", "Helper", &EmbedOptions::default());
        assert_eq!(
            snippet,
            "<iframe\n  src=\"http://localhost:3000/#abc\"\n  width=\"400\"\n  height=\"600\"\n  \
             style=\"border: 1px solid #fed7aa; border-radius: 12px; box-shadow: 0 4px 12px rgba(249, 115, 22, 0.1);\"\n  \
             title=\"Helper\"\n  allow=\"microphone\"\n></iframe>"
        );
    }

    #[test]
    fn test_style_without_border_or_shadow() {
        let options = EmbedOptions {
            show_border: false,
            show_shadow: false,
            border_radius: 0,
            ..EmbedOptions::default()
        };
        assert_eq!(options.style(), "border-radius: 0px;");
    }

    #[test]
    fn test_title_is_escaped() {
        let snippet = iframe_snippet("u", "Tom & \"Jerry\"", &EmbedOptions::default());
        assert!(snippet.contains("title=\"Tom &amp; &quot;Jerry&quot;\""));
    }

    #[test]
    fn test_embed_url_decodes_back() {
        let bot = BotConfig::new("Helper", Vec::new());
        let url = embed_url("https://bots.example.com/app#old", &bot);
        assert!(url.starts_with("https://bots.example.com/app#"));
        assert_eq!(decode(token_from_url(&url)), Some(bot));
    }
}
