//! Embed tokens and iframe snippets.
//!
//! A bot is deployed by encoding its full configuration into a URL fragment.
//! The hosting page decodes the fragment and starts a chat session with an
//! empty knowledge base; tokens never carry documents.

pub mod codec;
pub mod snippet;
