//! Shared domain types for Botsmith.
//!
//! This crate contains the core domain types used across the Botsmith workspace:
//! bot configurations and intents, knowledge documents, chat messages, LLM
//! request/response shapes, global configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, thiserror.

pub mod bot;
pub mod chat;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod llm;
pub mod theme;
