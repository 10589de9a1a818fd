//! Business logic and port definitions for Botsmith.
//!
//! This crate holds the retrieval and intent-resolution pipeline plus the
//! state holders around it (knowledge base, conversation, bot list, embed
//! tokens). It defines the "ports" (`KvStore`, `LlmProvider`) that the
//! infrastructure layer implements and never depends on `botsmith-infra`
//! or any database/HTTP crate.

pub mod chat;
pub mod context;
pub mod embed;
pub mod import;
pub mod intent;
pub mod knowledge;
pub mod llm;
pub mod resolver;
pub mod service;
pub mod storage;
