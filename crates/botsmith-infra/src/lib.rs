//! Infrastructure layer for Botsmith.
//!
//! Contains implementations of the ports defined in `botsmith-core`: SQLite
//! key-value storage, the Gemini model provider and PDF/DOCX text
//! extraction, plus config loading and data directory resolution.

pub mod config;
pub mod extract;
pub mod filesystem;
pub mod llm;
pub mod sqlite;
