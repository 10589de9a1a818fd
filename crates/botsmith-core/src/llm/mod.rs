//! LLM provider abstractions for Botsmith.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: Object-safe wrapper for dynamic dispatch
//! - `schema`: strict JSON schemas for structured output

pub mod box_provider;
pub mod provider;
pub mod schema;

#[cfg(test)]
pub(crate) mod testing;
