//! Intent catalog and LLM-driven intent generation.

pub mod catalog;
pub mod generator;
