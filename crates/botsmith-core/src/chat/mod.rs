//! Conversation state and the per-message chat pipeline.

pub mod service;
pub mod session;
