//! Interactive CLI chat with a bot.
//!
//! Entry point: `loop_runner::run_chat_loop`. Replies are printed by an
//! observer subscribed to the conversation, not by the input loop.

pub mod commands;
pub mod input;
pub mod loop_runner;
