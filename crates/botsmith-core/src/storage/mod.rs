//! Storage abstractions for Botsmith.
//!
//! Defines the key-value port every piece of persisted state goes through,
//! the key naming scheme, and an in-process implementation.
//! Durable implementations live in botsmith-infra.

pub mod keys;
pub mod kv_store;
pub mod memory;
