//! SQLite storage for Botsmith.

pub mod kv;
pub mod pool;
