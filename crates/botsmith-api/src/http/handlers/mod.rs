//! HTTP request handlers.

pub mod embed;
