//! HTTP host for embedded bots.
//!
//! Axum-based API at `/api/v1/embed/` that turns embed tokens into chat
//! sessions, with envelope response format and permissive CORS so widgets
//! can call it from any page.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod sessions;
