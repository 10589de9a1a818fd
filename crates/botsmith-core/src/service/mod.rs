//! Business logic services (use cases).
//!
//! Services orchestrate key-value store calls and business rules. They
//! depend on the `KvStore` port, never on a concrete backend.

pub mod bot;
pub mod defaults;
