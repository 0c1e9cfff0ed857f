//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the table contract the synchronizer writes through.
//! - Isolate SQLite query details from sync and presentation logic.

pub mod article_repo;
