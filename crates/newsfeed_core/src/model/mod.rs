//! Domain model for the article cache and its presentation.
//!
//! # Responsibility
//! - Define the canonical article record shared by storage, sync and views.
//! - Define the tagged UI state emitted by the presentation layer.

pub mod article;
pub mod ui_state;
