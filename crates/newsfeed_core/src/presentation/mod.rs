//! Presentation state for list and detail views.

pub mod view_model;

pub use view_model::NewsViewModel;
