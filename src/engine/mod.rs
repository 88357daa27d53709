// src/engine/mod.rs

//! Planning engine.
//!
//! Ties a loaded dataset, the dependency graph and the pricing overheads
//! together into two runs:
//! - [`Project::plan`]: backward from a delivery date ("when must I order?")
//! - [`Project::track`]: forward from order dates ("when will it be done?")
//!
//! Per-component quantity and mode rules live in [`selection`].

pub mod planner;
pub mod project;
pub mod selection;

pub use planner::{
    Plan, PlanRequest, PlannedComponent, TimelineBar, TrackRequest, Tracking, widen_for_display,
};
pub use project::Project;
pub use selection::{ModeChoice, SelectionOptions, choose_mode, normalise_selection};
