// src/dag/mod.rs

//! Component dependency graph and the two schedulers.
//!
//! - [`graph`] holds the component → prerequisite adjacency, cycle-tolerant.
//! - [`backward`] places components back from a fixed milestone.
//! - [`forward`] places components forward from chosen order dates.
//! - [`schedule`] provides the row and result types shared by both.

pub mod backward;
pub mod forward;
pub mod graph;
pub mod schedule;

pub use backward::{TerminalAnchor, schedule_backward};
pub use forward::{TerminalStep, schedule_forward};
pub use graph::{DependencyGraph, Subgraph};
pub use schedule::{Resolution, Schedule, ScheduleRow};
