// src/dag/schedule.rs

//! Schedule rows and the per-run resolution state shared by both schedulers.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates::days_between;
use crate::types::ComponentName;

/// One component's slot in a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleRow {
    pub component: ComponentName,
    pub start: NaiveDate,
    pub finish: NaiveDate,
}

impl ScheduleRow {
    pub fn duration_days(&self) -> i64 {
        days_between(self.start, self.finish)
    }
}

/// Per-run state of a component inside a scheduler (internal).
///
/// `Resolving` marks a component that has been reached but not settled: on
/// the DFS stack for the backward walk, blocked on a prerequisite for the
/// forward relaxation. `Resolved` is final for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResolveState {
    Resolving,
    Resolved,
}

/// How a scheduling run settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// Every component was placed from fully known constraints.
    Converged,
    /// These components were placed from partial constraints (cycle or
    /// otherwise unresolvable neighbours). Their rows exist but may not
    /// honour every dependency.
    Fallback { components: Vec<ComponentName> },
}

/// Ordered rows for a selection plus how they were obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule {
    pub rows: Vec<ScheduleRow>,
    pub resolution: Resolution,
}

impl Schedule {
    pub(crate) fn new(rows: Vec<ScheduleRow>, fallback: Vec<ComponentName>) -> Self {
        let resolution = if fallback.is_empty() {
            Resolution::Converged
        } else {
            Resolution::Fallback {
                components: fallback,
            }
        };
        Self { rows, resolution }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self.resolution, Resolution::Converged)
    }

    pub fn row(&self, component: &str) -> Option<&ScheduleRow> {
        self.rows.iter().find(|r| r.component == component)
    }

    /// Earliest start over all rows: the date the first order must go out.
    pub fn earliest_start(&self) -> Option<NaiveDate> {
        self.rows.iter().map(|r| r.start).min()
    }

    pub fn latest_finish(&self) -> Option<NaiveDate> {
        self.rows.iter().map(|r| r.finish).max()
    }
}
