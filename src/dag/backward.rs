// src/dag/backward.rs

//! Backward scheduling: fix the end, solve for the latest safe starts.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::dag::graph::{DependencyGraph, Subgraph};
use crate::dag::schedule::{ResolveState, Schedule, ScheduleRow};
use crate::dates::sub_days;
use crate::types::ComponentName;

/// Terminal component pinned to an explicit end date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalAnchor {
    pub name: ComponentName,
    pub end: NaiveDate,
}

/// Latest start/finish per selected component so that everything is ready by
/// `milestone_start`.
///
/// - A component nothing selected depends on (a sink) finishes on
///   `milestone_start`, or on `anchor.end` if it is the anchored terminal.
/// - Any other component finishes by the earliest start among its dependents
///   (`finish(D) - lead(D)`).
/// - start = finish - lead. Negative or missing lead times count as 0.
///
/// Components whose dependents cannot be settled first (a cycle) fall back
/// to `milestone_start` and are listed in the returned [`Resolution`].
///
/// Rows come back in selection order, one per distinct selected name.
///
/// [`Resolution`]: crate::dag::Resolution
pub fn schedule_backward(
    selection: &[ComponentName],
    graph: &DependencyGraph,
    milestone_start: NaiveDate,
    lead_days: &HashMap<ComponentName, i64>,
    anchor: Option<&TerminalAnchor>,
) -> Schedule {
    let sub = graph.restrict_to(selection);
    let lead = |name: &str| lead_days.get(name).copied().unwrap_or(0).max(0);

    let mut finish: HashMap<&str, NaiveDate> = HashMap::new();
    let mut fallback: Vec<ComponentName> = Vec::new();

    for name in downstream_first_order(&sub) {
        let dependents = sub.dependents_of(name);

        let date = if dependents.is_empty() {
            match anchor {
                Some(a) if a.name == name => a.end,
                _ => milestone_start,
            }
        } else {
            let tightest = dependents
                .iter()
                .filter_map(|d| finish.get(d.as_str()).map(|f| sub_days(*f, lead(d))))
                .min();
            match tightest {
                Some(date) => date,
                None => {
                    warn!(
                        component = %name,
                        "no dependent could be scheduled first (cycle?); finishing at milestone"
                    );
                    fallback.push(name.to_string());
                    milestone_start
                }
            }
        };

        debug!(component = %name, finish = %date, "backward: resolved finish");
        finish.insert(name, date);
    }

    let rows = sub
        .members()
        .iter()
        .map(|name| {
            let fin = finish.get(name.as_str()).copied().unwrap_or(milestone_start);
            ScheduleRow {
                component: name.clone(),
                start: sub_days(fin, lead(name)),
                finish: fin,
            }
        })
        .collect();

    // Report fallbacks in selection order.
    fallback.sort_by_key(|name| sub.members().iter().position(|m| m == name));
    Schedule::new(rows, fallback)
}

/// Post-order DFS over the dependents relation: a component is emitted only
/// after every component downstream of it. Iterative, so long chains do not
/// grow the call stack.
fn downstream_first_order(sub: &Subgraph) -> Vec<&str> {
    let mut state: HashMap<&str, ResolveState> = HashMap::new();
    let mut order: Vec<&str> = Vec::with_capacity(sub.members().len());

    for root in sub.members() {
        if state.contains_key(root.as_str()) {
            continue;
        }

        let mut stack: Vec<(&str, usize)> = vec![(root.as_str(), 0)];
        state.insert(root.as_str(), ResolveState::Resolving);

        while let Some(&(name, next_idx)) = stack.last() {
            match sub.dependents_of(name).get(next_idx) {
                Some(next) => {
                    if let Some(top) = stack.last_mut() {
                        top.1 += 1;
                    }
                    if !state.contains_key(next.as_str()) {
                        state.insert(next.as_str(), ResolveState::Resolving);
                        stack.push((next.as_str(), 0));
                    }
                }
                None => {
                    stack.pop();
                    state.insert(name, ResolveState::Resolved);
                    order.push(name);
                }
            }
        }
    }

    order
}
