// src/dag/forward.rs

//! Forward scheduling: fix the order dates, solve for the earliest finishes.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::dag::graph::DependencyGraph;
use crate::dag::schedule::{ResolveState, Schedule, ScheduleRow};
use crate::dates::add_days;
use crate::types::ComponentName;

/// Terminal (assembly) step appended after every other component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalStep {
    pub name: ComponentName,
    pub duration_days: i64,
}

/// Earliest start/finish per selected component.
///
/// - start = max(own order date, latest finish of its selected prerequisites)
/// - finish = start + max(0, lead)
///
/// Components without an entry in `order_dates` are ordered on
/// `default_order_date`. Resolution is a fixed-point relaxation bounded to
/// 3 × the component count passes; whatever is still blocked afterwards (a
/// cycle) is placed from the prerequisite finishes known at that point and
/// reported in the returned [`Resolution`].
///
/// The terminal is never relaxed with the others. When it is selected, or any
/// of its prerequisites is, a final row is appended: it starts at the latest
/// finish among its selected prerequisites (or among all rows if it has
/// none) and lasts `terminal.duration_days`.
///
/// [`Resolution`]: crate::dag::Resolution
pub fn schedule_forward(
    selection: &[ComponentName],
    graph: &DependencyGraph,
    order_dates: &HashMap<ComponentName, NaiveDate>,
    default_order_date: NaiveDate,
    lead_days: &HashMap<ComponentName, i64>,
    terminal: &TerminalStep,
) -> Schedule {
    let terminal_selected = selection.iter().any(|c| *c == terminal.name);
    let components: Vec<ComponentName> = selection
        .iter()
        .filter(|c| **c != terminal.name)
        .cloned()
        .collect();
    let sub = graph.restrict_to(&components);

    let mut starts: HashMap<&str, NaiveDate> = HashMap::new();
    let mut finishes: HashMap<&str, NaiveDate> = HashMap::new();
    let mut state: HashMap<&str, ResolveState> = HashMap::new();

    let place = |name: &str, deps: &[ComponentName], finishes: &HashMap<&str, NaiveDate>| {
        let own = order_dates.get(name).copied().unwrap_or(default_order_date);
        let latest_dep = deps.iter().filter_map(|d| finishes.get(d.as_str()).copied()).max();
        let start = latest_dep.map_or(own, |dep| own.max(dep));
        let lead = lead_days.get(name).copied().unwrap_or(0).max(0);
        (start, add_days(start, lead))
    };

    let members = sub.members();
    let max_passes = members.len().saturating_mul(3);
    let mut passes = 0;
    let mut remaining = members.len();

    while remaining > 0 && passes < max_passes {
        passes += 1;
        let mut progress = false;

        for name in members {
            let name = name.as_str();
            if state.get(name) == Some(&ResolveState::Resolved) {
                continue;
            }
            let deps = sub.dependencies_of(name);
            if deps.iter().all(|d| finishes.contains_key(d.as_str())) {
                let (start, finish) = place(name, deps, &finishes);
                starts.insert(name, start);
                finishes.insert(name, finish);
                state.insert(name, ResolveState::Resolved);
                remaining -= 1;
                progress = true;
                debug!(component = %name, %start, %finish, pass = passes, "forward: resolved");
            } else {
                state.insert(name, ResolveState::Resolving);
            }
        }

        if !progress {
            break;
        }
    }

    let mut forced: Vec<ComponentName> = Vec::new();
    for name in members {
        let name = name.as_str();
        if state.get(name) == Some(&ResolveState::Resolved) {
            continue;
        }
        let (start, finish) = place(name, sub.dependencies_of(name), &finishes);
        warn!(
            component = %name,
            %start,
            %finish,
            "forward: unresolved after relaxation (cycle?); placed from known prerequisites"
        );
        starts.insert(name, start);
        finishes.insert(name, finish);
        state.insert(name, ResolveState::Resolved);
        forced.push(name.to_string());
    }

    let mut rows: Vec<ScheduleRow> = members
        .iter()
        .filter_map(|name| {
            let start = starts.get(name.as_str())?;
            let finish = finishes.get(name.as_str())?;
            Some(ScheduleRow {
                component: name.clone(),
                start: *start,
                finish: *finish,
            })
        })
        .collect();

    let terminal_deps: Vec<&ComponentName> = graph
        .direct_dependencies(&terminal.name)
        .iter()
        .filter(|d| sub.contains(d))
        .collect();

    if terminal_selected || !terminal_deps.is_empty() {
        let start = terminal_deps
            .iter()
            .filter_map(|d| finishes.get(d.as_str()).copied())
            .max()
            .or_else(|| finishes.values().copied().max())
            .unwrap_or(default_order_date);
        let finish = add_days(start, terminal.duration_days.max(0));
        debug!(component = %terminal.name, %start, %finish, "forward: terminal step");
        rows.push(ScheduleRow {
            component: terminal.name.clone(),
            start,
            finish,
        });
    }

    Schedule::new(rows, forced)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn graph(edges: &[(&str, &[&str])]) -> DependencyGraph {
        edges
            .iter()
            .map(|(n, deps)| (n.to_string(), deps.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    fn names(items: &[&str]) -> Vec<ComponentName> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn leads(items: &[(&str, i64)]) -> HashMap<ComponentName, i64> {
        items.iter().map(|(n, l)| (n.to_string(), *l)).collect()
    }

    fn assembly(days: i64) -> TerminalStep {
        TerminalStep {
            name: "Assemblage".to_string(),
            duration_days: days,
        }
    }

    #[test]
    fn waits_for_prerequisites() {
        let g = graph(&[("Carte", &["PCB"])]);
        let today = d(2025, 3, 3);
        let s = schedule_forward(
            &names(&["Carte", "PCB"]),
            &g,
            &HashMap::new(),
            today,
            &leads(&[("PCB", 14), ("Carte", 7)]),
            &assembly(56),
        );

        assert!(s.is_converged());
        assert_eq!(s.rows.len(), 2);
        assert_eq!(s.row("PCB").unwrap().finish, d(2025, 3, 17));
        let carte = s.row("Carte").unwrap();
        assert_eq!(carte.start, d(2025, 3, 17));
        assert_eq!(carte.finish, d(2025, 3, 24));
    }

    #[test]
    fn own_order_date_can_be_later_than_prerequisites() {
        let g = graph(&[("Carte", &["PCB"])]);
        let today = d(2025, 3, 3);
        let orders: HashMap<ComponentName, NaiveDate> =
            [("Carte".to_string(), d(2025, 4, 1))].into_iter().collect();
        let s = schedule_forward(
            &names(&["PCB", "Carte"]),
            &g,
            &orders,
            today,
            &leads(&[("PCB", 14), ("Carte", 7)]),
            &assembly(56),
        );
        assert_eq!(s.row("Carte").unwrap().start, d(2025, 4, 1));
    }

    #[test]
    fn negative_lead_counts_as_zero() {
        let s = schedule_forward(
            &names(&["Vis"]),
            &DependencyGraph::default(),
            &HashMap::new(),
            d(2025, 3, 3),
            &leads(&[("Vis", -7)]),
            &assembly(0),
        );
        let row = s.row("Vis").unwrap();
        assert_eq!(row.start, row.finish);
    }

    #[test]
    fn terminal_follows_its_prerequisites() {
        let g = graph(&[("Assemblage", &["PCB", "Carte"])]);
        let s = schedule_forward(
            &names(&["PCB", "Carte", "Assemblage"]),
            &g,
            &HashMap::new(),
            d(2025, 3, 3),
            &leads(&[("PCB", 14), ("Carte", 28), ("Assemblage", 999)]),
            &assembly(56),
        );

        assert_eq!(s.rows.len(), 3);
        let last = s.rows.last().unwrap();
        assert_eq!(last.component, "Assemblage");
        assert_eq!(last.start, d(2025, 3, 31));
        assert_eq!(last.finish, d(2025, 5, 26));
    }

    #[test]
    fn terminal_without_selected_prerequisites_follows_everything() {
        let s = schedule_forward(
            &names(&["PCB", "Carte", "Assemblage"]),
            &DependencyGraph::default(),
            &HashMap::new(),
            d(2025, 3, 3),
            &leads(&[("PCB", 14), ("Carte", 28)]),
            &assembly(7),
        );
        let last = s.rows.last().unwrap();
        assert_eq!(last.start, d(2025, 3, 31));
        assert_eq!(last.finish, d(2025, 4, 7));
    }

    #[test]
    fn terminal_is_omitted_when_unrelated_to_selection() {
        let s = schedule_forward(
            &names(&["PCB"]),
            &DependencyGraph::default(),
            &HashMap::new(),
            d(2025, 3, 3),
            &HashMap::new(),
            &assembly(7),
        );
        assert_eq!(s.rows.len(), 1);
    }

    #[test]
    fn cycle_is_force_resolved() {
        let g = graph(&[("A", &["B"]), ("B", &["A"]), ("C", &["A"])]);
        let today = d(2025, 3, 3);
        let s = schedule_forward(
            &names(&["A", "B", "C"]),
            &g,
            &HashMap::new(),
            today,
            &leads(&[("A", 7), ("B", 7), ("C", 7)]),
            &assembly(0),
        );

        assert_eq!(s.rows.len(), 3);
        assert_eq!(
            s.resolution,
            crate::dag::Resolution::Fallback {
                components: names(&["A", "B", "C"])
            }
        );
        // A is forced first with nothing known, B then sees A's finish.
        assert_eq!(s.row("A").unwrap().start, today);
        assert_eq!(s.row("B").unwrap().start, d(2025, 3, 10));
        assert_eq!(s.row("C").unwrap().start, d(2025, 3, 10));
    }
}
