// tests/schedules.rs

use std::collections::HashMap;

use chrono::NaiveDate;
use procureplan::dag::{
    Resolution, TerminalAnchor, TerminalStep, schedule_backward, schedule_forward,
};
use procureplan::types::ComponentName;
use procureplan_test_utils::builders::{graph_from, names};
use procureplan_test_utils::{date, init_tracing};

fn leads(items: &[(&str, i64)]) -> HashMap<ComponentName, i64> {
    items.iter().map(|(n, l)| (n.to_string(), *l)).collect()
}

fn orders(items: &[(&str, NaiveDate)]) -> HashMap<ComponentName, NaiveDate> {
    items.iter().map(|(n, d)| (n.to_string(), *d)).collect()
}

#[test]
fn transitive_dependencies_survive_cycles() {
    let g = graph_from(&[("A", &["B"]), ("B", &["C", "A"]), ("C", &["C"])]);
    let deps = g.all_transitive_dependencies("A");
    assert_eq!(deps.into_iter().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    assert_eq!(g.direct_dependencies("B"), ["C", "A"]);
    assert!(g.direct_dependencies("missing").is_empty());
}

#[test]
fn backward_plan_with_anchored_assembly() {
    init_tracing();

    let g = graph_from(&[
        ("Carte mère", &["PCB"]),
        ("Assemblage", &["Carte mère", "Boitier"]),
    ]);
    let target = date(2025, 12, 1);
    let milestone = date(2025, 10, 20);
    let anchor = TerminalAnchor {
        name: "Assemblage".to_string(),
        end: target,
    };

    let s = schedule_backward(
        &names(&["Assemblage", "Boitier", "Carte mère", "PCB"]),
        &g,
        milestone,
        &leads(&[("Assemblage", 42), ("Boitier", 14), ("Carte mère", 28), ("PCB", 21)]),
        Some(&anchor),
    );

    assert!(s.is_converged());
    let asm = s.row("Assemblage").unwrap();
    assert_eq!((asm.start, asm.finish), (milestone, target));
    let carte = s.row("Carte mère").unwrap();
    assert_eq!((carte.start, carte.finish), (date(2025, 9, 22), milestone));
    let pcb = s.row("PCB").unwrap();
    assert_eq!((pcb.start, pcb.finish), (date(2025, 9, 1), date(2025, 9, 22)));
    assert_eq!(s.row("Boitier").unwrap().start, date(2025, 10, 6));
    assert_eq!(s.earliest_start(), Some(date(2025, 9, 1)));
}

#[test]
fn backward_without_anchor_finishes_sinks_on_milestone() {
    let g = graph_from(&[("Assemblage", &["PCB"])]);
    let milestone = date(2025, 10, 20);
    let s = schedule_backward(
        &names(&["Assemblage", "PCB"]),
        &g,
        milestone,
        &leads(&[("Assemblage", 10), ("PCB", 5)]),
        None,
    );
    assert_eq!(s.row("Assemblage").unwrap().finish, milestone);
    assert_eq!(s.row("PCB").unwrap().finish, date(2025, 10, 10));
}

#[test]
fn backward_ignores_unselected_dependents() {
    let g = graph_from(&[("Carte mère", &["PCB"])]);
    let milestone = date(2025, 10, 20);
    let s = schedule_backward(&names(&["PCB"]), &g, milestone, &leads(&[("PCB", 7)]), None);
    assert_eq!(s.rows.len(), 1);
    assert_eq!(s.row("PCB").unwrap().finish, milestone);
}

#[test]
fn forward_tracking_with_custom_order_dates() {
    init_tracing();

    let g = graph_from(&[
        ("Carte mère", &["PCB"]),
        ("Assemblage", &["Carte mère", "Boitier"]),
    ]);
    let today = date(2025, 3, 3);
    let terminal = TerminalStep {
        name: "Assemblage".to_string(),
        duration_days: 42,
    };

    let s = schedule_forward(
        &names(&["Assemblage", "Boitier", "Carte mère", "PCB"]),
        &g,
        &orders(&[("Boitier", date(2025, 5, 1))]),
        today,
        &leads(&[("Boitier", 14), ("Carte mère", 28), ("PCB", 21)]),
        &terminal,
    );

    assert!(s.is_converged());
    assert_eq!(s.rows.len(), 4);
    assert_eq!(s.row("PCB").unwrap().finish, date(2025, 3, 24));
    let carte = s.row("Carte mère").unwrap();
    assert_eq!((carte.start, carte.finish), (date(2025, 3, 24), date(2025, 4, 21)));
    assert_eq!(s.row("Boitier").unwrap().finish, date(2025, 5, 15));

    let last = s.rows.last().unwrap();
    assert_eq!(last.component, "Assemblage");
    assert_eq!((last.start, last.finish), (date(2025, 5, 15), date(2025, 6, 26)));
}

#[test]
fn forward_terminal_appended_when_only_a_prerequisite_is_selected() {
    let g = graph_from(&[("Assemblage", &["PCB"])]);
    let s = schedule_forward(
        &names(&["PCB"]),
        &g,
        &HashMap::new(),
        date(2025, 3, 3),
        &leads(&[("PCB", 7)]),
        &TerminalStep {
            name: "Assemblage".to_string(),
            duration_days: 7,
        },
    );
    assert_eq!(s.rows.len(), 2);
    assert_eq!(s.rows[1].start, date(2025, 3, 10));
    assert_eq!(s.rows[1].finish, date(2025, 3, 17));
}

#[test]
fn cycles_yield_one_row_per_component_and_report_fallback() {
    let g = graph_from(&[("A", &["B"]), ("B", &["A"]), ("S", &["S"])]);
    let selection = names(&["A", "B", "S"]);
    let l = leads(&[("A", 3), ("B", 4), ("S", 5)]);

    let back = schedule_backward(&selection, &g, date(2025, 6, 1), &l, None);
    assert_eq!(back.rows.len(), 3);
    assert!(matches!(back.resolution, Resolution::Fallback { .. }));

    let fwd = schedule_forward(
        &selection,
        &g,
        &HashMap::new(),
        date(2025, 6, 1),
        &l,
        &TerminalStep {
            name: "Assemblage".to_string(),
            duration_days: 0,
        },
    );
    assert_eq!(fwd.rows.len(), 3);
    assert_eq!(
        fwd.resolution,
        Resolution::Fallback {
            components: names(&["A", "B"])
        }
    );
    // The self-loop alone does not block S.
    assert_eq!(fwd.row("S").unwrap().finish, date(2025, 6, 6));
}
