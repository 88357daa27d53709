// src/report.rs

//! Text and JSON rendering of command results. Output goes to stdout;
//! logs stay on stderr.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::dag::Resolution;
use crate::engine::{Plan, PlannedComponent, TimelineBar, Tracking};
use crate::pricing::offer::{ModeOffer, Offer};
use crate::types::ComponentName;

/// What `procureplan components` reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentsReport {
    pub components: Vec<ComponentName>,
    pub terminal: ComponentName,
    pub assembly_days: i64,
    /// Dependency cycles (strongly connected groups), each sorted.
    pub cycles: Vec<Vec<ComponentName>>,
    /// Transitive prerequisites of each listed component that has any.
    pub prerequisites: BTreeMap<ComponentName, BTreeSet<ComponentName>>,
}

/// Any command result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Components(ComponentsReport),
    Offer(Offer),
    Plan(Plan),
    Tracking(Tracking),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn render(report: &Report, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(report.to_string()),
        OutputFormat::Json => serde_json::to_string_pretty(report).map(|mut s| {
            s.push('\n');
            s
        }),
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Components(r) => fmt::Display::fmt(r, f),
            Report::Offer(o) => write_offer(f, o),
            Report::Plan(p) => write_plan(f, p),
            Report::Tracking(t) => write_tracking(f, t),
        }
    }
}

impl fmt::Display for ComponentsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "components ({}):", self.components.len())?;
        for name in &self.components {
            let marker = if *name == self.terminal { "  (terminal)" } else { "" };
            writeln!(f, "  - {name}{marker}")?;
        }
        writeln!(f, "terminal: {} ({} days)", self.terminal, self.assembly_days)?;
        if !self.prerequisites.is_empty() {
            writeln!(f, "prerequisites (transitive):")?;
            for (name, deps) in &self.prerequisites {
                let deps: Vec<&str> = deps.iter().map(String::as_str).collect();
                writeln!(f, "  - {name} <- {}", deps.join(", "))?;
            }
        }
        if self.cycles.is_empty() {
            writeln!(f, "dependency cycles: none")?;
        } else {
            writeln!(f, "dependency cycles:")?;
            for cycle in &self.cycles {
                writeln!(f, "  - {}", cycle.join(" <-> "))?;
            }
        }
        Ok(())
    }
}

fn write_offer(f: &mut fmt::Formatter<'_>, offer: &Offer) -> fmt::Result {
    writeln!(
        f,
        "{}: requested {}, ordered {} ({})",
        offer.component, offer.requested_qty, offer.qty_ordered, offer.currency
    )?;
    writeln!(
        f,
        "{:<5} {:>12} {:>14} {:>14} {:>14} {:>8}  {}",
        "mode", "unit price", "production", "transport", "total", "lead(d)", "order by"
    )?;
    for mode in [&offer.air, &offer.sea] {
        write_mode_offer(f, mode)?;
    }
    writeln!(f, "cheapest: {}", offer.cheapest_mode())?;
    if !offer.defaulted.is_empty() {
        let fields: Vec<String> = offer.defaulted.iter().map(|d| format!("{d:?}")).collect();
        writeln!(f, "defaulted cells: {}", fields.join(", "))?;
    }
    Ok(())
}

fn write_mode_offer(f: &mut fmt::Formatter<'_>, m: &ModeOffer) -> fmt::Result {
    writeln!(
        f,
        "{:<5} {:>12.4} {:>14.2} {:>14.2} {:>14.2} {:>8}  {}",
        m.mode.as_str(),
        m.unit_price,
        m.production_total_pre_overhead,
        m.transport_total_pre_overhead,
        m.total_cost,
        m.lead_time_days,
        m.order_by
    )
}

fn write_plan(f: &mut fmt::Formatter<'_>, plan: &Plan) -> fmt::Result {
    writeln!(
        f,
        "plan for delivery {} (assembly {} days, components ready by {})",
        plan.target, plan.assembly_days, plan.milestone
    )?;
    writeln!(f)?;
    write_bars(f, &plan.bars, &plan.components, &plan.currency, false)?;
    writeln!(f)?;
    writeln!(f, "total cost (selection): {:.2} {}", plan.total_cost, plan.currency)?;
    match plan.earliest_start {
        Some(date) => writeln!(f, "order at the latest:    {date}")?,
        None => writeln!(f, "order at the latest:    -")?,
    }
    writeln!(f, "delivery:               {}", plan.delivery)?;
    write_resolution(f, &plan.schedule.resolution)
}

fn write_tracking(f: &mut fmt::Formatter<'_>, t: &Tracking) -> fmt::Result {
    writeln!(f, "tracking as of {} (assembly {} days)", t.today, t.assembly_days)?;
    writeln!(f)?;
    write_bars(f, &t.bars, &t.components, &t.currency, true)?;
    writeln!(f)?;
    writeln!(f, "total cost (selection): {:.2} {}", t.total_cost, t.currency)?;
    match t.expected_finish {
        Some(date) => writeln!(f, "expected finish:        {date}")?,
        None => writeln!(f, "expected finish:        -")?,
    }
    write_resolution(f, &t.schedule.resolution)
}

fn write_bars(
    f: &mut fmt::Formatter<'_>,
    bars: &[TimelineBar],
    components: &[PlannedComponent],
    currency: &str,
    remaining: bool,
) -> fmt::Result {
    let width = bars
        .iter()
        .map(|b| b.component.chars().count())
        .max()
        .unwrap_or(0)
        .max("component".len());

    write!(
        f,
        "{:<width$}  {:>8}  {:<11}  {:>7}  {:>14}  {:<10}  {:<10}",
        "component", "qty", "mode", "lead(d)", "cost", "start", "finish"
    )?;
    if remaining {
        write!(f, "  {:>8}", "left(d)")?;
    }
    writeln!(f)?;

    for bar in bars {
        let planned = components.iter().find(|c| c.component == bar.component);
        let qty = planned.map_or_else(|| "-".to_string(), |p| p.quantity.to_string());
        let mode = match planned.and_then(|p| p.mode) {
            Some(choice) if choice.fixed => format!("{} (fixed)", choice.mode),
            Some(choice) => choice.mode.to_string(),
            None => "-".to_string(),
        };
        write!(
            f,
            "{:<width$}  {:>8}  {:<11}  {:>7}  {:>10.2} {:<3}  {:<10}  {:<10}",
            bar.component, qty, mode, bar.lead_days, bar.cost, currency, bar.start, bar.finish
        )?;
        if let Some(days) = bar.remaining_days.filter(|_| remaining) {
            write!(f, "  {days:>8}")?;
        }
        writeln!(f)?;
    }
    Ok(())
}

fn write_resolution(f: &mut fmt::Formatter<'_>, resolution: &Resolution) -> fmt::Result {
    match resolution {
        Resolution::Converged => Ok(()),
        Resolution::Fallback { components } => writeln!(
            f,
            "warning: dependency cycle; placed from partial constraints: {}",
            components.join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_report_lists_cycles() {
        let report = Report::Components(ComponentsReport {
            components: vec!["A".to_string(), "Assemblage".to_string()],
            terminal: "Assemblage".to_string(),
            assembly_days: 56,
            cycles: vec![vec!["A".to_string(), "B".to_string()]],
            prerequisites: [(
                "Assemblage".to_string(),
                ["A".to_string(), "B".to_string()].into_iter().collect(),
            )]
            .into_iter()
            .collect(),
        });
        let text = render(&report, OutputFormat::Text).unwrap();
        assert!(text.contains("  - Assemblage  (terminal)"));
        assert!(text.contains("  - A <-> B"));
        assert!(text.contains("  - Assemblage <- A, B"));

        let json = render(&report, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["assembly_days"], 56);
        assert_eq!(value["cycles"][0][1], "B");
    }
}
