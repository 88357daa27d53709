// src/engine/planner.rs

//! Backward planning and forward tracking over a [`Project`].

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::dag::{
    Schedule, ScheduleRow, TerminalAnchor, TerminalStep, schedule_backward, schedule_forward,
};
use crate::dates::{add_days, days_between, sub_days};
use crate::engine::project::Project;
use crate::engine::selection::{ModeChoice, SelectionOptions, choose_mode, normalise_selection};
use crate::errors::{ProcureError, Result};
use crate::pricing::offer::{Offer, compute_offer};
use crate::types::ComponentName;

/// Priced entry for one selected component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedComponent {
    pub component: ComponentName,
    pub quantity: u64,
    /// `None` for a terminal step that has no dataset row.
    pub offer: Option<Offer>,
    pub mode: Option<ModeChoice>,
    pub lead_days: i64,
    /// Total cost in the retained mode; 0 without an offer.
    pub cost: f64,
}

/// Display row: a schedule row whose zero-length bar is widened so it stays
/// visible. The underlying [`ScheduleRow`] is untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineBar {
    pub component: ComponentName,
    pub lead_days: i64,
    pub cost: f64,
    pub start: NaiveDate,
    pub finish: NaiveDate,
    /// Days left until `finish`, counted from the tracking date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_days: Option<i64>,
}

/// Widen a bar with `finish <= start` to `max(1, lead_days)` days.
pub fn widen_for_display(row: &ScheduleRow, lead_days: i64) -> (NaiveDate, NaiveDate) {
    if row.finish <= row.start {
        (row.start, add_days(row.start, lead_days.max(1)))
    } else {
        (row.start, row.finish)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    pub selection: Vec<ComponentName>,
    /// Delivery date of the finished product.
    pub target: NaiveDate,
    pub options: SelectionOptions,
}

/// Result of a backward planning run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub target: NaiveDate,
    /// Date every component must be available: `target - assembly_days`.
    pub milestone: NaiveDate,
    pub assembly_days: i64,
    pub currency: String,
    pub components: Vec<PlannedComponent>,
    pub schedule: Schedule,
    pub bars: Vec<TimelineBar>,
    pub total_cost: f64,
    /// Latest date the first order can go out.
    pub earliest_start: Option<NaiveDate>,
    pub delivery: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRequest {
    pub selection: Vec<ComponentName>,
    pub today: NaiveDate,
    pub options: SelectionOptions,
    /// Actual or intended order dates; missing components order `today`.
    pub order_dates: HashMap<ComponentName, NaiveDate>,
}

/// Result of a forward tracking run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tracking {
    pub today: NaiveDate,
    pub assembly_days: i64,
    pub currency: String,
    pub components: Vec<PlannedComponent>,
    pub schedule: Schedule,
    pub bars: Vec<TimelineBar>,
    pub total_cost: f64,
    pub expected_finish: Option<NaiveDate>,
}

impl Project {
    /// Work back from `request.target`.
    ///
    /// Offers are priced for the milestone `target - assembly_days`, which is
    /// also where sink components finish. A selected terminal is anchored on
    /// the target itself and lasts `assembly_days`.
    pub fn plan(&self, request: &PlanRequest) -> Result<Plan> {
        let selection = self.checked_selection(&request.selection)?;
        let milestone = sub_days(request.target, self.assembly_days());

        let components = self.price_selection(&selection, &request.options, milestone)?;
        let leads = lead_map(&components);

        let anchor = selection
            .iter()
            .any(|c| self.is_terminal(c))
            .then(|| TerminalAnchor {
                name: self.terminal().to_string(),
                end: request.target,
            });

        let schedule = schedule_backward(&selection, self.graph(), milestone, &leads, anchor.as_ref());
        if !schedule.is_converged() {
            warn!(resolution = ?schedule.resolution, "plan: schedule built from partial constraints");
        }

        let bars = self.bars(&schedule, &components, None);
        let total_cost = components.iter().map(|c| c.cost).sum();
        let earliest_start = schedule.earliest_start();

        info!(
            target = %request.target,
            %milestone,
            components = components.len(),
            total_cost,
            earliest_start = ?earliest_start,
            "plan computed"
        );

        Ok(Plan {
            target: request.target,
            milestone,
            assembly_days: self.assembly_days(),
            currency: self.run_currency(&components),
            components,
            schedule,
            bars,
            total_cost,
            earliest_start,
            delivery: request.target,
        })
    }

    /// Work forward from the order dates in `request`.
    ///
    /// Offers are priced as of `today`; the terminal step is appended after
    /// its prerequisites and lasts `assembly_days`.
    pub fn track(&self, request: &TrackRequest) -> Result<Tracking> {
        let selection = self.checked_selection(&request.selection)?;

        for name in request.order_dates.keys() {
            if !selection.contains(name) {
                warn!(component = %name, "order date given for an unselected component; ignored");
            }
        }

        let components = self.price_selection(&selection, &request.options, request.today)?;
        let leads = lead_map(&components);

        let terminal = TerminalStep {
            name: self.terminal().to_string(),
            duration_days: self.assembly_days(),
        };
        let schedule = schedule_forward(
            &selection,
            self.graph(),
            &request.order_dates,
            request.today,
            &leads,
            &terminal,
        );
        if !schedule.is_converged() {
            warn!(resolution = ?schedule.resolution, "track: schedule built from partial constraints");
        }

        let bars = self.bars(&schedule, &components, Some(request.today));
        let total_cost = components.iter().map(|c| c.cost).sum();
        let expected_finish = schedule.latest_finish();

        info!(
            today = %request.today,
            components = components.len(),
            expected_finish = ?expected_finish,
            "tracking computed"
        );

        Ok(Tracking {
            today: request.today,
            assembly_days: self.assembly_days(),
            currency: self.run_currency(&components),
            components,
            schedule,
            bars,
            total_cost,
            expected_finish,
        })
    }

    fn checked_selection(&self, selection: &[ComponentName]) -> Result<Vec<ComponentName>> {
        let selection = normalise_selection(selection);
        if selection.is_empty() {
            return Err(ProcureError::InvalidArgument("no component selected".to_string()));
        }
        Ok(selection)
    }

    /// Offer, mode and lead time per selected component, priced at
    /// `offer_date`. The terminal may lack a dataset row; any other unknown
    /// name is an error.
    fn price_selection(
        &self,
        selection: &[ComponentName],
        options: &SelectionOptions,
        offer_date: NaiveDate,
    ) -> Result<Vec<PlannedComponent>> {
        let mut out = Vec::with_capacity(selection.len());

        for name in selection {
            let is_terminal = self.is_terminal(name);
            let quantity = options.quantity_for(name);

            let record = match self.record(name) {
                Ok(record) => Some(record),
                Err(ProcureError::UnknownComponent(_)) if is_terminal => None,
                Err(err) => return Err(err),
            };

            let priced = record.map(|record| {
                let offer = compute_offer(&record, quantity, offer_date, self.pricing());
                let choice = choose_mode(&offer, is_terminal, options.modes.get(name).copied(), options.default_mode);
                (offer, choice)
            });

            let cost = priced.as_ref().map_or(0.0, |(o, c)| o.mode(c.mode).total_cost);
            let lead_days = if is_terminal {
                self.assembly_days()
            } else {
                priced.as_ref().map_or(0, |(o, c)| o.mode(c.mode).lead_time_days)
            };

            debug!(
                component = %name,
                quantity,
                mode = ?priced.as_ref().map(|(_, c)| c.mode),
                lead_days,
                cost,
                "priced component"
            );

            let (offer, mode) = match priced {
                Some((offer, choice)) => (Some(offer), Some(choice)),
                None => (None, None),
            };
            out.push(PlannedComponent {
                component: name.clone(),
                quantity,
                offer,
                mode,
                lead_days,
                cost,
            });
        }

        Ok(out)
    }

    fn bars(
        &self,
        schedule: &Schedule,
        components: &[PlannedComponent],
        today: Option<NaiveDate>,
    ) -> Vec<TimelineBar> {
        let by_name: HashMap<&str, &PlannedComponent> =
            components.iter().map(|c| (c.component.as_str(), c)).collect();

        schedule
            .rows
            .iter()
            .map(|row| {
                let planned = by_name.get(row.component.as_str());
                let lead_days = match planned {
                    Some(p) => p.lead_days,
                    None if self.is_terminal(&row.component) => self.assembly_days(),
                    None => 0,
                };
                let (start, finish) = widen_for_display(row, lead_days);
                TimelineBar {
                    component: row.component.clone(),
                    lead_days,
                    cost: planned.map_or(0.0, |p| p.cost),
                    start,
                    finish,
                    remaining_days: today.map(|t| days_between(t, finish).max(0)),
                }
            })
            .collect()
    }

    fn run_currency(&self, components: &[PlannedComponent]) -> String {
        components
            .iter()
            .find_map(|c| c.offer.as_ref().map(|o| o.currency.clone()))
            .unwrap_or_else(|| self.pricing().default_currency.clone())
    }
}

fn lead_map(components: &[PlannedComponent]) -> HashMap<ComponentName, i64> {
    components
        .iter()
        .map(|c| (c.component.clone(), c.lead_days))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn zero_length_bars_widen_to_lead_or_one_day() {
        let row = ScheduleRow {
            component: "Vis".to_string(),
            start: d(2025, 3, 3),
            finish: d(2025, 3, 3),
        };
        assert_eq!(widen_for_display(&row, 0).1, d(2025, 3, 4));
        assert_eq!(widen_for_display(&row, 7).1, d(2025, 3, 10));

        let long = ScheduleRow {
            finish: d(2025, 3, 5),
            ..row
        };
        assert_eq!(widen_for_display(&long, 30), (d(2025, 3, 3), d(2025, 3, 5)));
    }
}
