// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod dataset;
pub mod dates;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod pricing;
pub mod report;
pub mod types;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::cli::{CliArgs, Command};
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::dataset::{Dataset, DatasetCache};
use crate::engine::{PlanRequest, Project, TrackRequest};
use crate::report::{ComponentsReport, OutputFormat, Report, render};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and validation
/// - dataset ingestion through the fingerprint cache
/// - the requested planning command
/// - report rendering to stdout
///
/// A CLI invocation loads the dataset once, so its cache never hits. Callers
/// that re-plan in one process should keep their own [`DatasetCache`] and
/// build each [`Project`] from `get_or_load`.
pub fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let mut cfg = load_and_validate(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    if let Some(path) = args.dataset.clone() {
        cfg = cfg.with_dataset_path(path);
    }

    let mut cache = DatasetCache::new();
    let dataset = load_dataset(&cfg, &mut cache)?;
    let project = Project::new(&cfg, dataset)?;

    let report = execute(&project, args.command, today())?;
    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    print!("{}", render(&report, format)?);
    Ok(())
}

/// Run one command against a loaded project. `today` stands in for the
/// current date wherever a command defaults to it.
pub fn execute(project: &Project, command: Command, today: NaiveDate) -> Result<Report> {
    let report = match command {
        Command::Components => {
            let components = project.component_names();
            let mut prerequisites = project
                .graph()
                .resolve_all(components.iter().map(String::as_str).chain([project.terminal()]));
            prerequisites.retain(|_, deps| !deps.is_empty());
            Report::Components(ComponentsReport {
                components,
                terminal: project.terminal().to_string(),
                assembly_days: project.assembly_days(),
                cycles: project.graph().cycles(),
                prerequisites,
            })
        }
        Command::Offer { name, qty, target } => {
            Report::Offer(project.offer(&name, qty, target.unwrap_or(today))?)
        }
        Command::Plan { target, selection } => {
            let request = PlanRequest {
                selection: selection_or_all(project, &selection.select),
                target,
                options: selection.options(),
            };
            Report::Plan(project.plan(&request)?)
        }
        Command::Track {
            today: track_today,
            orders,
            selection,
        } => {
            let request = TrackRequest {
                selection: selection_or_all(project, &selection.select),
                today: track_today.unwrap_or(today),
                options: selection.options(),
                order_dates: orders.into_iter().collect(),
            };
            Report::Tracking(project.track(&request)?)
        }
    };
    Ok(report)
}

fn load_dataset(cfg: &ConfigFile, cache: &mut DatasetCache) -> Result<Arc<Dataset>> {
    let path = cfg
        .dataset()
        .path
        .clone()
        .ok_or_else(|| anyhow!("no dataset configured: set [dataset].path or pass --dataset"))?;
    debug!(path = %path.display(), "loading dataset");
    cache
        .get_or_load(&path, cfg.dataset().sheet_name.as_deref())
        .with_context(|| format!("loading dataset {}", path.display()))
}

fn selection_or_all(project: &Project, select: &[String]) -> Vec<String> {
    if select.iter().all(|s| s.trim().is_empty()) {
        project.component_names()
    } else {
        select.to_vec()
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
