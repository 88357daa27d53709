// src/config/validate.rs

use std::collections::HashSet;

use regex::Regex;
use tracing::warn;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::dag::DependencyGraph;
use crate::errors::{ProcureError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::ProcureError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        report_dependency_anomalies(&raw);
        Ok(ConfigFile::new_unchecked(raw))
    }
}

/// Validate a raw config, returning the first problem found.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    validate_raw_config(cfg)
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_columns(cfg)?;
    validate_tier_patterns(cfg)?;
    validate_pricing(cfg)?;
    validate_assembly(cfg)?;
    Ok(())
}

fn validate_columns(cfg: &RawConfigFile) -> Result<()> {
    if cfg.columns.product_code.trim().is_empty() {
        return Err(ProcureError::ConfigError(
            "[columns].product_code must name the component identifier column".to_string(),
        ));
    }
    Ok(())
}

fn validate_tier_patterns(cfg: &RawConfigFile) -> Result<()> {
    for (key, pattern) in cfg.tiers.patterns() {
        if pattern.is_empty() {
            continue;
        }
        let re = Regex::new(pattern).map_err(|e| {
            ProcureError::ConfigError(format!("[tiers].{key} is not a valid regex: {e}"))
        })?;
        // captures_len() counts the implicit whole-match group.
        if re.captures_len() < 2 {
            return Err(ProcureError::ConfigError(format!(
                "[tiers].{key} must contain a capture group for the quantity (got '{pattern}')"
            )));
        }
    }
    Ok(())
}

fn validate_pricing(cfg: &RawConfigFile) -> Result<()> {
    let pricing = &cfg.pricing;

    if !pricing.handling_flat.is_finite() || pricing.handling_flat < 0.0 {
        return Err(ProcureError::ConfigError(format!(
            "[pricing].handling_flat must be a finite amount >= 0 (got {})",
            pricing.handling_flat
        )));
    }

    if !pricing.handling_percent.is_finite() || pricing.handling_percent <= -100.0 {
        return Err(ProcureError::ConfigError(format!(
            "[pricing].handling_percent must be finite and > -100 (got {})",
            pricing.handling_percent
        )));
    }

    if pricing.default_currency.trim().is_empty() {
        return Err(ProcureError::ConfigError(
            "[pricing].default_currency must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_assembly(cfg: &RawConfigFile) -> Result<()> {
    if cfg.assembly.component_name.trim().is_empty() {
        return Err(ProcureError::ConfigError(
            "[assembly].component_name must not be empty".to_string(),
        ));
    }
    if cfg.assembly.duration_weeks < 0 {
        return Err(ProcureError::ConfigError(format!(
            "[assembly].duration_weeks must be >= 0 (got {})",
            cfg.assembly.duration_weeks
        )));
    }
    Ok(())
}

/// Self-references, duplicates and cycles are tolerated by both schedulers,
/// so they are only logged.
fn report_dependency_anomalies(cfg: &RawConfigFile) {
    for (name, deps) in cfg.dependencies.iter() {
        let mut seen = HashSet::new();
        for dep in deps {
            if dep == name {
                warn!(component = %name, "component lists itself as a dependency");
            } else if !seen.insert(dep.as_str()) {
                warn!(component = %name, dependency = %dep, "duplicate dependency entry");
            }
        }
    }

    let graph = DependencyGraph::from_map(&cfg.dependencies);
    for cycle in graph.cycles() {
        warn!(
            ?cycle,
            "dependency cycle detected; schedules for these components are best-effort"
        );
    }
}
