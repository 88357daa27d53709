// src/engine/project.rs

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::model::{ConfigFile, PricingConfig};
use crate::dag::DependencyGraph;
use crate::dataset::{ColumnMapping, Dataset};
use crate::errors::Result;
use crate::pricing::offer::{ComponentRecord, Offer, compute_offer};
use crate::types::ComponentName;

/// Everything a planning run reads: the dataset with its resolved column
/// mapping, the dependency graph, pricing overheads and the terminal step.
///
/// Built once per loaded dataset; every query takes `&self` and returns a
/// fresh result.
#[derive(Debug, Clone)]
pub struct Project {
    dataset: Arc<Dataset>,
    mapping: ColumnMapping,
    graph: DependencyGraph,
    pricing: PricingConfig,
    terminal: ComponentName,
    assembly_days: i64,
}

impl Project {
    /// Resolve `cfg` against `dataset`.
    ///
    /// Fails only when a required column is missing. Dependency entries that
    /// name components absent from the dataset are logged and kept.
    pub fn new(cfg: &ConfigFile, dataset: Arc<Dataset>) -> Result<Self> {
        let mapping = ColumnMapping::resolve(&dataset, cfg)?;
        let graph = DependencyGraph::from_map(cfg.dependencies());
        let terminal = cfg.assembly().component_name.trim().to_string();
        let assembly_days = dataset.assembly_days(&mapping, cfg.assembly());

        let known = dataset.component_names(&mapping);
        for name in graph.components() {
            if name != terminal && known.binary_search_by(|k| k.as_str().cmp(name)).is_err() {
                warn!(component = %name, "dependency names a component absent from the dataset");
            }
        }

        info!(
            components = known.len(),
            dependency_entries = cfg.dependencies().len(),
            terminal = %terminal,
            assembly_days,
            "project ready"
        );

        Ok(Self {
            dataset,
            mapping,
            graph,
            pricing: cfg.pricing().clone(),
            terminal,
            assembly_days,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    /// Name of the terminal (assembly) component.
    pub fn terminal(&self) -> &str {
        &self.terminal
    }

    pub fn is_terminal(&self, name: &str) -> bool {
        name == self.terminal
    }

    pub fn assembly_days(&self) -> i64 {
        self.assembly_days
    }

    pub fn component_names(&self) -> Vec<ComponentName> {
        self.dataset.component_names(&self.mapping)
    }

    pub fn record(&self, name: &str) -> Result<ComponentRecord> {
        self.dataset.record(&self.mapping, name)
    }

    /// Offer for `name` at `qty`, order-by dates counted back from `target`.
    pub fn offer(&self, name: &str, qty: u64, target: NaiveDate) -> Result<Offer> {
        let record = self.record(name)?;
        Ok(compute_offer(&record, qty, target, &self.pricing))
    }
}
