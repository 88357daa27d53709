#![allow(dead_code)]

use procureplan::config::{ConfigFile, PricingConfig, RawConfigFile};
use procureplan::dag::DependencyGraph;
use procureplan::pricing::{CellValue, ComponentRecord, TierTable};
use procureplan::types::ComponentName;

/// Builder for `ComponentRecord` to simplify offer tests.
pub struct ComponentRecordBuilder {
    record: ComponentRecord,
}

impl ComponentRecordBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            record: ComponentRecord {
                name: name.to_string(),
                ..ComponentRecord::default()
            },
        }
    }

    pub fn production_cost(mut self, tiers: &[(u64, f64)]) -> Self {
        self.record.production_unit_cost = numeric_tiers(tiers);
        self
    }

    pub fn air_cost(mut self, tiers: &[(u64, f64)]) -> Self {
        self.record.air_transport_unit_cost = numeric_tiers(tiers);
        self
    }

    pub fn sea_cost(mut self, tiers: &[(u64, f64)]) -> Self {
        self.record.sea_transport_unit_cost = numeric_tiers(tiers);
        self
    }

    pub fn production_weeks(mut self, tiers: &[(u64, f64)]) -> Self {
        self.record.production_weeks = numeric_tiers(tiers);
        self
    }

    pub fn air_weeks(mut self, weeks: f64) -> Self {
        self.record.air_transport_weeks = Some(CellValue::Number(weeks));
        self
    }

    pub fn sea_weeks(mut self, weeks: f64) -> Self {
        self.record.sea_transport_weeks = Some(CellValue::Number(weeks));
        self
    }

    pub fn moq(mut self, moq: impl Into<CellValue>) -> Self {
        self.record.moq = moq.into();
        self
    }

    pub fn lot_size(mut self, lot: impl Into<CellValue>) -> Self {
        self.record.lot_size = lot.into();
        self
    }

    pub fn currency(mut self, currency: &str) -> Self {
        self.record.currency = CellValue::text(currency);
        self
    }

    pub fn build(self) -> ComponentRecord {
        self.record
    }
}

fn numeric_tiers(tiers: &[(u64, f64)]) -> TierTable<CellValue> {
    tiers
        .iter()
        .map(|(bp, v)| (*bp, CellValue::Number(*v)))
        .collect()
}

/// Builder for `ConfigFile`, starting from the defaults.
pub struct RawConfigBuilder {
    config: RawConfigFile,
}

impl RawConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn dependency(mut self, component: &str, deps: &[&str]) -> Self {
        self.config.dependencies.insert(
            component.to_string(),
            deps.iter().map(|d| d.to_string()).collect(),
        );
        self
    }

    pub fn pricing(mut self, handling_flat: f64, handling_percent: f64) -> Self {
        self.config.pricing = PricingConfig {
            handling_flat,
            handling_percent,
            ..PricingConfig::default()
        };
        self
    }

    pub fn assembly(mut self, name: &str, weeks: i64) -> Self {
        self.config.assembly.component_name = name.to_string();
        self.config.assembly.duration_weeks = weeks;
        self
    }

    pub fn assembly_column(mut self, column: &str) -> Self {
        self.config.assembly.duration_weeks_column = Some(column.to_string());
        self
    }

    pub fn product_code(mut self, column: &str) -> Self {
        self.config.columns.product_code = column.to_string();
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for RawConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Graph from `(component, [prerequisites])` pairs.
pub fn graph_from(edges: &[(&str, &[&str])]) -> DependencyGraph {
    edges
        .iter()
        .map(|(name, deps)| {
            (
                name.to_string(),
                deps.iter().map(|d| d.to_string()).collect::<Vec<_>>(),
            )
        })
        .collect()
}

/// Owned component names.
pub fn names(items: &[&str]) -> Vec<ComponentName> {
    items.iter().map(|s| s.to_string()).collect()
}
