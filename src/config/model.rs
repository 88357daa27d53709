// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [dataset]
/// path = "InputDelais.csv"
///
/// [columns]
/// product_code = "Composants"
///
/// [tiers]
/// production_unit_cost_pattern = "^CU pour (\\d+)$"
///
/// [pricing]
/// handling_flat = 25.0
/// handling_percent = 3.0
///
/// [assembly]
/// component_name = "Assemblage et intégration final"
/// duration_weeks = 8
///
/// [dependencies]
/// "Carte mère" = ["PCB", "Connecteurs"]
/// ```
///
/// All sections are optional and have reasonable defaults. This is the
/// unvalidated form; convert it with `ConfigFile::try_from`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub dataset: DatasetSection,

    #[serde(default)]
    pub columns: ColumnsSection,

    #[serde(default)]
    pub tiers: TiersSection,

    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub assembly: AssemblySection,

    /// Component name → direct prerequisites.
    #[serde(default)]
    pub dependencies: BTreeMap<String, Vec<String>>,
}

/// Validated configuration.
///
/// Only constructible through `TryFrom<RawConfigFile>` (see `validate.rs`).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    dataset: DatasetSection,
    columns: ColumnsSection,
    tiers: TiersSection,
    pricing: PricingConfig,
    assembly: AssemblySection,
    dependencies: BTreeMap<String, Vec<String>>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            dataset: raw.dataset,
            columns: raw.columns,
            tiers: raw.tiers,
            pricing: raw.pricing,
            assembly: raw.assembly,
            dependencies: raw.dependencies,
        }
    }

    pub fn dataset(&self) -> &DatasetSection {
        &self.dataset
    }

    pub fn columns(&self) -> &ColumnsSection {
        &self.columns
    }

    pub fn tiers(&self) -> &TiersSection {
        &self.tiers
    }

    pub fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    pub fn assembly(&self) -> &AssemblySection {
        &self.assembly
    }

    pub fn dependencies(&self) -> &BTreeMap<String, Vec<String>> {
        &self.dependencies
    }

    /// Point the config at another dataset file (e.g. from `--dataset`).
    pub fn with_dataset_path(mut self, path: PathBuf) -> Self {
        self.dataset.path = Some(path);
        self
    }
}

/// `[dataset]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DatasetSection {
    /// CSV or XLSX file. Relative paths are resolved against the directory
    /// holding the config file.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Worksheet to read for XLSX files; the first sheet when unset.
    #[serde(default)]
    pub sheet_name: Option<String>,
}

/// `[columns]` section: dataset header for each single-column role.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnsSection {
    /// Component / supplier identifier. The only required role.
    #[serde(default = "default_product_code")]
    pub product_code: String,

    #[serde(default = "default_moq")]
    pub moq: String,

    #[serde(default = "default_lot_size")]
    pub lot_size: String,

    #[serde(default = "default_currency_column")]
    pub currency: String,
}

fn default_product_code() -> String {
    "Composants".to_string()
}

fn default_moq() -> String {
    "MOQ".to_string()
}

fn default_lot_size() -> String {
    "Lot".to_string()
}

fn default_currency_column() -> String {
    "Devise".to_string()
}

impl Default for ColumnsSection {
    fn default() -> Self {
        Self {
            product_code: default_product_code(),
            moq: default_moq(),
            lot_size: default_lot_size(),
            currency: default_currency_column(),
        }
    }
}

/// `[tiers]` section.
///
/// Each `*_pattern` is a regex matched against dataset headers; its last
/// capture group holds the quantity breakpoint. An empty pattern disables
/// that tier family.
#[derive(Debug, Clone, Deserialize)]
pub struct TiersSection {
    #[serde(default = "default_production_cost_pattern")]
    pub production_unit_cost_pattern: String,

    #[serde(default = "default_air_cost_pattern")]
    pub air_transport_unit_cost_pattern: String,

    #[serde(default = "default_sea_cost_pattern")]
    pub sea_transport_unit_cost_pattern: String,

    #[serde(default = "default_production_time_pattern")]
    pub production_time_pattern: String,

    /// Fixed (non-tiered) air transport time in weeks.
    #[serde(default = "default_air_time_column")]
    pub air_transport_time_column: String,

    /// Fixed (non-tiered) sea transport time in weeks.
    #[serde(default = "default_sea_time_column")]
    pub sea_transport_time_column: String,
}

fn default_production_cost_pattern() -> String {
    r"^CU pour (\d+)$".to_string()
}

fn default_air_cost_pattern() -> String {
    r"^CTA pour (\d+)$".to_string()
}

fn default_sea_cost_pattern() -> String {
    r"^CTB pour (\d+)$".to_string()
}

fn default_production_time_pattern() -> String {
    r"^Temps de prod pour (\d+)$".to_string()
}

fn default_air_time_column() -> String {
    "Délais de transport Avion".to_string()
}

fn default_sea_time_column() -> String {
    "Délais de transport Bateau".to_string()
}

impl Default for TiersSection {
    fn default() -> Self {
        Self {
            production_unit_cost_pattern: default_production_cost_pattern(),
            air_transport_unit_cost_pattern: default_air_cost_pattern(),
            sea_transport_unit_cost_pattern: default_sea_cost_pattern(),
            production_time_pattern: default_production_time_pattern(),
            air_transport_time_column: default_air_time_column(),
            sea_transport_time_column: default_sea_time_column(),
        }
    }
}

impl TiersSection {
    /// All four patterns with a label, for validation and discovery.
    pub fn patterns(&self) -> [(&'static str, &str); 4] {
        [
            ("production_unit_cost_pattern", &self.production_unit_cost_pattern),
            ("air_transport_unit_cost_pattern", &self.air_transport_unit_cost_pattern),
            ("sea_transport_unit_cost_pattern", &self.sea_transport_unit_cost_pattern),
            ("production_time_pattern", &self.production_time_pattern),
        ]
    }
}

/// `[pricing]` section: overheads applied identically to both modes.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PricingConfig {
    /// Flat amount added to each order before the percentage.
    #[serde(default)]
    pub handling_flat: f64,

    /// Percentage surcharge applied after the flat amount.
    #[serde(default)]
    pub handling_percent: f64,

    /// Currency used when a component's currency cell is blank.
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

fn default_currency() -> String {
    "EUR".to_string()
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            handling_flat: 0.0,
            handling_percent: 0.0,
            default_currency: default_currency(),
        }
    }
}

/// `[assembly]` section: the terminal component consuming everything else.
#[derive(Debug, Clone, Deserialize)]
pub struct AssemblySection {
    #[serde(default = "default_assembly_name")]
    pub component_name: String,

    /// Duration used when no duration column is configured, or when the
    /// assembly row's cell cannot be parsed.
    #[serde(default = "default_assembly_weeks")]
    pub duration_weeks: i64,

    /// Optional dataset column holding the assembly duration in weeks.
    #[serde(default)]
    pub duration_weeks_column: Option<String>,
}

fn default_assembly_name() -> String {
    "Assemblage et intégration final".to_string()
}

fn default_assembly_weeks() -> i64 {
    8
}

impl Default for AssemblySection {
    fn default() -> Self {
        Self {
            component_name: default_assembly_name(),
            duration_weeks: default_assembly_weeks(),
            duration_weeks_column: None,
        }
    }
}
