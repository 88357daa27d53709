// src/config/mod.rs

//! Configuration loading and validation for procureplan.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate tier patterns, overheads and the assembly section (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{
    AssemblySection, ColumnsSection, ConfigFile, DatasetSection, PricingConfig, RawConfigFile,
    TiersSection,
};
pub use validate::validate_config;
