// src/cli.rs

//! CLI argument parsing using `clap`.

use std::collections::HashMap;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::engine::SelectionOptions;
use crate::types::{ComponentName, TransportMode};

/// Command-line arguments for `procureplan`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "procureplan",
    version,
    about = "Price tiered component offers and schedule procurement around a delivery date.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Procureplan.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Procureplan.toml", global = true)]
    pub config: String,

    /// Dataset file (CSV or XLSX), overriding `[dataset].path`.
    #[arg(long, value_name = "PATH", global = true)]
    pub dataset: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PROCUREPLAN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// Print results as JSON instead of a text table.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List component names and any dependency cycles.
    Components,

    /// Show the air and sea offer for one component.
    Offer {
        /// Component name as it appears in the product column.
        name: String,

        /// Requested quantity.
        #[arg(long, default_value_t = 100)]
        qty: u64,

        /// Date the goods are needed; order-by dates count back from it.
        /// Defaults to today.
        #[arg(long, value_name = "YYYY-MM-DD")]
        target: Option<NaiveDate>,
    },

    /// Work back from a delivery date: when must each order go out?
    Plan {
        /// Delivery date of the finished product.
        #[arg(long, value_name = "YYYY-MM-DD")]
        target: NaiveDate,

        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Work forward from order dates: when will everything be ready?
    Track {
        /// Reference date for offers, default order dates and remaining days.
        /// Defaults to today.
        #[arg(long, value_name = "YYYY-MM-DD")]
        today: Option<NaiveDate>,

        /// Order date for one component; repeatable.
        #[arg(long = "order", value_name = "NAME=YYYY-MM-DD", value_parser = parse_key_value::<NaiveDate>)]
        orders: Vec<(ComponentName, NaiveDate)>,

        #[command(flatten)]
        selection: SelectionArgs,
    },
}

/// Component selection shared by `plan` and `track`.
#[derive(Debug, Clone, Args)]
pub struct SelectionArgs {
    /// Components to include, comma separated. Defaults to every component.
    #[arg(long, value_name = "A,B,...", value_delimiter = ',')]
    pub select: Vec<String>,

    /// Default quantity per component.
    #[arg(long, default_value_t = 100)]
    pub qty: u64,

    /// Quantity for one component; repeatable. 0 means the default.
    #[arg(long = "quantity", value_name = "NAME=N", value_parser = parse_key_value::<u64>)]
    pub quantities: Vec<(ComponentName, u64)>,

    /// Transport mode for one component; repeatable.
    #[arg(long = "mode", value_name = "NAME=air|sea", value_parser = parse_key_value::<TransportMode>)]
    pub modes: Vec<(ComponentName, TransportMode)>,

    /// Mode for components without an explicit `--mode`.
    #[arg(long, value_name = "air|sea", default_value_t = TransportMode::Air)]
    pub default_mode: TransportMode,
}

impl SelectionArgs {
    pub fn options(&self) -> SelectionOptions {
        SelectionOptions {
            default_qty: self.qty,
            quantities: to_map(&self.quantities),
            modes: to_map(&self.modes),
            default_mode: self.default_mode,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Parse `NAME=VALUE`, splitting on the last `=` so names may contain one.
pub fn parse_key_value<T>(raw: &str) -> Result<(ComponentName, T), String>
where
    T: FromStr,
    T::Err: Display,
{
    let (name, value) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing component name in '{raw}'"));
    }
    let value = value
        .trim()
        .parse::<T>()
        .map_err(|e| format!("invalid value for '{name}': {e}"))?;
    Ok((name.to_string(), value))
}

/// Later repetitions of a name win.
fn to_map<T: Clone>(pairs: &[(ComponentName, T)]) -> HashMap<ComponentName, T> {
    pairs.iter().cloned().collect()
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
