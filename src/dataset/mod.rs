// src/dataset/mod.rs

//! Dataset ingestion: CSV/XLSX files into component records.
//!
//! - [`reader`] parses files into a header-indexed [`Dataset`].
//! - [`columns`] maps configured roles and tier patterns onto headers.
//! - [`record`] builds [`ComponentRecord`]s and reads the assembly duration.
//! - [`cache`] keeps parsed datasets keyed by content fingerprint.
//!
//! [`ComponentRecord`]: crate::pricing::ComponentRecord

pub mod cache;
pub mod columns;
pub mod reader;
pub mod record;
pub mod table;

pub use cache::{DatasetCache, Fingerprint};
pub use columns::{ColumnMapping, find_tier_columns};
pub use reader::{DatasetFormat, parse_dataset};
pub use table::{Dataset, Row};
