// src/dataset/cache.rs

//! Explicit dataset cache keyed by file content.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use blake3::Hasher;
use tracing::debug;

use crate::dataset::reader::parse_dataset;
use crate::dataset::table::Dataset;
use crate::errors::Result;

/// Identity of a dataset file: its name, its size and a blake3 digest of its
/// bytes. Two reads of an unchanged file yield equal fingerprints.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub file_name: String,
    pub size: u64,
    pub content_hash: String,
}

impl Fingerprint {
    pub fn of_bytes(file_name: &str, bytes: &[u8]) -> Self {
        let mut hasher = Hasher::new();
        hasher.update(bytes);
        Self {
            file_name: file_name.to_string(),
            size: bytes.len() as u64,
            content_hash: hasher.finalize().to_hex().to_string(),
        }
    }

    pub fn of_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        Ok(Self::of_bytes(file_name_of(path), &bytes))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    fingerprint: Fingerprint,
    sheet: Option<String>,
}

/// Parsed datasets keyed by fingerprint and worksheet.
///
/// Lookups always re-read the file to fingerprint it, so an edited file is
/// never served stale; the cache only saves re-parsing.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<CacheKey, Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parsed dataset for `path`, reusing a previous parse of identical bytes.
    pub fn get_or_load(&mut self, path: impl AsRef<Path>, sheet_name: Option<&str>) -> Result<Arc<Dataset>> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = file_name_of(path);
        let key = CacheKey {
            fingerprint: Fingerprint::of_bytes(name, &bytes),
            sheet: sheet_name.map(str::to_string),
        };

        if let Some(hit) = self.entries.get(&key) {
            debug!(file = %name, hash = %key.fingerprint.content_hash, "dataset cache hit");
            return Ok(Arc::clone(hit));
        }

        debug!(file = %name, hash = %key.fingerprint.content_hash, "dataset cache miss");
        let dataset = Arc::new(parse_dataset(name, &bytes, sheet_name)?);
        self.entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Drop every entry (all sheets) for `fingerprint`. Returns whether
    /// anything was removed.
    pub fn invalidate(&mut self, fingerprint: &Fingerprint) -> bool {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.fingerprint != *fingerprint);
        before != self.entries.len()
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.entries.keys().any(|key| key.fingerprint == *fingerprint)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn file_name_of(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}
