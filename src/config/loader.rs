// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks tier patterns, pricing overheads and the assembly section.
/// - Resolves a relative `[dataset].path` against the config file's directory.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let mut raw_config = load_from_path(path)?;

    if let Some(dataset) = raw_config.dataset.path.take() {
        raw_config.dataset.path = Some(resolve_relative(path, dataset));
    }

    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Helper to resolve a default config path.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Procureplan.toml")
}

fn resolve_relative(config_path: &Path, target: PathBuf) -> PathBuf {
    if target.is_absolute() {
        return target;
    }
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(target),
        _ => target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_path_is_relative_to_config_dir() {
        let resolved = resolve_relative(Path::new("conf/Procureplan.toml"), PathBuf::from("data.csv"));
        assert_eq!(resolved, PathBuf::from("conf/data.csv"));

        let bare = resolve_relative(Path::new("Procureplan.toml"), PathBuf::from("data.csv"));
        assert_eq!(bare, PathBuf::from("data.csv"));
    }
}
