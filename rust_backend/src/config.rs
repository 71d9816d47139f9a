//! Dataset configuration file support.
//!
//! This module reads the input file locations and the linking policy from a
//! TOML configuration file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{NeoError, NeoResult};
use crate::preprocessing::DuplicatePolicy;

/// Dataset configuration from file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub linking: LinkSettings,
}

/// Input file locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_neo_csv")]
    pub neo_csv: PathBuf,
    #[serde(default = "default_cad_json")]
    pub cad_json: PathBuf,
}

/// Linker settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkSettings {
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
}

fn default_neo_csv() -> PathBuf {
    PathBuf::from("data/neos.csv")
}

fn default_cad_json() -> PathBuf {
    PathBuf::from("data/cad.json")
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            neo_csv: default_neo_csv(),
            cad_json: default_cad_json(),
        }
    }
}

impl DatasetConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> NeoResult<Self> {
        toml::from_str(content).map_err(|e| {
            NeoError::ConfigurationError(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load configuration from a TOML file.
    ///
    /// Relative data paths are resolved against the directory holding the
    /// configuration file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(DatasetConfig)` if successful
    /// * `Err(NeoError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> NeoResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            NeoError::ConfigurationError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut config = Self::from_toml_str(&content)?;
        if let Some(base) = path.parent() {
            config.data.neo_csv = resolve(base, &config.data.neo_csv);
            config.data.cad_json = resolve(base, &config.data.cad_json);
        }

        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `neo.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> NeoResult<Self> {
        let search_paths = [
            PathBuf::from("neo.toml"),
            PathBuf::from("rust_backend/neo.toml"),
            PathBuf::from("../neo.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(NeoError::ConfigurationError(
            "No neo.toml found in standard locations".to_string(),
        ))
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
