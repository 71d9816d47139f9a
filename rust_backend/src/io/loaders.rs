use anyhow::{Context, Result};
use log::info;
use std::path::Path;

use crate::config::DatasetConfig;
use crate::core::database::NeoDatabase;
use crate::core::domain::{CloseApproach, NearEarthObject};
use crate::parsing::{csv_parser, json_parser};
use crate::preprocessing::{DuplicatePolicy, LinkReport, Linker};

/// Result of loading and linking both datasets
#[derive(Debug)]
pub struct NeoDataset {
    pub database: NeoDatabase,
    pub report: LinkReport,
}

/// Unified interface for loading the NEO catalog and its close approaches
pub struct DatasetLoader;

impl DatasetLoader {
    /// Load unlinked NEOs from a CSV file
    pub fn load_neos(neo_csv_path: &Path) -> Result<Vec<NearEarthObject>> {
        csv_parser::parse_neo_csv(neo_csv_path)
            .with_context(|| format!("Failed to load NEOs from {}", neo_csv_path.display()))
    }

    /// Load unlinked close approaches from a JSON file
    pub fn load_approaches(cad_json_path: &Path) -> Result<Vec<CloseApproach>> {
        json_parser::parse_cad_json(cad_json_path).with_context(|| {
            format!(
                "Failed to load close approaches from {}",
                cad_json_path.display()
            )
        })
    }

    /// Load both files and link them
    pub fn load_from_files(
        neo_csv_path: &Path,
        cad_json_path: &Path,
        policy: DuplicatePolicy,
    ) -> Result<NeoDataset> {
        let neos = Self::load_neos(neo_csv_path)?;
        let approaches = Self::load_approaches(cad_json_path)?;
        info!(
            "Loaded {} NEOs from {} and {} close approaches from {}",
            neos.len(),
            neo_csv_path.display(),
            approaches.len(),
            cad_json_path.display()
        );

        Self::link(neos, approaches, policy)
    }

    /// Load both datasets from in-memory CSV and JSON content and link them
    pub fn load_from_strs(
        neo_csv: &str,
        cad_json: &str,
        policy: DuplicatePolicy,
    ) -> Result<NeoDataset> {
        let neos = csv_parser::parse_neo_csv_str(neo_csv).context("Failed to parse NEO CSV string")?;
        let approaches = json_parser::parse_cad_json_str(cad_json)
            .context("Failed to parse close-approach JSON string")?;

        Self::link(neos, approaches, policy)
    }

    /// Load the files named by a configuration, with its duplicate policy
    pub fn load_from_config(config: &DatasetConfig) -> Result<NeoDataset> {
        Self::load_from_files(
            &config.data.neo_csv,
            &config.data.cad_json,
            config.linking.duplicate_policy,
        )
    }

    fn link(
        neos: Vec<NearEarthObject>,
        approaches: Vec<CloseApproach>,
        policy: DuplicatePolicy,
    ) -> Result<NeoDataset> {
        let (database, report) = Linker::with_policy(policy)
            .link(neos, approaches)
            .context("Failed to link close approaches to NEOs")?;

        Ok(NeoDataset { database, report })
    }
}
