//! High-level loading and export utilities.
//!
//! Loaders combine both parsers with the linker and attach file context to
//! errors; writers export linked approaches in the flat (CSV) and nested
//! (JSON) shapes.
//!
//! # Example
//!
//! ```no_run
//! use neo_rust::io::loaders::DatasetLoader;
//! use neo_rust::preprocessing::DuplicatePolicy;
//! use std::path::Path;
//!
//! let dataset = DatasetLoader::load_from_files(
//!     Path::new("data/neos.csv"),
//!     Path::new("data/cad.json"),
//!     DuplicatePolicy::default(),
//! )
//! .expect("Failed to load");
//! println!("{} orphan approaches", dataset.report.orphan_approaches);
//! ```

pub mod loaders;
pub mod writers;


pub use loaders::{DatasetLoader, NeoDataset};
pub use writers::{write_to_csv, write_to_json};
