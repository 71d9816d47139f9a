//! NEO Rust Backend - near-Earth object catalog and close-approach data model
//!
//! Parses the NEO catalog (CSV) and close-approach records (JSON), links every
//! approach to the NEO sharing its designation, and exposes the result as a
//! read-only [`NeoDatabase`](crate::core::NeoDatabase) ready for querying and export.
//!
//! # Example
//!
//! ```
//! use neo_rust::io::DatasetLoader;
//! use neo_rust::preprocessing::DuplicatePolicy;
//!
//! let neos = "pdes,name,diameter,pha\n433,Eros,16.84,N\n";
//! let cad = r#"{"data": [["433", "", "", "1900-01-01 12:00", "0.15", "", "", "5.2"]]}"#;
//!
//! let dataset = DatasetLoader::load_from_strs(neos, cad, DuplicatePolicy::default()).unwrap();
//! let approach = dataset.database.linked_approaches().next().unwrap();
//!
//! assert_eq!(approach.neo().fullname(), "433 Eros");
//! assert_eq!(approach.approach().time_str(), "1900-01-01 12:00");
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod parsing;
pub mod preprocessing;
pub mod time;

pub use error::{NeoError, NeoResult};
