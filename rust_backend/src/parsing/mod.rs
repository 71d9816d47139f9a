//! Parsers for the NEO catalog and close-approach data formats.
//!
//! # Parsers
//!
//! - [`csv_parser`]: Parse the NEO catalog CSV (`pdes`, `name`, `diameter`, `pha`)
//! - [`json_parser`]: Parse the close-approach JSON (`data` array of positional records)
//!
//! Both produce unlinked entities in input order; see
//! [`Linker`](crate::preprocessing::Linker) for cross-referencing.
//!
//! # Example
//!
//! ```no_run
//! use neo_rust::parsing::json_parser::parse_cad_json;
//! use std::path::Path;
//!
//! let approaches = parse_cad_json(Path::new("data/cad.json"))
//!     .expect("Failed to parse close approaches");
//! ```

pub mod csv_parser;
pub mod json_parser;


pub use csv_parser::{parse_neo_csv, parse_neo_csv_str};
pub use json_parser::{parse_cad_json, parse_cad_json_str, ApproachRow};
