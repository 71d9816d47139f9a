//! Turning parsed records into a linked data model.

pub mod linker;

pub use linker::{link, DuplicatePolicy, LinkReport, Linker};
