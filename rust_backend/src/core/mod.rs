//! Core data model for near-Earth objects and close approaches.
//!
//! This module defines the two entity types, the handles that connect them,
//! and the [`NeoDatabase`](database::NeoDatabase) that owns both collections once linked.

pub mod database;
pub mod domain;

pub use database::NeoDatabase;
pub use domain::{
    ApproachId, ApproachLayout, CloseApproach, KilometersPerSecond, LinkedApproach,
    NearEarthObject, NeoId,
};
