//! Linking of close approaches to their near-Earth objects.
//!
//! The linker indexes NEOs by designation once and then resolves every close
//! approach against that index, so linking is O(N + M). Approaches whose
//! designation matches no NEO are kept as orphans and reported, never dropped.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::core::database::NeoDatabase;
use crate::core::domain::{ApproachId, CloseApproach, NearEarthObject, NeoId};
use crate::error::{NeoError, NeoResult};

/// How the linker resolves two NEOs that share a designation.
///
/// A shadowed row stays in [`NeoDatabase::neos`] but is reachable neither by
/// designation nor by name, and never receives approaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The later row owns the designation; the earlier NEO keeps no approaches.
    #[default]
    LastWins,
    /// The first row owns the designation; later rows keep no approaches.
    FirstWins,
    /// Fail linking with [`NeoError::DuplicateDesignation`].
    Reject,
}

/// Outcome of a linking pass.
///
/// Orphan approaches are a data-quality condition rather than an error, so
/// they are counted and listed here for the caller to act on.
///
/// # Examples
///
/// ```
/// use neo_rust::core::domain::CloseApproach;
/// use neo_rust::preprocessing::link;
///
/// let orphan = CloseApproach::from_raw("999999", Some("1900-Jan-01 00:00"), "0.1", "3.0");
/// let (_, report) = link(vec![], vec![orphan]).unwrap();
///
/// assert!(!report.is_fully_linked());
/// assert_eq!(report.orphan_approaches, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkReport {
    pub total_neos: usize,
    pub total_approaches: usize,
    pub linked_approaches: usize,
    pub orphan_approaches: usize,
    pub duplicate_designations: Vec<String>,
    pub orphans: Vec<ApproachId>,
}

impl LinkReport {
    /// Returns `true` when every close approach found its NEO.
    pub fn is_fully_linked(&self) -> bool {
        self.orphan_approaches == 0
    }
}

/// Builds a [`NeoDatabase`] from parsed, unlinked collections.
#[derive(Debug, Clone, Copy, Default)]
pub struct Linker {
    policy: DuplicatePolicy,
}

impl Linker {
    /// Create a linker with the default last-wins duplicate policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a linker with a specific duplicate policy
    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Link every close approach to the NEO sharing its designation.
    ///
    /// Each NEO's approaches are appended in the order the approaches were
    /// given, and each linked approach records its NEO exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`NeoError::DuplicateDesignation`] under [`DuplicatePolicy::Reject`]
    /// when two NEOs share a designation.
    pub fn link(
        &self,
        mut neos: Vec<NearEarthObject>,
        mut approaches: Vec<CloseApproach>,
    ) -> NeoResult<(NeoDatabase, LinkReport)> {
        let mut report = LinkReport {
            total_neos: neos.len(),
            total_approaches: approaches.len(),
            ..LinkReport::default()
        };

        let index = self.index_designations(&neos, &mut report)?;

        for (idx, approach) in approaches.iter_mut().enumerate() {
            let approach_id = ApproachId(idx);
            match index.get(approach.designation_ref()) {
                Some(&neo_id) => {
                    approach.attach(neo_id);
                    neos[neo_id.0].push_approach(approach_id);
                    report.linked_approaches += 1;
                }
                None => {
                    debug!(
                        "Close approach #{} references unknown designation '{}'",
                        idx,
                        approach.designation_ref()
                    );
                    report.orphans.push(approach_id);
                }
            }
        }
        report.orphan_approaches = report.orphans.len();

        if report.orphan_approaches > 0 {
            warn!(
                "{} of {} close approaches reference no known near-Earth object",
                report.orphan_approaches, report.total_approaches
            );
        }
        info!(
            "Linked {} close approaches to {} near-Earth objects",
            report.linked_approaches, report.total_neos
        );

        Ok((NeoDatabase::from_parts(neos, approaches, index), report))
    }

    fn index_designations(
        &self,
        neos: &[NearEarthObject],
        report: &mut LinkReport,
    ) -> NeoResult<HashMap<String, NeoId>> {
        let mut index = HashMap::with_capacity(neos.len());

        for (idx, neo) in neos.iter().enumerate() {
            match index.entry(neo.designation().to_string()) {
                Entry::Vacant(slot) => {
                    slot.insert(NeoId(idx));
                }
                Entry::Occupied(mut slot) => {
                    if self.policy == DuplicatePolicy::Reject {
                        return Err(NeoError::DuplicateDesignation(neo.designation().to_string()));
                    }
                    warn!(
                        "Designation '{}' appears more than once (rows {} and {}), policy {:?}",
                        neo.designation(),
                        slot.get().0 + 1,
                        idx + 1,
                        self.policy
                    );
                    if self.policy == DuplicatePolicy::LastWins {
                        slot.insert(NeoId(idx));
                    }
                    report.duplicate_designations.push(neo.designation().to_string());
                }
            }
        }

        Ok(index)
    }
}

/// Link with the default [`DuplicatePolicy::LastWins`] policy.
pub fn link(
    neos: Vec<NearEarthObject>,
    approaches: Vec<CloseApproach>,
) -> NeoResult<(NeoDatabase, LinkReport)> {
    Linker::new().link(neos, approaches)
}
