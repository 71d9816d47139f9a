//! Cross-referenced, read-only collections of NEOs and close approaches.

use std::collections::HashMap;

use crate::core::domain::{ApproachId, CloseApproach, LinkedApproach, NearEarthObject, NeoId};
use crate::error::{NeoError, NeoResult};

/// Linked NEO and close-approach collections with exact-key lookups.
///
/// A database is only produced by the [`Linker`](crate::preprocessing::Linker).
/// Both collections keep source order, and nothing is mutated after linking.
///
/// # Example
/// ```
/// use neo_rust::core::domain::{parse_diameter, CloseApproach, NearEarthObject};
/// use neo_rust::preprocessing::link;
///
/// let neo = NearEarthObject::new("433", Some("Eros".to_string()), parse_diameter("16.84"), false)
///     .unwrap();
/// let approach = CloseApproach::from_raw("433", Some("1900-Dec-27 01:30"), "0.3149", "5.58");
/// let (db, report) = link(vec![neo], vec![approach]).unwrap();
///
/// assert_eq!(report.orphan_approaches, 0);
/// let eros = db.get_neo_by_name("Eros").unwrap();
/// assert_eq!(db.approaches_of(eros).count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NeoDatabase {
    neos: Vec<NearEarthObject>,
    approaches: Vec<CloseApproach>,
    by_designation: HashMap<String, NeoId>,
    by_name: HashMap<String, NeoId>,
}

impl NeoDatabase {
    /// Assembles a database from linked collections and the designation index
    /// the linker resolved them with.
    pub(crate) fn from_parts(
        neos: Vec<NearEarthObject>,
        approaches: Vec<CloseApproach>,
        by_designation: HashMap<String, NeoId>,
    ) -> Self {
        // Only rows that own their designation are named; shadowed duplicates
        // stay unreachable. On a name collision the later row wins.
        let mut owners: Vec<NeoId> = by_designation.values().copied().collect();
        owners.sort_unstable_by_key(|id| id.0);
        let by_name = owners
            .into_iter()
            .filter_map(|id| {
                neos.get(id.0)
                    .and_then(NearEarthObject::name)
                    .map(|name| (name.to_string(), id))
            })
            .collect();

        Self {
            neos,
            approaches,
            by_designation,
            by_name,
        }
    }

    /// All NEOs in source order.
    pub fn neos(&self) -> &[NearEarthObject] {
        &self.neos
    }

    /// All close approaches in source order, orphans included.
    pub fn approaches(&self) -> &[CloseApproach] {
        &self.approaches
    }

    pub fn neo(&self, id: NeoId) -> Option<&NearEarthObject> {
        self.neos.get(id.0)
    }

    pub fn approach(&self, id: ApproachId) -> Option<&CloseApproach> {
        self.approaches.get(id.0)
    }

    /// Exact, case-sensitive lookup by primary designation.
    pub fn get_neo_by_designation(&self, designation: &str) -> Option<&NearEarthObject> {
        self.by_designation
            .get(designation)
            .and_then(|id| self.neo(*id))
    }

    /// Exact, case-sensitive lookup by IAU name. Unnamed NEOs are never found.
    pub fn get_neo_by_name(&self, name: &str) -> Option<&NearEarthObject> {
        self.by_name.get(name).and_then(|id| self.neo(*id))
    }

    /// The NEO an approach was linked to, if any.
    pub fn neo_of(&self, approach: &CloseApproach) -> Option<&NearEarthObject> {
        approach.neo_id().and_then(|id| self.neo(id))
    }

    /// A NEO's close approaches in source order.
    pub fn approaches_of<'a>(
        &'a self,
        neo: &'a NearEarthObject,
    ) -> impl Iterator<Item = &'a CloseApproach> + 'a {
        neo.approaches().iter().filter_map(move |id| self.approach(*id))
    }

    /// Pairs an approach with its NEO.
    ///
    /// # Errors
    ///
    /// Returns [`NeoError::UnlinkedApproach`] for an orphan approach.
    pub fn resolve<'a>(&'a self, approach: &'a CloseApproach) -> NeoResult<LinkedApproach<'a>> {
        self.neo_of(approach)
            .map(|neo| LinkedApproach::new(approach, neo))
            .ok_or_else(|| NeoError::UnlinkedApproach(approach.designation_ref().to_string()))
    }

    /// Pairs the approach behind `id` with its NEO.
    pub fn linked(&self, id: ApproachId) -> NeoResult<LinkedApproach<'_>> {
        let approach = self.approach(id).ok_or_else(|| {
            NeoError::InvalidRecord(format!("no close approach at index {}", id.0))
        })?;
        self.resolve(approach)
    }

    /// Every linked approach in source order; orphans are skipped.
    pub fn linked_approaches(&self) -> impl Iterator<Item = LinkedApproach<'_>> + '_ {
        self.approaches
            .iter()
            .filter_map(move |approach| self.resolve(approach).ok())
    }

    /// Approaches whose designation matched no NEO.
    pub fn orphans(&self) -> impl Iterator<Item = &CloseApproach> + '_ {
        self.approaches.iter().filter(|approach| !approach.is_linked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::parse_diameter;
    use crate::preprocessing::{link, DuplicatePolicy, Linker};

    fn sample_database() -> NeoDatabase {
        let neos = vec![
            NearEarthObject::new("433", Some("Eros".to_string()), parse_diameter("16.84"), false)
                .unwrap(),
            NearEarthObject::new("2020 AB", None, parse_diameter(""), true).unwrap(),
        ];
        let approaches = vec![
            CloseApproach::from_raw("433", Some("1900-Dec-27 01:30"), "0.3149", "5.58"),
            CloseApproach::from_raw("999999", Some("1901-Jan-01 00:00"), "0.2", "7.1"),
            CloseApproach::from_raw("433", Some("1907-Nov-05 03:31"), "0.4714", "4.83"),
        ];
        link(neos, approaches).unwrap().0
    }

    #[test]
    fn test_lookup_by_designation_and_name() {
        let db = sample_database();

        assert_eq!(db.get_neo_by_designation("433").unwrap().name(), Some("Eros"));
        assert_eq!(db.get_neo_by_name("Eros").unwrap().designation(), "433");
        assert!(db.get_neo_by_designation("eros").is_none());
        assert!(db.get_neo_by_name("").is_none());
        assert!(db.get_neo_by_designation("2020 AB").is_some());
    }

    #[test]
    fn test_approaches_of_preserves_order() {
        let db = sample_database();
        let eros = db.get_neo_by_designation("433").unwrap();

        let times: Vec<String> = db.approaches_of(eros).map(CloseApproach::time_str).collect();
        assert_eq!(times, vec!["1900-12-27 01:30", "1907-11-05 03:31"]);
    }

    #[test]
    fn test_orphan_cannot_be_resolved() {
        let db = sample_database();

        let orphans: Vec<&CloseApproach> = db.orphans().collect();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].designation_ref(), "999999");
        assert!(db.neo_of(orphans[0]).is_none());

        let err = db.resolve(orphans[0]).unwrap_err();
        assert_eq!(err, NeoError::UnlinkedApproach("999999".to_string()));
        assert!(matches!(
            db.linked(ApproachId(1)),
            Err(NeoError::UnlinkedApproach(_))
        ));
    }

    fn duplicate_database(policy: DuplicatePolicy) -> NeoDatabase {
        let neos = vec![
            NearEarthObject::new("433", Some("Eros".to_string()), parse_diameter("16.84"), false)
                .unwrap(),
            NearEarthObject::new("433", Some("Late".to_string()), parse_diameter(""), false)
                .unwrap(),
        ];
        let approaches = vec![CloseApproach::from_raw(
            "433",
            Some("1900-Dec-27 01:30"),
            "0.3149",
            "5.58",
        )];
        Linker::with_policy(policy).link(neos, approaches).unwrap().0
    }

    #[test]
    fn test_name_index_follows_designation_owner() {
        for (policy, owner, shadowed) in [
            (DuplicatePolicy::FirstWins, "Eros", "Late"),
            (DuplicatePolicy::LastWins, "Late", "Eros"),
        ] {
            let db = duplicate_database(policy);
            let by_designation = db.get_neo_by_designation("433").unwrap();

            assert_eq!(by_designation.name(), Some(owner));
            assert!(std::ptr::eq(db.get_neo_by_name(owner).unwrap(), by_designation));
            assert_eq!(db.approaches_of(by_designation).count(), 1);
            assert!(db.get_neo_by_name(shadowed).is_none());
            assert_eq!(db.neos().len(), 2);
        }
    }

    #[test]
    fn test_linked_by_id() {
        let db = sample_database();

        let linked = db.linked(ApproachId(2)).unwrap();
        assert_eq!(linked.neo().fullname(), "433 Eros");
        assert!(matches!(
            db.linked(ApproachId(42)),
            Err(NeoError::InvalidRecord(_))
        ));
        assert_eq!(db.linked_approaches().count(), 2);
    }
}
