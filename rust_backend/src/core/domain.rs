//! Domain models for near-Earth objects and their close approaches.
//!
//! Both entities are built once per source record by the parsers and then
//! touched exactly once by the linker. The back reference from an approach to
//! its NEO is a plain [`NeoId`] handle into the owning
//! [`NeoDatabase`](crate::core::database::NeoDatabase), never a shared pointer.

use std::fmt;

use chrono::{DateTime, Utc};
use qtty::length::{AstronomicalUnits, Kilometer, Kilometers};
use qtty::time::Second;
use qtty::velocity::Velocity;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{NeoError, NeoResult};
use crate::time::{format_datetime, parse_datetime};

/// Relative approach velocity unit used by the close-approach data.
pub type KilometersPerSecond = Velocity<Kilometer, Second>;

/// Handle of a [`NearEarthObject`] inside a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NeoId(pub(crate) usize);

impl NeoId {
    /// Position of the NEO in input order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle of a [`CloseApproach`] inside a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApproachId(pub(crate) usize);

impl ApproachId {
    /// Position of the close approach in input order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Coerce a raw diameter field to kilometers.
///
/// Empty fields, the `nan` marker, unparseable text, and values that are not
/// finite and non-negative all become `NaN`.
///
/// # Examples
///
/// ```
/// use neo_rust::core::domain::parse_diameter;
///
/// assert_eq!(parse_diameter("16.84").value(), 16.84);
/// assert!(parse_diameter("").value().is_nan());
/// assert!(parse_diameter("nan").value().is_nan());
/// ```
pub fn parse_diameter(raw: &str) -> Kilometers {
    Kilometers::new(normalize_diameter(raw.trim().parse::<f64>().unwrap_or(f64::NAN)))
}

fn normalize_diameter(km: f64) -> f64 {
    if km.is_finite() && km >= 0.0 {
        km
    } else {
        f64::NAN
    }
}

/// Coerce a raw distance or velocity field, falling back to `0.0`.
pub fn parse_measurement(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// A near-Earth object (NEO).
///
/// Carries the primary designation (required, unique), the IAU name
/// (optional), the diameter in kilometers (`NaN` when unknown), and the
/// potentially-hazardous flag. The list of close approaches starts empty and is
/// filled by the linker.
///
/// # Examples
///
/// ```
/// use neo_rust::core::domain::{parse_diameter, NearEarthObject};
///
/// let eros = NearEarthObject::new("433", Some("Eros".to_string()), parse_diameter("16.84"), false)
///     .unwrap();
///
/// assert_eq!(eros.fullname(), "433 Eros");
/// assert!(eros.approaches().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NearEarthObject {
    designation: String,
    name: Option<String>,
    diameter: Kilometers,
    hazardous: bool,
    approaches: Vec<ApproachId>,
}

impl NearEarthObject {
    /// Creates an unlinked NEO.
    ///
    /// An empty `name` is stored as `None`, and a diameter that is not finite
    /// and non-negative is stored as `NaN`.
    ///
    /// # Errors
    ///
    /// Returns [`NeoError::BlankDesignation`] when `designation` is empty or
    /// whitespace.
    pub fn new(
        designation: impl Into<String>,
        name: Option<String>,
        diameter: Kilometers,
        hazardous: bool,
    ) -> NeoResult<Self> {
        let designation = designation.into();
        if designation.trim().is_empty() {
            return Err(NeoError::BlankDesignation);
        }

        Ok(Self {
            designation,
            name: name.filter(|n| !n.is_empty()),
            diameter: Kilometers::new(normalize_diameter(diameter.value())),
            hazardous,
            approaches: Vec::new(),
        })
    }

    pub fn designation(&self) -> &str {
        &self.designation
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Diameter in kilometers; `NaN` when unknown.
    pub fn diameter(&self) -> Kilometers {
        self.diameter
    }

    pub fn hazardous(&self) -> bool {
        self.hazardous
    }

    /// Handles of this NEO's close approaches, in source order.
    pub fn approaches(&self) -> &[ApproachId] {
        &self.approaches
    }

    /// Returns `"{designation} {name}"`, or just the designation when unnamed.
    pub fn fullname(&self) -> String {
        match &self.name {
            Some(name) => format!("{} {}", self.designation, name),
            None => self.designation.clone(),
        }
    }

    /// Returns the `{designation, name, diameter_km, potentially_hazardous}` mapping.
    ///
    /// `name` is `null` for unnamed objects. A `NaN` diameter has no JSON
    /// number representation and serializes as `null`.
    pub fn serialize(&self) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert("designation".to_string(), Value::from(self.designation.as_str()));
        record.insert(
            "name".to_string(),
            self.name.as_deref().map_or(Value::Null, Value::from),
        );
        record.insert("diameter_km".to_string(), Value::from(self.diameter.value()));
        record.insert(
            "potentially_hazardous".to_string(),
            Value::Bool(self.hazardous),
        );
        record
    }

    pub(crate) fn push_approach(&mut self, approach: ApproachId) {
        self.approaches.push(approach);
    }
}

impl fmt::Display for NearEarthObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hazard = if self.hazardous { "is" } else { "is not" };
        write!(
            f,
            "NEO {} has a diameter of {:.3} km and {} potentially hazardous.",
            self.fullname(),
            self.diameter.value(),
            hazard
        )
    }
}

/// A single close approach to Earth by an NEO.
///
/// Holds the approach time (UTC, minute resolution), the nominal distance in
/// astronomical units, and the relative velocity in km/s. Until the linker
/// runs, the owning NEO is known only by the raw `designation_ref`.
#[derive(Debug, Clone, PartialEq)]
pub struct CloseApproach {
    designation_ref: String,
    time: Option<DateTime<Utc>>,
    distance: AstronomicalUnits,
    velocity: KilometersPerSecond,
    neo: Option<NeoId>,
}

impl CloseApproach {
    /// Creates an unlinked close approach from already-typed values.
    pub fn new(
        designation_ref: impl Into<String>,
        time: Option<DateTime<Utc>>,
        distance: AstronomicalUnits,
        velocity: KilometersPerSecond,
    ) -> Self {
        Self {
            designation_ref: designation_ref.into(),
            time,
            distance,
            velocity,
            neo: None,
        }
    }

    /// Creates an unlinked close approach from raw source text.
    ///
    /// An empty `raw_time` leaves the time unset. A non-empty timestamp that
    /// fails to parse is logged and also leaves the time unset. Distance and
    /// velocity fall back to `0.0` when unparseable.
    ///
    /// # Examples
    ///
    /// ```
    /// use neo_rust::core::domain::CloseApproach;
    ///
    /// let approach = CloseApproach::from_raw("433", Some("1900-Dec-27 01:30"), "0.3149", "5.58");
    /// assert_eq!(approach.time_str(), "1900-12-27 01:30");
    /// assert_eq!(approach.distance().value(), 0.3149);
    /// assert!(!approach.is_linked());
    /// ```
    pub fn from_raw(
        designation_ref: &str,
        raw_time: Option<&str>,
        distance: &str,
        velocity: &str,
    ) -> Self {
        let time = raw_time
            .filter(|raw| !raw.trim().is_empty())
            .and_then(|raw| match parse_datetime(raw) {
                Ok(time) => Some(time),
                Err(e) => {
                    log::warn!(
                        "Close approach for '{}' has an unreadable time, leaving it unset: {}",
                        designation_ref,
                        e
                    );
                    None
                }
            });

        Self::new(
            designation_ref,
            time,
            AstronomicalUnits::new(parse_measurement(distance)),
            KilometersPerSecond::new(parse_measurement(velocity)),
        )
    }

    /// Raw designation copied from the source record.
    pub fn designation_ref(&self) -> &str {
        &self.designation_ref
    }

    pub fn time(&self) -> Option<&DateTime<Utc>> {
        self.time.as_ref()
    }

    /// Formatted approach time, or an empty string when the time is unknown.
    pub fn time_str(&self) -> String {
        self.time.as_ref().map(format_datetime).unwrap_or_default()
    }

    pub fn distance(&self) -> AstronomicalUnits {
        self.distance
    }

    pub fn velocity(&self) -> KilometersPerSecond {
        self.velocity
    }

    /// Handle of the owning NEO, set by the linker.
    pub fn neo_id(&self) -> Option<NeoId> {
        self.neo
    }

    pub fn is_linked(&self) -> bool {
        self.neo.is_some()
    }

    /// The approach's own `{datetime_utc, distance_au, velocity_km_s}` fields.
    fn base_record(&self) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert("datetime_utc".to_string(), Value::from(self.time_str()));
        record.insert("distance_au".to_string(), Value::from(self.distance.value()));
        record.insert("velocity_km_s".to_string(), Value::from(self.velocity.value()));
        record
    }

    pub(crate) fn attach(&mut self, neo: NeoId) {
        debug_assert!(self.neo.is_none(), "close approach linked twice");
        self.neo = Some(neo);
    }
}

/// Where a serialized close approach puts its NEO's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApproachLayout {
    /// NEO fields merged into the top-level mapping (tabular output).
    Flat,
    /// NEO mapping nested under a `neo` key (hierarchical output).
    #[default]
    Nested,
}

/// A close approach together with the NEO it was linked to.
///
/// Only a [`NeoDatabase`](crate::core::database::NeoDatabase) hands these out,
/// and only for linked approaches, so rendering and serialization cannot fail.
#[derive(Debug, Clone, Copy)]
pub struct LinkedApproach<'a> {
    approach: &'a CloseApproach,
    neo: &'a NearEarthObject,
}

impl<'a> LinkedApproach<'a> {
    pub(crate) fn new(approach: &'a CloseApproach, neo: &'a NearEarthObject) -> Self {
        Self { approach, neo }
    }

    pub fn approach(&self) -> &'a CloseApproach {
        self.approach
    }

    pub fn neo(&self) -> &'a NearEarthObject {
        self.neo
    }

    /// Serializes the approach with its NEO placed according to `layout`.
    ///
    /// # Examples
    ///
    /// ```
    /// use neo_rust::core::domain::{parse_diameter, ApproachLayout, CloseApproach, NearEarthObject};
    /// use neo_rust::preprocessing::link;
    ///
    /// let neo = NearEarthObject::new("433", None, parse_diameter("16.84"), false).unwrap();
    /// let approach = CloseApproach::from_raw("433", Some("1900-01-01 12:00"), "0.15", "5.2");
    /// let (db, _) = link(vec![neo], vec![approach]).unwrap();
    ///
    /// let linked = db.linked_approaches().next().unwrap();
    /// let flat = linked.serialize(ApproachLayout::Flat);
    /// assert_eq!(flat["designation"], "433");
    /// assert!(!flat.contains_key("neo"));
    /// ```
    pub fn serialize(&self, layout: ApproachLayout) -> Map<String, Value> {
        let mut record = self.approach.base_record();
        match layout {
            ApproachLayout::Flat => record.extend(self.neo.serialize()),
            ApproachLayout::Nested => {
                record.insert("neo".to_string(), Value::Object(self.neo.serialize()));
            }
        }
        record
    }
}

impl fmt::Display for LinkedApproach<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "At {}, '{}' approaches Earth at a distance of {:.2} au and a velocity of {:.2} km/s",
            self.approach.time_str(),
            self.neo.fullname(),
            self.approach.distance.value(),
            self.approach.velocity.value()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn eros() -> NearEarthObject {
        NearEarthObject::new("433", Some("Eros".to_string()), parse_diameter("16.84"), false)
            .unwrap()
    }

    #[test]
    fn test_blank_designation_is_rejected() {
        for designation in ["", "   "] {
            let result = NearEarthObject::new(designation, None, Kilometers::new(1.0), false);
            assert_eq!(result, Err(NeoError::BlankDesignation));
        }
    }

    #[test]
    fn test_empty_name_becomes_none() {
        let neo = NearEarthObject::new("2020 AB", Some(String::new()), Kilometers::new(1.0), false)
            .unwrap();
        assert_eq!(neo.name(), None);
        assert_eq!(neo.fullname(), "2020 AB");
    }

    #[test]
    fn test_fullname_with_name() {
        assert_eq!(eros().fullname(), "433 Eros");
    }

    #[test]
    fn test_parse_diameter_unknown_values() {
        for raw in ["", "nan", "NaN", "abc", "-1.0", "inf", "  "] {
            assert!(parse_diameter(raw).value().is_nan(), "'{}' should be NaN", raw);
        }
        assert_eq!(parse_diameter(" 0.5 ").value(), 0.5);
    }

    #[test]
    fn test_parse_measurement_defaults_to_zero() {
        assert_eq!(parse_measurement(""), 0.0);
        assert_eq!(parse_measurement("far"), 0.0);
        assert_eq!(parse_measurement("NaN"), 0.0);
        assert_eq!(parse_measurement("0.0144"), 0.0144);
    }

    #[test]
    fn test_neo_display() {
        assert_eq!(
            eros().to_string(),
            "NEO 433 Eros has a diameter of 16.840 km and is not potentially hazardous."
        );

        let unknown = NearEarthObject::new("2020 AB", None, parse_diameter(""), true).unwrap();
        assert_eq!(
            unknown.to_string(),
            "NEO 2020 AB has a diameter of NaN km and is potentially hazardous."
        );
    }

    #[test]
    fn test_neo_serialize_shape() {
        let record = eros().serialize();
        assert_eq!(record.len(), 4);
        assert_eq!(record["designation"], "433");
        assert_eq!(record["name"], "Eros");
        assert_eq!(record["diameter_km"], 16.84);
        assert_eq!(record["potentially_hazardous"], false);

        let unnamed = NearEarthObject::new("2020 AB", None, parse_diameter(""), true).unwrap();
        let record = unnamed.serialize();
        assert!(record["name"].is_null());
        assert!(record["diameter_km"].is_null());
    }

    #[test]
    fn test_close_approach_without_time() {
        for raw_time in [None, Some(""), Some("  ")] {
            let approach = CloseApproach::from_raw("433", raw_time, "0.1", "5.0");
            assert!(approach.time().is_none());
            assert_eq!(approach.time_str(), "");
        }
    }

    #[test]
    fn test_close_approach_unreadable_time_is_unset() {
        let approach = CloseApproach::from_raw("433", Some("not a date"), "0.1", "5.0");
        assert!(approach.time().is_none());
        assert_eq!(approach.distance().value(), 0.1);
    }

    #[test]
    fn test_close_approach_bad_numbers() {
        let approach = CloseApproach::from_raw("433", None, "", "fast");
        assert_eq!(approach.distance().value(), 0.0);
        assert_eq!(approach.velocity().value(), 0.0);
        assert_eq!(approach.neo_id(), None);
    }

    #[test]
    fn test_linked_approach_layouts() {
        let neo = eros();
        let approach = CloseApproach::from_raw("433", Some("1900-01-01 12:00"), "0.15", "5.2");
        let linked = LinkedApproach::new(&approach, &neo);

        let flat = linked.serialize(ApproachLayout::Flat);
        let mut keys: Vec<&str> = flat.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "datetime_utc",
                "designation",
                "diameter_km",
                "distance_au",
                "name",
                "potentially_hazardous",
                "velocity_km_s",
            ]
        );

        let nested = linked.serialize(ApproachLayout::Nested);
        assert_eq!(nested.len(), 4);
        assert_eq!(nested["datetime_utc"], "1900-01-01 12:00");
        assert_eq!(nested["neo"], Value::Object(neo.serialize()));
    }

    #[test]
    fn test_linked_approach_display() {
        let neo = eros();
        let approach = CloseApproach::from_raw("433", Some("1900-Dec-27 01:30"), "0.3149", "5.5813");

        assert_eq!(
            LinkedApproach::new(&approach, &neo).to_string(),
            "At 1900-12-27 01:30, '433 Eros' approaches Earth at a distance of 0.31 au and a velocity of 5.58 km/s"
        );
    }

    proptest! {
        #[test]
        fn prop_diameter_is_finite_non_negative_or_nan(raw in ".*") {
            let km = parse_diameter(&raw).value();
            prop_assert!(km.is_nan() || (km.is_finite() && km >= 0.0));
        }

        #[test]
        fn prop_fullname_matches_name(
            designation in "[0-9A-Z]{1,8}",
            name in proptest::option::of("[A-Za-z]{0,12}"),
        ) {
            let neo = NearEarthObject::new(designation.clone(), name.clone(), Kilometers::new(1.0), false)
                .unwrap();
            match name.filter(|n| !n.is_empty()) {
                Some(n) => prop_assert_eq!(neo.fullname(), format!("{} {}", designation, n)),
                None => prop_assert_eq!(neo.fullname(), designation),
            }
        }
    }
}
