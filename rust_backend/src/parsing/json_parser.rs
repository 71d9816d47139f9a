use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

use crate::core::domain::CloseApproach;
use crate::error::{NeoError, NeoResult};

/// Position of the NEO designation in a close-approach record
pub const DESIGNATION_INDEX: usize = 0;
/// Position of the approach time (`%Y-%b-%d %H:%M`) in a close-approach record
pub const TIME_INDEX: usize = 3;
/// Position of the nominal distance (au) in a close-approach record
pub const DISTANCE_INDEX: usize = 4;
/// Position of the relative velocity (km/s) in a close-approach record
pub const VELOCITY_INDEX: usize = 7;

/// Field names the upstream `fields` header carries at the positions above
const EXPECTED_FIELDS: [(usize, &str); 4] = [
    (DESIGNATION_INDEX, "des"),
    (TIME_INDEX, "cd"),
    (DISTANCE_INDEX, "dist"),
    (VELOCITY_INDEX, "v_rel"),
];

/// Container for the close-approach JSON file structure
#[derive(Debug, Deserialize)]
struct CadJson {
    #[serde(default)]
    fields: Option<Vec<String>>,
    #[serde(default)]
    count: Option<Value>,
    data: Vec<Vec<Value>>,
}

/// One positional close-approach record, decoded into named fields
///
/// This is the only place that knows the record layout. Values are kept as
/// text here; numeric coercion happens when the `CloseApproach` is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproachRow {
    pub designation: String,
    pub time: Option<String>,
    pub distance: String,
    pub velocity: String,
}

impl ApproachRow {
    /// Decode a positional record
    ///
    /// Strings are taken verbatim, numbers by their JSON text, `null` as empty.
    pub fn from_fields(fields: &[Value]) -> NeoResult<Self> {
        if fields.len() <= VELOCITY_INDEX {
            return Err(NeoError::InvalidRecord(format!(
                "expected at least {} fields, found {}",
                VELOCITY_INDEX + 1,
                fields.len()
            )));
        }

        let time = field_text(&fields[TIME_INDEX]);

        Ok(Self {
            designation: field_text(&fields[DESIGNATION_INDEX]),
            time: (!time.is_empty()).then_some(time),
            distance: field_text(&fields[DISTANCE_INDEX]),
            velocity: field_text(&fields[VELOCITY_INDEX]),
        })
    }

    pub fn into_close_approach(self) -> CloseApproach {
        CloseApproach::from_raw(
            &self.designation,
            self.time.as_deref(),
            &self.distance,
            &self.velocity,
        )
    }
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Parse a close-approach JSON file into unlinked `CloseApproach`es
pub fn parse_cad_json(json_path: &Path) -> Result<Vec<CloseApproach>> {
    let json_content = std::fs::read_to_string(json_path)
        .with_context(|| format!("Failed to read JSON file: {}", json_path.display()))?;

    parse_cad_json_str(&json_content)
}

/// Parse close-approach JSON from a string
pub fn parse_cad_json_str(json_str: &str) -> Result<Vec<CloseApproach>> {
    let json_value: Value = serde_json::from_str(json_str).with_context(|| {
        let preview: String = json_str.chars().take(200).collect();
        format!("Invalid JSON syntax. First 200 chars: {}", preview)
    })?;

    if !json_value
        .as_object()
        .is_some_and(|obj| obj.contains_key("data"))
    {
        anyhow::bail!(
            "JSON must contain a 'data' key. Found keys: {:?}",
            json_value.as_object().map(|o| o.keys().collect::<Vec<_>>())
        );
    }

    let cad: CadJson = serde_path_to_error::deserialize(json_value)
        .context("Failed to decode close-approach records")?;

    check_header(&cad);

    cad.data
        .iter()
        .enumerate()
        .map(|(idx, fields)| {
            ApproachRow::from_fields(fields)
                .map(ApproachRow::into_close_approach)
                .with_context(|| format!("Invalid close-approach record at index {}", idx))
        })
        .collect()
}

/// Warn when the payload's own header disagrees with the fixed record layout.
fn check_header(cad: &CadJson) {
    if let Some(fields) = &cad.fields {
        for (idx, expected) in EXPECTED_FIELDS {
            match fields.get(idx) {
                Some(name) if name == expected => {}
                found => log::warn!(
                    "Close-approach field {} is {:?}, expected '{}'; reading it as '{}' anyway",
                    idx,
                    found,
                    expected,
                    expected
                ),
            }
        }
    }

    if let Some(count) = &cad.count {
        let declared = field_text(count).parse::<usize>().ok();
        if declared != Some(cad.data.len()) {
            log::warn!(
                "Close-approach payload declares count {} but holds {} records",
                count,
                cad.data.len()
            );
        }
    }
}
