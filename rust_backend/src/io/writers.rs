//! Export of linked close approaches in the flat and nested shapes.

use anyhow::{Context, Result};
use polars::prelude::*;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::core::domain::{ApproachLayout, LinkedApproach};

/// Column order of the flat CSV export
pub const CSV_COLUMNS: [&str; 7] = [
    "datetime_utc",
    "distance_au",
    "velocity_km_s",
    "designation",
    "name",
    "diameter_km",
    "potentially_hazardous",
];

/// Convert linked approaches to a DataFrame in the flat layout
///
/// Cells come from [`LinkedApproach::serialize`] with [`ApproachLayout::Flat`],
/// so a `null` field (an absent name or unknown diameter) becomes a null cell.
pub fn approaches_to_dataframe<'a, I>(approaches: I) -> Result<DataFrame>
where
    I: IntoIterator<Item = LinkedApproach<'a>>,
{
    let records: Vec<Map<String, Value>> = approaches
        .into_iter()
        .map(|linked| linked.serialize(ApproachLayout::Flat))
        .collect();

    let columns: Vec<Column> = CSV_COLUMNS
        .iter()
        .map(|&key| match key {
            "distance_au" | "velocity_km_s" | "diameter_km" => {
                let values: Vec<Option<f64>> = records
                    .iter()
                    .map(|record| record.get(key).and_then(Value::as_f64))
                    .collect();
                Column::new(key.into(), values)
            }
            "potentially_hazardous" => {
                let values: Vec<Option<bool>> = records
                    .iter()
                    .map(|record| record.get(key).and_then(Value::as_bool))
                    .collect();
                Column::new(key.into(), values)
            }
            _ => {
                let values: Vec<Option<&str>> = records
                    .iter()
                    .map(|record| record.get(key).and_then(Value::as_str))
                    .collect();
                Column::new(key.into(), values)
            }
        })
        .collect();

    let df = DataFrame::new(columns)?;
    Ok(df)
}

/// Write linked approaches as CSV, one flat row per approach
///
/// Returns the number of rows written.
pub fn write_to_csv<'a, I>(path: &Path, approaches: I) -> Result<usize>
where
    I: IntoIterator<Item = LinkedApproach<'a>>,
{
    let mut df = approaches_to_dataframe(approaches)?;
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;

    Ok(df.height())
}

/// Write linked approaches as a JSON array of nested records
///
/// Returns the number of records written.
pub fn write_to_json<'a, I>(path: &Path, approaches: I) -> Result<usize>
where
    I: IntoIterator<Item = LinkedApproach<'a>>,
{
    let records: Vec<Value> = approaches
        .into_iter()
        .map(|linked| Value::Object(linked.serialize(ApproachLayout::Nested)))
        .collect();

    let file = File::create(path)
        .with_context(|| format!("Failed to create JSON file: {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &records)
        .with_context(|| format!("Failed to write JSON file: {}", path.display()))?;

    Ok(records.len())
}
