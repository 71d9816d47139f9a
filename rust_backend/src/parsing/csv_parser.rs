use anyhow::{Context, Result};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;

use crate::core::domain::{parse_diameter, NearEarthObject};

/// Primary designation column (required)
pub const DESIGNATION_COLUMN: &str = "pdes";
/// IAU name column (optional)
pub const NAME_COLUMN: &str = "name";
/// Diameter in kilometers column (optional)
pub const DIAMETER_COLUMN: &str = "diameter";
/// Potentially-hazardous flag column (optional)
pub const HAZARD_COLUMN: &str = "pha";

/// Flag value marking a potentially hazardous object; anything else is not hazardous
pub const HAZARDOUS_FLAG: &str = "Y";

/// Every column is read as text so designations like `433` are not turned into integers.
fn csv_options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
}

/// Parse an NEO CSV file into a Polars DataFrame of string columns
pub fn read_neo_csv(csv_path: &Path) -> Result<DataFrame> {
    csv_options()
        .try_into_reader_with_file_path(Some(csv_path.into()))
        .with_context(|| format!("Failed to open NEO CSV file: {}", csv_path.display()))?
        .finish()
        .context("Failed to parse NEO CSV into DataFrame")
}

/// Parse NEO CSV content held in memory into a Polars DataFrame
pub fn read_neo_csv_str(csv_str: &str) -> Result<DataFrame> {
    csv_options()
        .into_reader_with_file_handle(Cursor::new(csv_str.as_bytes().to_vec()))
        .finish()
        .context("Failed to parse NEO CSV into DataFrame")
}

/// Parse an NEO CSV file into unlinked `NearEarthObject`s
pub fn parse_neo_csv(csv_path: &Path) -> Result<Vec<NearEarthObject>> {
    let df = read_neo_csv(csv_path)?;
    dataframe_to_neos(&df)
}

/// Parse NEO CSV content held in memory into unlinked `NearEarthObject`s
pub fn parse_neo_csv_str(csv_str: &str) -> Result<Vec<NearEarthObject>> {
    let df = read_neo_csv_str(csv_str)?;
    dataframe_to_neos(&df)
}

/// Returns `true` only for the exact, case-sensitive hazardous marker.
pub fn is_hazardous_flag(flag: &str) -> bool {
    flag == HAZARDOUS_FLAG
}

/// Convert a DataFrame of NEO rows to `NearEarthObject`s, one per row, in row order
pub fn dataframe_to_neos(df: &DataFrame) -> Result<Vec<NearEarthObject>> {
    let designations = df
        .column(DESIGNATION_COLUMN)
        .with_context(|| format!("NEO CSV must contain a '{}' column", DESIGNATION_COLUMN))?
        .str()?;
    let names = df.column(NAME_COLUMN).ok().and_then(|c| c.str().ok());
    let diameters = df.column(DIAMETER_COLUMN).ok().and_then(|c| c.str().ok());
    let hazard_flags = df.column(HAZARD_COLUMN).ok().and_then(|c| c.str().ok());

    let mut neos = Vec::with_capacity(df.height());

    for i in 0..df.height() {
        let designation = designations.get(i).unwrap_or_default();
        let name = names
            .and_then(|col| col.get(i))
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        let diameter = parse_diameter(diameters.and_then(|col| col.get(i)).unwrap_or_default());
        let hazardous = hazard_flags
            .and_then(|col| col.get(i))
            .is_some_and(is_hazardous_flag);

        // 1-based line number, header included
        let neo = NearEarthObject::new(designation, name, diameter, hazardous)
            .with_context(|| format!("Invalid NEO at CSV row {}", i + 2))?;
        neos.push(neo);
    }

    Ok(neos)
}
