pub mod cad;

pub use cad::{format_datetime, parse_datetime, CAD_DATETIME_FORMAT, OUTPUT_DATETIME_FORMAT};
