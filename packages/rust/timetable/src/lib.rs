//! Timetable parsing for coursecat.
//!
//! Turns the rows of one timetable file into raw course occurrences:
//! table → weekday cells → lines → delimited course code + bilingual name.

pub mod cell;
pub mod names;
pub mod patterns;
pub mod reader;
pub mod table;

use std::path::Path;

use coursecat_shared::{RawCourse, Result};

pub use cell::extract_cell;
pub use names::split_name;
pub use patterns::{CodeKind, DEPARTMENT_CODE, NUMERIC_CODE, code_kind};
pub use reader::{CsvTableReader, TableReader};
pub use table::parse_table;

/// Read one timetable file and extract its course occurrences.
pub fn parse_file(reader: &dyn TableReader, path: &Path) -> Result<Vec<RawCourse>> {
    let rows = reader.read_rows(path)?;
    Ok(parse_table(&rows))
}
