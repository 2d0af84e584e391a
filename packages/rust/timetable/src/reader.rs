//! Row-level reading of timetable files.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use coursecat_shared::{CatalogError, Result};

const UTF8_BOM: char = '\u{feff}';

/// Reads a tabular file into ordered rows of text cells.
pub trait TableReader {
    /// Read every row of the file at `path`. The file is closed on return.
    fn read_rows(&self, path: &Path) -> Result<Vec<Vec<String>>>;
}

/// [`TableReader`] for delimited text exports of the timetables.
///
/// No header handling, ragged rows allowed, quoted cells may span lines.
#[derive(Debug, Clone)]
pub struct CsvTableReader {
    delimiter: u8,
}

impl CsvTableReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Read rows from any reader. `origin` is only used in error messages.
    pub fn read_from<R: Read>(&self, input: R, origin: &Path) -> Result<Vec<Vec<String>>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(input);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| CatalogError::table(origin, e.to_string()))?;
            rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }

        if let Some(first) = rows.first_mut().and_then(|row| row.first_mut()) {
            if let Some(stripped) = first.strip_prefix(UTF8_BOM) {
                *first = stripped.to_string();
            }
        }

        Ok(rows)
    }
}

impl Default for CsvTableReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TableReader for CsvTableReader {
    fn read_rows(&self, path: &Path) -> Result<Vec<Vec<String>>> {
        let file = File::open(path).map_err(|e| CatalogError::io(path, e))?;
        let rows = self.read_from(file, path)?;
        tracing::debug!(path = %path.display(), rows = rows.len(), "read table");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(text: &str) -> Vec<Vec<String>> {
        CsvTableReader::new()
            .read_from(text.as_bytes(), Path::new("inline.csv"))
            .expect("read csv")
    }

    #[test]
    fn ragged_rows_and_multiline_cells() {
        let rows = read("标题\n节次,时间,星期一\n第1-2节,08:00,\"a/BDIC1001J/\nb/0009287/\",x\n");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["标题"]);
        assert_eq!(rows[2].len(), 4);
        assert_eq!(rows[2][2], "a/BDIC1001J/\nb/0009287/");
    }

    #[test]
    fn strips_leading_bom() {
        let rows = read("\u{feff}软件工程2025级,x\n");
        assert_eq!(rows[0][0], "软件工程2025级");
    }

    #[test]
    fn custom_delimiter() {
        let rows = CsvTableReader::with_delimiter(b'\t')
            .read_from("a\tb\tc\n".as_bytes(), Path::new("inline.tsv"))
            .expect("read tsv");
        assert_eq!(rows[0], vec!["a", "b", "c"]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join(format!(
            "coursecat-missing-{}.csv",
            uuid::Uuid::now_v7()
        ));
        let err = CsvTableReader::new().read_rows(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn reads_fixture_file() {
        let path = Path::new("../../../fixtures/timetables/first_term/软件工程2025级课表.csv");
        let rows = CsvTableReader::new().read_rows(path).expect("read fixture");
        assert!(rows.len() > 2);
        assert_eq!(rows[1][0], "节次");
    }
}
