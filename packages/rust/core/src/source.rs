//! Source collections: which files make up a term and how to classify them.

use std::path::{Path, PathBuf};

use tracing::debug;

use coursecat_shared::{CatalogError, Major, Result, TermConfig, TermLabel};

use crate::classifier::{SourceConvention, convention_for};
use crate::grade::grade_level;

/// One timetable file of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// File name component, the only part used for classification.
    pub file_name: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, file_name }
    }
}

/// List the files of `dir` with the given extension, sorted by file name.
///
/// Not recursive. Hidden files and `~$` lock files are skipped.
pub fn list_source_files(dir: &Path, extension: &str) -> Result<Vec<SourceFile>> {
    let entries = std::fs::read_dir(dir).map_err(|e| CatalogError::io(dir, e))?;
    let wanted = extension.trim_start_matches('.');

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CatalogError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let matches_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(wanted));
        if !matches_ext {
            continue;
        }

        let file = SourceFile::new(path);
        if file.file_name.starts_with('.') || file.file_name.starts_with("~$") {
            debug!(file = %file.file_name, "skipping hidden or lock file");
            continue;
        }
        files.push(file);
    }

    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(files)
}

/// Metadata inferred from a filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub major: Major,
    pub entry_year: i32,
    pub grade_level: u8,
}

/// A term's naming convention paired with its label and reference year.
pub struct TermSource {
    pub label: TermLabel,
    pub reference_start_year: i32,
    pub convention: Box<dyn SourceConvention>,
}

impl TermSource {
    pub fn new(
        label: TermLabel,
        reference_start_year: i32,
        convention: Box<dyn SourceConvention>,
    ) -> Self {
        Self {
            label,
            reference_start_year,
            convention,
        }
    }

    pub fn from_config(config: &TermConfig) -> Result<Self> {
        Ok(Self::new(
            config.label(),
            config.reference_start_year,
            convention_for(&config.naming)?,
        ))
    }

    /// Major, entry year and grade level of `file_name` under this term.
    pub fn classify(&self, file_name: &str) -> Result<Classification> {
        let major = self.convention.major(file_name)?;
        let entry_year = self.convention.entry_year(file_name)?;
        let grade_level =
            grade_level(self.reference_start_year, entry_year).map_err(|e| e.in_file(file_name))?;

        Ok(Classification {
            major,
            entry_year,
            grade_level,
        })
    }
}

impl std::fmt::Debug for TermSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TermSource")
            .field("label", &self.label)
            .field("reference_start_year", &self.reference_start_year)
            .field("convention", &self.convention.name())
            .finish()
    }
}

/// A term source together with the files found for it.
#[derive(Debug)]
pub struct Collection {
    pub source: TermSource,
    pub files: Vec<SourceFile>,
}

impl Collection {
    /// Build the term source from config and enumerate its directory.
    pub fn load(config: &TermConfig, extension: &str) -> Result<Self> {
        let source = TermSource::from_config(config)?;
        let files = list_source_files(Path::new(&config.source_dir), extension)?;
        debug!(
            term = %source.label,
            dir = %config.source_dir,
            files = files.len(),
            "enumerated collection"
        );
        Ok(Self { source, files })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursecat_shared::{AppConfig, Term};

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "coursecat-source-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn lists_matching_files_sorted() {
        let tmp = temp_dir();
        for name in [
            "软件工程2025级.csv",
            "物联网工程2023级.CSV",
            "notes.txt",
            ".hidden.csv",
            "~$软件工程2025级.csv",
        ] {
            std::fs::write(tmp.join(name), "").unwrap();
        }
        std::fs::create_dir_all(tmp.join("nested.csv")).unwrap();

        let files = list_source_files(&tmp, "csv").unwrap();
        let names: Vec<_> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["物联网工程2023级.CSV", "软件工程2025级.csv"]);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_directory_is_io_error() {
        let missing = temp_dir().join("absent");
        let err = list_source_files(&missing, "csv").unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn classify_first_term_file() {
        let config = AppConfig::default();
        let source = TermSource::from_config(&config.first_term).unwrap();
        let c = source.classify("软件工程2023级课表.csv").unwrap();
        assert_eq!(c.major, Major::Se);
        assert_eq!(c.entry_year, 2023);
        assert_eq!(c.grade_level, 3);
        assert_eq!(source.label.term, Term::First);
    }

    #[test]
    fn classify_template_file_uses_older_reference() {
        let config = AppConfig::default();
        let source = TermSource::from_config(&config.second_term).unwrap();
        let c = source.classify("2023-2024-2-2022电子信息工程课表.csv").unwrap();
        assert_eq!(c.major, Major::Eie);
        assert_eq!(c.grade_level, 2);
    }

    #[test]
    fn template_cohorts_2020_to_2023_map_to_grades_4_to_1() {
        let config = AppConfig::default();
        let source = TermSource::from_config(&config.second_term).unwrap();

        let oldest = source.classify("2023-2024-2-2020软件工程课表.csv").unwrap();
        assert_eq!(oldest.entry_year, 2020);
        assert_eq!(oldest.grade_level, 4);

        let newest = source.classify("2023-2024-2-2023软件工程课表.csv").unwrap();
        assert_eq!(newest.entry_year, 2023);
        assert_eq!(newest.grade_level, 1);

        assert!(source.classify("2023-2024-2-2024软件工程课表.csv").is_err());
        assert!(source.classify("2024-2025-2-2023软件工程课表.csv").is_err());
    }

    #[test]
    fn out_of_range_cohort_names_the_file() {
        let config = AppConfig::default();
        let source = TermSource::from_config(&config.first_term).unwrap();
        let err = source.classify("软件工程2026级课表.csv").unwrap_err();
        assert!(err.to_string().starts_with("软件工程2026级课表.csv: grade level 0"));
    }

    #[test]
    fn source_file_name_ignores_directories() {
        let file = SourceFile::new("/data/2023-2024-2-x/软件工程2025级.csv");
        assert_eq!(file.file_name, "软件工程2025级.csv");
    }
}
