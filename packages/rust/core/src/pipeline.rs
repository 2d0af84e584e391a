//! End-to-end `extract` pipeline: collections → classify → parse → merge.

use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use coursecat_shared::{CourseRecord, ExtractConfig, Major, NameConflict, Result, TermLabel};
use coursecat_timetable::TableReader;

use crate::registry::{CourseRegistry, FileExtraction};
use crate::source::{Collection, SourceFile};

/// Per-file outcome, kept for the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub file_name: String,
    pub label: TermLabel,
    pub major: Major,
    pub grade_level: u8,
    /// Course occurrences found, duplicates included.
    pub occurrences: usize,
}

/// Result of the `extract` pipeline.
#[derive(Debug)]
pub struct ExtractResult {
    /// Merged records in output order.
    pub records: Vec<CourseRecord>,
    /// Name conflicts, in the order they were detected.
    pub conflicts: Vec<NameConflict>,
    /// Files processed, in processing order.
    pub files: Vec<FileSummary>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after a file has been parsed.
    fn file_parsed(&self, file_name: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &ExtractResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn file_parsed(&self, _file_name: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &ExtractResult) {}
}

/// Load both collections from config and run the pipeline.
pub fn run_extract(
    config: &ExtractConfig,
    reader: &dyn TableReader,
    progress: &dyn ProgressReporter,
) -> Result<ExtractResult> {
    progress.phase("Enumerating timetable files");
    let first_term = Collection::load(&config.first_term, &config.extension)?;
    let second_term = Collection::load(&config.second_term, &config.extension)?;

    run(&first_term, &second_term, reader, progress)
}

/// Run the pipeline over the first-term, then the second-term collection.
///
/// 1. Classify each file (major, grade level) under its term's convention
/// 2. Parse the file's table into course occurrences
/// 3. Fold all occurrences into the registry, first write wins
/// 4. Emit the sorted record list
///
/// Any classification or grade-range failure aborts the run.
#[instrument(skip_all, fields(
    first_term = %first_term.source.label,
    second_term = %second_term.source.label,
))]
pub fn run(
    first_term: &Collection,
    second_term: &Collection,
    reader: &dyn TableReader,
    progress: &dyn ProgressReporter,
) -> Result<ExtractResult> {
    let start = Instant::now();
    let total = first_term.files.len() + second_term.files.len();

    info!(
        first_term_files = first_term.files.len(),
        second_term_files = second_term.files.len(),
        "starting extract pipeline"
    );

    let mut extractions = Vec::with_capacity(total);
    for collection in [first_term, second_term] {
        if collection.source.convention.stand_in() {
            warn!(
                term = %collection.source.label,
                reference_start_year = collection.source.reference_start_year,
                "records for this term come from an earlier offering's timetables"
            );
        }

        progress.phase(&format!("Parsing {}", collection.source.label));
        for file in sorted_files(&collection.files) {
            let extraction = extract_file(collection, file, reader)?;
            progress.file_parsed(&file.file_name, extractions.len() + 1, total);
            extractions.push(extraction);
        }
    }

    let files: Vec<FileSummary> = extractions
        .iter()
        .map(|e| FileSummary {
            file_name: e.source.clone(),
            label: e.label.clone(),
            major: e.major,
            grade_level: e.grade_level,
            occurrences: e.courses.len(),
        })
        .collect();

    progress.phase("Merging courses");
    let catalog = CourseRegistry::from_extractions(extractions).into_catalog();

    let result = ExtractResult {
        records: catalog.records,
        conflicts: catalog.conflicts,
        files,
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        files = result.files.len(),
        records = result.records.len(),
        conflicts = result.conflicts.len(),
        elapsed_ms = result.elapsed.as_millis(),
        "extract pipeline complete"
    );

    Ok(result)
}

/// Classify and parse one file of `collection`.
fn extract_file(
    collection: &Collection,
    file: &SourceFile,
    reader: &dyn TableReader,
) -> Result<FileExtraction> {
    let class = collection.source.classify(&file.file_name)?;

    let courses = coursecat_timetable::parse_file(reader, &file.path)
        .map_err(|e| e.in_file(&file.file_name))?;

    debug!(
        file = %file.file_name,
        major = %class.major,
        entry_year = class.entry_year,
        grade_level = class.grade_level,
        courses = courses.len(),
        "parsed timetable"
    );

    Ok(FileExtraction {
        source: file.file_name.clone(),
        label: collection.source.label.clone(),
        major: class.major,
        grade_level: class.grade_level,
        courses,
    })
}

fn sorted_files(files: &[SourceFile]) -> Vec<&SourceFile> {
    let mut sorted: Vec<&SourceFile> = files.iter().collect();
    sorted.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    sorted
}
