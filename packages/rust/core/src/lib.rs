//! Core pipeline orchestration and domain logic for coursecat.
//!
//! This crate ties together filename classification, grade-level
//! arithmetic, timetable parsing and the keyed merge into the end-to-end
//! `extract` workflow.

pub mod classifier;
pub mod grade;
pub mod pipeline;
pub mod registry;
pub mod source;

pub use classifier::{
    PrimaryConvention, SourceConvention, TemplateConvention, infer_entry_year_primary,
    infer_entry_year_template, infer_major,
};
pub use grade::grade_level;
pub use pipeline::{ExtractResult, FileSummary, ProgressReporter, SilentProgress, run, run_extract};
pub use registry::{CourseRegistry, FileExtraction, MergedCatalog};
pub use source::{Classification, Collection, SourceFile, TermSource, list_source_files};
