//! Shared types, error model, and configuration for coursecat.
//!
//! This crate is the foundation depended on by all other coursecat crates.
//! It provides:
//! - [`CatalogError`]: the unified error type
//! - Domain types ([`CourseRecord`], [`RecordKey`], [`Major`], [`Term`])
//! - Configuration ([`AppConfig`], [`ExtractConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DEFAULT_COHORT_MARKER, DEFAULT_TEMPLATE_PREFIX, DefaultsConfig, ExtractConfig,
    NamingConfig, OutputFormat, TermConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from, validate_config,
};
pub use error::{CatalogError, ClassificationRule, Result};
pub use types::{
    CourseNames, CourseRecord, Major, NameConflict, RawCourse, RecordKey, RunId, Term, TermLabel,
};
