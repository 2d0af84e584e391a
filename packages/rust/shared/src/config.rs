//! Application configuration for coursecat.
//!
//! User config lives at `~/.coursecat/coursecat.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::types::{Term, TermLabel};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "coursecat.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".coursecat";

/// Marker that follows the entry year in first-term filenames (`2023级`).
pub const DEFAULT_COHORT_MARKER: &str = "级";

/// Literal prefix of second-term template filenames.
pub const DEFAULT_TEMPLATE_PREFIX: &str = "2023-2024-2-";

// ---------------------------------------------------------------------------
// Config structs (matching coursecat.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Current first-term timetables.
    #[serde(default = "default_first_term")]
    pub first_term: TermConfig,

    /// Second-term template timetables.
    #[serde(default = "default_second_term")]
    pub second_term: TermConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            defaults: DefaultsConfig::default(),
            first_term: default_first_term(),
            second_term: default_second_term(),
        }
    }
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory the exported files are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Output formats to emit.
    #[serde(default = "default_formats")]
    pub formats: Vec<OutputFormat>,

    /// Extension of the timetable files to pick up (without the dot).
    #[serde(default = "default_extension")]
    pub extension: String,

    /// File stem of the exported record files (`<stem>.json`, `<stem>.csv`).
    #[serde(default = "default_output_stem")]
    pub output_stem: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            formats: default_formats(),
            extension: default_extension(),
            output_stem: default_output_stem(),
        }
    }
}

fn default_output_dir() -> String {
    "output".into()
}
fn default_formats() -> Vec<OutputFormat> {
    vec![OutputFormat::Json, OutputFormat::Csv]
}
fn default_extension() -> String {
    "csv".into()
}
fn default_output_stem() -> String {
    "timetable_courses_2025_2026".into()
}

/// Export format of the merged record list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(CatalogError::config(format!(
                "unknown output format '{other}': expected 'json' or 'csv'"
            ))),
        }
    }
}

/// `[first_term]` / `[second_term]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermConfig {
    /// Directory holding this collection's timetable files.
    pub source_dir: String,

    /// Academic year the records are filed under, e.g. `2025-2026`.
    pub academic_year: String,

    /// Term number (1 or 2).
    pub term: Term,

    /// Start year the cohorts' grade levels are measured from.
    pub reference_start_year: i32,

    /// How filenames in this collection encode major and entry year.
    pub naming: NamingConfig,
}

impl TermConfig {
    pub fn label(&self) -> TermLabel {
        TermLabel {
            academic_year: self.academic_year.clone(),
            term: self.term,
        }
    }
}

/// `[*.naming]`: filename convention of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NamingConfig {
    /// `<major keyword>...<YYYY><cohort_marker>...`
    Primary {
        #[serde(default = "default_cohort_marker")]
        cohort_marker: String,
    },
    /// `<prefix><YYYY>...<major keyword>...`
    Template {
        #[serde(default = "default_template_prefix")]
        prefix: String,
        /// The collection stands in for a term that has no timetables yet.
        #[serde(default = "default_true")]
        stand_in: bool,
    },
}

fn default_cohort_marker() -> String {
    DEFAULT_COHORT_MARKER.into()
}
fn default_template_prefix() -> String {
    DEFAULT_TEMPLATE_PREFIX.into()
}
fn default_true() -> bool {
    true
}

fn default_first_term() -> TermConfig {
    TermConfig {
        source_dir: "data/first_term".into(),
        academic_year: "2025-2026".into(),
        term: Term::First,
        reference_start_year: 2025,
        naming: NamingConfig::Primary {
            cohort_marker: default_cohort_marker(),
        },
    }
}

fn default_second_term() -> TermConfig {
    TermConfig {
        source_dir: "data/second_term".into(),
        academic_year: "2025-2026".into(),
        term: Term::Second,
        reference_start_year: 2023,
        naming: NamingConfig::Template {
            prefix: default_template_prefix(),
            stand_in: true,
        },
    }
}

// ---------------------------------------------------------------------------
// Extract config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime extraction configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub first_term: TermConfig,
    pub second_term: TermConfig,
    /// Directory the exported files are written to.
    pub output_dir: PathBuf,
    pub formats: Vec<OutputFormat>,
    /// Extension of the timetable files to pick up.
    pub extension: String,
    pub output_stem: String,
}

impl From<&AppConfig> for ExtractConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            first_term: config.first_term.clone(),
            second_term: config.second_term.clone(),
            output_dir: PathBuf::from(&config.defaults.output_dir),
            formats: config.defaults.formats.clone(),
            extension: config.defaults.extension.clone(),
            output_stem: config.defaults.output_stem.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.coursecat/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CatalogError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.coursecat/coursecat.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| CatalogError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| CatalogError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| CatalogError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| CatalogError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Matches a two-year academic label like `2025-2026`.
static ACADEMIC_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})-([0-9]{4})$").expect("academic year regex"));

/// Check both term sections for values that would produce wrong records.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    validate_term("first_term", &config.first_term)?;
    validate_term("second_term", &config.second_term)?;

    if !matches!(config.first_term.naming, NamingConfig::Primary { .. }) {
        return Err(CatalogError::config(
            "first_term must use the primary naming convention",
        ));
    }
    if !matches!(config.second_term.naming, NamingConfig::Template { .. }) {
        return Err(CatalogError::config(
            "second_term must use the template naming convention",
        ));
    }
    if config.first_term.label() == config.second_term.label() {
        return Err(CatalogError::config(format!(
            "first_term and second_term are both filed under {}",
            config.first_term.label()
        )));
    }
    if config.defaults.extension.trim().is_empty() {
        return Err(CatalogError::config("defaults.extension must not be empty"));
    }
    let stem = config.defaults.output_stem.trim();
    if stem.is_empty() || stem.contains(['/', '\\']) {
        return Err(CatalogError::config(
            "defaults.output_stem must be a non-empty file name without separators",
        ));
    }

    Ok(())
}

fn validate_term(section: &str, term: &TermConfig) -> Result<()> {
    let caps = ACADEMIC_YEAR_RE.captures(&term.academic_year).ok_or_else(|| {
        CatalogError::config(format!(
            "{section}.academic_year '{}' is not of the form YYYY-YYYY",
            term.academic_year
        ))
    })?;
    let start: i32 = caps[1].parse().unwrap_or_default();
    let end: i32 = caps[2].parse().unwrap_or_default();
    if end != start + 1 {
        return Err(CatalogError::config(format!(
            "{section}.academic_year '{}' must span two consecutive years",
            term.academic_year
        )));
    }

    match &term.naming {
        NamingConfig::Primary { cohort_marker } if cohort_marker.is_empty() => Err(
            CatalogError::config(format!("{section}.naming.cohort_marker must not be empty")),
        ),
        NamingConfig::Template { prefix, .. } if prefix.is_empty() => Err(CatalogError::config(
            format!("{section}.naming.prefix must not be empty"),
        )),
        _ => Ok(()),
    }
}
