//! Catalog export.
//!
//! Writes the merged course records to an output directory as JSON and/or
//! CSV, plus a `manifest.json` describing the run and checksumming every
//! artifact it wrote.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use coursecat_shared::{CatalogError, CourseRecord, NameConflict, OutputFormat, Result, RunId};

/// Manifest layout version.
pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Metadata for a single artifact file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMeta {
    pub filename: String,
    pub sha256: String,
    pub size_bytes: usize,
}

/// Contents of `manifest.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogManifest {
    pub schema_version: u32,
    pub run_id: RunId,
    pub tool_version: String,
    pub generated_at: DateTime<Utc>,
    /// Files processed per term label.
    pub files_per_term: BTreeMap<String, usize>,
    pub record_count: usize,
    pub conflict_count: usize,
    pub conflicts: Vec<String>,
    pub artifacts: Vec<ArtifactMeta>,
}

/// Where and how to export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub formats: Vec<OutputFormat>,
    /// Record files are named `<file_stem>.json` and `<file_stem>.csv`.
    pub file_stem: String,
    pub tool_version: String,
}

impl ExportConfig {
    /// File name used for `format`.
    pub fn file_name(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => format!("{}.json", self.file_stem),
            OutputFormat::Csv => format!("{}.csv", self.file_stem),
        }
    }
}

/// What to export.
#[derive(Debug, Clone, Copy)]
pub struct CatalogExport<'a> {
    pub records: &'a [CourseRecord],
    pub conflicts: &'a [NameConflict],
    pub files_per_term: &'a BTreeMap<String, usize>,
}

/// Output from a successful export.
#[derive(Debug, Clone)]
pub struct ExportResult {
    pub output_dir: PathBuf,
    pub manifest: CatalogManifest,
}

/// Render and write the requested formats, then the manifest.
///
/// Everything is rendered first, then every file is written to a temp
/// sibling, and only then are the temp files renamed into place. A
/// rendering or write failure leaves no new output files behind.
#[instrument(skip_all, fields(
    output_dir = %config.output_dir.display(),
    records = catalog.records.len(),
))]
pub fn export(config: &ExportConfig, catalog: CatalogExport<'_>) -> Result<ExportResult> {
    if config.formats.is_empty() {
        return Err(CatalogError::Export("no output format selected".into()));
    }

    let mut files = Vec::with_capacity(config.formats.len() + 1);
    for format in dedup_formats(&config.formats) {
        let content = match format {
            OutputFormat::Json => render_json(catalog.records)?,
            OutputFormat::Csv => render_csv(catalog.records)?,
        };
        files.push((config.file_name(format), content));
    }

    let artifacts: Vec<ArtifactMeta> = files
        .iter()
        .map(|(filename, content)| ArtifactMeta {
            filename: filename.clone(),
            sha256: sha256_hex(content.as_bytes()),
            size_bytes: content.len(),
        })
        .collect();

    let manifest = CatalogManifest {
        schema_version: MANIFEST_SCHEMA_VERSION,
        run_id: RunId::new(),
        tool_version: config.tool_version.clone(),
        generated_at: Utc::now(),
        files_per_term: catalog.files_per_term.clone(),
        record_count: catalog.records.len(),
        conflict_count: catalog.conflicts.len(),
        conflicts: catalog.conflicts.iter().map(ToString::to_string).collect(),
        artifacts,
    };
    let manifest_json = serde_json::to_string_pretty(&manifest)
        .map_err(|e| CatalogError::Export(format!("manifest serialization failed: {e}")))?;
    files.push((MANIFEST_FILE_NAME.to_string(), manifest_json));

    std::fs::create_dir_all(&config.output_dir)
        .map_err(|e| CatalogError::io(&config.output_dir, e))?;

    let staged = stage_files(&config.output_dir, &files)?;
    commit_staged(&staged)?;

    info!(
        run_id = %manifest.run_id,
        artifacts = manifest.artifacts.len(),
        "export complete"
    );

    Ok(ExportResult {
        output_dir: config.output_dir.clone(),
        manifest,
    })
}

/// Pretty-printed JSON array of records.
pub fn render_json(records: &[CourseRecord]) -> Result<String> {
    serde_json::to_string_pretty(records)
        .map_err(|e| CatalogError::Export(format!("JSON serialization failed: {e}")))
}

/// Header row plus one row per record.
pub fn render_csv(records: &[CourseRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| CatalogError::Export(format!("CSV serialization failed: {e}")))?;
    }
    // serialize() only emits the header alongside the first row
    if records.is_empty() {
        writer
            .write_record(CSV_HEADER)
            .map_err(|e| CatalogError::Export(format!("CSV serialization failed: {e}")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CatalogError::Export(format!("CSV flush failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| CatalogError::Export(format!("CSV is not UTF-8: {e}")))
}

const CSV_HEADER: [&str; 7] = [
    "academic_year",
    "term",
    "major",
    "grade_level",
    "course_code",
    "course_name_cn",
    "course_name_en",
];

/// Check that an output directory holds a readable manifest whose
/// artifacts exist and match their recorded checksums.
pub fn verify_output(output_dir: &Path) -> Result<CatalogManifest> {
    let manifest_path = output_dir.join(MANIFEST_FILE_NAME);
    if !manifest_path.exists() {
        return Err(CatalogError::validation(format!(
            "missing {MANIFEST_FILE_NAME}"
        )));
    }

    let content = std::fs::read_to_string(&manifest_path)
        .map_err(|e| CatalogError::io(&manifest_path, e))?;
    let manifest: CatalogManifest = serde_json::from_str(&content)
        .map_err(|e| CatalogError::validation(format!("invalid {MANIFEST_FILE_NAME}: {e}")))?;

    if manifest.schema_version != MANIFEST_SCHEMA_VERSION {
        return Err(CatalogError::validation(format!(
            "unsupported schema_version: {} (expected {})",
            manifest.schema_version, MANIFEST_SCHEMA_VERSION
        )));
    }

    for artifact in &manifest.artifacts {
        let path = output_dir.join(&artifact.filename);
        let bytes = std::fs::read(&path).map_err(|e| CatalogError::io(&path, e))?;
        if sha256_hex(&bytes) != artifact.sha256 {
            return Err(CatalogError::validation(format!(
                "{} does not match its recorded checksum",
                artifact.filename
            )));
        }
    }

    debug!(path = %output_dir.display(), "output verified");
    Ok(manifest)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn dedup_formats(formats: &[OutputFormat]) -> Vec<OutputFormat> {
    let mut seen = Vec::with_capacity(formats.len());
    for format in formats {
        if !seen.contains(format) {
            seen.push(*format);
        }
    }
    seen
}

/// A file written to its temp path, waiting to be renamed over `target`.
struct StagedFile {
    temp: PathBuf,
    target: PathBuf,
}

/// Write every file to a `.<name>.tmp` sibling. On failure, temp files
/// already written are removed.
fn stage_files(dir: &Path, files: &[(String, String)]) -> Result<Vec<StagedFile>> {
    let mut staged = Vec::with_capacity(files.len());
    for (filename, content) in files {
        let file = StagedFile {
            temp: dir.join(format!(".{filename}.tmp")),
            target: dir.join(filename),
        };
        if let Err(e) = std::fs::write(&file.temp, content) {
            let err = CatalogError::io(&file.temp, e);
            discard_staged(&staged);
            return Err(err);
        }
        debug!(file = %filename, size = content.len(), "staged artifact");
        staged.push(file);
    }
    Ok(staged)
}

fn commit_staged(staged: &[StagedFile]) -> Result<()> {
    for (i, file) in staged.iter().enumerate() {
        if let Err(e) = std::fs::rename(&file.temp, &file.target) {
            discard_staged(&staged[i..]);
            return Err(CatalogError::io(&file.target, e));
        }
    }
    Ok(())
}

fn discard_staged(staged: &[StagedFile]) {
    for file in staged {
        let _ = std::fs::remove_file(&file.temp);
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
