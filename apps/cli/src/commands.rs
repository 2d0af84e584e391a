//! CLI command definitions, routing, and tracing setup.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use coursecat_artifacts::{CatalogExport, ExportConfig};
use coursecat_core::{ExtractResult, ProgressReporter, TermSource};
use coursecat_shared::{
    AppConfig, ExtractConfig, OutputFormat, init_config, load_config, load_config_from,
    validate_config,
};
use coursecat_timetable::CsvTableReader;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// coursecat: course catalog extraction from timetable exports.
#[derive(Parser)]
#[command(
    name = "coursecat",
    version,
    about = "Extract a de-duplicated course catalog from per-cohort timetable files.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.coursecat/coursecat.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Filename convention selector for `classify`.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum ConventionArg {
    /// `<major><YYYY>级...`, the first term's convention.
    Primary,
    /// `<prefix><YYYY><major>...`, the second term's convention.
    Template,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the pipeline over both terms and export the catalog.
    Extract {
        /// Directory of first-term timetables.
        #[arg(long)]
        first_term: Option<String>,

        /// Directory of second-term timetables.
        #[arg(long)]
        second_term: Option<String>,

        /// Output directory.
        #[arg(short, long)]
        out: Option<String>,

        /// Output formats (comma-separated): json, csv.
        #[arg(long, value_delimiter = ',')]
        format: Vec<String>,
    },

    /// Show how a file name is classified.
    Classify {
        /// Timetable file name (directories are ignored).
        filename: String,

        /// Which term's naming convention to apply.
        #[arg(long, default_value = "primary")]
        convention: ConventionArg,
    },

    /// Print every course occurrence found in one timetable file.
    Parse {
        /// Path to the timetable file.
        file: PathBuf,

        /// Emit JSON instead of tab-separated lines.
        #[arg(long)]
        json: bool,
    },

    /// Check an output directory against its manifest.
    Verify {
        /// Output directory written by `extract`.
        dir: PathBuf,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "coursecat=info",
        1 => "coursecat=debug",
        _ => "coursecat=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Extract {
            first_term,
            second_term,
            out,
            format,
        } => cmd_extract(
            config_path,
            first_term.as_deref(),
            second_term.as_deref(),
            out.as_deref(),
            &format,
        ),
        Command::Classify {
            filename,
            convention,
        } => cmd_classify(config_path, &filename, convention),
        Command::Parse { file, json } => cmd_parse(&file, json),
        Command::Verify { dir } => cmd_verify(&dir),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

/// Load the config file named by `--config`, or the default one.
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_extract(
    config_path: Option<&Path>,
    first_term: Option<&str>,
    second_term: Option<&str>,
    out: Option<&str>,
    formats: &[String],
) -> Result<()> {
    let mut config = resolve_config(config_path)?;

    if let Some(dir) = first_term {
        config.first_term.source_dir = dir.to_string();
    }
    if let Some(dir) = second_term {
        config.second_term.source_dir = dir.to_string();
    }
    if let Some(dir) = out {
        config.defaults.output_dir = dir.to_string();
    }
    if !formats.is_empty() {
        config.defaults.formats = formats
            .iter()
            .map(|f| f.parse::<OutputFormat>())
            .collect::<coursecat_shared::Result<Vec<_>>>()?;
    }
    validate_config(&config)?;

    let extract_config = ExtractConfig::from(&config);

    info!(
        first_term = %extract_config.first_term.source_dir,
        second_term = %extract_config.second_term.source_dir,
        output_dir = %extract_config.output_dir.display(),
        "extracting course catalog"
    );

    let reporter = CliProgress::new();
    let reader = CsvTableReader::default();
    let result = coursecat_core::run_extract(&extract_config, &reader, &reporter)?;

    let files_per_term = files_per_term(&extract_config, &result);
    let export_config = ExportConfig {
        output_dir: extract_config.output_dir.clone(),
        formats: extract_config.formats.clone(),
        file_stem: extract_config.output_stem.clone(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
    };
    let exported = coursecat_artifacts::export(
        &export_config,
        CatalogExport {
            records: &result.records,
            conflicts: &result.conflicts,
            files_per_term: &files_per_term,
        },
    )?;

    println!();
    println!("  Course catalog extracted!");
    for (label, count) in &files_per_term {
        println!("  Files ({label}): {count}");
    }
    println!("  Records:   {}", result.records.len());
    println!("  Conflicts: {}", result.conflicts.len());
    for conflict in &result.conflicts {
        println!("    - {conflict}");
    }
    println!("  Run:       {}", exported.manifest.run_id);
    println!("  Path:      {}", exported.output_dir.display());
    println!("  Time:      {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

/// Files processed per term label, listing both terms even when empty.
fn files_per_term(config: &ExtractConfig, result: &ExtractResult) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for term in [&config.first_term, &config.second_term] {
        counts.insert(term.label().to_string(), 0);
    }
    for file in &result.files {
        *counts.entry(file.label.to_string()).or_insert(0) += 1;
    }
    counts
}

fn cmd_classify(
    config_path: Option<&Path>,
    filename: &str,
    convention: ConventionArg,
) -> Result<()> {
    let config = resolve_config(config_path)?;
    let term = match convention {
        ConventionArg::Primary => &config.first_term,
        ConventionArg::Template => &config.second_term,
    };

    let source = TermSource::from_config(term)?;
    let name = Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| eyre!("'{filename}' has no file name component"))?;
    let class = source.classify(&name)?;

    println!("  File:        {name}");
    println!("  Term:        {}", source.label);
    println!("  Major:       {}", class.major);
    println!("  Entry year:  {}", class.entry_year);
    println!("  Grade level: {}", class.grade_level);
    Ok(())
}

fn cmd_parse(file: &Path, json: bool) -> Result<()> {
    let reader = CsvTableReader::default();
    let courses = coursecat_timetable::parse_file(&reader, file)?;

    info!(file = %file.display(), courses = courses.len(), "parsed timetable");

    if json {
        let values: Vec<serde_json::Value> = courses
            .iter()
            .map(|c| {
                serde_json::json!({
                    "course_code": c.code,
                    "course_name_cn": c.name_cn,
                    "course_name_en": c.name_en,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else {
        for course in &courses {
            println!("{}\t{}\t{}", course.code, course.name_cn, course.name_en);
        }
    }
    Ok(())
}

fn cmd_verify(dir: &Path) -> Result<()> {
    let manifest = coursecat_artifacts::verify_output(dir)?;
    println!("  Output verified: {}", dir.display());
    println!("  Run:       {}", manifest.run_id);
    println!("  Generated: {}", manifest.generated_at.to_rfc3339());
    println!("  Records:   {}", manifest.record_count);
    for artifact in &manifest.artifacts {
        println!("  - {} ({} bytes)", artifact.filename, artifact.size_bytes);
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn file_parsed(&self, file_name: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Parsing [{current}/{total}] {file_name}"));
    }

    fn done(&self, _result: &ExtractResult) {
        self.spinner.finish_and_clear();
    }
}
