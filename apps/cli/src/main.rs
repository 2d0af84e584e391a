//! coursecat CLI: build a course catalog from exported timetable files.
//!
//! Reads the timetables of two terms, infers major and grade level from
//! each file name, and writes the merged, de-duplicated course list.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
