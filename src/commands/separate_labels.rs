//! # Separate Labels Command Implementation
//!
//! This module implements the `separate-labels` subcommand, which splits the
//! `CustomLabels` aggregate retrieved from an org into one file per label for
//! version control.
//!
//! Labels without a `fullName` are skipped with a warning and do not fail the
//! command. Only an unreadable or malformed aggregate does.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use sf_aggregate::defaults;
use sf_aggregate::labels;

use super::explain;

/// Separate the label aggregate into one file per label
#[derive(Args, Debug)]
pub struct SeparateLabelsArgs {
    /// Path of the label aggregate to separate.
    #[arg(short, long, value_name = "FILE", default_value = defaults::LABELS_PATH)]
    pub file: PathBuf,

    /// Directory for the per-label files. Defaults to the aggregate's directory.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

/// Execute the `separate-labels` command.
pub fn execute(args: SeparateLabelsArgs) -> Result<()> {
    let output = args.output.unwrap_or_else(|| {
        args.file
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default()
    });

    let report = labels::split_labels(&args.file, &output).map_err(explain)?;

    println!(
        "Separated {} labels into {}",
        report.written.len(),
        output.display()
    );
    if !report.is_complete() {
        println!(
            "   Skipped: {}, failed: {} (see warnings above)",
            report.skipped, report.failed
        );
    }
    Ok(())
}
