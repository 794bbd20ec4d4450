//! CLI argument parsing and command dispatch

use std::io::Write;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{Level, LevelFilter};

use crate::commands;

/// sf-aggregate - Combine and separate Salesforce labels and workflows
#[derive(Parser, Debug)]
#[command(name = "sf-aggregate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "info",
        value_parser = ["error", "warn", "info", "debug", "trace"]
    )]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Combine per-label files into the label aggregate for deployment
    CombineLabels(commands::combine_labels::CombineLabelsArgs),

    /// Separate the label aggregate into one file per label
    SeparateLabels(commands::separate_labels::SeparateLabelsArgs),

    /// Combine per-component workflow files into one aggregate per workflow
    CombineWorkflows(commands::combine_workflows::CombineWorkflowsArgs),

    /// Separate workflow aggregates into one file per component
    SeparateWorkflows(commands::separate_workflows::SeparateWorkflowsArgs),

    /// Combine the labels and workflows a deploy manifest lists, and fix the manifest
    Prepare(commands::prepare::PrepareArgs),

    /// Replace workflow child types in a deploy manifest with their parent workflows
    RewriteManifest(commands::rewrite_manifest::RewriteManifestArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(self.log_level.parse().unwrap_or(LevelFilter::Info));

        match self.command {
            Commands::CombineLabels(args) => commands::combine_labels::execute(args),
            Commands::SeparateLabels(args) => commands::separate_labels::execute(args),
            Commands::CombineWorkflows(args) => commands::combine_workflows::execute(args),
            Commands::SeparateWorkflows(args) => commands::separate_workflows::execute(args),
            Commands::Prepare(args) => commands::prepare::execute(args),
            Commands::RewriteManifest(args) => commands::rewrite_manifest::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Install the logger for this run.
///
/// `RUST_LOG`, when set, refines the level chosen with `--log-level`.
fn init_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| match record.level() {
            Level::Error => writeln!(buf, "error: {}", record.args()),
            Level::Warn => writeln!(buf, "warning: {}", record.args()),
            _ => writeln!(buf, "{}", record.args()),
        })
        .init();
}
