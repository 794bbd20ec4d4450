//! # Completions Command Implementation
//!
//! This module implements the `completions` subcommand, which prints a shell
//! completion script for every `sf-aggregate` subcommand and flag.
//!
//! ## Example
//!
//! ```bash
//! sf-aggregate completions bash > ~/.local/share/bash-completion/completions/sf-aggregate
//! sf-aggregate completions zsh > ~/.zfunc/_sf-aggregate
//! ```

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io;

use crate::cli::Cli;

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Execute the `completions` command.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "sf-aggregate", &mut io::stdout());
    Ok(())
}
