//! `sqlwire completions` command
//!
//! Prints a completion script for the given shell. Cable designators are
//! free text, so only subcommands, flags and `--format` values complete.
//!
//! ```bash
//! sqlwire completions bash > ~/.local/share/bash-completion/completions/sqlwire
//! sqlwire completions zsh > "${fpath[1]}/_sqlwire"
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use miette::Result;
use std::io;

use crate::cli::Cli;

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// bash, zsh, fish, elvish or powershell
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(args.shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
