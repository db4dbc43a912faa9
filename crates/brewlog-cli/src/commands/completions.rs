use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::{Cli, CompletionShell};
use crate::error::CliError;

const BIN_NAME: &str = "brewlog";

impl From<CompletionShell> for Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Self::Bash,
            CompletionShell::Zsh => Self::Zsh,
            CompletionShell::Fish => Self::Fish,
        }
    }
}

/// Write the completion script for `shell` to `output_path`, or stdout.
pub fn run_completions(shell: CompletionShell, output_path: Option<&Path>) -> Result<(), CliError> {
    let mut command = Cli::command();
    let shell = Shell::from(shell);

    match output_path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            generate(shell, &mut command, BIN_NAME, &mut writer);
            writer.flush()?;
            println!("Wrote {shell} completions to {}", path.display());
        }
        None => generate(shell, &mut command, BIN_NAME, &mut io::stdout().lock()),
    }
    Ok(())
}
