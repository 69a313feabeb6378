//! `datei cat`: write a file's bytes to stdout.

use std::io::{self, Write};

use tokio_util::sync::CancellationToken;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the cat command.
pub fn run(target: &str, runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("cat");

    let uri = runner.resolve(target)?;
    let provider = runner.provider_for(&uri)?;
    let token = CancellationToken::new();
    let content = runner.runtime().block_on(provider.read_file(&uri, &token))?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(&content)?;
    stdout.flush()?;
    Ok(())
}
