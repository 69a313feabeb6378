//! `datei ls`: list a directory with per-entry metadata.

use tokio_util::sync::CancellationToken;

use super::common::{format_mtime, kind_marker};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the ls command.
pub struct LsArgs {
    pub target: String,
    pub json: bool,
}

/// Run the ls command.
///
/// Entries are printed in the order the platform listed them.
pub fn run(args: LsArgs, runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("ls");

    let uri = runner.resolve(&args.target)?;
    let provider = runner.provider_for(&uri)?;
    let token = CancellationToken::new();
    let entries = runner
        .runtime()
        .block_on(provider.read_directory(&uri, &token))?;

    if args.json {
        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| CliError::Runtime(format!("Failed to serialize output: {}", e)))?;
        println!("{}", json);
        return Ok(());
    }

    let width = entries
        .iter()
        .map(|e| e.stat.size.to_string().len())
        .max()
        .unwrap_or(1);

    for entry in &entries {
        println!(
            "{} {:>width$} {} {}",
            kind_marker(entry.stat.kind),
            entry.stat.size,
            format_mtime(entry.stat.mtime),
            entry.name,
            width = width
        );
    }
    Ok(())
}
