//! `datei stat`: print metadata for one resource.

use tokio_util::sync::CancellationToken;

use super::common::{format_mtime, kind_name};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the stat command.
pub struct StatArgs {
    pub target: String,
    pub json: bool,
}

/// Run the stat command.
pub fn run(args: StatArgs, runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("stat");

    let uri = runner.resolve(&args.target)?;
    let provider = runner.provider_for(&uri)?;
    let token = CancellationToken::new();
    let stat = runner.runtime().block_on(provider.stat(&uri, &token))?;

    if args.json {
        let json = serde_json::to_string_pretty(&stat)
            .map_err(|e| CliError::Runtime(format!("Failed to serialize output: {}", e)))?;
        println!("{}", json);
        return Ok(());
    }

    println!("Resource: {}", uri);
    println!("Kind:     {}", kind_name(stat.kind));
    println!("Size:     {} bytes", stat.size);
    println!("Modified: {}", format_mtime(stat.mtime));
    Ok(())
}
