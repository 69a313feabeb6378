//! `datei watch`: print change events under a directory until Ctrl-C.

use chrono::Local;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the watch command.
pub struct WatchArgs {
    pub target: String,
    pub no_recursive: bool,
    pub excludes: Vec<String>,
}

/// Run the watch command.
///
/// CLI flags refine the `[watch]` section of the config: `--no-recursive`
/// overrides `watch.recursive`, and `--exclude` patterns are added to
/// `watch.excludes`.
pub fn run(args: WatchArgs, runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("watch");

    let uri = runner.resolve(&args.target)?;
    let provider = runner.provider_for(&uri)?;

    let mut options = runner.config().watch_options();
    if args.no_recursive {
        options.recursive = false;
    }
    options.excludes.extend(args.excludes);

    let shutdown = CancellationToken::new();
    let handler_token = shutdown.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .map_err(|e| CliError::Runtime(format!("Failed to set Ctrl-C handler: {}", e)))?;

    runner.runtime().block_on(async {
        // Subscribe before starting the watch so no early event is missed.
        let mut events = provider.subscribe();
        let mut handle = provider.watch(&uri, options)?;

        println!("Watching {} (press Ctrl-C to stop)", uri);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                received = events.recv() => match received {
                    Ok(event) => {
                        let time = Local::now().format("%H:%M:%S");
                        println!("{} {:<8} {}", time, event.kind, event.uri);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Fell behind the change stream; some events were dropped");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }

        handle.dispose();
        info!(root = %uri, "Watch stopped");
        Ok::<(), CliError>(())
    })
}
