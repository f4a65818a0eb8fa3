//! Logging setup for the keel binary.

use eyre::Result;
use tracing_subscriber::EnvFilter;

use crate::cli::LogArgs;

/// Initialize logging based on command line arguments.
///
/// The filter is built with the following precedence:
/// 1. If `--quiet` is set, only errors are shown
/// 2. Otherwise, start with `RUST_LOG` env var if set, or a level derived from `-v`
/// 3. Apply any custom filter from `--log.filter`
///
/// Logs go to stderr so command output on stdout stays machine readable.
pub(crate) fn init_logging(args: &LogArgs) -> Result<()> {
    let filter = if args.quiet {
        EnvFilter::new("error")
    } else {
        let base_level = match args.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        let mut filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(base_level));

        if let Some(custom_filter) = &args.filter {
            for directive in custom_filter.split(',') {
                filter = filter.add_directive(directive.parse()?);
            }
        }

        filter
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if args.json {
        builder
            .json()
            .try_init()
            .map_err(|e| eyre::eyre!(e))?;
    } else {
        builder
            .without_time()
            .try_init()
            .map_err(|e| eyre::eyre!(e))?;
    }

    Ok(())
}
