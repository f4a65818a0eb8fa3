//! keel command line.

mod cli;
mod logging;

use clap::Parser;

fn main() -> eyre::Result<()> {
    let cli = cli::Cli::parse();
    logging::init_logging(&cli.logs)?;
    cli.run()
}
