//! keel CLI entry point.

use std::{path::PathBuf, sync::Arc};

use alloy_primitives::B256;
use clap::{Args, Parser, Subcommand};
use eyre::{Result, WrapErr};
use keel_chainspec::{
    ChainConfig, ChainRegistry, ChainSpec, ChainSpecExt, DEFAULT_CHAIN_NAME, DisplayForks,
    OptionKey, RuleOption,
};
use tracing::{debug, info};

/// keel - fork schedule and rule inspection for Ethereum Classic style networks
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Logging configuration (applies to all subcommands).
    #[command(flatten)]
    pub(crate) logs: LogArgs,

    /// Network selection.
    #[command(flatten)]
    pub(crate) network: NetworkArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub(crate) command: Commands,
}

/// Logging configuration.
#[derive(Debug, Args, Clone, Default)]
#[command(next_help_heading = "Logging")]
pub(crate) struct LogArgs {
    /// Silence all output.
    #[arg(short, long, global = true)]
    pub(crate) quiet: bool,

    /// Verbose mode (-v, -vv, -vvv, etc.).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub(crate) verbosity: u8,

    /// Log filter directive (e.g., "keel_forks=trace").
    #[arg(long = "log.filter", value_name = "DIRECTIVE", global = true)]
    pub(crate) filter: Option<String>,

    /// Use JSON format for log output.
    #[arg(long = "log.json", global = true)]
    pub(crate) json: bool,
}

/// Network selection.
#[derive(Debug, Args, Clone)]
#[command(next_help_heading = "Network")]
pub(crate) struct NetworkArgs {
    /// Built-in network to use (mainnet, testnet).
    #[arg(long, default_value = DEFAULT_CHAIN_NAME, conflicts_with = "config", global = true)]
    pub(crate) chain: String,

    /// Path to a custom chain configuration file (JSON).
    ///
    /// Cannot be used with --chain.
    #[arg(long, value_name = "PATH", global = true)]
    pub(crate) config: Option<PathBuf>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Print the fork schedule.
    Forks,

    /// Print the rules in effect at a block.
    Rules {
        /// Block height.
        #[arg(long)]
        block: u64,
    },

    /// Check a block against the known-invalid blocks of the network.
    CheckBlock {
        /// Block height.
        #[arg(long)]
        block: u64,

        /// Block hash (0x-prefixed hex).
        #[arg(long)]
        hash: B256,
    },
}

impl Cli {
    /// Execute the selected command.
    pub(crate) fn run(self) -> Result<()> {
        let spec = self.network.resolve()?;
        debug!(network = spec.name(), chain_id = spec.chain_id(), "loaded chain configuration");

        match self.command {
            Commands::Forks => {
                spec.log();
                print!("{}", DisplayForks::new(spec.schedule()));
            }
            Commands::Rules { block } => print_rules(&spec, block),
            Commands::CheckBlock { block, hash } => {
                spec.check_block(block, &hash)?;
                info!(block, %hash, "block accepted");
                println!("ok: block {block} {hash} is not known to be invalid");
            }
        }
        Ok(())
    }
}

impl NetworkArgs {
    /// Loads the selected chain configuration.
    fn resolve(&self) -> Result<Arc<ChainConfig>> {
        if let Some(path) = &self.config {
            let config = ChainConfig::from_file(path).wrap_err_with(|| {
                format!("failed to load chain configuration: {}", path.display())
            })?;
            return Ok(Arc::new(config));
        }
        Ok(ChainRegistry::with_defaults().get(&self.chain)?)
    }
}

fn print_rules(spec: &ChainConfig, block: u64) {
    let rules = spec.rules_at(block);

    println!("Rules at block {block}:");
    println!("  Fork: {}", rules.current_fork().unwrap_or("Frontier"));
    match spec.signing_chain_id(block) {
        Some(chain_id) => println!("  Replay protection: chain ID {chain_id}"),
        None => println!("  Replay protection: none"),
    }

    println!("  Features:");
    for (id, since) in rules.features() {
        println!("    {id:28} @{since}");
    }

    let difficulty_source = match rules.option(OptionKey::Difficulty) {
        Some(RuleOption::Difficulty(_)) => "",
        _ => " (default)",
    };
    println!("  Difficulty: {}{difficulty_source}", rules.difficulty());

    let gas_source = match rules.option(OptionKey::GasTable) {
        Some(RuleOption::GasTable(_)) => "",
        _ => " (default)",
    };
    println!("  Gas table{gas_source}:");
    for (op, cost) in rules.gas_table().iter() {
        println!("    {:16} {cost}", op.to_string());
    }
}
