//! Display formatting for chain configurations.
//!
//! This module provides two ways to format a [`ChainSpec`]:
//!
//! - [`ChainSpecExt::log()`] - Extension trait for direct logging via tracing
//! - [`DisplayChainSpec`] - Wrapper for [`Display`] trait integration
//!
//! # Example
//!
//! ```ignore
//! use keel_chainspec::{init_mainnet, ChainSpecExt};
//!
//! let spec = init_mainnet();
//!
//! // Direct logging (preferred)
//! spec.log();
//!
//! // Display trait for string output
//! println!("{}", spec.display());
//! ```

use core::fmt::{self, Display, Formatter};

use keel_forks::DisplayForks;
use tracing::info;

use crate::ChainSpec;

/// Extension trait for ChainSpec that provides display and logging methods.
///
/// This trait is automatically implemented for all types that implement [`ChainSpec`].
pub trait ChainSpecExt: ChainSpec {
    /// Log the configuration using tracing.
    ///
    /// Each configuration line gets its own `info!()` call so log prefixes
    /// appear correctly.
    fn log(&self) {
        info!("Chain configuration:");
        info!("  Network: {} (chain ID: {})", self.name(), self.chain_id());

        let forks = DisplayForks::new(self.schedule()).to_string();
        for line in forks.lines() {
            info!("  {line}");
        }

        info!("  Bad blocks: {}", self.bad_hashes().len());
        for bad in self.bad_hashes().iter() {
            info!("    {:>10} {:#}", bad.block, bad.hash);
        }
    }

    /// Create a wrapper for [`Display`] trait integration.
    fn display(&self) -> DisplayChainSpec<'_, Self>
    where
        Self: Sized,
    {
        DisplayChainSpec::new(self)
    }
}

/// Blanket implementation for all ChainSpec types.
impl<S: ChainSpec> ChainSpecExt for S {}

/// Pretty-print wrapper for a chain configuration.
///
/// Prefer using [`ChainSpecExt::log()`] for tracing output, as it formats
/// each line with proper log prefixes.
///
/// # Output Format
///
/// ```text
/// Chain configuration:
///   Network: mainnet (chain ID: 61)
///   Forks (block based):
///   - Homestead                        @1150000
///       homestead                    @1150000
///   - ETF                              @1920000 (checkpoint 0x9436…de7f)
///   ...
///   Bad blocks: 1
///         116522 0x05be…b689
/// ```
pub struct DisplayChainSpec<'a, S: ChainSpec> {
    spec: &'a S,
}

impl<'a, S: ChainSpec> DisplayChainSpec<'a, S> {
    /// Create a new display wrapper for the given spec.
    pub fn new(spec: &'a S) -> Self {
        Self { spec }
    }
}

impl<S: ChainSpec> Display for DisplayChainSpec<'_, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Chain configuration:")?;
        writeln!(
            f,
            "  Network: {} (chain ID: {})",
            self.spec.name(),
            self.spec.chain_id()
        )?;

        let forks = DisplayForks::new(self.spec.schedule()).to_string();
        for line in forks.lines() {
            writeln!(f, "  {line}")?;
        }

        writeln!(f, "  Bad blocks: {}", self.spec.bad_hashes().len())?;
        for bad in self.spec.bad_hashes().iter() {
            writeln!(f, "    {:>10} {:#}", bad.block, bad.hash)?;
        }

        Ok(())
    }
}
