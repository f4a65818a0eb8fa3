//! Constants used throughout the built-in chain configurations
//!
//! Block heights, chain identifiers and hashes here are consensus-critical:
//! every node on a network must agree on them exactly.

/// Number of blocks the ECIP-1010 difficulty bomb is paused for.
pub const DEFAULT_BOMB_DELAY_LENGTH: u64 = 2_000_000;

/// Name of the network selected when none is given.
pub const DEFAULT_CHAIN_NAME: &str = mainnet::NAME;

/// Name of the test network.
pub const DEFAULT_TEST_CHAIN_NAME: &str = testnet::NAME;

/// Ethereum Classic mainnet constants
pub mod mainnet {
    use alloy_primitives::{B256, b256};

    /// Network name
    pub const NAME: &str = "mainnet";

    /// EIP-155 chain identifier
    pub const CHAIN_ID: u64 = 61;

    /// Homestead activation block
    pub const HOMESTEAD_BLOCK: u64 = 1_150_000;

    /// Block of the DAO hard fork on the Ethereum chain; Classic requires the
    /// non-forking block here.
    pub const ETF_BLOCK: u64 = 1_920_000;

    /// Required canonical hash at [`ETF_BLOCK`].
    pub const ETF_HASH: B256 =
        b256!("0x94365e3a8c0b35089c1d1195081fe7489b528a84b22199c916180db8b28ade7f");

    /// EIP-150 gas reprice activation block
    pub const GAS_REPRICE_BLOCK: u64 = 2_500_000;

    /// Diehard (EIP-155, EIP-160, ECIP-1010) activation block
    pub const DIEHARD_BLOCK: u64 = 3_000_000;

    /// Block 116,522 of the Frontier consensus issue of 2015-08-20.
    pub const BAD_BLOCK_116522: (u64, B256) = (
        116_522,
        b256!("0x05bef30ef572270f654746da22639a7a0c97dd97a7050b9e252391996aaeb689"),
    );
}

/// Ethereum Classic testnet (Morden) constants
pub mod testnet {
    use alloy_primitives::{B256, b256};

    /// Network name
    pub const NAME: &str = "testnet";

    /// EIP-155 chain identifier
    pub const CHAIN_ID: u64 = 62;

    /// Homestead activation block
    pub const HOMESTEAD_BLOCK: u64 = 494_000;

    /// EIP-150 gas reprice activation block
    pub const GAS_REPRICE_BLOCK: u64 = 1_783_000;

    /// ETF activation block
    pub const ETF_BLOCK: u64 = 1_885_000;

    /// Diehard activation block
    pub const DIEHARD_BLOCK: u64 = 1_915_000;

    /// Consensus issue at block 383,792.
    pub const BAD_BLOCK_383792: (u64, B256) = (
        383_792,
        b256!("0x9690db54968a760704d99b8118bf79d565711669cefad24b51b5b1013d827808"),
    );

    /// First block of the chain followed by non-Diehard nodes.
    pub const BAD_BLOCK_1915277: (u64, B256) = (
        1_915_277,
        b256!("0x3bef9997340acebc85b84948d849ceeff74384ddf512a20676d424e972a3c3c4"),
    );
}

/// Default values for development networks
pub mod dev {
    /// Default network name for development
    pub const NAME: &str = "dev";

    /// Default chain identifier for development
    pub const CHAIN_ID: u64 = 1337;
}
