//! Named lookup of chain configurations.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{ChainConfig, ChainSpec, RegistryError, init_mainnet, init_testnet};

/// Maps network names to frozen configurations.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    configs: FxHashMap<String, Arc<ChainConfig>>,
}

impl ChainRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in networks.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for config in [init_mainnet(), init_testnet()] {
            registry
                .configs
                .insert(config.name().to_string(), config);
        }
        registry
    }

    /// Registers `config` under its own name.
    ///
    /// Fails if a configuration with that name is already present.
    pub fn register(&mut self, config: impl Into<Arc<ChainConfig>>) -> Result<(), RegistryError> {
        let config = config.into();
        let name = config.name().to_string();
        if self.configs.contains_key(&name) {
            return Err(RegistryError::DuplicateConfig(name));
        }
        debug!(%name, chain_id = config.chain_id(), "registered chain configuration");
        self.configs.insert(name, config);
        Ok(())
    }

    /// Returns the configuration registered under `name`.
    pub fn get(&self, name: &str) -> Result<Arc<ChainConfig>, RegistryError> {
        self.configs
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Returns true if a configuration is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.configs.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.configs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered configurations.
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChainConfigBuilder;
    use assert_matches::assert_matches;

    #[test]
    fn test_defaults() {
        let registry = ChainRegistry::with_defaults();
        assert_eq!(registry.names(), ["mainnet", "testnet"]);
        assert!(Arc::ptr_eq(&registry.get("mainnet").unwrap(), &init_mainnet()));
        assert_eq!(registry.get("testnet").unwrap().chain_id(), 62);
    }

    #[test]
    fn test_unknown_name() {
        let registry = ChainRegistry::new();
        assert!(registry.is_empty());
        assert_matches!(registry.get("morden"), Err(RegistryError::NotFound(name)) if name == "morden");
    }

    #[test]
    fn test_duplicate_name() {
        let mut registry = ChainRegistry::with_defaults();
        let shadow = ChainConfigBuilder::new().name("mainnet").chain_id(7).build().unwrap();
        assert_matches!(
            registry.register(shadow),
            Err(RegistryError::DuplicateConfig(name)) if name == "mainnet"
        );
        assert_eq!(registry.get("mainnet").unwrap().chain_id(), 61);

        let local = ChainConfigBuilder::new().name("local").build().unwrap();
        registry.register(local).unwrap();
        assert!(registry.contains("local"));
        assert_eq!(registry.len(), 3);
    }
}
