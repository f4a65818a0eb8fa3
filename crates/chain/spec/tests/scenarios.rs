//! End-to-end rule lookups against the built-in networks and JSON configurations.

use std::{collections::BTreeMap, sync::Arc, thread};

use alloy_primitives::B256;
use assert_matches::assert_matches;
use keel_chainspec::{
    ChainConfig, ChainConfigBuilder, ChainConfigFileError, ChainRegistry, ChainSpec, ConfigError,
    DifficultyAlgorithm, ForkError, GasOperation, InvalidChain, RegistryError, init_mainnet,
    init_testnet, mainnet, testnet,
};

#[test]
fn homestead_activates_at_its_block() {
    let spec = init_mainnet();
    let rules = spec.rules_at(mainnet::HOMESTEAD_BLOCK);

    assert!(rules.is_feature_active("homestead"));
    assert_eq!(rules.current_fork(), Some("Homestead"));
    assert_eq!(rules.gas_cost(GasOperation::SLoad), Some(50));
    assert_eq!(rules.difficulty(), DifficultyAlgorithm::Homestead);
}

#[test]
fn frontier_rules_before_homestead() {
    let spec = init_mainnet();
    let rules = spec.rules_at(mainnet::HOMESTEAD_BLOCK - 1);

    assert!(!rules.is_feature_active("homestead"));
    assert_eq!(rules.current_fork(), None);
    assert_eq!(rules.gas_cost(GasOperation::SLoad), Some(50));
    assert_eq!(rules.gas_cost(GasOperation::Calls), Some(40));
    assert_eq!(rules.difficulty(), DifficultyAlgorithm::Frontier);
    assert!(spec.active_forks(0).is_empty());
}

#[test]
fn diehard_enables_replay_protection() {
    let spec = init_testnet();

    let rules = spec.rules_at(testnet::DIEHARD_BLOCK);
    assert!(rules.is_feature_active("eip155"));
    assert!(rules.is_replay_protected());
    assert_eq!(rules.difficulty(), DifficultyAlgorithm::Diehard);
    assert_eq!(rules.gas_cost(GasOperation::ExpByte), Some(50));
    assert_eq!(spec.signing_chain_id(testnet::DIEHARD_BLOCK), Some(62));

    let before = spec.rules_at(testnet::DIEHARD_BLOCK - 1);
    assert!(!before.is_replay_protected());
    assert_eq!(before.gas_cost(GasOperation::ExpByte), Some(10));
    assert_eq!(spec.signing_chain_id(testnet::DIEHARD_BLOCK - 1), None);
}

#[test]
fn known_bad_block_is_rejected() {
    let spec = init_mainnet();
    let (block, hash) = mainnet::BAD_BLOCK_116522;

    assert_eq!(spec.check_block(block, &hash), Err(InvalidChain { block, hash }));
    assert_eq!(spec.check_block(block, &B256::repeat_byte(0x11)), Ok(()));
    assert_eq!(spec.check_block(block + 1, &hash), Ok(()));
}

#[test]
fn gas_reprice_overrides_homestead_table() {
    let spec = init_mainnet();

    let rules = spec.rules_at(mainnet::GAS_REPRICE_BLOCK);
    assert_eq!(rules.gas_cost(GasOperation::SLoad), Some(200));
    assert_eq!(rules.gas_cost(GasOperation::Calls), Some(700));
    assert_eq!(rules.difficulty(), DifficultyAlgorithm::Homestead);
    assert_eq!(rules.current_fork(), Some("GasReprice"));
}

#[test]
fn difficulty_bomb_resumes_after_delay() {
    let spec = init_mainnet();
    let explosion = mainnet::DIEHARD_BLOCK + 2_000_000;

    assert_eq!(spec.rules_at(explosion - 1).difficulty(), DifficultyAlgorithm::Diehard);
    assert_eq!(
        spec.rules_at(explosion).difficulty(),
        DifficultyAlgorithm::Explosion { delay: 2_000_000 }
    );
    assert!(!spec.rules_at(explosion - 1).is_feature_active("explosionDefault"));
    assert_eq!(spec.rules_at(explosion).current_fork(), Some("Diehard"));
}

#[test]
fn etf_checkpoint_is_verified() {
    let spec = init_mainnet();

    let canonical = BTreeMap::from([(mainnet::ETF_BLOCK, mainnet::ETF_HASH)]);
    let rules = spec.rules_at_verified(mainnet::ETF_BLOCK, &canonical).unwrap();
    assert_eq!(rules.current_fork(), Some("ETF"));

    let forked = B256::repeat_byte(0x4d);
    let canonical = BTreeMap::from([(mainnet::ETF_BLOCK, forked)]);
    assert_matches!(
        spec.rules_at_verified(mainnet::ETF_BLOCK, &canonical),
        Err(ForkError::ChainMismatch { fork, block: mainnet::ETF_BLOCK, expected, observed })
            if fork == "ETF" && expected == mainnet::ETF_HASH && observed == forked
    );

    // Not yet active, so not checked.
    assert!(spec.rules_at_verified(mainnet::ETF_BLOCK - 1, &canonical).is_ok());

    // Unknown hashes are not checked.
    let empty = BTreeMap::new();
    assert!(spec.rules_at_verified(mainnet::DIEHARD_BLOCK, &empty).is_ok());
}

#[test]
fn json_round_trip() {
    let spec = init_mainnet();
    let json = spec.to_json().unwrap();
    let parsed = ChainConfig::from_json(&json).unwrap();
    assert_eq!(parsed, *spec);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("testnet.json");
    init_testnet().to_file(&path).unwrap();
    let loaded = ChainConfig::from_file(&path).unwrap();
    assert_eq!(loaded, *init_testnet());
    assert_eq!(
        loaded.rules_at(testnet::DIEHARD_BLOCK).gas_cost(GasOperation::ExpByte),
        Some(50)
    );
}

#[test]
fn json_accepts_inline_and_encoded_options() {
    let json = r#"{
        "name": "local",
        "chainId": 4242,
        "forks": [
            {
                "name": "Homestead",
                "block": 10,
                "features": [
                    {
                        "id": "homestead",
                        "options": {
                            "gastable": { "sload": 60 },
                            "difficulty": "{\"name\": \"homestead\", \"options\": {}}"
                        }
                    }
                ]
            },
            {
                "name": "Diehard",
                "block": 20,
                "features": [
                    { "id": "eip155" },
                    {
                        "id": "explosion",
                        "block": 30,
                        "options": {
                            "difficulty": { "name": "explosion", "options": { "delay": 5 } }
                        }
                    }
                ]
            }
        ]
    }"#;

    let config = ChainConfig::from_json(json).unwrap();
    assert_eq!(config.name(), "local");
    assert!(config.is_dev());
    assert_eq!(config.rules_at(10).gas_cost(GasOperation::SLoad), Some(60));
    assert_eq!(config.rules_at(10).difficulty(), DifficultyAlgorithm::Homestead);
    assert_eq!(config.signing_chain_id(20), Some(4242));
    assert_eq!(
        config.rules_at(30).difficulty(),
        DifficultyAlgorithm::Explosion { delay: 5 }
    );
    assert!(config.bad_hashes().is_empty());
}

#[test]
fn json_rejects_invalid_schedules() {
    let unknown_option = r#"{
        "chainId": 1,
        "forks": [{ "name": "A", "block": 1, "features": [{ "id": "a", "options": { "chainID": "61" } }] }]
    }"#;
    assert_matches!(
        ChainConfig::from_json(unknown_option),
        Err(ChainConfigFileError::Config(ConfigError::UnknownOption { .. }))
    );

    let unordered = r#"{
        "chainId": 1,
        "forks": [{ "name": "B", "block": 2 }, { "name": "A", "block": 1 }]
    }"#;
    assert_matches!(
        ChainConfig::from_json(unordered),
        Err(ChainConfigFileError::Config(ConfigError::UnorderedForks { .. }))
    );

    assert_matches!(
        ChainConfig::from_json("{\"forks\": []}"),
        Err(ChainConfigFileError::Json(_))
    );
}

#[test]
fn json_rejects_unknown_fields() {
    let misspelled_checkpoint = r#"{
        "chainId": 1,
        "forks": [{
            "name": "ETF",
            "block": 10,
            "required_hash": "0x94365e3a8c0b35089c1d1195081fe7489b528a84b22199c916180db8b28ade7f"
        }]
    }"#;
    assert_matches!(
        ChainConfig::from_json(misspelled_checkpoint),
        Err(ChainConfigFileError::Json(err)) if err.to_string().contains("required_hash")
    );

    let misspelled_feature_block = r#"{
        "chainId": 1,
        "forks": [{
            "name": "Diehard",
            "block": 10,
            "features": [{
                "id": "explosion",
                "Block": 1000,
                "options": { "difficulty": { "name": "explosion", "options": { "delay": 5 } } }
            }]
        }]
    }"#;
    assert_matches!(
        ChainConfig::from_json(misspelled_feature_block),
        Err(ChainConfigFileError::Json(err)) if err.to_string().contains("Block")
    );

    let misspelled_top_level = r#"{ "chainId": 1, "badHash": [] }"#;
    assert_matches!(
        ChainConfig::from_json(misspelled_top_level),
        Err(ChainConfigFileError::Json(err)) if err.to_string().contains("badHash")
    );

    let misspelled_bad_hash = r#"{
        "chainId": 1,
        "badHashes": [{
            "block": 5,
            "hash": "0x05bef30ef572270f654746da22639a7a0c97dd97a7050b9e252391996aaeb689",
            "height": 5
        }]
    }"#;
    assert_matches!(
        ChainConfig::from_json(misspelled_bad_hash),
        Err(ChainConfigFileError::Json(_))
    );
}

#[test]
fn json_rejects_duplicate_keys() {
    let duplicate_operation = r#"{
        "chainId": 1,
        "forks": [{
            "name": "Homestead",
            "block": 10,
            "features": [{ "id": "homestead", "options": { "gastable": { "sload": 50, "sload": 200 } } }]
        }]
    }"#;
    assert_matches!(
        ChainConfig::from_json(duplicate_operation),
        Err(ChainConfigFileError::Config(ConfigError::MalformedOption { key: "gastable", .. }))
    );

    let duplicate_option = r#"{
        "chainId": 1,
        "forks": [{
            "name": "Homestead",
            "block": 10,
            "features": [{
                "id": "homestead",
                "options": {
                    "difficulty": { "name": "homestead", "options": {} },
                    "difficulty": { "name": "diehard", "options": {} }
                }
            }]
        }]
    }"#;
    assert_matches!(
        ChainConfig::from_json(duplicate_option),
        Err(ChainConfigFileError::Json(err)) if err.to_string().contains("duplicate")
    );
}

#[test]
fn registry_lookup() {
    let mut registry = ChainRegistry::with_defaults();
    assert_eq!(registry.get("mainnet").unwrap().chain_id(), mainnet::CHAIN_ID);
    assert_matches!(registry.get("kotti"), Err(RegistryError::NotFound(_)));

    let kotti = ChainConfigBuilder::new().name("kotti").chain_id(6).build().unwrap();
    registry.register(kotti).unwrap();
    assert_eq!(registry.names(), ["kotti", "mainnet", "testnet"]);
}

#[test]
fn concurrent_readers_agree() {
    let spec: Arc<ChainConfig> = Arc::new(ChainConfigBuilder::mainnet().build().unwrap());
    let blocks = [0, 1_150_000, 1_920_000, 2_500_000, 3_000_000, 5_000_000];

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let spec = Arc::clone(&spec);
            thread::spawn(move || {
                blocks
                    .iter()
                    .map(|block| spec.rules_at(*block))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        let results = handle.join().unwrap();
        for (block, rules) in blocks.iter().zip(results) {
            assert_eq!(*rules, spec.resolve_uncached(*block));
            assert!(Arc::ptr_eq(&rules, &spec.rules_at(*block)));
        }
    }
}
