//! # Central Configuration Module
//!
//! Defines the configuration of the ICO client. `config.toml` is deserialized
//! with `serde` into a [`Config`]; every field has a default so the client
//! still starts with a partial or missing file.
//!
//! The raw file only holds strings and numbers. [`Config::validate`] turns it
//! into [`Settings`], with parsed contract addresses and wei-denominated pricing,
//! which is what the rest of the application consumes.

use alloy::primitives::Address;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path, time::Duration};
use tracing::warn;

use crate::units::Pricing;

/// Business constants of the sale, loaded from the `[sale]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct SaleConfig {
    #[serde(default = "default_token_name")]
    pub token_name: String,
    #[serde(default = "default_unit_price_ether")]
    pub unit_price_ether: String,
    #[serde(default = "default_claim_reward_per_nft")]
    pub claim_reward_per_nft: u64,
    #[serde(default = "default_max_supply")]
    pub max_supply: u64,
}

impl Default for SaleConfig {
    fn default() -> Self {
        Self {
            token_name: default_token_name(),
            unit_price_ether: default_unit_price_ether(),
            claim_reward_per_nft: default_claim_reward_per_nft(),
            max_supply: default_max_supply(),
        }
    }
}

/// The main configuration structure for the application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // -- Wallet --
    #[serde(default)]
    pub keystore_path: String,

    // -- Network --
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    #[serde(default = "default_network_name")]
    pub network_name: String,

    // -- Contracts --
    #[serde(default)]
    pub nft_contract_address: String,
    #[serde(default)]
    pub token_contract_address: String,

    // -- Client behaviour --
    #[serde(default = "default_claim_scan_concurrency")]
    pub claim_scan_concurrency: usize,
    #[serde(default = "default_confirmations")]
    pub confirmations: u64,
    #[serde(default = "default_receipt_poll_interval_ms")]
    pub receipt_poll_interval_ms: u64,

    #[serde(default)]
    pub sale: SaleConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keystore_path: String::new(),
            rpc_url: default_rpc_url(),
            chain_id: default_chain_id(),
            network_name: default_network_name(),
            nft_contract_address: String::new(),
            token_contract_address: String::new(),
            claim_scan_concurrency: default_claim_scan_concurrency(),
            confirmations: default_confirmations(),
            receipt_poll_interval_ms: default_receipt_poll_interval_ms(),
            sale: SaleConfig::default(),
        }
    }
}

/// The network the sale contracts are deployed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkRequirement {
    pub chain_id: u64,
    pub name: String,
}

/// Validated, typed view of [`Config`].
#[derive(Debug, Clone)]
pub struct Settings {
    pub keystore_path: String,
    pub rpc_url: String,
    pub network: NetworkRequirement,
    pub nft_contract: Address,
    pub token_contract: Address,
    pub token_name: String,
    pub pricing: Pricing,
    pub claim_scan_concurrency: usize,
    pub confirmations: u64,
    pub receipt_poll_interval: Duration,
}

impl Config {
    /// Loads configuration from `config.toml` in the working directory.
    pub fn load() -> Self {
        Self::load_from("config.toml")
    }

    /// Loads configuration from `path`.
    /// If the file doesn't exist or fails to parse, it returns a default configuration.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Failed to parse {}: {}. Using default values.", path.display(), e);
                    Config::default()
                }
            },
            Err(_) => {
                warn!("{} not found. Using default values.", path.display());
                Config::default()
            }
        }
    }

    /// Checks every field and produces the typed [`Settings`].
    pub fn validate(&self) -> Result<Settings> {
        let nft_contract: Address = self
            .nft_contract_address
            .parse()
            .with_context(|| format!("Invalid nft_contract_address '{}'", self.nft_contract_address))?;
        let token_contract: Address = self
            .token_contract_address
            .parse()
            .with_context(|| format!("Invalid token_contract_address '{}'", self.token_contract_address))?;

        let pricing = Pricing::new(
            &self.sale.unit_price_ether,
            self.sale.claim_reward_per_nft,
            self.sale.max_supply,
        )
        .context("Invalid [sale] table")?;

        if self.confirmations == 0 {
            anyhow::bail!("confirmations must be at least 1");
        }

        Ok(Settings {
            keystore_path: self.keystore_path.clone(),
            rpc_url: self.rpc_url.clone(),
            network: NetworkRequirement {
                chain_id: self.chain_id,
                name: self.network_name.clone(),
            },
            nft_contract,
            token_contract,
            token_name: self.sale.token_name.clone(),
            pricing,
            claim_scan_concurrency: self.claim_scan_concurrency.max(1),
            confirmations: self.confirmations,
            receipt_poll_interval: Duration::from_millis(self.receipt_poll_interval_ms.max(100)),
        })
    }
}

// --- Default value functions for serde ---

fn default_rpc_url() -> String { "http://127.0.0.1:8545".to_string() }
fn default_chain_id() -> u64 { 4 }
fn default_network_name() -> String { "Rinkeby".to_string() }
fn default_claim_scan_concurrency() -> usize { 4 }
fn default_confirmations() -> u64 { 1 }
fn default_receipt_poll_interval_ms() -> u64 { 2_000 }

// Sale defaults
fn default_token_name() -> String { "NickCoin".to_string() }
fn default_unit_price_ether() -> String { "0.001".to_string() }
fn default_claim_reward_per_nft() -> u64 { 50 }
fn default_max_supply() -> u64 { 10_000 }

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;

    const NFT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
    const TOKEN: &str = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512";

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config: Config = toml::from_str(&format!(
            "nft_contract_address = \"{NFT}\"\ntoken_contract_address = \"{TOKEN}\"\n"
        ))
        .unwrap();

        assert_eq!(config.chain_id, 4);
        assert_eq!(config.network_name, "Rinkeby");
        assert_eq!(config.sale.claim_reward_per_nft, 50);

        let settings = config.validate().unwrap();
        assert_eq!(settings.pricing.unit_price_wei, U256::from(1_000_000_000_000_000u64));
        assert_eq!(settings.pricing.max_supply, 10_000);
        assert_eq!(settings.confirmations, 1);
    }

    #[test]
    fn sale_table_overrides_constants() {
        let config: Config = toml::from_str(&format!(
            r#"
            nft_contract_address = "{NFT}"
            token_contract_address = "{TOKEN}"
            chain_id = 11155111
            network_name = "Sepolia"
            claim_scan_concurrency = 0

            [sale]
            unit_price_ether = "0.01"
            claim_reward_per_nft = 10
            "#
        ))
        .unwrap();

        let settings = config.validate().unwrap();
        assert_eq!(settings.network.chain_id, 11_155_111);
        assert_eq!(settings.pricing.unit_price_wei, U256::from(10_000_000_000_000_000u64));
        assert_eq!(settings.pricing.claim_reward_per_nft, 10);
        assert_eq!(settings.claim_scan_concurrency, 1);
    }

    #[test]
    fn missing_contract_address_fails_validation() {
        let err = Config::default().validate().unwrap_err();
        assert!(err.to_string().contains("nft_contract_address"));
    }

    #[test]
    fn malformed_unit_price_names_the_field() {
        let config: Config = toml::from_str(&format!(
            "nft_contract_address = \"{NFT}\"\ntoken_contract_address = \"{TOKEN}\"\n[sale]\nunit_price_ether = \"free\"\n"
        ))
        .unwrap();

        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid [sale] table");
        assert!(format!("{err:#}").contains("Invalid unit_price_ether 'free'"), "{err:#}");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path().join("nope.toml"));
        assert_eq!(config.rpc_url, "http://127.0.0.1:8545");
    }
}
