//! # Wallet Manager
//!
//! Loads the user's private key from the file named in the configuration and
//! exposes it only as an `EthereumWallet` for the signing provider. It is the
//! single source of authority for all on-chain actions.
//!
//! Two key file formats are accepted:
//! - a hex string, with or without `0x`,
//! - a JSON array of 32 bytes.

use alloy::{
    network::EthereumWallet,
    primitives::{Address, B256},
    signers::local::PrivateKeySigner,
};
use anyhow::{anyhow, Context, Result};
use std::fs;

#[derive(Debug, Clone)]
pub struct WalletManager {
    signer: PrivateKeySigner,
}

impl WalletManager {
    /// Creates a new WalletManager by loading the key from `keystore_path`.
    pub fn from_path(keystore_path: &str) -> Result<Self> {
        if keystore_path.is_empty() {
            return Err(anyhow!("keystore_path is not set in config.toml"));
        }
        let key_data = fs::read_to_string(keystore_path)
            .with_context(|| format!("Failed to read key file at '{}'", keystore_path))?;

        let signer = Self::parse_key(&key_data)
            .with_context(|| format!("Failed to parse key file at '{}'", keystore_path))?;

        tracing::info!("✅ Wallet loaded successfully. Address: {}", signer.address());
        Ok(Self { signer })
    }

    fn parse_key(key_data: &str) -> Result<PrivateKeySigner> {
        let trimmed = key_data.trim();
        let bytes: B256 = if trimmed.starts_with('[') {
            let raw: Vec<u8> = serde_json::from_str(trimmed).context("Invalid JSON byte array")?;
            if raw.len() != 32 {
                return Err(anyhow!("Expected 32 key bytes, found {}", raw.len()));
            }
            B256::from_slice(&raw)
        } else {
            trimmed.parse().context("Invalid hex private key")?
        };
        PrivateKeySigner::from_bytes(&bytes).map_err(|e| anyhow!("Invalid secp256k1 key: {}", e))
    }

    /// Returns the address controlled by the loaded key.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Wallet handed to the signing provider. The key never leaves this module otherwise.
    pub fn ethereum_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}
