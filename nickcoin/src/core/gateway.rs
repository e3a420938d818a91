//! # Network/Session Gateway
//!
//! Owns the [`WalletSession`] and is the only place that talks to the
//! [`WalletProvider`] directly. Every handle passes the network check first, so
//! no read or write can reach a contract on the wrong chain.

use alloy::primitives::Address;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    config::NetworkRequirement,
    core::chain::{ChainHandle, ReadHandle, SignHandle, WalletProvider},
    error::IcoError,
};

/// Connection state of the user's wallet. Lives until the process exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalletSession {
    pub connected: bool,
    pub address: Option<Address>,
}

pub struct Gateway {
    provider: Arc<dyn WalletProvider>,
    network: NetworkRequirement,
    session: Mutex<WalletSession>,
}

impl Gateway {
    pub fn new(provider: Arc<dyn WalletProvider>, network: NetworkRequirement) -> Self {
        Self {
            provider,
            network,
            session: Mutex::new(WalletSession::default()),
        }
    }

    pub fn session(&self) -> WalletSession {
        *self.session.lock()
    }

    /// Connects if needed, checks the chain id, and returns a read-only handle,
    /// with a signer attached when `needs_signer` is set.
    pub async fn acquire_handle(&self, needs_signer: bool) -> Result<ChainHandle, IcoError> {
        let address = self.ensure_connected().await?;
        Ok(ChainHandle {
            address,
            reader: self.provider.read_handle(),
            signer: needs_signer.then(|| self.provider.sign_handle()),
        })
    }

    /// Read-only handle plus the connected address, which every read is scoped to.
    pub async fn reader(&self) -> Result<(Arc<dyn ReadHandle>, Address), IcoError> {
        let handle = self.acquire_handle(false).await?;
        Ok((handle.reader, handle.address))
    }

    pub async fn signer(&self) -> Result<Arc<dyn SignHandle>, IcoError> {
        self.acquire_handle(true)
            .await?
            .signer
            .ok_or_else(|| IcoError::Provider("wallet offered no signer".into()))
    }

    async fn ensure_connected(&self) -> Result<Address, IcoError> {
        let address = match self.session().address {
            Some(address) => address,
            None => self.provider.connect().await?,
        };

        let chain_id = self.provider.chain_id().await?;
        if chain_id != self.network.chain_id {
            warn!(
                "Wallet is on chain {} but the sale requires {} ({}).",
                chain_id, self.network.chain_id, self.network.name
            );
            return Err(IcoError::WrongNetwork {
                expected: self.network.chain_id,
                actual: chain_id,
                network: self.network.name.clone(),
            });
        }

        let mut session = self.session.lock();
        if !session.connected {
            info!("🔗 Wallet connected: {}", address);
        }
        session.connected = true;
        session.address = Some(address);
        Ok(address)
    }
}
