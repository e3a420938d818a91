//! # Chain Seams
//!
//! The client talks to three external collaborators: the wallet provider, the
//! NFT contract and the token contract. They are modelled as traits so the
//! engine never depends on a concrete RPC stack:
//!
//! - [`WalletProvider`]: connect-and-authorize, network identity, and the two
//!   kinds of handles.
//! - [`ReadHandle`]: read-only contract queries.
//! - [`SignHandle`]: state-changing transactions bound to the user's address.

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use std::sync::Arc;

use crate::error::IcoError;

/// Outcome of a transaction that reached the requested confirmation depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxReceipt {
    pub hash: TxHash,
    pub block_number: u64,
}

/// Read-only queries against the NFT and token contracts.
#[async_trait]
pub trait ReadHandle: Send + Sync {
    /// NFT contract `balanceOf(owner)`.
    async fn nft_balance_of(&self, owner: Address) -> Result<U256, IcoError>;
    /// NFT contract `tokenOfOwnerByIndex(owner, index)`.
    async fn token_of_owner_by_index(&self, owner: Address, index: U256) -> Result<U256, IcoError>;
    /// Token contract `tokenIdsClaimed(tokenId)`.
    async fn token_ids_claimed(&self, token_id: U256) -> Result<bool, IcoError>;
    /// Token contract `balanceOf(owner)`.
    async fn token_balance_of(&self, owner: Address) -> Result<U256, IcoError>;
    /// Token contract `totalSupply()`.
    async fn total_supply(&self) -> Result<U256, IcoError>;
}

/// Transaction-signing capability bound to the connected address.
#[async_trait]
pub trait SignHandle: Send + Sync {
    fn address(&self) -> Address;
    /// Submits `mint(amount)` carrying `value` wei. Returns once the wallet accepted it.
    async fn submit_mint(&self, amount: U256, value: U256) -> Result<TxHash, IcoError>;
    /// Submits `claim()`.
    async fn submit_claim(&self) -> Result<TxHash, IcoError>;
    /// Waits, without timeout, until `tx` is included with `confirmations` blocks on top.
    /// A reverted transaction is an [`IcoError::Transaction`].
    async fn wait_for_inclusion(&self, tx: TxHash, confirmations: u64) -> Result<TxReceipt, IcoError>;
}

/// The user's wallet and the network it is connected to.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Connects and authorizes; returns the user's address.
    async fn connect(&self) -> Result<Address, IcoError>;
    /// Chain id of the network the wallet is currently on.
    async fn chain_id(&self) -> Result<u64, IcoError>;
    fn read_handle(&self) -> Arc<dyn ReadHandle>;
    fn sign_handle(&self) -> Arc<dyn SignHandle>;
}

/// What [`crate::core::gateway::Gateway::acquire_handle`] hands out: a
/// read-only handle scoped to the connected address, plus a signer when one was
/// requested.
#[derive(Clone)]
pub struct ChainHandle {
    pub address: Address,
    pub reader: Arc<dyn ReadHandle>,
    pub signer: Option<Arc<dyn SignHandle>>,
}

impl std::fmt::Debug for ChainHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainHandle")
            .field("address", &self.address)
            .field("signer", &self.signer.is_some())
            .finish()
    }
}
