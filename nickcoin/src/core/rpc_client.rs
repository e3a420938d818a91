//! # RPC Client - alloy-backed Wallet Provider
//!
//! Implements the chain seams on top of an HTTP JSON-RPC endpoint:
//!
//! - **Contract bindings:** `sol!` interfaces for the NFT collection and the sale
//!   token, limited to the functions this client calls.
//! - **Two providers:** a plain one for reads, and one with the user's wallet
//!   attached for transactions. Both are type-erased to `DynProvider`.
//! - **Inclusion tracking:** polls the receipt and the head block on a fixed
//!   interval until the requested depth is reached. There is no timeout.

use alloy::{
    network::{ReceiptResponse, TransactionBuilder},
    primitives::{Address, TxHash, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    sol,
    transports::http::reqwest::Url,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use tracing::{debug, info, warn};

use crate::{
    config::Settings,
    core::chain::{ReadHandle, SignHandle, TxReceipt, WalletProvider},
    error::IcoError,
    wallet::WalletManager,
};

sol! {
    #[sol(rpc)]
    interface INftCollection {
        function balanceOf(address owner) external view returns (uint256);
        function tokenOfOwnerByIndex(address owner, uint256 index) external view returns (uint256);
    }

    #[sol(rpc)]
    interface IIcoToken {
        function tokenIdsClaimed(uint256 tokenId) external view returns (bool);
        function balanceOf(address owner) external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function mint(uint256 amount) external payable;
        function claim() external;
    }
}

/// Contract addresses shared by both handles.
#[derive(Debug, Clone, Copy)]
struct Contracts {
    nft: Address,
    token: Address,
}

/// Read-only handle over a provider without a wallet.
#[derive(Clone)]
pub struct RpcReader {
    provider: DynProvider,
    contracts: Contracts,
}

#[async_trait]
impl ReadHandle for RpcReader {
    async fn nft_balance_of(&self, owner: Address) -> Result<U256, IcoError> {
        INftCollection::new(self.contracts.nft, self.provider.clone())
            .balanceOf(owner)
            .call()
            .await
            .map_err(IcoError::provider)
    }

    async fn token_of_owner_by_index(&self, owner: Address, index: U256) -> Result<U256, IcoError> {
        INftCollection::new(self.contracts.nft, self.provider.clone())
            .tokenOfOwnerByIndex(owner, index)
            .call()
            .await
            .map_err(IcoError::provider)
    }

    async fn token_ids_claimed(&self, token_id: U256) -> Result<bool, IcoError> {
        IIcoToken::new(self.contracts.token, self.provider.clone())
            .tokenIdsClaimed(token_id)
            .call()
            .await
            .map_err(IcoError::provider)
    }

    async fn token_balance_of(&self, owner: Address) -> Result<U256, IcoError> {
        IIcoToken::new(self.contracts.token, self.provider.clone())
            .balanceOf(owner)
            .call()
            .await
            .map_err(IcoError::provider)
    }

    async fn total_supply(&self) -> Result<U256, IcoError> {
        IIcoToken::new(self.contracts.token, self.provider.clone())
            .totalSupply()
            .call()
            .await
            .map_err(IcoError::provider)
    }
}

/// Signing handle over a provider with the user's wallet attached.
#[derive(Clone)]
pub struct RpcSigner {
    provider: DynProvider,
    address: Address,
    contracts: Contracts,
    poll_interval: Duration,
}

impl RpcSigner {
    async fn send(&self, tx: TransactionRequest) -> Result<TxHash, IcoError> {
        let pending = self
            .provider
            .send_transaction(tx.with_from(self.address))
            .await
            .map_err(IcoError::transaction)?;
        Ok(*pending.tx_hash())
    }
}

#[async_trait]
impl SignHandle for RpcSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn submit_mint(&self, amount: U256, value: U256) -> Result<TxHash, IcoError> {
        let tx = IIcoToken::new(self.contracts.token, self.provider.clone())
            .mint(amount)
            .value(value)
            .into_transaction_request();
        self.send(tx).await
    }

    async fn submit_claim(&self) -> Result<TxHash, IcoError> {
        let tx = IIcoToken::new(self.contracts.token, self.provider.clone())
            .claim()
            .into_transaction_request();
        self.send(tx).await
    }

    async fn wait_for_inclusion(&self, tx: TxHash, confirmations: u64) -> Result<TxReceipt, IcoError> {
        let mut interval = tokio::time::interval(self.poll_interval);
        loop {
            interval.tick().await;

            let receipt = match self.provider.get_transaction_receipt(tx).await {
                Ok(Some(receipt)) => receipt,
                Ok(None) => {
                    debug!("⏳ {} not yet included", tx);
                    continue;
                }
                Err(e) => {
                    // Transient RPC hiccups do not abort the wait.
                    warn!("Receipt poll for {} failed: {}", tx, e);
                    continue;
                }
            };

            if !receipt.status() {
                return Err(IcoError::Transaction(format!("{} reverted", tx)));
            }
            let Some(included_at) = receipt.block_number() else {
                continue;
            };

            let head = match self.provider.get_block_number().await {
                Ok(head) => head,
                Err(e) => {
                    warn!("Block number poll failed: {}", e);
                    continue;
                }
            };
            let depth = head.saturating_sub(included_at) + 1;
            if depth >= confirmations {
                return Ok(TxReceipt {
                    hash: tx,
                    block_number: included_at,
                });
            }
            debug!("⏳ {} has {}/{} confirmations", tx, depth, confirmations);
        }
    }
}

/// The wallet provider backed by a local key and an HTTP endpoint.
pub struct RpcWalletProvider {
    reader: Arc<RpcReader>,
    signer: Arc<RpcSigner>,
}

impl RpcWalletProvider {
    pub fn new(settings: &Settings, wallet: &WalletManager) -> Result<Self> {
        let url: Url = settings
            .rpc_url
            .parse()
            .with_context(|| format!("Invalid rpc_url '{}'", settings.rpc_url))?;
        let contracts = Contracts {
            nft: settings.nft_contract,
            token: settings.token_contract,
        };

        let read_provider = ProviderBuilder::new().connect_http(url.clone()).erased();
        let sign_provider = ProviderBuilder::new()
            .wallet(wallet.ethereum_wallet())
            .connect_http(url)
            .erased();

        info!("🌐 RPC client initialized for {}", settings.rpc_url);
        info!("   📜 NFT contract:   {}", contracts.nft);
        info!("   📜 Token contract: {}", contracts.token);

        Ok(Self {
            reader: Arc::new(RpcReader {
                provider: read_provider,
                contracts,
            }),
            signer: Arc::new(RpcSigner {
                provider: sign_provider,
                address: wallet.address(),
                contracts,
                poll_interval: settings.receipt_poll_interval,
            }),
        })
    }
}

#[async_trait]
impl WalletProvider for RpcWalletProvider {
    async fn connect(&self) -> Result<Address, IcoError> {
        // A round-trip proves the endpoint is reachable before the session opens.
        self.reader
            .provider
            .get_chain_id()
            .await
            .map_err(IcoError::provider)?;
        Ok(self.signer.address)
    }

    async fn chain_id(&self) -> Result<u64, IcoError> {
        self.reader.provider.get_chain_id().await.map_err(IcoError::provider)
    }

    fn read_handle(&self) -> Arc<dyn ReadHandle> {
        self.reader.clone()
    }

    fn sign_handle(&self) -> Arc<dyn SignHandle> {
        self.signer.clone()
    }
}
