//! In-memory chain used by the integration tests. It behaves like the sale
//! contracts: `mint` credits `amount * 10^18` to the caller and the supply,
//! `claim` pays the reward for every unclaimed NFT and marks it claimed.

#![allow(dead_code)]

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use nickcoin_ico::{
    config::{Config, Settings},
    core::chain::{ReadHandle, SignHandle, TxReceipt, WalletProvider},
    error::IcoError,
    state::{SharedState, View},
    units::whole_tokens,
};
use parking_lot::Mutex;
use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

pub const USER: Address = Address::new([0x11; 20]);
pub const NFT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
pub const TOKEN: &str = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512";

#[derive(Debug, Default)]
pub struct Ledger {
    pub owned_nfts: Vec<U256>,
    pub claimed: HashSet<U256>,
    pub balance: U256,
    pub total_supply: U256,
    pub block: u64,
    pub submitted_mints: Vec<(U256, U256)>,
    pub submitted_claims: usize,
}

#[derive(Debug, Default)]
pub struct MockChain {
    pub chain_id: Mutex<u64>,
    pub refuse_connection: Mutex<bool>,
    pub revert_next_tx: Mutex<bool>,
    pub fail_reads: Mutex<bool>,
    pub ledger: Mutex<Ledger>,
    pub connects: AtomicUsize,
    pub per_token_queries: AtomicUsize,
    /// Panel state to sample while a transaction waits for inclusion.
    pub observed_state: Mutex<Option<SharedState>>,
    /// `(loading, view)` seen at each `wait_for_inclusion`.
    pub seen_while_waiting: Mutex<Vec<(bool, View)>>,
}

impl MockChain {
    pub fn new(chain_id: u64) -> Arc<Self> {
        let chain = Self::default();
        *chain.chain_id.lock() = chain_id;
        Arc::new(chain)
    }

    /// Gives the user the NFTs `ids`, with `claimed[i]` telling whether `ids[i]` was used.
    pub fn with_nfts(self: Arc<Self>, ids: &[u64], claimed: &[bool]) -> Arc<Self> {
        {
            let mut ledger = self.ledger.lock();
            for (id, used) in ids.iter().zip(claimed) {
                ledger.owned_nfts.push(U256::from(*id));
                if *used {
                    ledger.claimed.insert(U256::from(*id));
                }
            }
        }
        self
    }

    pub fn observe(&self, state: &SharedState) {
        *self.observed_state.lock() = Some(state.clone());
    }

    fn check_reads(&self) -> Result<(), IcoError> {
        if *self.fail_reads.lock() {
            return Err(IcoError::Provider("rpc unavailable".into()));
        }
        Ok(())
    }

    fn next_hash(ledger: &mut Ledger) -> TxHash {
        ledger.block += 1;
        TxHash::with_last_byte(ledger.block as u8)
    }
}

pub fn settings(chain_id: u64) -> Settings {
    let config: Config = toml::from_str(&format!(
        "nft_contract_address = \"{NFT}\"\ntoken_contract_address = \"{TOKEN}\"\nchain_id = {chain_id}\nreceipt_poll_interval_ms = 100\n"
    ))
    .expect("test config parses");
    config.validate().expect("test config is valid")
}

#[async_trait]
impl ReadHandle for MockChain {
    async fn nft_balance_of(&self, owner: Address) -> Result<U256, IcoError> {
        self.check_reads()?;
        assert_eq!(owner, USER);
        Ok(U256::from(self.ledger.lock().owned_nfts.len()))
    }

    async fn token_of_owner_by_index(&self, owner: Address, index: U256) -> Result<U256, IcoError> {
        self.check_reads()?;
        assert_eq!(owner, USER);
        self.per_token_queries.fetch_add(1, Ordering::SeqCst);
        let index: usize = index.to::<usize>();
        self.ledger
            .lock()
            .owned_nfts
            .get(index)
            .copied()
            .ok_or_else(|| IcoError::Provider("owner index out of bounds".into()))
    }

    async fn token_ids_claimed(&self, token_id: U256) -> Result<bool, IcoError> {
        self.check_reads()?;
        self.per_token_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.ledger.lock().claimed.contains(&token_id))
    }

    async fn token_balance_of(&self, owner: Address) -> Result<U256, IcoError> {
        self.check_reads()?;
        assert_eq!(owner, USER);
        Ok(self.ledger.lock().balance)
    }

    async fn total_supply(&self) -> Result<U256, IcoError> {
        self.check_reads()?;
        Ok(self.ledger.lock().total_supply)
    }
}

#[async_trait]
impl SignHandle for MockChain {
    fn address(&self) -> Address {
        USER
    }

    async fn submit_mint(&self, amount: U256, value: U256) -> Result<TxHash, IcoError> {
        let mut ledger = self.ledger.lock();
        ledger.submitted_mints.push((amount, value));
        if *self.revert_next_tx.lock() {
            return Ok(Self::next_hash(&mut ledger));
        }
        let minted = amount * whole_tokens(1);
        ledger.balance += minted;
        ledger.total_supply += minted;
        Ok(Self::next_hash(&mut ledger))
    }

    async fn submit_claim(&self) -> Result<TxHash, IcoError> {
        let mut ledger = self.ledger.lock();
        ledger.submitted_claims += 1;
        if *self.revert_next_tx.lock() {
            return Ok(Self::next_hash(&mut ledger));
        }
        let unclaimed: Vec<U256> = ledger
            .owned_nfts
            .iter()
            .filter(|id| !ledger.claimed.contains(*id))
            .copied()
            .collect();
        let reward = whole_tokens(50) * U256::from(unclaimed.len());
        ledger.claimed.extend(unclaimed);
        ledger.balance += reward;
        ledger.total_supply += reward;
        Ok(Self::next_hash(&mut ledger))
    }

    async fn wait_for_inclusion(&self, tx: TxHash, _confirmations: u64) -> Result<TxReceipt, IcoError> {
        if let Some(state) = self.observed_state.lock().as_ref() {
            let state = state.read();
            self.seen_while_waiting.lock().push((state.loading, state.view()));
        }
        let block_number = self.ledger.lock().block;
        let mut revert = self.revert_next_tx.lock();
        if *revert {
            *revert = false;
            return Err(IcoError::Transaction(format!("{} reverted", tx)));
        }
        Ok(TxReceipt { hash: tx, block_number })
    }
}

/// Wallet provider handing out the mock itself as both handles.
pub struct MockWallet(pub Arc<MockChain>);

#[async_trait]
impl WalletProvider for MockWallet {
    async fn connect(&self) -> Result<Address, IcoError> {
        self.0.connects.fetch_add(1, Ordering::SeqCst);
        if *self.0.refuse_connection.lock() {
            return Err(IcoError::Provider("user rejected the connection".into()));
        }
        Ok(USER)
    }

    async fn chain_id(&self) -> Result<u64, IcoError> {
        Ok(*self.0.chain_id.lock())
    }

    fn read_handle(&self) -> Arc<dyn ReadHandle> {
        self.0.clone()
    }

    fn sign_handle(&self) -> Arc<dyn SignHandle> {
        self.0.clone()
    }
}
