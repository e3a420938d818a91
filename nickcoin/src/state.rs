//! # Application State Management
//!
//! The single state store shared by the engine (writer) and the control panel
//! (reader). Chain-derived fields are only ever written together through
//! [`AppState::apply_snapshot`].

use alloy::primitives::{Address, U256};
use parking_lot::RwLock;
use serde::Serialize;
use std::{collections::VecDeque, sync::Arc};

use crate::{core::ledger::Snapshot, units::Pricing};

/// How many notices the panel keeps around.
const MAX_NOTICES: usize = 5;

pub type SharedState = Arc<RwLock<AppState>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A user-visible alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// The one of three mutually exclusive action views the panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum View {
    /// A transaction is in flight.
    Loading,
    /// At least one NFT reward can be claimed.
    ClaimAvailable,
    /// Nothing to claim; offer minting.
    MintForm,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub wallet_connected: bool,
    pub address: Option<Address>,
    pub loading: bool,
    /// NFTs whose reward has not been claimed.
    pub claimable_nfts: u64,
    /// Smallest units (18 decimals).
    pub token_balance: U256,
    /// Smallest units (18 decimals).
    pub total_minted: U256,
    /// Bumped by the engine after every mint or claim it runs. An action event
    /// carries the epoch the panel saw, so a queued duplicate is dropped.
    pub action_epoch: u64,
    pub notices: VecDeque<Notice>,
}

impl AppState {
    pub fn shared() -> SharedState {
        Arc::new(RwLock::new(Self::default()))
    }

    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.token_balance = snapshot.token_balance;
        self.total_minted = snapshot.total_minted;
        self.claimable_nfts = snapshot.claimable_nfts;
    }

    /// Current chain-derived values, as last applied.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            token_balance: self.token_balance,
            total_minted: self.total_minted,
            claimable_nfts: self.claimable_nfts,
        }
    }

    pub fn view(&self) -> View {
        select_view(self.loading, self.claimable_nfts)
    }

    /// True unless a transaction is in flight or the panel already sent an
    /// action for the current epoch.
    pub fn action_ready(&self, awaiting_epoch: Option<u64>) -> bool {
        !self.loading && awaiting_epoch != Some(self.action_epoch)
    }

    /// `amount` is the panel's parsed input; `None` unless a positive integer.
    pub fn can_mint(&self, amount: Option<U256>, awaiting_epoch: Option<u64>) -> bool {
        self.action_ready(awaiting_epoch) && amount.is_some_and(|amount| !amount.is_zero())
    }

    pub fn push_notice(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push_back(Notice {
            level,
            message: message.into(),
        });
        while self.notices.len() > MAX_NOTICES {
            self.notices.pop_front();
        }
    }

    pub fn dismiss_notices(&mut self) {
        self.notices.clear();
    }
}

/// Pure mapping from flags to the view.
pub fn select_view(loading: bool, claimable_nfts: u64) -> View {
    if loading {
        View::Loading
    } else if claimable_nfts > 0 {
        View::ClaimAvailable
    } else {
        View::MintForm
    }
}

/// "100 Tokens Can Be Claimed!"
pub fn claim_message(claimable_nfts: u64, pricing: &Pricing) -> String {
    format!("{} Tokens Can Be Claimed!", pricing.claim_reward(claimable_nfts))
}

/// Clears `loading` when dropped, whichever way the transaction flow exits.
pub struct LoadingGuard {
    state: SharedState,
}

impl LoadingGuard {
    pub fn acquire(state: &SharedState) -> Self {
        state.write().loading = true;
        Self { state: state.clone() }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.state.write().loading = false;
    }
}
