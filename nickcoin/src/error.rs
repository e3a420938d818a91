//! # Error Taxonomy
//!
//! Every chain-facing operation returns an [`IcoError`]. Each error is terminal
//! for the user action that triggered it; nothing is retried automatically.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IcoError {
    /// The wallet is connected to a network other than the one the sale lives on.
    #[error("Change the network to {network} (expected chain id {expected}, wallet is on {actual})")]
    WrongNetwork {
        expected: u64,
        actual: u64,
        network: String,
    },

    /// Wallet connection refused, RPC endpoint unreachable, or a contract read failed.
    #[error("provider error: {0}")]
    Provider(String),

    /// Submission rejected or the transaction reverted on-chain.
    #[error("transaction failed: {0}")]
    Transaction(String),

    /// Mint requested with a non-positive amount or an unpayable total.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

impl IcoError {
    pub fn provider(e: impl std::fmt::Display) -> Self {
        Self::Provider(e.to_string())
    }

    pub fn transaction(e: impl std::fmt::Display) -> Self {
        Self::Transaction(e.to_string())
    }
}
