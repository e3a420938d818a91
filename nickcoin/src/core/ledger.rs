//! # Balance/Supply Readers
//!
//! Direct pass-through queries against the token contract, plus the
//! [`Snapshot`] that groups every derived value the panel shows. A snapshot is
//! only produced when all reads succeed, so applying it can never mix values
//! from different refresh attempts.

use alloy::primitives::{Address, U256};

use crate::{
    core::{chain::ReadHandle, claims, gateway::Gateway},
    error::IcoError,
};

/// Everything the panel derives from chain state, read in one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub token_balance: U256,
    pub total_minted: U256,
    pub claimable_nfts: u64,
}

pub async fn token_balance_of(reader: &dyn ReadHandle, owner: Address) -> Result<U256, IcoError> {
    reader.token_balance_of(owner).await
}

pub async fn total_supply(reader: &dyn ReadHandle) -> Result<U256, IcoError> {
    reader.total_supply().await
}

/// Reads balance, supply and the claimable count for the connected address.
pub async fn read_snapshot(gateway: &Gateway, claim_scan_concurrency: usize) -> Result<Snapshot, IcoError> {
    let (reader, owner) = gateway.reader().await?;
    let token_balance = token_balance_of(reader.as_ref(), owner).await?;
    let total_minted = total_supply(reader.as_ref()).await?;
    let claimable_nfts = claims::claimable_nfts(reader.as_ref(), owner, claim_scan_concurrency).await?;
    Ok(Snapshot {
        token_balance,
        total_minted,
        claimable_nfts,
    })
}
