//! # Claimable-Balance Calculator
//!
//! Counts the NFTs held by an address whose free token reward has not been
//! claimed yet. For each ownership index the NFT contract is asked for the
//! token id, then the token contract is asked whether that id was used.
//!
//! Every index is independent, so the per-index reads run with bounded
//! parallelism through `buffer_unordered`. The count does not depend on the
//! order in which lookups complete, and a concurrency of 1 degenerates to the
//! plain sequential scan.

use alloy::primitives::{Address, U256};
use futures_util::stream::{self, StreamExt, TryStreamExt};
use tracing::debug;

use crate::{core::chain::ReadHandle, error::IcoError};

/// Number of NFTs whose reward is still claimable. A count, not a token amount.
pub async fn claimable_nfts(
    reader: &dyn ReadHandle,
    owner: Address,
    concurrency: usize,
) -> Result<u64, IcoError> {
    let held = reader.nft_balance_of(owner).await?;
    if held.is_zero() {
        return Ok(0);
    }
    let held: u64 = held
        .try_into()
        .map_err(|_| IcoError::Provider(format!("NFT balance {} does not fit in u64", held)))?;

    let unclaimed = stream::iter(0..held)
        .map(|index| async move {
            let token_id = reader.token_of_owner_by_index(owner, U256::from(index)).await?;
            let claimed = reader.token_ids_claimed(token_id).await?;
            debug!("NFT #{} (index {}) claimed: {}", token_id, index, claimed);
            Ok::<bool, IcoError>(!claimed)
        })
        .buffer_unordered(concurrency.max(1))
        .try_fold(0u64, |count, unclaimed| async move {
            Ok(count + u64::from(unclaimed))
        })
        .await?;

    Ok(unclaimed)
}
