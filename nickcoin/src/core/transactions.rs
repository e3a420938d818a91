//! # Mint & Claim Transactions
//!
//! Both flows follow the same shape: acquire a signer, raise the loading flag,
//! submit, wait for inclusion. The flag is held by a [`LoadingGuard`], so a
//! rejected submission or a revert clears it just like a success does.
//! Refreshing derived state afterwards is the engine's job.

use alloy::primitives::U256;
use tracing::info;

use crate::{
    core::{chain::TxReceipt, gateway::Gateway},
    error::IcoError,
    state::{LoadingGuard, SharedState},
    units::{format_ether, Pricing},
};

/// Mints `amount` whole tokens, paying `amount * unit_price`.
pub async fn mint(
    gateway: &Gateway,
    state: &SharedState,
    pricing: &Pricing,
    amount: U256,
    confirmations: u64,
) -> Result<TxReceipt, IcoError> {
    // Priced before the signer is touched; a bad amount never reaches the wallet.
    let value = pricing.mint_payment(amount)?;
    let signer = gateway.signer().await?;

    let _loading = LoadingGuard::acquire(state);
    info!("🪙 Minting {} tokens for {} ETH from {}", amount, format_ether(value), signer.address());
    let hash = signer.submit_mint(amount, value).await?;
    info!("📤 Mint submitted: {}", hash);
    let receipt = signer.wait_for_inclusion(hash, confirmations).await?;
    info!("✅ Mint included in block {}", receipt.block_number);
    Ok(receipt)
}

/// Claims the rewards of every unclaimed NFT. Eligibility is decided on-chain.
pub async fn claim(
    gateway: &Gateway,
    state: &SharedState,
    confirmations: u64,
) -> Result<TxReceipt, IcoError> {
    let signer = gateway.signer().await?;

    let _loading = LoadingGuard::acquire(state);
    info!("🎁 Claiming NFT rewards for {}", signer.address());
    let hash = signer.submit_claim().await?;
    info!("📤 Claim submitted: {}", hash);
    let receipt = signer.wait_for_inclusion(hash, confirmations).await?;
    info!("✅ Claim included in block {}", receipt.block_number);
    Ok(receipt)
}
