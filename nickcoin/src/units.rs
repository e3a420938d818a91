//! Amount helpers: ether formatting, user input parsing and mint pricing.

use alloy::primitives::{
    utils::{format_units, parse_ether},
    U256,
};

use anyhow::Context;

use crate::error::IcoError;

/// Decimals of both the native currency and the sale token.
pub const TOKEN_DECIMALS: u8 = 18;

/// Fixed business constants of the sale, in their on-chain units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pricing {
    /// Price of one whole token, in wei.
    pub unit_price_wei: U256,
    /// Tokens awarded for each NFT whose reward has not been claimed yet.
    pub claim_reward_per_nft: u64,
    /// Displayed sale cap, in whole tokens.
    pub max_supply: u64,
}

impl Pricing {
    /// Parses a decimal ether price such as `"0.001"`.
    pub fn new(unit_price_ether: &str, claim_reward_per_nft: u64, max_supply: u64) -> anyhow::Result<Self> {
        let unit_price_wei = parse_ether(unit_price_ether)
            .with_context(|| format!("Invalid unit_price_ether '{}'", unit_price_ether))?;
        Ok(Self {
            unit_price_wei,
            claim_reward_per_nft,
            max_supply,
        })
    }

    /// Payment attached to `mint(amount)`: `amount * unit_price`, in wei.
    pub fn mint_payment(&self, amount: U256) -> Result<U256, IcoError> {
        if amount.is_zero() {
            return Err(IcoError::InvalidAmount("amount must be greater than zero".into()));
        }
        amount
            .checked_mul(self.unit_price_wei)
            .ok_or_else(|| IcoError::InvalidAmount(format!("payment for {} tokens overflows", amount)))
    }

    /// Whole tokens a user receives for `unclaimed_nfts` unclaimed NFTs.
    pub fn claim_reward(&self, unclaimed_nfts: u64) -> U256 {
        U256::from(unclaimed_nfts) * U256::from(self.claim_reward_per_nft)
    }
}

/// Parses the mint input field. Only positive base-10 integers are accepted.
pub fn parse_mint_amount(input: &str) -> Option<U256> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let amount = U256::from_str_radix(trimmed, 10).ok()?;
    (!amount.is_zero()).then_some(amount)
}

/// Formats an 18-decimal amount like ethers' `formatEther`: `1.5`, `0.0`, `100.0`.
pub fn format_ether(amount: U256) -> String {
    let raw = format_units(amount, TOKEN_DECIMALS).unwrap_or_else(|_| amount.to_string());
    match raw.split_once('.') {
        Some((whole, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                format!("{}.0", whole)
            } else {
                format!("{}.{}", whole, frac)
            }
        }
        None => format!("{}.0", raw),
    }
}

/// One whole token in smallest units.
pub fn whole_tokens(amount: u64) -> U256 {
    U256::from(amount) * U256::from(10u64).pow(U256::from(TOKEN_DECIMALS))
}
