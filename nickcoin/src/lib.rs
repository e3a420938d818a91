//! # NickCoin ICO Client
//!
//! Desktop client for an ICO whose token and NFT contracts already live
//! on-chain. It connects a wallet, shows how many tokens can be claimed for
//! free thanks to NFT ownership, mints tokens against ether, and tracks global
//! mint progress.

pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod state;
pub mod ui;
pub mod units;
pub mod wallet;
