//! # Core Chain Layer
//!
//! Everything that touches the chain lives here. The engine composes these
//! pieces into user actions.
//!
//! ## Sub-modules
//!
//! - **`chain`**: trait seams for the wallet provider and its read/sign handles.
//! - **`gateway`**: the Network/Session Gateway; connects, checks the network,
//!   hands out handles.
//! - **`claims`**: counts NFTs whose free reward is still claimable.
//! - **`ledger`**: token balance and total supply readers, and the combined
//!   refresh snapshot.
//! - **`transactions`**: mint and claim flows with a scoped loading flag.
//! - **`rpc_client`**: the alloy implementation of the seams over HTTP JSON-RPC.

pub mod chain;
pub mod claims;
pub mod gateway;
pub mod ledger;
pub mod rpc_client;
pub mod transactions;
