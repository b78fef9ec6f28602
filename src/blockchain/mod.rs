// src/blockchain/mod.rs

pub mod abi;
pub mod builder;
pub mod client;
pub mod models;
pub mod services;
pub mod transaction;
pub mod units;

// Re-export commonly used types
pub use client::{LedgerClient, RelayLedgerClient};
pub use ethers_core::types::{Address, Bytes, U256};
pub use transaction::Transaction;
