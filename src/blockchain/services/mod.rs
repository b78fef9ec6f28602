// src/blockchain/services/mod.rs

pub mod mirrornode;
pub mod normaliser;
pub mod resolver;
pub mod strategy;

pub use mirrornode::{get_mirrornode_service, HederaMirrorNodeClient, MirrorNodeService};
pub use strategy::{handle_transaction, TransactionOutcome, TxModeStrategy};
