//! # Parameter normaliser
//!
//! One function per operation, each turning a raw parameter record into its
//! normalised counterpart: defaults resolved, identifiers canonical, every
//! quantity in base units.
//!
//! Transfer lists are double-entry: one credit per recipient followed by a
//! single debit of the source equal to minus the sum of the credits.

use ethers_core::types::U256;

use crate::blockchain::models::Hbar;
use crate::blockchain::units::DisplayAmount;
use crate::error::ToolError;

pub mod account;
pub mod consensus;
pub mod evm;
pub mod queries;
pub mod token;

pub use account::*;
pub use consensus::*;
pub use evm::*;
pub use queries::*;
pub use token::*;

/// Converts a display amount to base units that fit the ledger's `int64`.
pub(crate) fn to_base_i64(amount: &DisplayAmount, decimals: u8) -> Result<i64, ToolError> {
    if amount.is_negative() {
        return Err(ToolError::InvalidAmount(format!("Invalid amount: {}", amount)));
    }
    let base = amount.to_base_unit(decimals)?;
    u256_to_i64(base, amount.as_str())
}

pub(crate) fn u256_to_i64(value: U256, original: &str) -> Result<i64, ToolError> {
    if value > U256::from(i64::MAX as u64) {
        return Err(ToolError::InvalidAmount(format!(
            "Amount {} exceeds the ledger's maximum",
            original
        )));
    }
    Ok(value.as_u64() as i64)
}

/// Converts an HBAR display amount to tinybars.
pub(crate) fn to_hbar(amount: &DisplayAmount) -> Result<Hbar, ToolError> {
    to_base_i64(amount, Hbar::DECIMALS).map(Hbar::from_tinybars)
}

pub(crate) fn sum_overflow() -> ToolError {
    ToolError::InvalidAmount("Total transfer amount exceeds the ledger's maximum".to_string())
}
