// src/error.rs

use thiserror::Error;

use crate::blockchain::client::LedgerError;
use crate::blockchain::models::{KeyError, ParseIdError};
use crate::blockchain::services::mirrornode::MirrorNodeError;
use crate::blockchain::transaction::TransactionError;
use crate::blockchain::units::UnitError;

/// Every way a tool call can fail. Turned into a plain message at the tool boundary.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    InvalidAmount(String),
    #[error("Could not resolve account: {0}")]
    UnresolvableAccount(String),
    #[error("{0}")]
    InsufficientContext(String),
    #[error("Context account ID is required to return transaction bytes")]
    MissingAccountContext,
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Mirror(#[from] MirrorNodeError),
    #[error(transparent)]
    Transaction(#[from] TransactionError),
    #[error("ABI encoding failed: {0}")]
    Abi(String),
}

impl ToolError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ToolError::Validation(msg.into())
    }
}

impl From<UnitError> for ToolError {
    fn from(err: UnitError) -> Self {
        match err {
            UnitError::InvalidAmount(_) | UnitError::Overflow(_) => ToolError::InvalidAmount(err.to_string()),
            UnitError::DecimalsOutOfRange(_) => ToolError::Validation(err.to_string()),
        }
    }
}

impl From<ParseIdError> for ToolError {
    fn from(err: ParseIdError) -> Self {
        ToolError::Validation(err.to_string())
    }
}

impl From<KeyError> for ToolError {
    fn from(err: KeyError) -> Self {
        ToolError::Validation(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ToolError {
    fn from(err: validator::ValidationErrors) -> Self {
        ToolError::Validation(format!("Invalid parameters: {}", err))
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        ToolError::Validation(format!("Invalid parameters: {}", err))
    }
}
