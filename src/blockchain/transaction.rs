// src/blockchain/transaction.rs

//! In-memory ledger transaction.
//!
//! A transaction carries one typed body plus the envelope fields the ledger
//! stamps on every transaction. Once frozen its content can no longer change
//! and it can be serialised for external signing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::models::{AccountId, TransactionId};
use crate::params::{
    account::{
        CreateAccountParametersNormalised, DeleteAccountParametersNormalised,
        TransferHbarParametersNormalised, UpdateAccountParametersNormalised,
    },
    consensus::{CreateTopicParametersNormalised, SubmitTopicMessageParametersNormalised},
    evm::ContractExecuteParametersNormalised,
    token::{
        AirdropFungibleTokenParametersNormalised, CreateTokenParametersNormalised,
        MintTokenParametersNormalised,
    },
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("transaction is immutable; it has been frozen")]
    Frozen,
    #[error("transaction must be frozen before it can be serialised")]
    NotFrozen,
    #[error("transaction id must be set before freezing")]
    MissingTransactionId,
    #[error("failed to serialise transaction: {0}")]
    Serialization(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "data")]
pub enum TransactionBody {
    AccountCreate(CreateAccountParametersNormalised),
    AccountUpdate(UpdateAccountParametersNormalised),
    AccountDelete(DeleteAccountParametersNormalised),
    CryptoTransfer(TransferHbarParametersNormalised),
    TokenCreate(CreateTokenParametersNormalised),
    TokenMint(MintTokenParametersNormalised),
    TokenAirdrop(AirdropFungibleTokenParametersNormalised),
    TopicCreate(CreateTopicParametersNormalised),
    TopicMessageSubmit(SubmitTopicMessageParametersNormalised),
    ContractExecute(ContractExecuteParametersNormalised),
}

impl TransactionBody {
    pub fn kind(&self) -> &'static str {
        match self {
            TransactionBody::AccountCreate(_) => "AccountCreate",
            TransactionBody::AccountUpdate(_) => "AccountUpdate",
            TransactionBody::AccountDelete(_) => "AccountDelete",
            TransactionBody::CryptoTransfer(_) => "CryptoTransfer",
            TransactionBody::TokenCreate(_) => "TokenCreate",
            TransactionBody::TokenMint(_) => "TokenMint",
            TransactionBody::TokenAirdrop(_) => "TokenAirdrop",
            TransactionBody::TopicCreate(_) => "TopicCreate",
            TransactionBody::TopicMessageSubmit(_) => "TopicMessageSubmit",
            TransactionBody::ContractExecute(_) => "ContractExecute",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    body: TransactionBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transaction_id: Option<TransactionId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    node_account_ids: Vec<AccountId>,
    #[serde(skip)]
    frozen: bool,
}

impl Transaction {
    pub fn new(body: TransactionBody) -> Self {
        Self {
            body,
            memo: None,
            transaction_id: None,
            node_account_ids: Vec::new(),
            frozen: false,
        }
    }

    pub fn body(&self) -> &TransactionBody {
        &self.body
    }

    pub fn memo(&self) -> Option<&str> {
        self.memo.as_deref()
    }

    pub fn transaction_id(&self) -> Option<TransactionId> {
        self.transaction_id
    }

    pub fn node_account_ids(&self) -> &[AccountId] {
        &self.node_account_ids
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn ensure_mutable(&self) -> Result<(), TransactionError> {
        if self.frozen {
            return Err(TransactionError::Frozen);
        }
        Ok(())
    }

    pub fn set_transaction_memo(&mut self, memo: impl Into<String>) -> Result<&mut Self, TransactionError> {
        self.ensure_mutable()?;
        self.memo = Some(memo.into());
        Ok(self)
    }

    pub fn set_transaction_id(&mut self, id: TransactionId) -> Result<&mut Self, TransactionError> {
        self.ensure_mutable()?;
        self.transaction_id = Some(id);
        Ok(self)
    }

    pub fn set_node_account_ids(&mut self, ids: Vec<AccountId>) -> Result<&mut Self, TransactionError> {
        self.ensure_mutable()?;
        self.node_account_ids = ids;
        Ok(self)
    }

    /// Makes the transaction immutable. Freezing twice is a no-op.
    pub fn freeze(&mut self) -> Result<&mut Self, TransactionError> {
        if self.transaction_id.is_none() {
            return Err(TransactionError::MissingTransactionId);
        }
        self.frozen = true;
        Ok(self)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        if !self.frozen {
            return Err(TransactionError::NotFrozen);
        }
        serde_json::to_vec(self).map_err(|e| TransactionError::Serialization(e.to_string()))
    }

    /// Reads back bytes produced by [`Transaction::to_bytes`]. The result is frozen.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut tx: Transaction =
            serde_json::from_slice(bytes).map_err(|e| TransactionError::Serialization(e.to_string()))?;
        tx.freeze()?;
        Ok(tx)
    }
}
