// src/blockchain/builder.rs

//! Normalised parameter records to unsigned [`Transaction`]s.

use super::transaction::{Transaction, TransactionBody, TransactionError};
use crate::params::account::{
    CreateAccountParametersNormalised, DeleteAccountParametersNormalised,
    TransferHbarParametersNormalised, UpdateAccountParametersNormalised,
};
use crate::params::consensus::{CreateTopicParametersNormalised, SubmitTopicMessageParametersNormalised};
use crate::params::evm::ContractExecuteParametersNormalised;
use crate::params::token::{
    AirdropFungibleTokenParametersNormalised, CreateTokenParametersNormalised, MintTokenParametersNormalised,
};

pub struct TransactionBuilder;

impl TransactionBuilder {
    fn with_memo(body: TransactionBody, memo: Option<String>) -> Result<Transaction, TransactionError> {
        let mut tx = Transaction::new(body);
        if let Some(memo) = memo.filter(|m| !m.is_empty()) {
            tx.set_transaction_memo(memo)?;
        }
        Ok(tx)
    }

    pub fn create_account(params: CreateAccountParametersNormalised) -> Transaction {
        Transaction::new(TransactionBody::AccountCreate(params))
    }

    pub fn update_account(params: UpdateAccountParametersNormalised) -> Transaction {
        Transaction::new(TransactionBody::AccountUpdate(params))
    }

    pub fn delete_account(params: DeleteAccountParametersNormalised) -> Transaction {
        Transaction::new(TransactionBody::AccountDelete(params))
    }

    pub fn transfer_hbar(params: TransferHbarParametersNormalised) -> Result<Transaction, TransactionError> {
        let memo = params.transaction_memo.clone();
        Self::with_memo(TransactionBody::CryptoTransfer(params), memo)
    }

    pub fn create_token(params: CreateTokenParametersNormalised) -> Transaction {
        Transaction::new(TransactionBody::TokenCreate(params))
    }

    pub fn mint_token(params: MintTokenParametersNormalised) -> Transaction {
        Transaction::new(TransactionBody::TokenMint(params))
    }

    pub fn airdrop_fungible_token(
        params: AirdropFungibleTokenParametersNormalised,
    ) -> Result<Transaction, TransactionError> {
        let memo = params.transaction_memo.clone();
        Self::with_memo(TransactionBody::TokenAirdrop(params), memo)
    }

    pub fn create_topic(params: CreateTopicParametersNormalised) -> Result<Transaction, TransactionError> {
        let memo = params.transaction_memo.clone();
        Self::with_memo(TransactionBody::TopicCreate(params), memo)
    }

    pub fn submit_topic_message(
        params: SubmitTopicMessageParametersNormalised,
    ) -> Result<Transaction, TransactionError> {
        let memo = params.transaction_memo.clone();
        Self::with_memo(TransactionBody::TopicMessageSubmit(params), memo)
    }

    pub fn execute_contract(params: ContractExecuteParametersNormalised) -> Transaction {
        Transaction::new(TransactionBody::ContractExecute(params))
    }
}
