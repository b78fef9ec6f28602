// src/blockchain/services/strategy.rs

//! Transaction-mode dispatch.
//!
//! Every state-changing tool ends here. The strategy is a pure function of the
//! context mode and is re-evaluated on each call:
//!
//! * [`TxModeStrategy::Execute`] submits through the [`LedgerClient`] and
//!   renders a summary of the receipt.
//! * [`TxModeStrategy::ReturnBytes`] freezes the transaction for the context
//!   account and hands back the unsigned bytes without touching the network.

use ethers_core::types::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::blockchain::client::LedgerClient;
use crate::blockchain::models::{AccountId, TokenId, TopicId, TransactionId, TransactionReceipt};
use crate::blockchain::transaction::Transaction;
use crate::config::{AgentMode, Context};
use crate::error::ToolError;

/// Nodes a return-bytes transaction is pinned to.
pub const RETURN_BYTES_NODE_IDS: [u64; 2] = [4, 5];

pub type PostProcess = fn(&RawTransactionResponse) -> String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxModeStrategy {
    Execute,
    ReturnBytes,
}

impl TxModeStrategy {
    pub fn from_context(context: &Context) -> Self {
        match context.mode {
            AgentMode::ReturnBytes => TxModeStrategy::ReturnBytes,
            AgentMode::Autonomous => TxModeStrategy::Execute,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransactionResponse {
    pub status: i32,
    pub account_id: Option<AccountId>,
    pub token_id: Option<TokenId>,
    pub transaction_id: String,
    pub topic_id: Option<TopicId>,
}

impl RawTransactionResponse {
    fn from_receipt(receipt: &TransactionReceipt, transaction_id: &TransactionId) -> Self {
        Self {
            status: receipt.status,
            account_id: receipt.account_id,
            token_id: receipt.token_id,
            transaction_id: transaction_id.to_string(),
            topic_id: receipt.topic_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteStrategyResult {
    pub raw: RawTransactionResponse,
    #[serde(rename = "humanMessage")]
    pub human_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnBytesResult {
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionOutcome {
    Executed(ExecuteStrategyResult),
    Bytes(ReturnBytesResult),
}

impl TransactionOutcome {
    pub fn raw(&self) -> Option<&RawTransactionResponse> {
        match self {
            TransactionOutcome::Executed(result) => Some(&result.raw),
            TransactionOutcome::Bytes(_) => None,
        }
    }
}

fn default_post_process(raw: &RawTransactionResponse) -> String {
    serde_json::to_string_pretty(raw).unwrap_or_else(|_| format!("{:?}", raw))
}

pub async fn handle_transaction(
    tx: Transaction,
    client: &dyn LedgerClient,
    context: &Context,
    post_process: Option<PostProcess>,
) -> Result<TransactionOutcome, ToolError> {
    let strategy = TxModeStrategy::from_context(context);
    debug!("Dispatching {} with {:?} strategy", tx.body().kind(), strategy);
    match strategy {
        TxModeStrategy::Execute => execute(tx, client, post_process).await,
        TxModeStrategy::ReturnBytes => return_bytes(tx, context),
    }
}

async fn execute(
    mut tx: Transaction,
    client: &dyn LedgerClient,
    post_process: Option<PostProcess>,
) -> Result<TransactionOutcome, ToolError> {
    let transaction_id = match tx.transaction_id() {
        Some(id) => id,
        None => {
            let operator = client.operator_account_id().ok_or_else(|| {
                ToolError::InsufficientContext(
                    "Operator account ID is required to execute transactions".to_string(),
                )
            })?;
            let id = TransactionId::generate(operator);
            tx.set_transaction_id(id)?;
            id
        }
    };
    tx.freeze()?;

    let receipt = client.submit(&tx).await?;
    info!("Transaction {} executed with status {}", transaction_id, receipt.status);

    let raw = RawTransactionResponse::from_receipt(&receipt, &transaction_id);
    let human_message = post_process.unwrap_or(default_post_process)(&raw);
    Ok(TransactionOutcome::Executed(ExecuteStrategyResult { raw, human_message }))
}

fn return_bytes(mut tx: Transaction, context: &Context) -> Result<TransactionOutcome, ToolError> {
    let account = context.account_id.ok_or(ToolError::MissingAccountContext)?;
    let nodes = RETURN_BYTES_NODE_IDS.iter().map(|num| AccountId::from_num(*num)).collect();

    tx.set_transaction_id(TransactionId::generate(account))?
        .set_node_account_ids(nodes)?
        .freeze()?;
    let bytes = tx.to_bytes()?;
    info!("Returning {} unsigned bytes for {}", bytes.len(), account);

    Ok(TransactionOutcome::Bytes(ReturnBytesResult { bytes: Bytes::from(bytes) }))
}
