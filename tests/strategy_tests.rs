//! Tests for the transaction-mode strategy dispatcher

mod common;

use common::{context, topic_id, FakeLedgerClient};
use hedera_agent_toolkit::{
    blockchain::{
        models::{AccountId, TokenId, TransactionReceipt},
        services::strategy::{
            handle_transaction, RawTransactionResponse, TransactionOutcome, TxModeStrategy, RETURN_BYTES_NODE_IDS,
        },
        transaction::{Transaction, TransactionBody},
    },
    config::AgentMode,
    params::consensus::SubmitTopicMessageParametersNormalised,
    ToolError,
};

fn message_tx() -> Transaction {
    Transaction::new(TransactionBody::TopicMessageSubmit(SubmitTopicMessageParametersNormalised {
        topic_id: topic_id(42),
        message: "hello".to_string(),
        transaction_memo: None,
    }))
}

fn summary(raw: &RawTransactionResponse) -> String {
    format!("{} via {}", raw.status, raw.transaction_id)
}

#[test]
fn strategy_follows_the_context_mode() {
    let execute = context(AgentMode::Autonomous, None);
    let bytes = context(AgentMode::ReturnBytes, Some(1));
    assert_eq!(TxModeStrategy::from_context(&execute), TxModeStrategy::Execute);
    assert_eq!(TxModeStrategy::from_context(&bytes), TxModeStrategy::ReturnBytes);
}

#[tokio::test]
async fn return_bytes_requires_a_context_account() {
    let client = FakeLedgerClient::new();
    let ctx = context(AgentMode::ReturnBytes, None);

    let err = handle_transaction(message_tx(), &client, &ctx, None).await.unwrap_err();
    assert!(matches!(err, ToolError::MissingAccountContext));
    assert!(client.submissions().is_empty());
}

#[tokio::test]
async fn return_bytes_freezes_for_the_context_account() {
    let client = FakeLedgerClient::new();
    let ctx = context(AgentMode::ReturnBytes, Some(5001));

    let outcome = handle_transaction(message_tx(), &client, &ctx, Some(summary)).await.unwrap();
    let bytes = match outcome {
        TransactionOutcome::Bytes(result) => result.bytes,
        other => panic!("expected bytes, got {:?}", other),
    };

    // The network is never touched in this mode.
    assert!(client.submissions().is_empty());

    let tx = Transaction::from_bytes(&bytes).unwrap();
    assert!(tx.is_frozen());
    assert_eq!(tx.transaction_id().unwrap().account_id, AccountId::from_num(5001));
    let nodes: Vec<u64> = tx.node_account_ids().iter().map(|n| n.num).collect();
    assert_eq!(nodes, RETURN_BYTES_NODE_IDS.to_vec());
    assert_eq!(tx.body(), message_tx().body());
}

#[tokio::test]
async fn execute_submits_and_post_processes() {
    let client = FakeLedgerClient::new().with_receipt(|r| r.token_id = Some(TokenId::from_num(7000)));
    let ctx = context(AgentMode::Autonomous, Some(5001));

    let outcome = handle_transaction(message_tx(), &client, &ctx, Some(summary)).await.unwrap();
    let result = match outcome {
        TransactionOutcome::Executed(result) => result,
        other => panic!("expected an executed result, got {:?}", other),
    };

    let submitted = client.submissions();
    assert_eq!(submitted.len(), 1);
    assert!(submitted[0].is_frozen());
    // The operator pays in execute mode, whatever the context account.
    let id = submitted[0].transaction_id().unwrap();
    assert_eq!(id.account_id, AccountId::from_num(2));

    assert_eq!(result.raw.status, TransactionReceipt::SUCCESS);
    assert_eq!(serde_json::to_value(&result.raw).unwrap()["status"], serde_json::json!(22));
    assert_eq!(result.raw.token_id, Some(TokenId::from_num(7000)));
    assert_eq!(result.raw.transaction_id, id.to_string());
    assert_eq!(result.human_message, format!("22 via {}", id));
}

#[tokio::test]
async fn execute_without_post_processor_renders_json() {
    let client = FakeLedgerClient::new();
    let ctx = context(AgentMode::Autonomous, None);

    let outcome = handle_transaction(message_tx(), &client, &ctx, None).await.unwrap();
    let raw = outcome.raw().unwrap().clone();
    let message = match outcome {
        TransactionOutcome::Executed(result) => result.human_message,
        other => panic!("expected an executed result, got {:?}", other),
    };

    let parsed: RawTransactionResponse = serde_json::from_str(&message).unwrap();
    assert_eq!(parsed, raw);
}

#[tokio::test]
async fn execute_without_operator_fails() {
    let client = FakeLedgerClient::without_operator();
    let ctx = context(AgentMode::Autonomous, Some(5001));

    let err = handle_transaction(message_tx(), &client, &ctx, None).await.unwrap_err();
    assert!(matches!(err, ToolError::InsufficientContext(_)));
    assert_eq!(err.to_string(), "Operator account ID is required to execute transactions");
}

#[tokio::test]
async fn ledger_errors_propagate() {
    let client = FakeLedgerClient::failing("INSUFFICIENT_PAYER_BALANCE");
    let ctx = context(AgentMode::Autonomous, None);

    let err = handle_transaction(message_tx(), &client, &ctx, None).await.unwrap_err();
    assert!(matches!(err, ToolError::Ledger(_)));
    assert!(err.to_string().contains("INSUFFICIENT_PAYER_BALANCE"));
    assert_eq!(client.submissions().len(), 1);
}

#[test]
fn receipt_success_status() {
    let receipt = TransactionReceipt {
        status: 22,
        account_id: None,
        token_id: None,
        topic_id: None,
        contract_id: None,
    };
    assert!(receipt.is_success());
    assert!(!TransactionReceipt { status: 21, ..receipt }.is_success());
}
