//! Tests for tools run end to end through the toolkit

mod common;

use std::sync::Arc;

use serde_json::json;

use common::{context, context_with_mirror, topic_id, FakeLedgerClient, FakeMirrorNode};
use hedera_agent_toolkit::{
    blockchain::{
        models::{AccountId, ContractId},
        services::strategy::TransactionOutcome,
        transaction::{Transaction, TransactionBody},
    },
    config::AgentMode,
    tools::{core_plugins, Tool, ToolOutput, Toolkit},
};

const DEPLOYED: &str = "0xd94dc7f82f103757f715514e4a37186be6e4580b";

fn toolkit() -> Toolkit {
    Toolkit::new(core_plugins(None, None), None)
}

#[tokio::test]
async fn transfer_hbar_executes_and_summarises() {
    let client = FakeLedgerClient::new();
    let ctx = context(AgentMode::Autonomous, Some(5001));

    let output = toolkit()
        .execute(
            "transfer_hbar_tool",
            &client,
            &ctx,
            json!({ "transfers": [{ "accountId": "0.0.1001", "amount": 2 }] }),
        )
        .await
        .unwrap();

    assert!(!output.is_error());
    let submitted = client.submissions();
    assert_eq!(submitted.len(), 1);
    let id = submitted[0].transaction_id().unwrap();
    assert_eq!(
        output.human_message(),
        format!("HBAR successfully transferred.\nTransaction ID: {}", id)
    );
    match submitted[0].body() {
        TransactionBody::CryptoTransfer(transfer) => {
            assert_eq!(transfer.hbar_transfers.len(), 2);
        }
        other => panic!("unexpected body {:?}", other),
    }
}

#[tokio::test]
async fn return_bytes_mode_hands_back_unsigned_bytes() {
    let client = FakeLedgerClient::new();
    let ctx = context(AgentMode::ReturnBytes, Some(5001));

    let output = toolkit()
        .execute(
            "submit_topic_message_tool",
            &client,
            &ctx,
            json!({ "topicId": "0.0.42", "message": "hello", "transactionMemo": "greeting" }),
        )
        .await
        .unwrap();

    assert!(client.submissions().is_empty());
    assert!(output.human_message().starts_with("Unsigned transaction bytes: 0x"));

    let bytes = match &output {
        ToolOutput::Transaction(TransactionOutcome::Bytes(result)) => result.bytes.clone(),
        other => panic!("expected bytes, got {:?}", other),
    };
    let tx = Transaction::from_bytes(&bytes).unwrap();
    assert_eq!(tx.memo(), Some("greeting"));
    assert_eq!(tx.transaction_id().unwrap().account_id, AccountId::from_num(5001));
    match tx.body() {
        TransactionBody::TopicMessageSubmit(submit) => assert_eq!(submit.topic_id, topic_id(42)),
        other => panic!("unexpected body {:?}", other),
    }

    // The structured form carries the bytes as hex.
    assert!(output.to_value()["bytes"].as_str().unwrap().starts_with("0x"));
}

#[tokio::test]
async fn failures_become_plain_messages() {
    let client = FakeLedgerClient::new();
    let ctx = context(AgentMode::Autonomous, Some(5001));
    let toolkit = toolkit();

    let output = toolkit
        .execute(
            "transfer_hbar_tool",
            &client,
            &ctx,
            json!({ "transfers": [{ "accountId": "0.0.1001", "amount": 0 }] }),
        )
        .await
        .unwrap();
    assert_eq!(output, ToolOutput::Failure("Invalid transfer amount: 0".to_string()));

    let output = toolkit
        .execute("transfer_hbar_tool", &client, &ctx, json!({ "transfers": "lots" }))
        .await
        .unwrap();
    assert!(output.is_error());
    assert!(output.human_message().starts_with("Invalid parameters"));

    assert!(client.submissions().is_empty());
}

#[tokio::test]
async fn ledger_failures_are_reported_not_raised() {
    let client = FakeLedgerClient::failing("INSUFFICIENT_PAYER_BALANCE");
    let ctx = context(AgentMode::Autonomous, None);

    let output = toolkit()
        .execute("create_topic_tool", &client, &ctx, json!({ "topicMemo": "news" }))
        .await
        .unwrap();
    assert!(output.is_error());
    assert!(output.human_message().contains("INSUFFICIENT_PAYER_BALANCE"));
}

#[tokio::test]
async fn unknown_methods_are_not_run() {
    let client = FakeLedgerClient::new();
    let ctx = context(AgentMode::Autonomous, None);
    assert!(toolkit().execute("mine_bitcoin", &client, &ctx, json!({})).await.is_none());
}

#[tokio::test]
async fn create_topic_reports_the_new_topic() {
    let client = FakeLedgerClient::new().with_receipt(|r| r.topic_id = Some(topic_id(777)));
    let ctx = context(AgentMode::Autonomous, None);

    let output = toolkit()
        .execute("create_topic_tool", &client, &ctx, json!({}))
        .await
        .unwrap();
    let id = client.submissions()[0].transaction_id().unwrap();
    assert_eq!(
        output.human_message(),
        format!("Topic created successfully with topic id 0.0.777 and transaction id {}", id)
    );
    assert_eq!(output.to_value()["raw"]["topicId"], json!("0.0.777"));
}

#[tokio::test]
async fn erc20_deploy_reads_the_token_address() {
    let call_result = format!("0x000000000000000000000000{}", &DEPLOYED[2..]);
    let mirror = Arc::new(FakeMirrorNode::new().with_contract_result(&call_result));
    let client = FakeLedgerClient::new();
    let ctx = context_with_mirror(AgentMode::Autonomous, None, mirror.clone());

    let output = toolkit()
        .execute(
            "create_erc20_tool",
            &client,
            &ctx,
            json!({ "tokenName": "Gold", "tokenSymbol": "GLD", "initialSupply": 1000 }),
        )
        .await
        .unwrap();

    let deployed = match &output {
        ToolOutput::Deployed(result) => result.clone(),
        other => panic!("expected a deployment, got {:?}", other),
    };
    assert_eq!(deployed.erc20_address.as_deref(), Some(DEPLOYED));
    assert_eq!(deployed.erc721_address, None);
    assert_eq!(
        deployed.message,
        format!("ERC20 token created successfully at address {}", DEPLOYED)
    );

    // Testnet has a published ERC20 factory.
    match client.submissions()[0].body() {
        TransactionBody::ContractExecute(call) => {
            assert_eq!(call.contract_id, ContractId::from_num(6_471_814));
        }
        other => panic!("unexpected body {:?}", other),
    }

    let id = client.submissions()[0].transaction_id().unwrap();
    assert_eq!(mirror.requests(), vec![format!("contract result {}", id.to_mirror_format())]);

    let value = output.to_value();
    assert_eq!(value["erc20Address"], json!(DEPLOYED));
    assert_eq!(value["raw"]["status"], json!(22));
}

#[tokio::test]
async fn erc20_deploy_survives_a_missing_contract_result() {
    let mirror = Arc::new(FakeMirrorNode::new());
    let client = FakeLedgerClient::new();
    let ctx = context_with_mirror(AgentMode::Autonomous, None, mirror);

    let output = toolkit()
        .execute("create_erc20_tool", &client, &ctx, json!({ "tokenName": "Gold", "tokenSymbol": "GLD" }))
        .await
        .unwrap();

    assert!(!output.is_error());
    match output {
        ToolOutput::Deployed(result) => {
            assert_eq!(result.erc20_address, None);
            assert!(result.message.contains("could not be determined"));
        }
        other => panic!("expected a deployment, got {:?}", other),
    }
}

#[tokio::test]
async fn erc721_deploy_needs_a_factory() {
    let client = FakeLedgerClient::new();
    let ctx = context(AgentMode::Autonomous, None);

    let output = toolkit()
        .execute("create_erc721_tool", &client, &ctx, json!({ "tokenName": "Art", "tokenSymbol": "ART" }))
        .await
        .unwrap();
    assert_eq!(
        output,
        ToolOutput::Failure("No ERC721 factory contract is available on testnet".to_string())
    );

    let configured = Toolkit::new(core_plugins(None, Some(ContractId::from_num(9000))), None);
    let ctx = context(AgentMode::ReturnBytes, Some(5001));
    let output = configured
        .execute("create_erc721_tool", &client, &ctx, json!({ "tokenName": "Art", "tokenSymbol": "ART" }))
        .await
        .unwrap();
    // Return-bytes deployments pass through without an address lookup.
    assert!(matches!(output, ToolOutput::Transaction(TransactionOutcome::Bytes(_))));
}

#[tokio::test]
async fn hbar_balance_query_uses_the_mirror_node() {
    let mirror = Arc::new(FakeMirrorNode::new().with_account("0.0.5001", None, None));
    let client = FakeLedgerClient::new();
    let ctx = context_with_mirror(AgentMode::Autonomous, Some(5001), mirror);

    let output = toolkit()
        .execute("get_hbar_balance_query_tool", &client, &ctx, json!({}))
        .await
        .unwrap();

    match &output {
        ToolOutput::Query(result) => {
            assert_eq!(result.raw["accountId"], json!("0.0.5001"));
            assert_eq!(result.raw["hbarBalance"], json!("1.5"));
            assert_eq!(result.raw["tinybars"], json!(150_000_000));
        }
        other => panic!("expected a query result, got {:?}", other),
    }
    assert!(output.human_message().starts_with("Account 0.0.5001 has a balance of 1.5"));
    assert!(client.submissions().is_empty());
}

#[tokio::test]
async fn mint_fungible_token_looks_up_decimals() {
    let mirror = Arc::new(FakeMirrorNode::new().with_token("0.0.7000", 2));
    let client = FakeLedgerClient::new();
    let ctx = context_with_mirror(AgentMode::Autonomous, None, mirror);

    let output = toolkit()
        .execute("mint_fungible_token_tool", &client, &ctx, json!({ "tokenId": "0.0.7000", "amount": 3.25 }))
        .await
        .unwrap();

    assert!(output.human_message().starts_with("Tokens successfully minted with transaction id"));
    match client.submissions()[0].body() {
        TransactionBody::TokenMint(mint) => assert_eq!(mint.amount, 325),
        other => panic!("unexpected body {:?}", other),
    }
}

#[test]
fn descriptions_mention_the_default_account() {
    let ctx = context(AgentMode::ReturnBytes, Some(5001));
    let toolkit = toolkit();
    let tool = toolkit.get("airdrop_fungible_token_tool").unwrap();
    let description = tool.description(&ctx);

    assert!(description.contains("0.0.5001"));
    assert!(description.contains("return bytes"));
    assert_eq!(tool.parameters()["required"], json!(["tokenId", "recipients"]));
}
