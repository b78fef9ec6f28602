//! Tests for the mirror node client and the relay ledger client against a mock HTTP server

use mockito::{mock, Matcher};
use secrecy::SecretString;
use serde_json::json;
use url::Url;

use hedera_agent_toolkit::blockchain::{
    client::{LedgerClient, LedgerError, RelayLedgerClient},
    models::{AccountId, LedgerId, TopicId, TopicMessagesQueryParams, TransactionId},
    services::mirrornode::{HederaMirrorNodeClient, MirrorNodeError, MirrorNodeService},
    transaction::{Transaction, TransactionBody},
};
use hedera_agent_toolkit::params::consensus::SubmitTopicMessageParametersNormalised;

fn mirror() -> HederaMirrorNodeClient {
    HederaMirrorNodeClient::new(format!("{}/api/v1/", mockito::server_url()))
}

#[tokio::test]
async fn account_lookup_flattens_the_key() {
    let _m = mock("GET", "/api/v1/accounts/0.0.1001")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "account": "0.0.1001",
                "key": { "_type": "ED25519", "key": "e0c8ec2758a5879ffac226a13c0c516b799e72e35141a0dd828f94d37988a4b7" },
                "balance": { "balance": 250000000, "timestamp": "1700000000.000000000", "tokens": [] },
                "evm_address": "0xd94dc7f82f103757f715514e4a37186be6e4580b"
            })
            .to_string(),
        )
        .create();

    let client = mirror();
    assert!(!client.base_url().ends_with('/'));

    let account = client.get_account("0.0.1001").await.unwrap();
    assert_eq!(account.account_id, "0.0.1001");
    assert_eq!(
        account.account_public_key.as_deref(),
        Some("e0c8ec2758a5879ffac226a13c0c516b799e72e35141a0dd828f94d37988a4b7")
    );
    assert_eq!(account.evm_address.as_deref(), Some("0xd94dc7f82f103757f715514e4a37186be6e4580b"));

    let balance = client.get_account_hbar_balance("0.0.1001").await.unwrap();
    assert_eq!(balance.to_tinybars(), 250_000_000);
}

#[tokio::test]
async fn missing_entities_are_not_found() {
    let _m = mock("GET", "/api/v1/tokens/0.0.404404")
        .with_status(404)
        .with_body(r#"{"_status":{"messages":[{"message":"Not found"}]}}"#)
        .create();

    let err = mirror().get_token_info("0.0.404404").await.unwrap_err();
    assert!(matches!(err, MirrorNodeError::NotFound(_)));
    assert_eq!(err.to_string(), "Token 0.0.404404 not found on the mirror node");
}

#[tokio::test]
async fn server_errors_keep_the_status() {
    let _m = mock("GET", "/api/v1/tokens/0.0.500500").with_status(503).create();

    let err = mirror().get_token_info("0.0.500500").await.unwrap_err();
    assert!(matches!(err, MirrorNodeError::Status { status: 503, .. }));
}

#[tokio::test]
async fn token_info_reads_string_decimals() {
    let _m = mock("GET", "/api/v1/tokens/0.0.7000")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "token_id": "0.0.7000",
                "name": "Gold",
                "symbol": "GLD",
                "type": "FUNGIBLE_COMMON",
                "decimals": "6",
                "total_supply": "1000000000",
                "supply_type": "INFINITE",
                "deleted": false
            })
            .to_string(),
        )
        .create();

    let info = mirror().get_token_info("0.0.7000").await.unwrap();
    assert_eq!(info.decimals().unwrap(), 6);
    assert_eq!(info.token_type.as_deref(), Some("FUNGIBLE_COMMON"));
}

#[tokio::test]
async fn token_balances_pass_the_token_filter() {
    let _m = mock("GET", "/api/v1/accounts/0.0.1002/tokens")
        .match_query(Matcher::UrlEncoded("token.id".into(), "0.0.7000".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"tokens":[{"token_id":"0.0.7000","balance":1250,"decimals":2}],"links":{"next":null}}"#)
        .create();

    let balances = mirror()
        .get_account_token_balances("0.0.1002", Some("0.0.7000"))
        .await
        .unwrap();
    assert_eq!(balances.tokens.len(), 1);
    assert_eq!(balances.tokens[0].balance, 1250);
    assert_eq!(balances.tokens[0].decimals, Some(2));
}

#[tokio::test]
async fn topic_messages_follow_next_links_and_decode() {
    let _first = mock("GET", "/api/v1/topics/0.0.42/messages")
        .match_query(Matcher::Exact("limit=3&order=desc".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "messages": [
                    { "topic_id": "0.0.42", "message": "aGVsbG8=", "consensus_timestamp": "1700000003.000000000", "sequence_number": 4 },
                    { "topic_id": "0.0.42", "message": "d29ybGQ=", "consensus_timestamp": "1700000002.000000000", "sequence_number": 3 }
                ],
                "links": { "next": "/api/v1/topics/0.0.42/messages?limit=3&order=desc&timestamp=lt:1700000002.000000000" }
            })
            .to_string(),
        )
        .create();
    let _second = mock("GET", "/api/v1/topics/0.0.42/messages")
        .match_query(Matcher::UrlEncoded("timestamp".into(), "lt:1700000002.000000000".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "messages": [
                    { "topic_id": "0.0.42", "message": "Zm9v", "consensus_timestamp": "1700000001.000000000", "sequence_number": 2 },
                    { "topic_id": "0.0.42", "message": "YmFy", "consensus_timestamp": "1700000000.000000000", "sequence_number": 1 }
                ],
                "links": { "next": null }
            })
            .to_string(),
        )
        .create();

    let params = TopicMessagesQueryParams {
        topic_id: TopicId::from_num(42).to_string(),
        lower_timestamp: String::new(),
        upper_timestamp: String::new(),
        limit: 3,
    };
    let response = mirror().get_topic_messages(&params).await.unwrap();

    let texts: Vec<&str> = response.messages.iter().map(|m| m.message.as_str()).collect();
    assert_eq!(texts, vec!["hello", "world", "foo"]);
    assert_eq!(response.topic_id, "0.0.42");
}

#[tokio::test]
async fn topic_messages_pass_the_time_window() {
    let _m = mock("GET", "/api/v1/topics/0.0.43/messages")
        // Both bounds share the `timestamp` key, so match the raw query string.
        .match_query(Matcher::Regex(
            r"^limit=10&order=desc&timestamp=gte:1704067200\.000000000&timestamp=lte:1704067201\.500000000$".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"messages":[],"links":{"next":null}}"#)
        .create();

    let params = TopicMessagesQueryParams {
        topic_id: "0.0.43".to_string(),
        lower_timestamp: "1704067200.000000000".to_string(),
        upper_timestamp: "1704067201.500000000".to_string(),
        limit: 10,
    };
    let response = mirror().get_topic_messages(&params).await.unwrap();
    assert!(response.messages.is_empty());
}

#[tokio::test]
async fn contract_results_use_the_mirror_transaction_id() {
    let _m = mock("GET", "/api/v1/contracts/results/0.0.2-1700000000-000000001")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"contract_id":"0.0.6471814","call_result":"0x000000000000000000000000d94dc7f82f103757f715514e4a37186be6e4580b","result":"SUCCESS"}"#)
        .create();

    let id: TransactionId = "0.0.2@1700000000.000000001".parse().unwrap();
    let result = mirror().get_contract_result(&id).await.unwrap();
    assert_eq!(result.contract_id.as_deref(), Some("0.0.6471814"));
    assert!(result.call_result.unwrap().ends_with("e4580b"));
}

fn frozen_message_tx() -> Transaction {
    let mut tx = Transaction::new(TransactionBody::TopicMessageSubmit(SubmitTopicMessageParametersNormalised {
        topic_id: TopicId::from_num(42),
        message: "hello".to_string(),
        transaction_memo: None,
    }));
    tx.set_transaction_id(TransactionId::generate(AccountId::from_num(2)))
        .unwrap()
        .freeze()
        .unwrap();
    tx
}

fn relay(path: &str) -> RelayLedgerClient {
    let url = Url::parse(&format!("{}{}", mockito::server_url(), path)).unwrap();
    RelayLedgerClient::new(LedgerId::Testnet)
        .with_operator(Some(AccountId::from_num(2)), None)
        .with_relay(url, Some(SecretString::new("relay-secret".to_string())))
}

#[tokio::test]
async fn relay_submits_and_returns_the_receipt() {
    let _m = mock("POST", "/relay/ok")
        .match_header("authorization", "Bearer relay-secret")
        .match_body(Matcher::PartialJson(json!({
            "jsonrpc": "2.0",
            "method": "ledger_submitTransaction",
            "params": { "network": "testnet" }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"jsonrpc":"2.0","id":"1","result":{"status":22,"topicId":"0.0.42"}}"#)
        .create();

    let receipt = relay("/relay/ok").submit(&frozen_message_tx()).await.unwrap();
    assert!(receipt.is_success());
    assert_eq!(receipt.topic_id, Some(TopicId::from_num(42)));
}

#[tokio::test]
async fn relay_errors_are_reported() {
    let _m = mock("POST", "/relay/rejects")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"jsonrpc":"2.0","id":"1","error":{"code":-32000,"message":"INVALID_SIGNATURE"}}"#)
        .create();

    let err = relay("/relay/rejects").submit(&frozen_message_tx()).await.unwrap_err();
    assert!(matches!(err, LedgerError::Rpc(_)));
    assert!(err.to_string().contains("INVALID_SIGNATURE"));
}

#[tokio::test]
async fn failed_receipts_are_errors() {
    let _m = mock("POST", "/relay/fails")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"jsonrpc":"2.0","id":"1","result":{"status":10}}"#)
        .create();

    let err = relay("/relay/fails").submit(&frozen_message_tx()).await.unwrap_err();
    assert!(matches!(err, LedgerError::ReceiptStatus { status: 10, .. }));
}

#[tokio::test]
async fn submitting_without_a_relay_is_not_configured() {
    let client = RelayLedgerClient::new(LedgerId::Testnet);
    let err = client.submit(&frozen_message_tx()).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotConfigured));
    assert_eq!(client.operator_account_id(), None);
}
