// src/tools/consensus.rs

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{parse_params, Plugin, PromptGenerator, Tool, ToolOutput};
use crate::blockchain::builder::TransactionBuilder;
use crate::blockchain::client::LedgerClient;
use crate::blockchain::services::mirrornode::get_mirrornode_service;
use crate::blockchain::services::normaliser::{normalise_create_topic, normalise_submit_topic_message};
use crate::blockchain::services::strategy::{handle_transaction, RawTransactionResponse};
use crate::config::Context;
use crate::error::ToolError;
use crate::params::consensus::{CreateTopicParameters, SubmitTopicMessageParameters};
use crate::params::ParameterSchema;

pub const CREATE_TOPIC_TOOL: &str = "create_topic_tool";
pub const SUBMIT_TOPIC_MESSAGE_TOOL: &str = "submit_topic_message_tool";

pub fn core_consensus_plugin() -> Plugin {
    Plugin {
        name: "core-consensus-plugin",
        version: "1.0.0",
        description: "Topics on the Hedera Consensus Service",
        tools: vec![Arc::new(CreateTopicTool), Arc::new(SubmitTopicMessageTool)],
    }
}

fn created_topic_message(raw: &RawTransactionResponse) -> String {
    let topic = raw
        .topic_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    format!(
        "Topic created successfully with topic id {} and transaction id {}",
        topic, raw.transaction_id
    )
}

fn submitted_message_message(raw: &RawTransactionResponse) -> String {
    format!("Message submitted successfully with transaction id {}", raw.transaction_id)
}

pub struct CreateTopicTool;

#[async_trait]
impl Tool for CreateTopicTool {
    fn method(&self) -> &'static str {
        CREATE_TOPIC_TOOL
    }

    fn name(&self) -> &'static str {
        "Create Topic"
    }

    fn description(&self, context: &Context) -> String {
        PromptGenerator::tool_prompt(
            context,
            "This tool will create a new topic on the Hedera network.",
            &[
                "isSubmitKey (bool, optional): Whether to restrict submissions with the default account's key",
                "topicMemo (str, optional): Memo for the topic",
                "transactionMemo (str, optional): Memo for the transaction",
            ],
        )
    }

    fn parameters(&self) -> Value {
        CreateTopicParameters::schema()
    }

    async fn run(&self, client: &dyn LedgerClient, context: &Context, params: Value) -> Result<ToolOutput, ToolError> {
        let params: CreateTopicParameters = parse_params(params)?;
        let mirror = get_mirrornode_service(context, client.ledger_id());
        let normalised = normalise_create_topic(params, context, client, mirror.as_ref()).await?;
        let tx = TransactionBuilder::create_topic(normalised)?;
        Ok(handle_transaction(tx, client, context, Some(created_topic_message)).await?.into())
    }
}

pub struct SubmitTopicMessageTool;

#[async_trait]
impl Tool for SubmitTopicMessageTool {
    fn method(&self) -> &'static str {
        SUBMIT_TOPIC_MESSAGE_TOOL
    }

    fn name(&self) -> &'static str {
        "Submit Topic Message"
    }

    fn description(&self, context: &Context) -> String {
        PromptGenerator::tool_prompt(
            context,
            "This tool will submit a message to a topic on the Hedera network.",
            &[
                "topicId (str, required): The topic to submit to",
                "message (str, required): The message to submit",
                "transactionMemo (str, optional): Memo for the transaction",
            ],
        )
    }

    fn parameters(&self) -> Value {
        SubmitTopicMessageParameters::schema()
    }

    async fn run(&self, client: &dyn LedgerClient, context: &Context, params: Value) -> Result<ToolOutput, ToolError> {
        let params: SubmitTopicMessageParameters = parse_params(params)?;
        let normalised = normalise_submit_topic_message(params)?;
        let tx = TransactionBuilder::submit_topic_message(normalised)?;
        Ok(handle_transaction(tx, client, context, Some(submitted_message_message)).await?.into())
    }
}
