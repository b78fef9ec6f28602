// src/tools/account.rs

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{parse_params, Plugin, PromptGenerator, Tool, ToolOutput};
use crate::blockchain::builder::TransactionBuilder;
use crate::blockchain::client::LedgerClient;
use crate::blockchain::services::mirrornode::get_mirrornode_service;
use crate::blockchain::services::normaliser::{
    normalise_create_account, normalise_delete_account, normalise_transfer_hbar, normalise_update_account,
};
use crate::blockchain::services::strategy::{handle_transaction, RawTransactionResponse};
use crate::config::Context;
use crate::error::ToolError;
use crate::params::account::{
    CreateAccountParameters, DeleteAccountParameters, TransferHbarParameters, UpdateAccountParameters,
};
use crate::params::ParameterSchema;

pub const CREATE_ACCOUNT_TOOL: &str = "create_account_tool";
pub const UPDATE_ACCOUNT_TOOL: &str = "update_account_tool";
pub const DELETE_ACCOUNT_TOOL: &str = "delete_account_tool";
pub const TRANSFER_HBAR_TOOL: &str = "transfer_hbar_tool";

pub fn core_account_plugin() -> Plugin {
    Plugin {
        name: "core-account-plugin",
        version: "1.0.0",
        description: "Account creation, updates, deletion and HBAR transfers",
        tools: vec![
            Arc::new(CreateAccountTool),
            Arc::new(UpdateAccountTool),
            Arc::new(DeleteAccountTool),
            Arc::new(TransferHbarTool),
        ],
    }
}

fn created_account_message(raw: &RawTransactionResponse) -> String {
    let account = raw
        .account_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    format!(
        "Account created successfully.\nTransaction ID: {}\nNew Account ID: {}",
        raw.transaction_id, account
    )
}

fn updated_account_message(raw: &RawTransactionResponse) -> String {
    format!("Account successfully updated. Transaction ID: {}", raw.transaction_id)
}

fn deleted_account_message(raw: &RawTransactionResponse) -> String {
    format!("Account successfully deleted. Transaction ID: {}", raw.transaction_id)
}

fn transferred_hbar_message(raw: &RawTransactionResponse) -> String {
    format!("HBAR successfully transferred.\nTransaction ID: {}", raw.transaction_id)
}

pub struct CreateAccountTool;

#[async_trait]
impl Tool for CreateAccountTool {
    fn method(&self) -> &'static str {
        CREATE_ACCOUNT_TOOL
    }

    fn name(&self) -> &'static str {
        "Create Account"
    }

    fn description(&self, context: &Context) -> String {
        PromptGenerator::tool_prompt(
            context,
            "This tool will create a new Hedera account with a passed public key. If not passed, the tool will use the default account's public key.",
            &[
                "publicKey (str, optional): Public key to use for the account",
                "accountMemo (str, optional): Memo for the account",
                "initialBalance (number, optional, default 0): Initial HBAR to fund the account",
                "maxAutomaticTokenAssociations (number, optional, default -1): -1 means unlimited",
            ],
        )
    }

    fn parameters(&self) -> Value {
        CreateAccountParameters::schema()
    }

    async fn run(&self, client: &dyn LedgerClient, context: &Context, params: Value) -> Result<ToolOutput, ToolError> {
        let params: CreateAccountParameters = parse_params(params)?;
        let mirror = get_mirrornode_service(context, client.ledger_id());
        let normalised = normalise_create_account(params, context, client, mirror.as_ref()).await?;
        let tx = TransactionBuilder::create_account(normalised);
        Ok(handle_transaction(tx, client, context, Some(created_account_message)).await?.into())
    }
}

pub struct UpdateAccountTool;

#[async_trait]
impl Tool for UpdateAccountTool {
    fn method(&self) -> &'static str {
        UPDATE_ACCOUNT_TOOL
    }

    fn name(&self) -> &'static str {
        "Update Account"
    }

    fn description(&self, context: &Context) -> String {
        let account = PromptGenerator::account_parameter_description("accountId", context);
        PromptGenerator::tool_prompt(
            context,
            "This tool will update an existing Hedera account. Only the fields that are passed are changed.",
            &[
                &account,
                "maxAutomaticTokenAssociations (number, optional): -1 means unlimited",
                "stakedAccountId (str, optional): Account to stake to",
                "accountMemo (str, optional): New memo for the account",
                "declineStakingReward (bool, optional): Whether to decline staking rewards",
            ],
        )
    }

    fn parameters(&self) -> Value {
        UpdateAccountParameters::schema()
    }

    async fn run(&self, client: &dyn LedgerClient, context: &Context, params: Value) -> Result<ToolOutput, ToolError> {
        let params: UpdateAccountParameters = parse_params(params)?;
        let mirror = get_mirrornode_service(context, client.ledger_id());
        let normalised = normalise_update_account(params, context, client, mirror.as_ref()).await?;
        let tx = TransactionBuilder::update_account(normalised);
        let outcome = handle_transaction(tx, client, context, Some(updated_account_message)).await?;
        Ok(outcome.into())
    }
}

pub struct DeleteAccountTool;

#[async_trait]
impl Tool for DeleteAccountTool {
    fn method(&self) -> &'static str {
        DELETE_ACCOUNT_TOOL
    }

    fn name(&self) -> &'static str {
        "Delete Account"
    }

    fn description(&self, context: &Context) -> String {
        let transfer = PromptGenerator::account_parameter_description("transferAccountId", context);
        PromptGenerator::tool_prompt(
            context,
            "This tool will delete an existing Hedera account. The remaining balance is moved to the transfer account.",
            &["accountId (str, required): The account to delete", &transfer],
        )
    }

    fn parameters(&self) -> Value {
        DeleteAccountParameters::schema()
    }

    async fn run(&self, client: &dyn LedgerClient, context: &Context, params: Value) -> Result<ToolOutput, ToolError> {
        let params: DeleteAccountParameters = parse_params(params)?;
        let mirror = get_mirrornode_service(context, client.ledger_id());
        let normalised = normalise_delete_account(params, context, client, mirror.as_ref()).await?;
        let tx = TransactionBuilder::delete_account(normalised);
        let outcome = handle_transaction(tx, client, context, Some(deleted_account_message)).await?;
        Ok(outcome.into())
    }
}

pub struct TransferHbarTool;

#[async_trait]
impl Tool for TransferHbarTool {
    fn method(&self) -> &'static str {
        TRANSFER_HBAR_TOOL
    }

    fn name(&self) -> &'static str {
        "Transfer HBAR"
    }

    fn description(&self, context: &Context) -> String {
        let source = PromptGenerator::account_parameter_description("sourceAccountId", context);
        PromptGenerator::tool_prompt(
            context,
            "This tool will transfer HBAR to one or more accounts.",
            &[
                "transfers (array, required): List of {accountId, amount} entries; amount is in HBAR",
                &source,
                "transactionMemo (str, optional): Memo for the transaction",
            ],
        )
    }

    fn parameters(&self) -> Value {
        TransferHbarParameters::schema()
    }

    async fn run(&self, client: &dyn LedgerClient, context: &Context, params: Value) -> Result<ToolOutput, ToolError> {
        let params: TransferHbarParameters = parse_params(params)?;
        let normalised = normalise_transfer_hbar(params, context, client)?;
        let tx = TransactionBuilder::transfer_hbar(normalised)?;
        let outcome = handle_transaction(tx, client, context, Some(transferred_hbar_message)).await?;
        Ok(outcome.into())
    }
}
