// src/tools/queries.rs

//! Read-only tools backed by the mirror node. Nothing here builds a transaction.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use validator::Validate;

use super::{parse_params, Plugin, PromptGenerator, QueryResult, Tool, ToolOutput};
use crate::blockchain::client::LedgerClient;
use crate::blockchain::models::{
    AccountResponse, Hbar, MirrorKey, TokenBalancesResponse, TokenInfo, TopicMessagesResponse,
    TransactionDetailsResponse,
};
use crate::blockchain::services::mirrornode::get_mirrornode_service;
use crate::blockchain::services::normaliser::{
    normalise_account_token_balances, normalise_hbar_balance, normalise_topic_messages,
    normalise_transaction_details,
};
use crate::blockchain::units::to_display_unit_signed;
use crate::config::Context;
use crate::error::ToolError;
use crate::params::queries::{
    AccountBalanceQueryParameters, AccountQueryParameters, AccountTokenBalancesQueryParameters,
    TokenInfoQueryParameters, TopicMessagesQueryParameters, TransactionDetailsQueryParameters,
};
use crate::params::ParameterSchema;

pub const GET_ACCOUNT_QUERY_TOOL: &str = "get_account_query_tool";
pub const GET_HBAR_BALANCE_QUERY_TOOL: &str = "get_hbar_balance_query_tool";
pub const GET_ACCOUNT_TOKEN_BALANCES_QUERY_TOOL: &str = "get_account_token_balances_query_tool";
pub const GET_TOKEN_INFO_QUERY_TOOL: &str = "get_token_info_query_tool";
pub const GET_TRANSACTION_DETAILS_QUERY_TOOL: &str = "get_transaction_details_query_tool";
pub const GET_TOPIC_MESSAGES_QUERY_TOOL: &str = "get_topic_messages_query_tool";

pub fn core_queries_plugin() -> Plugin {
    Plugin {
        name: "core-queries-plugin",
        version: "1.0.0",
        description: "Account, token, transaction and topic lookups through the mirror node",
        tools: vec![
            Arc::new(GetAccountQueryTool),
            Arc::new(GetHbarBalanceQueryTool),
            Arc::new(GetAccountTokenBalancesQueryTool),
            Arc::new(GetTokenInfoQueryTool),
            Arc::new(GetTransactionDetailsQueryTool),
            Arc::new(GetTopicMessagesQueryTool),
        ],
    }
}

fn account_message(account: &AccountResponse) -> String {
    format!(
        "Details for {}\nBalance: {}\nPublic Key: {}\nEVM address: {}",
        account.account_id,
        Hbar::from_tinybars(account.balance.balance),
        account.account_public_key.as_deref().unwrap_or("none"),
        account.evm_address.as_deref().unwrap_or("none"),
    )
}

fn token_balances_message(account: &str, balances: &TokenBalancesResponse) -> String {
    if balances.tokens.is_empty() {
        return format!("Account {} holds no tokens", account);
    }
    let mut out = format!("Token balances for account {}:", account);
    for token in &balances.tokens {
        let amount = match token.decimals {
            Some(decimals) if decimals <= u8::MAX as u32 => {
                to_display_unit_signed(token.balance as i128, decimals as u8)
            }
            _ => token.balance.to_string(),
        };
        out.push_str(&format!("\n  Token: {}, Balance: {}", token.token_id, amount));
    }
    out
}

fn format_key(key: &Option<MirrorKey>) -> &str {
    match key {
        Some(key) => &key.key,
        None => "Not Set",
    }
}

fn format_supply(info: &TokenInfo, supply: Option<&str>) -> String {
    match supply.map(|s| s.parse::<i128>()) {
        Some(Ok(amount)) => match info.decimals() {
            Ok(decimals) => to_display_unit_signed(amount, decimals),
            Err(_) => amount.to_string(),
        },
        Some(Err(_)) => supply.unwrap_or_default().to_string(),
        None => "N/A".to_string(),
    }
}

fn token_info_message(info: &TokenInfo) -> String {
    let supply_type = match info.supply_type.as_deref() {
        Some("INFINITE") => "Infinite".to_string(),
        _ => info.max_supply.clone().unwrap_or_else(|| "Finite".to_string()),
    };
    let freeze_status = if info.freeze_default == Some(true) { "Frozen" } else { "Active" };

    let mut out = format!(
        "Here are the details for token **{}**:\n\n\
         - **Token Name**: {}\n\
         - **Token Symbol**: {}\n\
         - **Token Type**: {}\n\
         - **Decimals**: {}\n\
         - **Max Supply**: {}\n\
         - **Current Supply**: {}\n\
         - **Supply Type**: {}\n\
         - **Treasury Account ID**: {}\n\
         - **Status (Deleted/Active)**: {}\n\
         - **Status (Frozen/Active)**: {}\n\n\
         **Keys**:\n\
         - Admin Key: {}\n\
         - Supply Key: {}\n\
         - Wipe Key: {}\n\
         - KYC Key: {}\n\
         - Freeze Key: {}\n\
         - Fee Schedule Key: {}\n\
         - Pause Key: {}\n\
         - Metadata Key: {}\n",
        info.token_id.as_deref().unwrap_or("unknown"),
        info.name,
        info.symbol,
        info.token_type.as_deref().unwrap_or("N/A"),
        info.decimals,
        format_supply(info, info.max_supply.as_deref()),
        format_supply(info, info.total_supply.as_deref()),
        supply_type,
        info.treasury_account_id.as_deref().unwrap_or("N/A"),
        if info.deleted { "Deleted" } else { "Active" },
        freeze_status,
        format_key(&info.admin_key),
        format_key(&info.supply_key),
        format_key(&info.wipe_key),
        format_key(&info.kyc_key),
        format_key(&info.freeze_key),
        format_key(&info.fee_schedule_key),
        format_key(&info.pause_key),
        format_key(&info.metadata_key),
    );
    if let Some(memo) = info.memo.as_deref().filter(|m| !m.is_empty()) {
        out.push_str(&format!("\n**Memo**: {}\n", memo));
    }
    out
}

fn transaction_details_message(details: &TransactionDetailsResponse, transaction_id: &str) -> String {
    if details.transactions.is_empty() {
        return format!("No transaction details found for transaction ID: {}", transaction_id);
    }
    let several = details.transactions.len() > 1;
    details
        .transactions
        .iter()
        .enumerate()
        .map(|(i, tx)| {
            let header = if several {
                format!("Transaction {} Details for {}", i + 1, transaction_id)
            } else {
                format!("Transaction Details for {}", transaction_id)
            };
            let mut out = format!(
                "{}\nStatus: {}\nConsensus Timestamp: {}\nTransaction Hash: {}\nTransaction Fee: {}\nType: {}\nEntity ID: {}",
                header,
                tx.result,
                tx.consensus_timestamp,
                tx.transaction_hash,
                tx.charged_tx_fee,
                tx.name,
                tx.entity_id.as_deref().unwrap_or("N/A"),
            );
            if !tx.transfers.is_empty() {
                out.push_str("\nTransfers:");
                for transfer in &tx.transfers {
                    out.push_str(&format!(
                        "\n  Account: {}, Amount: {}",
                        transfer.account,
                        Hbar::from_tinybars(transfer.amount)
                    ));
                }
            }
            out
        })
        .collect::<Vec<_>>()
        .join(&format!("\n\n{}\n\n", "=".repeat(50)))
}

fn topic_messages_message(response: &TopicMessagesResponse) -> String {
    if response.messages.is_empty() {
        return format!("No messages found for topic {}", response.topic_id);
    }
    let mut out = format!("Messages for topic {}:", response.topic_id);
    for message in &response.messages {
        out.push_str(&format!(
            "\n- {} (posted at {})",
            message.message, message.consensus_timestamp
        ));
    }
    out
}

pub struct GetAccountQueryTool;

#[async_trait]
impl Tool for GetAccountQueryTool {
    fn method(&self) -> &'static str {
        GET_ACCOUNT_QUERY_TOOL
    }

    fn name(&self) -> &'static str {
        "Get Account Query"
    }

    fn description(&self, context: &Context) -> String {
        PromptGenerator::tool_prompt(
            context,
            "This tool will return the account information for a given Hedera account.",
            &["accountId (str, required): The account ID to query"],
        )
    }

    fn parameters(&self) -> Value {
        AccountQueryParameters::schema()
    }

    async fn run(&self, client: &dyn LedgerClient, context: &Context, params: Value) -> Result<ToolOutput, ToolError> {
        let params: AccountQueryParameters = parse_params(params)?;
        params.validate()?;
        let mirror = get_mirrornode_service(context, client.ledger_id());
        let account = mirror.get_account(params.account_id.trim()).await?;
        Ok(QueryResult {
            human_message: account_message(&account),
            raw: json!({ "accountId": params.account_id, "account": account }),
        }
        .into())
    }
}

pub struct GetHbarBalanceQueryTool;

#[async_trait]
impl Tool for GetHbarBalanceQueryTool {
    fn method(&self) -> &'static str {
        GET_HBAR_BALANCE_QUERY_TOOL
    }

    fn name(&self) -> &'static str {
        "Get HBAR Balance"
    }

    fn description(&self, context: &Context) -> String {
        let account = PromptGenerator::account_parameter_description("accountId", context);
        PromptGenerator::tool_prompt(
            context,
            "This tool will return the HBAR balance for a given Hedera account.",
            &[&account],
        )
    }

    fn parameters(&self) -> Value {
        AccountBalanceQueryParameters::schema()
    }

    async fn run(&self, client: &dyn LedgerClient, context: &Context, params: Value) -> Result<ToolOutput, ToolError> {
        let params: AccountBalanceQueryParameters = parse_params(params)?;
        let normalised = normalise_hbar_balance(params, context, client)?;
        let account = normalised.account_id.to_string();
        let mirror = get_mirrornode_service(context, client.ledger_id());
        let balance = mirror.get_account_hbar_balance(&account).await?;
        Ok(QueryResult {
            human_message: format!("Account {} has a balance of {}", account, balance),
            raw: json!({
                "accountId": account,
                "hbarBalance": to_display_unit_signed(balance.to_tinybars() as i128, Hbar::DECIMALS),
                "tinybars": balance,
            }),
        }
        .into())
    }
}

pub struct GetAccountTokenBalancesQueryTool;

#[async_trait]
impl Tool for GetAccountTokenBalancesQueryTool {
    fn method(&self) -> &'static str {
        GET_ACCOUNT_TOKEN_BALANCES_QUERY_TOOL
    }

    fn name(&self) -> &'static str {
        "Get Account Token Balances"
    }

    fn description(&self, context: &Context) -> String {
        let account = PromptGenerator::account_parameter_description("accountId", context);
        PromptGenerator::tool_prompt(
            context,
            "This tool will return the token balances of a Hedera account.",
            &[&account, "tokenId (str, optional): Only return the balance of this token"],
        )
    }

    fn parameters(&self) -> Value {
        AccountTokenBalancesQueryParameters::schema()
    }

    async fn run(&self, client: &dyn LedgerClient, context: &Context, params: Value) -> Result<ToolOutput, ToolError> {
        let params: AccountTokenBalancesQueryParameters = parse_params(params)?;
        let normalised = normalise_account_token_balances(params, context, client)?;
        let account = normalised.account_id.to_string();
        let token = normalised.token_id.map(|id| id.to_string());
        let mirror = get_mirrornode_service(context, client.ledger_id());
        let balances = mirror.get_account_token_balances(&account, token.as_deref()).await?;
        Ok(QueryResult {
            human_message: token_balances_message(&account, &balances),
            raw: json!({ "accountId": account, "tokenBalances": balances }),
        }
        .into())
    }
}

pub struct GetTokenInfoQueryTool;

#[async_trait]
impl Tool for GetTokenInfoQueryTool {
    fn method(&self) -> &'static str {
        GET_TOKEN_INFO_QUERY_TOOL
    }

    fn name(&self) -> &'static str {
        "Get Token Info"
    }

    fn description(&self, context: &Context) -> String {
        PromptGenerator::tool_prompt(
            context,
            "This tool will return the information for a given Hedera token.",
            &["tokenId (str, required): The token ID to query for"],
        )
    }

    fn parameters(&self) -> Value {
        TokenInfoQueryParameters::schema()
    }

    async fn run(&self, client: &dyn LedgerClient, context: &Context, params: Value) -> Result<ToolOutput, ToolError> {
        let params: TokenInfoQueryParameters = parse_params(params)?;
        params.validate()?;
        let mirror = get_mirrornode_service(context, client.ledger_id());
        let mut info = mirror.get_token_info(params.token_id.trim()).await?;
        info.token_id = Some(params.token_id.clone());
        Ok(QueryResult {
            human_message: token_info_message(&info),
            raw: json!({ "tokenId": params.token_id, "tokenInfo": info }),
        }
        .into())
    }
}

pub struct GetTransactionDetailsQueryTool;

#[async_trait]
impl Tool for GetTransactionDetailsQueryTool {
    fn method(&self) -> &'static str {
        GET_TRANSACTION_DETAILS_QUERY_TOOL
    }

    fn name(&self) -> &'static str {
        "Get Transaction Details Query"
    }

    fn description(&self, context: &Context) -> String {
        PromptGenerator::tool_prompt(
            context,
            "This tool will return the transaction details for a given Hedera transaction ID.",
            &[
                "transactionId (str, required): Either 0.0.x@seconds.nanos or 0.0.x-seconds-nanos",
                "nonce (number, optional): Nonce of a child transaction",
            ],
        )
    }

    fn parameters(&self) -> Value {
        TransactionDetailsQueryParameters::schema()
    }

    async fn run(&self, client: &dyn LedgerClient, context: &Context, params: Value) -> Result<ToolOutput, ToolError> {
        let params: TransactionDetailsQueryParameters = parse_params(params)?;
        let normalised = normalise_transaction_details(params)?;
        let mirror = get_mirrornode_service(context, client.ledger_id());
        let details = mirror
            .get_transaction_details(&normalised.transaction_id, normalised.nonce)
            .await?;
        Ok(QueryResult {
            human_message: transaction_details_message(&details, &normalised.transaction_id),
            raw: json!({ "transactionId": normalised.transaction_id, "transactionDetails": details }),
        }
        .into())
    }
}

pub struct GetTopicMessagesQueryTool;

#[async_trait]
impl Tool for GetTopicMessagesQueryTool {
    fn method(&self) -> &'static str {
        GET_TOPIC_MESSAGES_QUERY_TOOL
    }

    fn name(&self) -> &'static str {
        "Get Topic Messages"
    }

    fn description(&self, context: &Context) -> String {
        PromptGenerator::tool_prompt(
            context,
            "This tool will return the messages of a topic, newest first.",
            &[
                "topicId (str, required): The topic to read",
                "startTime (str, optional): ISO-8601 lower bound",
                "endTime (str, optional): ISO-8601 upper bound",
                "limit (int, optional): Maximum number of messages, 1 to 100. Defaults to 100",
            ],
        )
    }

    fn parameters(&self) -> Value {
        TopicMessagesQueryParameters::schema()
    }

    async fn run(&self, client: &dyn LedgerClient, context: &Context, params: Value) -> Result<ToolOutput, ToolError> {
        let params: TopicMessagesQueryParameters = parse_params(params)?;
        let query = normalise_topic_messages(params)?;
        let mirror = get_mirrornode_service(context, client.ledger_id());
        let response = mirror.get_topic_messages(&query).await?;
        Ok(QueryResult {
            human_message: topic_messages_message(&response),
            raw: json!({ "topicId": query.topic_id, "messages": response.messages }),
        }
        .into())
    }
}
