// src/blockchain/services/normaliser/queries.rs

use std::str::FromStr;

use chrono::DateTime;
use validator::Validate;

use crate::blockchain::client::LedgerClient;
use crate::blockchain::models::{TokenId, TopicId, TopicMessagesQueryParams, TransactionId};
use crate::blockchain::services::resolver::resolve_account;
use crate::config::Context;
use crate::error::ToolError;
use crate::params::queries::{
    AccountBalanceQueryParameters, AccountBalanceQueryParametersNormalised,
    AccountTokenBalancesQueryParameters, AccountTokenBalancesQueryParametersNormalised,
    TopicMessagesQueryParameters, TransactionDetailsQueryParameters,
    TransactionDetailsQueryParametersNormalised,
};

const DEFAULT_TOPIC_MESSAGE_LIMIT: u32 = 100;

pub fn normalise_hbar_balance(
    params: AccountBalanceQueryParameters,
    context: &Context,
    client: &dyn LedgerClient,
) -> Result<AccountBalanceQueryParametersNormalised, ToolError> {
    params.validate()?;
    Ok(AccountBalanceQueryParametersNormalised {
        account_id: resolve_account(params.account_id.as_deref(), context, client)?,
    })
}

pub fn normalise_account_token_balances(
    params: AccountTokenBalancesQueryParameters,
    context: &Context,
    client: &dyn LedgerClient,
) -> Result<AccountTokenBalancesQueryParametersNormalised, ToolError> {
    params.validate()?;
    let token_id = params.token_id.as_deref().map(TokenId::from_str).transpose()?;
    Ok(AccountTokenBalancesQueryParametersNormalised {
        account_id: resolve_account(params.account_id.as_deref(), context, client)?,
        token_id,
    })
}

/// Accepts `0.0.x@s.n` as well as the mirror form and emits the mirror form.
pub fn normalise_transaction_details(
    params: TransactionDetailsQueryParameters,
) -> Result<TransactionDetailsQueryParametersNormalised, ToolError> {
    params.validate()?;
    let id = TransactionId::from_str(&params.transaction_id)?;
    Ok(TransactionDetailsQueryParametersNormalised {
        transaction_id: id.to_mirror_format(),
        nonce: params.nonce,
    })
}

/// ISO-8601 instant to the mirror node's `seconds.nanos` form.
fn to_mirror_timestamp(field: &str, value: Option<&str>) -> Result<String, ToolError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => {
            let instant = DateTime::parse_from_rfc3339(v)
                .map_err(|e| ToolError::validation(format!("{} must be an ISO-8601 timestamp: {}", field, e)))?;
            Ok(format!("{}.{:09}", instant.timestamp(), instant.timestamp_subsec_nanos()))
        }
        None => Ok(String::new()),
    }
}

pub fn normalise_topic_messages(
    params: TopicMessagesQueryParameters,
) -> Result<TopicMessagesQueryParams, ToolError> {
    params.validate()?;
    let topic_id = TopicId::from_str(&params.topic_id)?;
    Ok(TopicMessagesQueryParams {
        topic_id: topic_id.to_string(),
        lower_timestamp: to_mirror_timestamp("startTime", params.start_time.as_deref())?,
        upper_timestamp: to_mirror_timestamp("endTime", params.end_time.as_deref())?,
        limit: params.limit.unwrap_or(DEFAULT_TOPIC_MESSAGE_LIMIT),
    })
}
