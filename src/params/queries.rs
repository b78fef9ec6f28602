// src/params/queries.rs

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use super::ParameterSchema;
use crate::blockchain::models::{AccountRef, TokenId};

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AccountQueryParameters {
    pub account_id: String,
}

impl ParameterSchema for AccountQueryParameters {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "accountId": {"type": "string", "description": "The account ID to query."}
            },
            "required": ["accountId"]
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalanceQueryParameters {
    pub account_id: Option<String>,
}

impl ParameterSchema for AccountBalanceQueryParameters {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "accountId": {"type": "string", "description": "The account ID to query. Defaults to the default account."}
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalanceQueryParametersNormalised {
    pub account_id: AccountRef,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AccountTokenBalancesQueryParameters {
    pub account_id: Option<String>,
    pub token_id: Option<String>,
}

impl ParameterSchema for AccountTokenBalancesQueryParameters {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "accountId": {"type": "string", "description": "The account ID to query. Defaults to the default account."},
                "tokenId": {"type": "string", "description": "Only return the balance of this token."}
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountTokenBalancesQueryParametersNormalised {
    pub account_id: AccountRef,
    pub token_id: Option<TokenId>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfoQueryParameters {
    pub token_id: String,
}

impl ParameterSchema for TokenInfoQueryParameters {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "tokenId": {"type": "string", "description": "The token ID to query."}
            },
            "required": ["tokenId"]
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetailsQueryParameters {
    pub transaction_id: String,
    pub nonce: Option<u32>,
}

impl ParameterSchema for TransactionDetailsQueryParameters {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "transactionId": {"type": "string", "description": "Transaction ID as 0.0.x-seconds-nanos or 0.0.x@seconds.nanos."},
                "nonce": {"type": "integer", "minimum": 0, "description": "Optional nonce of a child transaction."}
            },
            "required": ["transactionId"]
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetailsQueryParametersNormalised {
    /// Mirror node form, `0.0.x-seconds-nanos`.
    pub transaction_id: String,
    pub nonce: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TopicMessagesQueryParameters {
    pub topic_id: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
}

impl ParameterSchema for TopicMessagesQueryParameters {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "topicId": {"type": "string", "description": "The topic ID to query."},
                "startTime": {"type": "string", "format": "date-time", "description": "Only messages at or after this ISO-8601 time."},
                "endTime": {"type": "string", "format": "date-time", "description": "Only messages at or before this ISO-8601 time."},
                "limit": {"type": "integer", "minimum": 1, "maximum": 100, "description": "Maximum number of messages. Defaults to 100."}
            },
            "required": ["topicId"]
        })
    }
}
