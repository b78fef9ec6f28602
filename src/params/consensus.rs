// src/params/consensus.rs

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use super::ParameterSchema;
use crate::blockchain::models::{AccountId, PublicKey, TopicId};

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopicParameters {
    pub is_submit_key: Option<bool>,
    #[validate(length(max = 100))]
    pub topic_memo: Option<String>,
    #[validate(length(max = 100))]
    pub transaction_memo: Option<String>,
}

impl ParameterSchema for CreateTopicParameters {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "isSubmitKey": {"type": "boolean", "description": "Restrict submissions to the default account's key."},
                "topicMemo": {"type": "string", "description": "Memo for the topic."},
                "transactionMemo": {"type": "string", "description": "Memo to include with the transaction."}
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopicParametersNormalised {
    pub topic_memo: Option<String>,
    pub transaction_memo: Option<String>,
    pub auto_renew_account_id: Option<AccountId>,
    pub submit_key: Option<PublicKey>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTopicMessageParameters {
    pub topic_id: String,
    #[validate(length(min = 1, message = "message must not be empty"))]
    pub message: String,
    #[validate(length(max = 100))]
    pub transaction_memo: Option<String>,
}

impl ParameterSchema for SubmitTopicMessageParameters {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "topicId": {"type": "string", "description": "The topic to submit to."},
                "message": {"type": "string", "description": "The message to submit."},
                "transactionMemo": {"type": "string", "description": "Memo to include with the transaction."}
            },
            "required": ["topicId", "message"]
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTopicMessageParametersNormalised {
    pub topic_id: TopicId,
    pub message: String,
    pub transaction_memo: Option<String>,
}
