// src/blockchain/services/normaliser/consensus.rs

use std::str::FromStr;

use validator::Validate;

use crate::blockchain::client::LedgerClient;
use crate::blockchain::models::TopicId;
use crate::blockchain::services::mirrornode::MirrorNodeService;
use crate::blockchain::services::resolver::{default_account, default_account_public_key};
use crate::config::Context;
use crate::error::ToolError;
use crate::params::consensus::{
    CreateTopicParameters, CreateTopicParametersNormalised, SubmitTopicMessageParameters,
    SubmitTopicMessageParametersNormalised,
};

pub async fn normalise_create_topic(
    params: CreateTopicParameters,
    context: &Context,
    client: &dyn LedgerClient,
    mirror: &dyn MirrorNodeService,
) -> Result<CreateTopicParametersNormalised, ToolError> {
    params.validate()?;

    let submit_key = if params.is_submit_key == Some(true) {
        let key = default_account_public_key(context, client, mirror).await?.ok_or_else(|| {
            ToolError::InsufficientContext("Could not determine default account ID for submit key".to_string())
        })?;
        Some(key)
    } else {
        None
    };

    Ok(CreateTopicParametersNormalised {
        topic_memo: params.topic_memo,
        transaction_memo: params.transaction_memo,
        auto_renew_account_id: default_account(context, client),
        submit_key,
    })
}

pub fn normalise_submit_topic_message(
    params: SubmitTopicMessageParameters,
) -> Result<SubmitTopicMessageParametersNormalised, ToolError> {
    params.validate()?;
    Ok(SubmitTopicMessageParametersNormalised {
        topic_id: TopicId::from_str(&params.topic_id)?,
        message: params.message,
        transaction_memo: params.transaction_memo,
    })
}
