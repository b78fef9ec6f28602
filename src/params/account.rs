// src/params/account.rs

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use super::ParameterSchema;
use crate::blockchain::models::{AccountId, AccountRef, Hbar, PublicKey};
use crate::blockchain::units::DisplayAmount;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountParameters {
    pub public_key: Option<String>,
    #[validate(length(max = 100))]
    pub account_memo: Option<String>,
    pub initial_balance: Option<DisplayAmount>,
    pub max_automatic_token_associations: Option<i32>,
}

impl ParameterSchema for CreateAccountParameters {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "publicKey": {"type": "string", "description": "Public key to use for the account. If not provided, the default account's key is used."},
                "accountMemo": {"type": "string", "description": "Optional memo for the account."},
                "initialBalance": {"type": ["number", "string"], "description": "Initial HBAR to fund the account. Defaults to 0."},
                "maxAutomaticTokenAssociations": {"type": "integer", "minimum": -1, "description": "Max automatic token associations; -1 means unlimited."}
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountParametersNormalised {
    pub public_key: PublicKey,
    pub account_memo: Option<String>,
    pub initial_balance: Hbar,
    pub max_automatic_token_associations: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountParameters {
    pub account_id: Option<String>,
    pub max_automatic_token_associations: Option<i32>,
    pub staked_account_id: Option<String>,
    #[validate(length(max = 100))]
    pub account_memo: Option<String>,
    pub decline_staking_reward: Option<bool>,
}

impl ParameterSchema for UpdateAccountParameters {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "accountId": {"type": "string", "description": "Account ID to update (e.g. 0.0.xxxxx). Defaults to the default account."},
                "maxAutomaticTokenAssociations": {"type": "integer", "minimum": -1, "description": "Max automatic token associations; -1 means unlimited."},
                "stakedAccountId": {"type": "string", "description": "Account to stake to."},
                "accountMemo": {"type": "string", "description": "New account memo."},
                "declineStakingReward": {"type": "boolean", "description": "Decline staking rewards."}
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountParametersNormalised {
    pub account_id: AccountId,
    pub max_automatic_token_associations: Option<i32>,
    pub staked_account_id: Option<AccountId>,
    pub account_memo: Option<String>,
    pub decline_staking_reward: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountParameters {
    pub account_id: String,
    pub transfer_account_id: Option<String>,
}

impl ParameterSchema for DeleteAccountParameters {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "accountId": {"type": "string", "description": "The account ID to delete."},
                "transferAccountId": {"type": "string", "description": "Account that receives the remaining balance. Defaults to the default account."}
            },
            "required": ["accountId"]
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountParametersNormalised {
    pub account_id: AccountId,
    pub transfer_account_id: AccountId,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HbarTransferEntry {
    pub account_id: String,
    pub amount: DisplayAmount,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransferHbarParameters {
    #[validate(length(min = 1, message = "at least one transfer is required"))]
    pub transfers: Vec<HbarTransferEntry>,
    pub source_account_id: Option<String>,
    #[validate(length(max = 100))]
    pub transaction_memo: Option<String>,
}

impl ParameterSchema for TransferHbarParameters {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "transfers": {
                    "type": "array",
                    "minItems": 1,
                    "description": "Array of HBAR transfers.",
                    "items": {
                        "type": "object",
                        "properties": {
                            "accountId": {"type": "string", "description": "Recipient account ID or EVM address."},
                            "amount": {"type": ["number", "string"], "description": "Amount of HBAR to transfer."}
                        },
                        "required": ["accountId", "amount"]
                    }
                },
                "sourceAccountId": {"type": "string", "description": "Sender account ID. Defaults to the default account."},
                "transactionMemo": {"type": "string", "description": "Memo to include with the transaction."}
            },
            "required": ["transfers"]
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HbarTransfer {
    pub account_id: AccountRef,
    pub amount: Hbar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferHbarParametersNormalised {
    pub hbar_transfers: Vec<HbarTransfer>,
    pub transaction_memo: Option<String>,
}
