// src/params/token.rs

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use super::ParameterSchema;
use crate::blockchain::models::{AccountId, AccountRef, PublicKey, TokenId, TokenSupplyType, TokenType};
use crate::blockchain::units::DisplayAmount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplyTypeParameter {
    Finite,
    Infinite,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFungibleTokenParameters {
    #[validate(length(max = 100))]
    pub token_name: String,
    #[validate(length(max = 100))]
    pub token_symbol: String,
    #[validate(length(max = 100))]
    pub token_memo: Option<String>,
    pub initial_supply: Option<DisplayAmount>,
    pub supply_type: Option<SupplyTypeParameter>,
    pub max_supply: Option<DisplayAmount>,
    #[validate(range(max = 18))]
    pub decimals: Option<u8>,
    pub treasury_account_id: Option<String>,
    pub is_supply_key: Option<bool>,
}

impl ParameterSchema for CreateFungibleTokenParameters {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "tokenName": {"type": "string", "description": "The name of the token."},
                "tokenSymbol": {"type": "string", "description": "The symbol of the token."},
                "tokenMemo": {"type": "string", "description": "Optional token memo."},
                "initialSupply": {"type": ["number", "string"], "description": "Initial supply in display units. Defaults to 0."},
                "supplyType": {"type": "string", "enum": ["finite", "infinite"], "description": "Supply type. Defaults to infinite."},
                "maxSupply": {"type": ["number", "string"], "description": "Maximum supply in display units. Required for finite supply."},
                "decimals": {"type": "integer", "minimum": 0, "maximum": 18, "description": "Number of decimals. Defaults to 0."},
                "treasuryAccountId": {"type": "string", "description": "Treasury account. Defaults to the default account."},
                "isSupplyKey": {"type": "boolean", "description": "Set the default account's key as supply key."}
            },
            "required": ["tokenName", "tokenSymbol"]
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNonFungibleTokenParameters {
    #[validate(length(max = 100))]
    pub token_name: String,
    #[validate(length(max = 100))]
    pub token_symbol: String,
    #[validate(range(min = 1))]
    pub max_supply: Option<u64>,
    pub treasury_account_id: Option<String>,
}

impl ParameterSchema for CreateNonFungibleTokenParameters {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "tokenName": {"type": "string", "description": "The name of the collection."},
                "tokenSymbol": {"type": "string", "description": "The symbol of the collection."},
                "maxSupply": {"type": "integer", "minimum": 1, "description": "Maximum number of NFTs. Defaults to 100."},
                "treasuryAccountId": {"type": "string", "description": "Treasury account. Defaults to the default account."}
            },
            "required": ["tokenName", "tokenSymbol"]
        })
    }
}

/// Shared by fungible and non-fungible token creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenParametersNormalised {
    pub token_name: String,
    pub token_symbol: String,
    pub token_memo: Option<String>,
    pub token_type: TokenType,
    pub decimals: u8,
    pub initial_supply: i64,
    pub supply_type: TokenSupplyType,
    pub max_supply: Option<i64>,
    pub treasury_account_id: AccountRef,
    pub supply_key: Option<PublicKey>,
    pub auto_renew_account_id: Option<AccountId>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MintFungibleTokenParameters {
    pub token_id: String,
    pub amount: DisplayAmount,
}

impl ParameterSchema for MintFungibleTokenParameters {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "tokenId": {"type": "string", "description": "The token to mint."},
                "amount": {"type": ["number", "string"], "description": "Amount to mint in display units."}
            },
            "required": ["tokenId", "amount"]
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MintNonFungibleTokenParameters {
    pub token_id: String,
    #[validate(length(min = 1, max = 10))]
    pub uris: Vec<String>,
}

impl ParameterSchema for MintNonFungibleTokenParameters {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "tokenId": {"type": "string", "description": "The NFT collection to mint into."},
                "uris": {"type": "array", "items": {"type": "string"}, "minItems": 1, "maxItems": 10, "description": "Metadata URIs, one per NFT."}
            },
            "required": ["tokenId", "uris"]
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintTokenParametersNormalised {
    pub token_id: TokenId,
    /// Base units; zero for NFT mints.
    pub amount: u64,
    #[serde(with = "super::hex_list")]
    pub metadata: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AirdropRecipient {
    pub account_id: String,
    pub amount: DisplayAmount,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AirdropFungibleTokenParameters {
    pub token_id: String,
    pub source_account_id: Option<String>,
    #[validate(length(min = 1, message = "at least one recipient is required"))]
    pub recipients: Vec<AirdropRecipient>,
    #[validate(length(max = 100))]
    pub transaction_memo: Option<String>,
}

impl ParameterSchema for AirdropFungibleTokenParameters {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "tokenId": {"type": "string", "description": "The token to airdrop."},
                "sourceAccountId": {"type": "string", "description": "Account sending the tokens. Defaults to the default account."},
                "recipients": {
                    "type": "array",
                    "minItems": 1,
                    "items": {
                        "type": "object",
                        "properties": {
                            "accountId": {"type": "string", "description": "Recipient account ID or EVM address."},
                            "amount": {"type": ["number", "string"], "description": "Amount in display units."}
                        },
                        "required": ["accountId", "amount"]
                    }
                },
                "transactionMemo": {"type": "string", "description": "Memo to include with the transaction."}
            },
            "required": ["tokenId", "recipients"]
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfer {
    pub token_id: TokenId,
    pub account_id: AccountRef,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirdropFungibleTokenParametersNormalised {
    pub token_transfers: Vec<TokenTransfer>,
    pub transaction_memo: Option<String>,
}
