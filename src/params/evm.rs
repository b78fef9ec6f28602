// src/params/evm.rs

use ethers_core::types::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use super::ParameterSchema;
use crate::blockchain::models::ContractId;
use crate::blockchain::units::TokenAmount;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateErc20Parameters {
    pub token_name: String,
    pub token_symbol: String,
    #[validate(range(max = 18))]
    pub decimals: Option<u8>,
    pub initial_supply: Option<TokenAmount>,
}

impl ParameterSchema for CreateErc20Parameters {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "tokenName": {"type": "string", "description": "The name of the token."},
                "tokenSymbol": {"type": "string", "description": "The symbol of the token."},
                "decimals": {"type": "integer", "minimum": 0, "maximum": 18, "description": "Number of decimals. Defaults to 18."},
                "initialSupply": {"type": ["integer", "string"], "description": "Initial supply. Defaults to 0."}
            },
            "required": ["tokenName", "tokenSymbol"]
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateErc721Parameters {
    pub token_name: String,
    pub token_symbol: String,
    #[serde(rename = "baseURI", alias = "baseUri")]
    pub base_uri: Option<String>,
}

impl ParameterSchema for CreateErc721Parameters {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "tokenName": {"type": "string", "description": "The name of the collection."},
                "tokenSymbol": {"type": "string", "description": "The symbol of the collection."},
                "baseURI": {"type": "string", "description": "Base URI for token metadata. Defaults to empty."}
            },
            "required": ["tokenName", "tokenSymbol"]
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransferErc20Parameters {
    pub contract_id: String,
    pub recipient_address: String,
    pub amount: TokenAmount,
}

impl ParameterSchema for TransferErc20Parameters {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "contractId": {"type": "string", "description": "The ERC20 contract (native id or EVM address)."},
                "recipientAddress": {"type": "string", "description": "Recipient (native id or EVM address)."},
                "amount": {"type": ["integer", "string"], "description": "Amount in the token's base units."}
            },
            "required": ["contractId", "recipientAddress", "amount"]
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApproveErc20Parameters {
    pub contract_id: String,
    pub spender_address: String,
    pub amount: TokenAmount,
}

impl ParameterSchema for ApproveErc20Parameters {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "contractId": {"type": "string", "description": "The ERC20 contract (native id or EVM address)."},
                "spenderAddress": {"type": "string", "description": "Spender (native id or EVM address)."},
                "amount": {"type": ["integer", "string"], "description": "Allowance in base units. Up to 2^256-1."}
            },
            "required": ["contractId", "spenderAddress", "amount"]
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransferErc721Parameters {
    pub contract_id: String,
    pub from_address: String,
    pub to_address: String,
    pub token_id: TokenAmount,
}

impl ParameterSchema for TransferErc721Parameters {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "contractId": {"type": "string", "description": "The ERC721 contract (native id or EVM address)."},
                "fromAddress": {"type": "string", "description": "Current owner (native id or EVM address)."},
                "toAddress": {"type": "string", "description": "New owner (native id or EVM address)."},
                "tokenId": {"type": ["integer", "string"], "description": "The token to transfer."}
            },
            "required": ["contractId", "fromAddress", "toAddress", "tokenId"]
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MintErc721Parameters {
    pub contract_id: String,
    pub to_address: String,
}

impl ParameterSchema for MintErc721Parameters {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "contractId": {"type": "string", "description": "The ERC721 contract (native id or EVM address)."},
                "toAddress": {"type": "string", "description": "Recipient of the new token (native id or EVM address)."}
            },
            "required": ["contractId", "toAddress"]
        })
    }
}

/// Normalised form of every contract call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractExecuteParametersNormalised {
    pub contract_id: ContractId,
    pub function_parameters: Bytes,
    pub gas: u64,
}
