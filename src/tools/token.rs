// src/tools/token.rs

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{parse_params, Plugin, PromptGenerator, Tool, ToolOutput};
use crate::blockchain::builder::TransactionBuilder;
use crate::blockchain::client::LedgerClient;
use crate::blockchain::services::mirrornode::get_mirrornode_service;
use crate::blockchain::services::normaliser::{
    normalise_airdrop_fungible_token, normalise_create_fungible_token, normalise_create_non_fungible_token,
    normalise_mint_fungible_token, normalise_mint_non_fungible_token,
};
use crate::blockchain::services::strategy::{handle_transaction, RawTransactionResponse};
use crate::config::Context;
use crate::error::ToolError;
use crate::params::token::{
    AirdropFungibleTokenParameters, CreateFungibleTokenParameters, CreateNonFungibleTokenParameters,
    MintFungibleTokenParameters, MintNonFungibleTokenParameters,
};
use crate::params::ParameterSchema;

pub const CREATE_FUNGIBLE_TOKEN_TOOL: &str = "create_fungible_token_tool";
pub const CREATE_NON_FUNGIBLE_TOKEN_TOOL: &str = "create_non_fungible_token_tool";
pub const MINT_FUNGIBLE_TOKEN_TOOL: &str = "mint_fungible_token_tool";
pub const MINT_NON_FUNGIBLE_TOKEN_TOOL: &str = "mint_non_fungible_token_tool";
pub const AIRDROP_FUNGIBLE_TOKEN_TOOL: &str = "airdrop_fungible_token_tool";

/// Hedera Token Service tools.
pub fn core_hts_plugin() -> Plugin {
    Plugin {
        name: "core-hts-plugin",
        version: "1.0.0",
        description: "Fungible and non-fungible tokens on the Hedera Token Service",
        tools: vec![
            Arc::new(CreateFungibleTokenTool),
            Arc::new(CreateNonFungibleTokenTool),
            Arc::new(MintFungibleTokenTool),
            Arc::new(MintNonFungibleTokenTool),
            Arc::new(AirdropFungibleTokenTool),
        ],
    }
}

fn created_token_message(raw: &RawTransactionResponse) -> String {
    let token = raw
        .token_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    format!(
        "Token created successfully at address {} with transaction id {}",
        token, raw.transaction_id
    )
}

fn minted_token_message(raw: &RawTransactionResponse) -> String {
    format!("Tokens successfully minted with transaction id {}", raw.transaction_id)
}

fn airdropped_token_message(raw: &RawTransactionResponse) -> String {
    format!("Token successfully airdropped with transaction id {}", raw.transaction_id)
}

pub struct CreateFungibleTokenTool;

#[async_trait]
impl Tool for CreateFungibleTokenTool {
    fn method(&self) -> &'static str {
        CREATE_FUNGIBLE_TOKEN_TOOL
    }

    fn name(&self) -> &'static str {
        "Create Fungible Token"
    }

    fn description(&self, context: &Context) -> String {
        let treasury = PromptGenerator::account_parameter_description("treasuryAccountId", context);
        PromptGenerator::tool_prompt(
            context,
            "This tool creates a fungible token on Hedera.",
            &[
                "tokenName (str, required): The name of the token",
                "tokenSymbol (str, required): The symbol of the token",
                "initialSupply (number, optional): Initial supply in display units. Defaults to 0",
                "supplyType (str, optional): finite or infinite. Defaults to infinite",
                "maxSupply (number, optional): Maximum supply in display units. Required for finite supply",
                "decimals (int, optional): Number of decimals. Defaults to 0",
                &treasury,
                "isSupplyKey (bool, optional): Whether the default account's key becomes the supply key",
            ],
        )
    }

    fn parameters(&self) -> Value {
        CreateFungibleTokenParameters::schema()
    }

    async fn run(&self, client: &dyn LedgerClient, context: &Context, params: Value) -> Result<ToolOutput, ToolError> {
        let params: CreateFungibleTokenParameters = parse_params(params)?;
        let mirror = get_mirrornode_service(context, client.ledger_id());
        let normalised = normalise_create_fungible_token(params, context, client, mirror.as_ref()).await?;
        let tx = TransactionBuilder::create_token(normalised);
        Ok(handle_transaction(tx, client, context, Some(created_token_message)).await?.into())
    }
}

pub struct CreateNonFungibleTokenTool;

#[async_trait]
impl Tool for CreateNonFungibleTokenTool {
    fn method(&self) -> &'static str {
        CREATE_NON_FUNGIBLE_TOKEN_TOOL
    }

    fn name(&self) -> &'static str {
        "Create Non-Fungible Token"
    }

    fn description(&self, context: &Context) -> String {
        let treasury = PromptGenerator::account_parameter_description("treasuryAccountId", context);
        PromptGenerator::tool_prompt(
            context,
            "This tool creates a non-fungible token (NFT) collection on Hedera. The default account's key becomes the supply key.",
            &[
                "tokenName (str, required): The name of the collection",
                "tokenSymbol (str, required): The symbol of the collection",
                "maxSupply (int, optional): Maximum number of NFTs. Defaults to 100",
                &treasury,
            ],
        )
    }

    fn parameters(&self) -> Value {
        CreateNonFungibleTokenParameters::schema()
    }

    async fn run(&self, client: &dyn LedgerClient, context: &Context, params: Value) -> Result<ToolOutput, ToolError> {
        let params: CreateNonFungibleTokenParameters = parse_params(params)?;
        let mirror = get_mirrornode_service(context, client.ledger_id());
        let normalised = normalise_create_non_fungible_token(params, context, client, mirror.as_ref()).await?;
        let tx = TransactionBuilder::create_token(normalised);
        Ok(handle_transaction(tx, client, context, Some(created_token_message)).await?.into())
    }
}

pub struct MintFungibleTokenTool;

#[async_trait]
impl Tool for MintFungibleTokenTool {
    fn method(&self) -> &'static str {
        MINT_FUNGIBLE_TOKEN_TOOL
    }

    fn name(&self) -> &'static str {
        "Mint Fungible Token"
    }

    fn description(&self, context: &Context) -> String {
        PromptGenerator::tool_prompt(
            context,
            "This tool mints additional supply of an existing fungible token.",
            &[
                "tokenId (str, required): The token to mint",
                "amount (number, required): Amount in display units; converted with the token's decimals",
            ],
        )
    }

    fn parameters(&self) -> Value {
        MintFungibleTokenParameters::schema()
    }

    async fn run(&self, client: &dyn LedgerClient, context: &Context, params: Value) -> Result<ToolOutput, ToolError> {
        let params: MintFungibleTokenParameters = parse_params(params)?;
        let mirror = get_mirrornode_service(context, client.ledger_id());
        let normalised = normalise_mint_fungible_token(params, mirror.as_ref()).await?;
        let tx = TransactionBuilder::mint_token(normalised);
        Ok(handle_transaction(tx, client, context, Some(minted_token_message)).await?.into())
    }
}

pub struct MintNonFungibleTokenTool;

#[async_trait]
impl Tool for MintNonFungibleTokenTool {
    fn method(&self) -> &'static str {
        MINT_NON_FUNGIBLE_TOKEN_TOOL
    }

    fn name(&self) -> &'static str {
        "Mint Non-Fungible Token"
    }

    fn description(&self, context: &Context) -> String {
        PromptGenerator::tool_prompt(
            context,
            "This tool mints NFTs in an existing collection, one per metadata URI.",
            &[
                "tokenId (str, required): The collection to mint into",
                "uris (array of str, required): Metadata URIs, at most 10",
            ],
        )
    }

    fn parameters(&self) -> Value {
        MintNonFungibleTokenParameters::schema()
    }

    async fn run(&self, client: &dyn LedgerClient, context: &Context, params: Value) -> Result<ToolOutput, ToolError> {
        let params: MintNonFungibleTokenParameters = parse_params(params)?;
        let normalised = normalise_mint_non_fungible_token(params)?;
        let tx = TransactionBuilder::mint_token(normalised);
        Ok(handle_transaction(tx, client, context, Some(minted_token_message)).await?.into())
    }
}

pub struct AirdropFungibleTokenTool;

#[async_trait]
impl Tool for AirdropFungibleTokenTool {
    fn method(&self) -> &'static str {
        AIRDROP_FUNGIBLE_TOKEN_TOOL
    }

    fn name(&self) -> &'static str {
        "Airdrop Fungible Token"
    }

    fn description(&self, context: &Context) -> String {
        let source = PromptGenerator::account_parameter_description("sourceAccountId", context);
        PromptGenerator::tool_prompt(
            context,
            "This tool airdrops a fungible token to one or more recipients.",
            &[
                "tokenId (str, required): The token to airdrop",
                &source,
                "recipients (array, required): List of {accountId, amount}; amount is in display units",
                "transactionMemo (str, optional): Memo for the transaction",
            ],
        )
    }

    fn parameters(&self) -> Value {
        AirdropFungibleTokenParameters::schema()
    }

    async fn run(&self, client: &dyn LedgerClient, context: &Context, params: Value) -> Result<ToolOutput, ToolError> {
        let params: AirdropFungibleTokenParameters = parse_params(params)?;
        let mirror = get_mirrornode_service(context, client.ledger_id());
        let normalised = normalise_airdrop_fungible_token(params, context, client, mirror.as_ref()).await?;
        let tx = TransactionBuilder::airdrop_fungible_token(normalised)?;
        Ok(handle_transaction(tx, client, context, Some(airdropped_token_message)).await?.into())
    }
}
