// src/tools/evm.rs

//! ERC20 and ERC721 tools. Deployments go through factory contracts; the
//! other operations are plain contract calls with EVM-address arguments.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use ethers_core::types::Address;
use serde_json::Value;
use tracing::{info, warn};

use super::{parse_params, DeployResult, Plugin, PromptGenerator, Tool, ToolOutput};
use crate::blockchain::abi::{decode_address, default_erc20_factory, default_erc721_factory};
use crate::blockchain::builder::TransactionBuilder;
use crate::blockchain::client::LedgerClient;
use crate::blockchain::models::{ContractId, TransactionId};
use crate::blockchain::services::mirrornode::{get_mirrornode_service, MirrorNodeService};
use crate::blockchain::services::normaliser::{
    normalise_approve_erc20, normalise_create_erc20, normalise_create_erc721, normalise_mint_erc721,
    normalise_transfer_erc20, normalise_transfer_erc721, resolve_factory,
};
use crate::blockchain::services::strategy::{
    handle_transaction, ExecuteStrategyResult, RawTransactionResponse, TransactionOutcome,
};
use crate::config::Context;
use crate::error::ToolError;
use crate::params::evm::{
    ApproveErc20Parameters, ContractExecuteParametersNormalised, CreateErc20Parameters, CreateErc721Parameters,
    MintErc721Parameters, TransferErc20Parameters, TransferErc721Parameters,
};
use crate::params::ParameterSchema;

pub const CREATE_ERC20_TOOL: &str = "create_erc20_tool";
pub const TRANSFER_ERC20_TOOL: &str = "transfer_erc20_tool";
pub const APPROVE_ERC20_TOOL: &str = "approve_erc20_tool";
pub const CREATE_ERC721_TOOL: &str = "create_erc721_tool";
pub const TRANSFER_ERC721_TOOL: &str = "transfer_erc721_tool";
pub const MINT_ERC721_TOOL: &str = "mint_erc721_tool";

/// Factory overrides take precedence over the addresses published per network.
pub fn core_evm_plugin(erc20_factory: Option<ContractId>, erc721_factory: Option<ContractId>) -> Plugin {
    Plugin {
        name: "core-evm-plugin",
        version: "1.0.0",
        description: "ERC20 and ERC721 tokens through Hedera smart contracts",
        tools: vec![
            Arc::new(CreateErc20Tool { factory: erc20_factory }),
            Arc::new(TransferErc20Tool),
            Arc::new(ApproveErc20Tool),
            Arc::new(CreateErc721Tool { factory: erc721_factory }),
            Arc::new(TransferErc721Tool),
            Arc::new(MintErc721Tool),
        ],
    }
}

#[derive(Debug, Clone, Copy)]
enum Standard {
    Erc20,
    Erc721,
}

impl Standard {
    fn label(self) -> &'static str {
        match self {
            Standard::Erc20 => "ERC20",
            Standard::Erc721 => "ERC721",
        }
    }
}

/// Reads the deployed token address from the factory's return value.
async fn deployed_address(
    raw: &RawTransactionResponse,
    mirror: &dyn MirrorNodeService,
) -> Result<Address, ToolError> {
    let transaction_id = TransactionId::from_str(&raw.transaction_id)?;
    let result = mirror.get_contract_result(&transaction_id).await?;
    let call_result = result
        .call_result
        .ok_or_else(|| ToolError::Abi("contract result carries no return data".to_string()))?;
    decode_address(&call_result)
        .ok_or_else(|| ToolError::Abi(format!("cannot decode an address from {}", call_result)))
}

async fn deploy(
    normalised: ContractExecuteParametersNormalised,
    standard: Standard,
    client: &dyn LedgerClient,
    context: &Context,
) -> Result<ToolOutput, ToolError> {
    let tx = TransactionBuilder::execute_contract(normalised);
    let result: ExecuteStrategyResult = match handle_transaction(tx, client, context, None).await? {
        TransactionOutcome::Executed(result) => result,
        bytes => return Ok(bytes.into()),
    };

    let mirror = get_mirrornode_service(context, client.ledger_id());
    let (address, message) = match deployed_address(&result.raw, mirror.as_ref()).await {
        Ok(address) => {
            let address = format!("{:#x}", address);
            info!("{} token deployed at {}", standard.label(), address);
            let message = format!("{} token created successfully at address {}", standard.label(), address);
            (Some(address), message)
        }
        Err(e) => {
            warn!("Could not read the deployed address for {}: {}", result.raw.transaction_id, e);
            let message = format!(
                "{} token deployment {} succeeded, but the token address could not be determined: {}",
                standard.label(),
                result.raw.transaction_id,
                e
            );
            (None, message)
        }
    };

    let (erc20_address, erc721_address) = match standard {
        Standard::Erc20 => (address, None),
        Standard::Erc721 => (None, address),
    };
    Ok(ToolOutput::Deployed(DeployResult {
        result,
        erc20_address,
        erc721_address,
        message,
    }))
}

fn contract_call_message(raw: &RawTransactionResponse) -> String {
    format!("Contract call executed successfully. Transaction ID: {}", raw.transaction_id)
}

pub struct CreateErc20Tool {
    factory: Option<ContractId>,
}

#[async_trait]
impl Tool for CreateErc20Tool {
    fn method(&self) -> &'static str {
        CREATE_ERC20_TOOL
    }

    fn name(&self) -> &'static str {
        "Create ERC20 Token"
    }

    fn description(&self, context: &Context) -> String {
        PromptGenerator::tool_prompt(
            context,
            "This tool creates an ERC20 token on Hedera by calling the ERC20 factory contract.",
            &[
                "tokenName (str, required): The name of the token",
                "tokenSymbol (str, required): The symbol of the token",
                "decimals (int, optional): The number of decimals the token supports. Defaults to 18",
                "initialSupply (int, optional): The initial supply of the token. Defaults to 0",
            ],
        )
    }

    fn parameters(&self) -> Value {
        CreateErc20Parameters::schema()
    }

    async fn run(&self, client: &dyn LedgerClient, context: &Context, params: Value) -> Result<ToolOutput, ToolError> {
        let params: CreateErc20Parameters = parse_params(params)?;
        let ledger = client.ledger_id();
        let factory = resolve_factory(self.factory, default_erc20_factory(ledger), "ERC20", ledger)?;
        let normalised = normalise_create_erc20(params, factory)?;
        deploy(normalised, Standard::Erc20, client, context).await
    }
}

pub struct CreateErc721Tool {
    factory: Option<ContractId>,
}

#[async_trait]
impl Tool for CreateErc721Tool {
    fn method(&self) -> &'static str {
        CREATE_ERC721_TOOL
    }

    fn name(&self) -> &'static str {
        "Create ERC721 Token"
    }

    fn description(&self, context: &Context) -> String {
        PromptGenerator::tool_prompt(
            context,
            "This tool creates an ERC721 token on Hedera by calling the ERC721 factory contract.",
            &[
                "tokenName (str, required): The name of the token",
                "tokenSymbol (str, required): The symbol of the token",
                "baseURI (str, optional): Base URI for token metadata",
            ],
        )
    }

    fn parameters(&self) -> Value {
        CreateErc721Parameters::schema()
    }

    async fn run(&self, client: &dyn LedgerClient, context: &Context, params: Value) -> Result<ToolOutput, ToolError> {
        let params: CreateErc721Parameters = parse_params(params)?;
        let ledger = client.ledger_id();
        let factory = resolve_factory(self.factory, default_erc721_factory(ledger), "ERC721", ledger)?;
        let normalised = normalise_create_erc721(params, factory)?;
        deploy(normalised, Standard::Erc721, client, context).await
    }
}

pub struct TransferErc20Tool;

#[async_trait]
impl Tool for TransferErc20Tool {
    fn method(&self) -> &'static str {
        TRANSFER_ERC20_TOOL
    }

    fn name(&self) -> &'static str {
        "Transfer ERC20"
    }

    fn description(&self, context: &Context) -> String {
        PromptGenerator::tool_prompt(
            context,
            "This tool transfers ERC20 tokens to a recipient.",
            &[
                "contractId (str, required): The token contract, as an ID or EVM address",
                "recipientAddress (str, required): Recipient account ID or EVM address",
                "amount (int, required): Amount in base units",
            ],
        )
    }

    fn parameters(&self) -> Value {
        TransferErc20Parameters::schema()
    }

    async fn run(&self, client: &dyn LedgerClient, context: &Context, params: Value) -> Result<ToolOutput, ToolError> {
        let params: TransferErc20Parameters = parse_params(params)?;
        let mirror = get_mirrornode_service(context, client.ledger_id());
        let normalised = normalise_transfer_erc20(params, mirror.as_ref()).await?;
        let tx = TransactionBuilder::execute_contract(normalised);
        Ok(handle_transaction(tx, client, context, Some(contract_call_message)).await?.into())
    }
}

pub struct ApproveErc20Tool;

#[async_trait]
impl Tool for ApproveErc20Tool {
    fn method(&self) -> &'static str {
        APPROVE_ERC20_TOOL
    }

    fn name(&self) -> &'static str {
        "Approve ERC20"
    }

    fn description(&self, context: &Context) -> String {
        PromptGenerator::tool_prompt(
            context,
            "This tool approves a spender to move ERC20 tokens on behalf of the default account.",
            &[
                "contractId (str, required): The token contract, as an ID or EVM address",
                "spenderAddress (str, required): Spender account ID or EVM address",
                "amount (int, required): Allowance in base units",
            ],
        )
    }

    fn parameters(&self) -> Value {
        ApproveErc20Parameters::schema()
    }

    async fn run(&self, client: &dyn LedgerClient, context: &Context, params: Value) -> Result<ToolOutput, ToolError> {
        let params: ApproveErc20Parameters = parse_params(params)?;
        let mirror = get_mirrornode_service(context, client.ledger_id());
        let normalised = normalise_approve_erc20(params, mirror.as_ref()).await?;
        let tx = TransactionBuilder::execute_contract(normalised);
        Ok(handle_transaction(tx, client, context, Some(contract_call_message)).await?.into())
    }
}

pub struct TransferErc721Tool;

#[async_trait]
impl Tool for TransferErc721Tool {
    fn method(&self) -> &'static str {
        TRANSFER_ERC721_TOOL
    }

    fn name(&self) -> &'static str {
        "Transfer ERC721"
    }

    fn description(&self, context: &Context) -> String {
        PromptGenerator::tool_prompt(
            context,
            "This tool transfers an ERC721 token between accounts.",
            &[
                "contractId (str, required): The token contract, as an ID or EVM address",
                "fromAddress (str, required): Current owner account ID or EVM address",
                "toAddress (str, required): Recipient account ID or EVM address",
                "tokenId (int, required): The token to transfer",
            ],
        )
    }

    fn parameters(&self) -> Value {
        TransferErc721Parameters::schema()
    }

    async fn run(&self, client: &dyn LedgerClient, context: &Context, params: Value) -> Result<ToolOutput, ToolError> {
        let params: TransferErc721Parameters = parse_params(params)?;
        let mirror = get_mirrornode_service(context, client.ledger_id());
        let normalised = normalise_transfer_erc721(params, mirror.as_ref()).await?;
        let tx = TransactionBuilder::execute_contract(normalised);
        Ok(handle_transaction(tx, client, context, Some(contract_call_message)).await?.into())
    }
}

pub struct MintErc721Tool;

#[async_trait]
impl Tool for MintErc721Tool {
    fn method(&self) -> &'static str {
        MINT_ERC721_TOOL
    }

    fn name(&self) -> &'static str {
        "Mint ERC721"
    }

    fn description(&self, context: &Context) -> String {
        PromptGenerator::tool_prompt(
            context,
            "This tool mints a new ERC721 token to an account.",
            &[
                "contractId (str, required): The token contract, as an ID or EVM address",
                "toAddress (str, required): Recipient account ID or EVM address",
            ],
        )
    }

    fn parameters(&self) -> Value {
        MintErc721Parameters::schema()
    }

    async fn run(&self, client: &dyn LedgerClient, context: &Context, params: Value) -> Result<ToolOutput, ToolError> {
        let params: MintErc721Parameters = parse_params(params)?;
        let mirror = get_mirrornode_service(context, client.ledger_id());
        let normalised = normalise_mint_erc721(params, mirror.as_ref()).await?;
        let tx = TransactionBuilder::execute_contract(normalised);
        Ok(handle_transaction(tx, client, context, Some(contract_call_message)).await?.into())
    }
}
