// src/blockchain/services/normaliser/evm.rs

use ethers_core::abi::Token;
use ethers_core::types::U256;
use tracing::debug;
use validator::Validate;

use crate::blockchain::abi::{
    encode_call, CALL_GAS, DEPLOY_GAS, ERC20_APPROVE, ERC20_FACTORY_DEPLOY, ERC20_TRANSFER,
    ERC721_FACTORY_DEPLOY, ERC721_SAFE_MINT, ERC721_TRANSFER_FROM,
};
use crate::blockchain::models::{ContractId, LedgerId};
use crate::blockchain::services::mirrornode::MirrorNodeService;
use crate::blockchain::services::resolver::{to_account_id, to_evm_address};
use crate::error::ToolError;
use crate::params::evm::{
    ApproveErc20Parameters, ContractExecuteParametersNormalised, CreateErc20Parameters,
    CreateErc721Parameters, MintErc721Parameters, TransferErc20Parameters, TransferErc721Parameters,
};

const DEFAULT_ERC20_DECIMALS: u8 = 18;

/// Picks the configured factory, else the one published for `ledger`.
pub fn resolve_factory(
    configured: Option<ContractId>,
    published: Option<ContractId>,
    kind: &str,
    ledger: LedgerId,
) -> Result<ContractId, ToolError> {
    configured
        .or(published)
        .ok_or_else(|| ToolError::validation(format!("No {} factory contract is available on {}", kind, ledger)))
}

async fn resolve_contract(contract: &str, mirror: &dyn MirrorNodeService) -> Result<ContractId, ToolError> {
    to_account_id(contract, mirror).await.map(ContractId::from)
}

pub fn normalise_create_erc20(
    params: CreateErc20Parameters,
    factory: ContractId,
) -> Result<ContractExecuteParametersNormalised, ToolError> {
    params.validate()?;
    let decimals = params.decimals.unwrap_or(DEFAULT_ERC20_DECIMALS);
    let initial_supply = params.initial_supply.map(|a| a.value()).unwrap_or_else(U256::zero);

    let function_parameters = encode_call(
        ERC20_FACTORY_DEPLOY,
        vec![
            Token::String(params.token_name),
            Token::String(params.token_symbol),
            Token::Uint(U256::from(decimals)),
            Token::Uint(initial_supply),
        ],
    );

    Ok(ContractExecuteParametersNormalised {
        contract_id: factory,
        function_parameters,
        gas: DEPLOY_GAS,
    })
}

pub fn normalise_create_erc721(
    params: CreateErc721Parameters,
    factory: ContractId,
) -> Result<ContractExecuteParametersNormalised, ToolError> {
    params.validate()?;
    let function_parameters = encode_call(
        ERC721_FACTORY_DEPLOY,
        vec![
            Token::String(params.token_name),
            Token::String(params.token_symbol),
            Token::String(params.base_uri.unwrap_or_default()),
        ],
    );

    Ok(ContractExecuteParametersNormalised {
        contract_id: factory,
        function_parameters,
        gas: DEPLOY_GAS,
    })
}

pub async fn normalise_transfer_erc20(
    params: TransferErc20Parameters,
    mirror: &dyn MirrorNodeService,
) -> Result<ContractExecuteParametersNormalised, ToolError> {
    params.validate()?;
    let recipient = to_evm_address(&params.recipient_address, mirror).await?;
    let contract_id = resolve_contract(&params.contract_id, mirror).await?;
    debug!("ERC20 transfer of {} to {:#x} on {}", params.amount.value(), recipient, contract_id);

    Ok(ContractExecuteParametersNormalised {
        contract_id,
        function_parameters: encode_call(
            ERC20_TRANSFER,
            vec![Token::Address(recipient), Token::Uint(params.amount.value())],
        ),
        gas: CALL_GAS,
    })
}

pub async fn normalise_approve_erc20(
    params: ApproveErc20Parameters,
    mirror: &dyn MirrorNodeService,
) -> Result<ContractExecuteParametersNormalised, ToolError> {
    params.validate()?;
    let spender = to_evm_address(&params.spender_address, mirror).await?;
    let contract_id = resolve_contract(&params.contract_id, mirror).await?;

    Ok(ContractExecuteParametersNormalised {
        contract_id,
        function_parameters: encode_call(
            ERC20_APPROVE,
            vec![Token::Address(spender), Token::Uint(params.amount.value())],
        ),
        gas: CALL_GAS,
    })
}

pub async fn normalise_transfer_erc721(
    params: TransferErc721Parameters,
    mirror: &dyn MirrorNodeService,
) -> Result<ContractExecuteParametersNormalised, ToolError> {
    params.validate()?;
    let from = to_evm_address(&params.from_address, mirror).await?;
    let to = to_evm_address(&params.to_address, mirror).await?;
    let contract_id = resolve_contract(&params.contract_id, mirror).await?;

    Ok(ContractExecuteParametersNormalised {
        contract_id,
        function_parameters: encode_call(
            ERC721_TRANSFER_FROM,
            vec![Token::Address(from), Token::Address(to), Token::Uint(params.token_id.value())],
        ),
        gas: CALL_GAS,
    })
}

pub async fn normalise_mint_erc721(
    params: MintErc721Parameters,
    mirror: &dyn MirrorNodeService,
) -> Result<ContractExecuteParametersNormalised, ToolError> {
    params.validate()?;
    let to = to_evm_address(&params.to_address, mirror).await?;
    let contract_id = resolve_contract(&params.contract_id, mirror).await?;

    Ok(ContractExecuteParametersNormalised {
        contract_id,
        function_parameters: encode_call(ERC721_SAFE_MINT, vec![Token::Address(to)]),
        gas: CALL_GAS,
    })
}
