// src/blockchain/services/normaliser/token.rs

use std::str::FromStr;

use tracing::debug;
use validator::Validate;

use super::{sum_overflow, to_base_i64};
use crate::blockchain::client::LedgerClient;
use crate::blockchain::models::{AccountRef, TokenId, TokenSupplyType, TokenType};
use crate::blockchain::services::mirrornode::MirrorNodeService;
use crate::blockchain::services::resolver::{
    default_account, default_account_public_key, parse_account_ref, resolve_account,
};
use crate::config::Context;
use crate::error::ToolError;
use crate::params::token::{
    AirdropFungibleTokenParameters, AirdropFungibleTokenParametersNormalised,
    CreateFungibleTokenParameters, CreateNonFungibleTokenParameters, CreateTokenParametersNormalised,
    MintFungibleTokenParameters, MintNonFungibleTokenParameters, MintTokenParametersNormalised,
    SupplyTypeParameter, TokenTransfer,
};

const DEFAULT_NFT_MAX_SUPPLY: u64 = 100;

fn resolve_treasury(
    given: Option<&str>,
    context: &Context,
    client: &dyn LedgerClient,
) -> Result<AccountRef, ToolError> {
    match given.map(str::trim).filter(|s| !s.is_empty()) {
        Some(treasury) => parse_account_ref(treasury),
        None => default_account(context, client)
            .map(AccountRef::Id)
            .ok_or_else(|| ToolError::InsufficientContext("Must include treasury account ID".to_string())),
    }
}

async fn token_decimals(token_id: &TokenId, mirror: &dyn MirrorNodeService) -> Result<u8, ToolError> {
    let info = mirror.get_token_info(&token_id.to_string()).await?;
    Ok(info.decimals()?)
}

pub async fn normalise_create_fungible_token(
    params: CreateFungibleTokenParameters,
    context: &Context,
    client: &dyn LedgerClient,
    mirror: &dyn MirrorNodeService,
) -> Result<CreateTokenParametersNormalised, ToolError> {
    params.validate()?;
    let treasury_account_id = resolve_treasury(params.treasury_account_id.as_deref(), context, client)?;

    let decimals = params.decimals.unwrap_or(0);
    let initial_supply = match &params.initial_supply {
        Some(amount) => to_base_i64(amount, decimals)?,
        None => 0,
    };

    let supply_type = match params.supply_type.unwrap_or(SupplyTypeParameter::Infinite) {
        SupplyTypeParameter::Finite => TokenSupplyType::Finite,
        SupplyTypeParameter::Infinite => TokenSupplyType::Infinite,
    };

    let max_supply = match supply_type {
        TokenSupplyType::Finite => {
            let missing = || ToolError::validation("Must include max supply for finite supply type");
            let max_supply = to_base_i64(params.max_supply.as_ref().ok_or_else(missing)?, decimals)?;
            if max_supply == 0 {
                return Err(missing());
            }
            if initial_supply > max_supply {
                return Err(ToolError::validation(format!(
                    "Initial supply ({}) cannot exceed max supply ({})",
                    initial_supply, max_supply
                )));
            }
            Some(max_supply)
        }
        TokenSupplyType::Infinite => None,
    };

    let supply_key = if params.is_supply_key == Some(true) {
        let key = default_account_public_key(context, client, mirror).await?.ok_or_else(|| {
            ToolError::InsufficientContext("Could not determine a public key for the supply key".to_string())
        })?;
        Some(key)
    } else {
        None
    };

    let normalised = CreateTokenParametersNormalised {
        token_name: params.token_name,
        token_symbol: params.token_symbol,
        token_memo: params.token_memo,
        token_type: TokenType::FungibleCommon,
        decimals,
        initial_supply,
        supply_type,
        max_supply,
        treasury_account_id,
        supply_key,
        auto_renew_account_id: default_account(context, client),
    };
    debug!("Normalised fungible token create: {:?}", normalised);
    Ok(normalised)
}

pub async fn normalise_create_non_fungible_token(
    params: CreateNonFungibleTokenParameters,
    context: &Context,
    client: &dyn LedgerClient,
    mirror: &dyn MirrorNodeService,
) -> Result<CreateTokenParametersNormalised, ToolError> {
    params.validate()?;
    let treasury_account_id = resolve_treasury(params.treasury_account_id.as_deref(), context, client)?;

    // An NFT collection always carries a supply key.
    let supply_key = default_account_public_key(context, client, mirror).await?.ok_or_else(|| {
        ToolError::InsufficientContext("Could not determine a public key for the supply key".to_string())
    })?;

    let max_supply = params.max_supply.unwrap_or(DEFAULT_NFT_MAX_SUPPLY);
    let max_supply = i64::try_from(max_supply)
        .map_err(|_| ToolError::InvalidAmount(format!("Invalid max supply: {}", max_supply)))?;

    Ok(CreateTokenParametersNormalised {
        token_name: params.token_name,
        token_symbol: params.token_symbol,
        token_memo: None,
        token_type: TokenType::NonFungibleUnique,
        decimals: 0,
        initial_supply: 0,
        supply_type: TokenSupplyType::Finite,
        max_supply: Some(max_supply),
        treasury_account_id,
        supply_key: Some(supply_key),
        auto_renew_account_id: default_account(context, client),
    })
}

pub async fn normalise_mint_fungible_token(
    params: MintFungibleTokenParameters,
    mirror: &dyn MirrorNodeService,
) -> Result<MintTokenParametersNormalised, ToolError> {
    params.validate()?;
    let token_id = TokenId::from_str(&params.token_id)?;
    let decimals = token_decimals(&token_id, mirror).await?;
    let amount = to_base_i64(&params.amount, decimals)?;

    Ok(MintTokenParametersNormalised {
        token_id,
        amount: amount as u64,
        metadata: Vec::new(),
    })
}

pub fn normalise_mint_non_fungible_token(
    params: MintNonFungibleTokenParameters,
) -> Result<MintTokenParametersNormalised, ToolError> {
    params.validate()?;
    let token_id = TokenId::from_str(&params.token_id)?;
    let metadata = params.uris.into_iter().map(String::into_bytes).collect();

    Ok(MintTokenParametersNormalised {
        token_id,
        amount: 0,
        metadata,
    })
}

/// Builds the token transfer list. Zero-amount recipients are allowed; negative ones are not.
pub async fn normalise_airdrop_fungible_token(
    params: AirdropFungibleTokenParameters,
    context: &Context,
    client: &dyn LedgerClient,
    mirror: &dyn MirrorNodeService,
) -> Result<AirdropFungibleTokenParametersNormalised, ToolError> {
    params.validate()?;
    let source = resolve_account(params.source_account_id.as_deref(), context, client)?;
    let token_id = TokenId::from_str(&params.token_id)?;
    let decimals = token_decimals(&token_id, mirror).await?;

    let mut token_transfers = Vec::with_capacity(params.recipients.len() + 1);
    let mut total: i64 = 0;
    for recipient in &params.recipients {
        if recipient.amount.is_negative() {
            return Err(ToolError::InvalidAmount(format!(
                "Invalid recipient amount: {}",
                recipient.amount
            )));
        }
        let amount = to_base_i64(&recipient.amount, decimals)?;
        total = total.checked_add(amount).ok_or_else(sum_overflow)?;
        token_transfers.push(TokenTransfer {
            token_id,
            account_id: parse_account_ref(&recipient.account_id)?,
            amount,
        });
    }

    token_transfers.push(TokenTransfer {
        token_id,
        account_id: source,
        amount: -total,
    });

    Ok(AirdropFungibleTokenParametersNormalised {
        token_transfers,
        transaction_memo: params.transaction_memo,
    })
}
