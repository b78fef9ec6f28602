// src/blockchain/services/normaliser/account.rs

use std::str::FromStr;

use tracing::debug;
use validator::Validate;

use super::{sum_overflow, to_hbar};
use crate::blockchain::client::LedgerClient;
use crate::blockchain::models::{AccountId, Hbar, PublicKey};
use crate::blockchain::services::mirrornode::MirrorNodeService;
use crate::blockchain::services::resolver::{
    default_account_public_key, parse_account_ref, resolve_account, resolve_account_id, to_account_id,
};
use crate::config::Context;
use crate::error::ToolError;
use crate::params::account::{
    CreateAccountParameters, CreateAccountParametersNormalised, DeleteAccountParameters,
    DeleteAccountParametersNormalised, HbarTransfer, TransferHbarParameters,
    TransferHbarParametersNormalised, UpdateAccountParameters, UpdateAccountParametersNormalised,
};

fn check_associations(value: Option<i32>) -> Result<(), ToolError> {
    match value {
        Some(v) if v < -1 => Err(ToolError::validation(format!(
            "maxAutomaticTokenAssociations must be -1 (unlimited) or greater, got {}",
            v
        ))),
        _ => Ok(()),
    }
}

pub async fn normalise_create_account(
    params: CreateAccountParameters,
    context: &Context,
    client: &dyn LedgerClient,
    mirror: &dyn MirrorNodeService,
) -> Result<CreateAccountParametersNormalised, ToolError> {
    params.validate()?;
    check_associations(params.max_automatic_token_associations)?;

    let public_key = match params.public_key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        Some(key) => PublicKey::from_str(key)?,
        None => default_account_public_key(context, client, mirror)
            .await?
            .ok_or_else(|| {
                ToolError::InsufficientContext(
                    "Unable to resolve public key: no key was given and no default account key was found"
                        .to_string(),
                )
            })?,
    };

    // Zero is a valid opening balance.
    let initial_balance = match &params.initial_balance {
        Some(amount) => to_hbar(amount)?,
        None => Hbar::ZERO,
    };

    Ok(CreateAccountParametersNormalised {
        public_key,
        account_memo: params.account_memo,
        initial_balance,
        max_automatic_token_associations: params.max_automatic_token_associations.unwrap_or(-1),
    })
}

/// EVM-form account ids are mapped to their native id through the mirror node.
pub async fn normalise_update_account(
    params: UpdateAccountParameters,
    context: &Context,
    client: &dyn LedgerClient,
    mirror: &dyn MirrorNodeService,
) -> Result<UpdateAccountParametersNormalised, ToolError> {
    params.validate()?;
    check_associations(params.max_automatic_token_associations)?;

    let account_id = resolve_account_id(params.account_id.as_deref(), context, client, mirror).await?;
    let staked_account_id = params
        .staked_account_id
        .as_deref()
        .map(AccountId::from_str)
        .transpose()?;

    Ok(UpdateAccountParametersNormalised {
        account_id,
        max_automatic_token_associations: params.max_automatic_token_associations,
        staked_account_id,
        account_memo: params.account_memo,
        decline_staking_reward: params.decline_staking_reward,
    })
}

pub async fn normalise_delete_account(
    params: DeleteAccountParameters,
    context: &Context,
    client: &dyn LedgerClient,
    mirror: &dyn MirrorNodeService,
) -> Result<DeleteAccountParametersNormalised, ToolError> {
    params.validate()?;
    let account_id = to_account_id(&params.account_id, mirror).await?;
    let transfer_account_id =
        resolve_account_id(params.transfer_account_id.as_deref(), context, client, mirror).await?;
    Ok(DeleteAccountParametersNormalised {
        account_id,
        transfer_account_id,
    })
}

/// Builds the HBAR transfer list. Negative and zero-tinybar amounts are rejected.
pub fn normalise_transfer_hbar(
    params: TransferHbarParameters,
    context: &Context,
    client: &dyn LedgerClient,
) -> Result<TransferHbarParametersNormalised, ToolError> {
    params.validate()?;
    let source = resolve_account(params.source_account_id.as_deref(), context, client)?;

    let mut hbar_transfers = Vec::with_capacity(params.transfers.len() + 1);
    let mut total = Hbar::ZERO;
    for transfer in &params.transfers {
        let invalid = || ToolError::InvalidAmount(format!("Invalid transfer amount: {}", transfer.amount));
        if transfer.amount.is_negative() {
            return Err(invalid());
        }
        let amount = to_hbar(&transfer.amount).map_err(|_| invalid())?;
        if amount == Hbar::ZERO {
            return Err(invalid());
        }
        let recipient = parse_account_ref(&transfer.account_id)?;

        total = total.checked_add(amount).ok_or_else(sum_overflow)?;
        hbar_transfers.push(HbarTransfer {
            account_id: recipient,
            amount,
        });
    }

    hbar_transfers.push(HbarTransfer {
        account_id: source,
        amount: total.checked_neg().ok_or_else(sum_overflow)?,
    });
    debug!("Normalised {} HBAR transfer entries from {}", hbar_transfers.len(), source);

    Ok(TransferHbarParametersNormalised {
        hbar_transfers,
        transaction_memo: params.transaction_memo,
    })
}
