//! Account and address resolution.
//!
//! Callers may name an account by native id or by EVM address, or leave it out
//! entirely. These helpers turn that into the form an operation needs, using
//! the context and the client's operator account as explicit fallbacks.

use std::str::FromStr;

use ethers_core::types::Address;
use tracing::{debug, warn};

use crate::blockchain::client::LedgerClient;
use crate::blockchain::models::{is_evm_address, is_native_id, AccountId, AccountRef, PublicKey};
use crate::blockchain::services::mirrornode::MirrorNodeService;
use crate::config::Context;
use crate::error::ToolError;

/// The context account, else the client's operator account.
pub fn default_account(context: &Context, client: &dyn LedgerClient) -> Option<AccountId> {
    context.account_id.or_else(|| client.operator_account_id())
}

pub fn resolve_default_account(context: &Context, client: &dyn LedgerClient) -> Result<AccountId, ToolError> {
    default_account(context, client).ok_or_else(|| {
        ToolError::UnresolvableAccount(
            "no account was given and neither a context account nor an operator account is configured"
                .to_string(),
        )
    })
}

/// Parses an account given in either form.
pub fn parse_account_ref(given: &str) -> Result<AccountRef, ToolError> {
    AccountRef::from_str(given.trim())
        .map_err(|_| ToolError::UnresolvableAccount(format!("'{}' is not an account ID or EVM address", given)))
}

/// Parses a supplied account in either form, or falls back to the default account.
pub fn resolve_account(
    maybe: Option<&str>,
    context: &Context,
    client: &dyn LedgerClient,
) -> Result<AccountRef, ToolError> {
    match maybe.map(str::trim).filter(|s| !s.is_empty()) {
        Some(given) => parse_account_ref(given),
        None => resolve_default_account(context, client).map(AccountRef::Id),
    }
}

/// Like [`resolve_account`] but always yields a native id, asking the mirror node for EVM addresses.
pub async fn resolve_account_id(
    maybe: Option<&str>,
    context: &Context,
    client: &dyn LedgerClient,
    mirror: &dyn MirrorNodeService,
) -> Result<AccountId, ToolError> {
    match resolve_account(maybe, context, client)? {
        AccountRef::Id(id) => Ok(id),
        AccountRef::Evm(address) => to_account_id(&format!("{:#x}", address), mirror).await,
    }
}

/// Maps a native id to its EVM address. EVM input passes through unchanged.
pub async fn to_evm_address(address: &str, mirror: &dyn MirrorNodeService) -> Result<Address, ToolError> {
    let address = address.trim();
    if is_evm_address(address) {
        return Address::from_str(address)
            .map_err(|_| ToolError::validation(format!("invalid EVM address '{}'", address)));
    }
    if !is_native_id(address) {
        return Err(ToolError::UnresolvableAccount(format!(
            "'{}' is not an account ID or EVM address",
            address
        )));
    }

    let account = mirror.get_account(address).await?;
    let evm = account.evm_address.ok_or_else(|| {
        ToolError::UnresolvableAccount(format!("account {} has no EVM address", address))
    })?;
    debug!("Resolved {} to EVM address {}", address, evm);
    Address::from_str(&evm).map_err(|_| ToolError::validation(format!("mirror node returned invalid EVM address '{}'", evm)))
}

/// Maps an EVM address to its native id. Native input passes through unchanged.
pub async fn to_account_id(address: &str, mirror: &dyn MirrorNodeService) -> Result<AccountId, ToolError> {
    let address = address.trim();
    if let Ok(id) = AccountId::from_str(address) {
        return Ok(id);
    }
    if !is_evm_address(address) {
        return Err(ToolError::UnresolvableAccount(format!(
            "'{}' is not an account ID or EVM address",
            address
        )));
    }

    let account = mirror.get_account(address).await?;
    debug!("Resolved {} to account {}", address, account.account_id);
    Ok(AccountId::from_str(&account.account_id)?)
}

/// Public key published for the default account, falling back to the operator key.
pub async fn default_account_public_key(
    context: &Context,
    client: &dyn LedgerClient,
    mirror: &dyn MirrorNodeService,
) -> Result<Option<PublicKey>, ToolError> {
    if let Some(account) = default_account(context, client) {
        let info = mirror.get_account(&account.to_string()).await?;
        if let Some(key) = info.account_public_key {
            match PublicKey::from_str(&key) {
                Ok(key) => return Ok(Some(key)),
                Err(e) => warn!("Ignoring unusable key of account {}: {}", account, e),
            }
        }
    }
    Ok(client.operator_public_key())
}
