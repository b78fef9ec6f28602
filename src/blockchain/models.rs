// src/blockchain/models.rs
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use ethers_core::types::Address;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::blockchain::services::mirrornode::MirrorNodeError;

// --- Error types for identifier and key parsing ---

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseIdError {
    #[error("invalid entity id '{0}': expected shard.realm.num")]
    InvalidEntityId(String),
    #[error("invalid address '{0}': expected shard.realm.num or a 0x-prefixed EVM address")]
    InvalidAddress(String),
    #[error("invalid transaction id '{0}'")]
    InvalidTransactionId(String),
    #[error("unknown ledger '{0}'")]
    UnknownLedger(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("public key is not valid hex: {0}")]
    InvalidHex(String),
    #[error("unsupported public key length: {0} bytes")]
    UnsupportedLength(usize),
    #[error("invalid ECDSA secp256k1 public key")]
    InvalidEcdsaKey,
}

// --- Entity identifiers ---

fn parse_entity_parts(input: &str) -> Option<(u64, u64, u64)> {
    let mut parts = input.trim().split('.');
    let shard = parts.next()?.parse().ok()?;
    let realm = parts.next()?.parse().ok()?;
    let num = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((shard, realm, num))
}

/// Returns true when `input` has the native `shard.realm.num` shape.
pub fn is_native_id(input: &str) -> bool {
    parse_entity_parts(input).is_some()
}

/// Returns true when `input` is a 0x-prefixed, 20-byte hex address.
pub fn is_evm_address(input: &str) -> bool {
    let input = input.trim();
    match input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        Some(hex_part) => hex_part.len() == 40 && hex_part.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name {
            pub shard: u64,
            pub realm: u64,
            pub num: u64,
        }

        impl $name {
            pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
                Self { shard, realm, num }
            }

            pub const fn from_num(num: u64) -> Self {
                Self { shard: 0, realm: 0, num }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_entity_parts(s)
                    .map(|(shard, realm, num)| Self { shard, realm, num })
                    .ok_or_else(|| ParseIdError::InvalidEntityId(s.to_string()))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

entity_id!(
    /// Native ledger account identifier (`shard.realm.num`).
    AccountId
);
entity_id!(
    /// Native identifier of a fungible or non-fungible token.
    TokenId
);
entity_id!(
    /// Native identifier of a consensus topic.
    TopicId
);
entity_id!(
    /// Native identifier of a smart contract.
    ContractId
);

impl From<AccountId> for ContractId {
    fn from(id: AccountId) -> Self {
        ContractId::new(id.shard, id.realm, id.num)
    }
}

/// An account reference in either addressing form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountRef {
    Id(AccountId),
    Evm(Address),
}

impl From<AccountId> for AccountRef {
    fn from(id: AccountId) -> Self {
        AccountRef::Id(id)
    }
}

impl fmt::Display for AccountRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountRef::Id(id) => write!(f, "{}", id),
            AccountRef::Evm(address) => write!(f, "{:#x}", address),
        }
    }
}

impl FromStr for AccountRef {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(id) = trimmed.parse::<AccountId>() {
            return Ok(AccountRef::Id(id));
        }
        if is_evm_address(trimmed) {
            let address = Address::from_str(trimmed)
                .map_err(|_| ParseIdError::InvalidAddress(s.to_string()))?;
            return Ok(AccountRef::Evm(address));
        }
        Err(ParseIdError::InvalidAddress(s.to_string()))
    }
}

impl Serialize for AccountRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AccountRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// --- Network ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerId {
    Mainnet,
    Testnet,
    Previewnet,
    Local,
}

impl fmt::Display for LedgerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LedgerId::Mainnet => "mainnet",
            LedgerId::Testnet => "testnet",
            LedgerId::Previewnet => "previewnet",
            LedgerId::Local => "local",
        };
        f.write_str(name)
    }
}

impl FromStr for LedgerId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" | "main" => Ok(LedgerId::Mainnet),
            "testnet" | "test" => Ok(LedgerId::Testnet),
            "previewnet" | "preview" => Ok(LedgerId::Previewnet),
            "local" | "local-node" | "localnet" => Ok(LedgerId::Local),
            other => Err(ParseIdError::UnknownLedger(other.to_string())),
        }
    }
}

// --- Keys ---

const ED25519_DER_PREFIX: &str = "302a300506032b6570032100";
const ECDSA_SECP256K1_DER_PREFIX: &str = "302d300706052b8104000a032200";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyAlgorithm {
    Ed25519,
    EcdsaSecp256k1,
}

/// Public key in one of the two algorithms the ledger accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    algorithm: KeyAlgorithm,
    bytes: Vec<u8>,
}

impl PublicKey {
    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    pub fn to_bytes_raw(&self) -> &[u8] {
        &self.bytes
    }

    /// Hex encoding of the DER (SubjectPublicKeyInfo) form.
    pub fn to_string_der(&self) -> String {
        let prefix = match self.algorithm {
            KeyAlgorithm::Ed25519 => ED25519_DER_PREFIX,
            KeyAlgorithm::EcdsaSecp256k1 => ECDSA_SECP256K1_DER_PREFIX,
        };
        format!("{}{}", prefix, hex::encode(&self.bytes))
    }

    fn from_ecdsa_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        k256::PublicKey::from_sec1_bytes(bytes).map_err(|_| KeyError::InvalidEcdsaKey)?;
        Ok(Self {
            algorithm: KeyAlgorithm::EcdsaSecp256k1,
            bytes: bytes.to_vec(),
        })
    }
}

impl FromStr for PublicKey {
    type Err = KeyError;

    /// Accepts raw or DER-encoded hex, with or without a `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex_part = trimmed.strip_prefix("0x").unwrap_or(trimmed).to_lowercase();

        if let Some(raw) = hex_part.strip_prefix(ED25519_DER_PREFIX) {
            let bytes = hex::decode(raw).map_err(|e| KeyError::InvalidHex(e.to_string()))?;
            if bytes.len() != 32 {
                return Err(KeyError::UnsupportedLength(bytes.len()));
            }
            return Ok(Self { algorithm: KeyAlgorithm::Ed25519, bytes });
        }
        if let Some(raw) = hex_part.strip_prefix(ECDSA_SECP256K1_DER_PREFIX) {
            let bytes = hex::decode(raw).map_err(|e| KeyError::InvalidHex(e.to_string()))?;
            return Self::from_ecdsa_bytes(&bytes);
        }

        let bytes = hex::decode(&hex_part).map_err(|e| KeyError::InvalidHex(e.to_string()))?;
        match bytes.len() {
            32 => Ok(Self { algorithm: KeyAlgorithm::Ed25519, bytes }),
            33 => Self::from_ecdsa_bytes(&bytes),
            other => Err(KeyError::UnsupportedLength(other)),
        }
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_der())
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string_der())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// --- Native currency ---

/// Native currency amount held as signed tinybars (1 HBAR = 10^8 tinybars).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hbar {
    tinybars: i64,
}

impl Hbar {
    pub const DECIMALS: u8 = 8;
    pub const ZERO: Hbar = Hbar { tinybars: 0 };

    pub const fn from_tinybars(tinybars: i64) -> Self {
        Self { tinybars }
    }

    pub const fn to_tinybars(self) -> i64 {
        self.tinybars
    }

    pub fn is_negative(self) -> bool {
        self.tinybars < 0
    }

    pub fn checked_add(self, other: Hbar) -> Option<Hbar> {
        self.tinybars.checked_add(other.tinybars).map(Hbar::from_tinybars)
    }

    pub fn checked_neg(self) -> Option<Hbar> {
        self.tinybars.checked_neg().map(Hbar::from_tinybars)
    }
}

impl fmt::Display for Hbar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ℏ",
            super::units::to_display_unit_signed(self.tinybars as i128, Self::DECIMALS)
        )
    }
}

// --- Transaction identifiers ---

/// Payer account plus the valid-start instant of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionId {
    pub account_id: AccountId,
    pub valid_start_seconds: i64,
    pub valid_start_nanos: u32,
}

impl TransactionId {
    pub fn generate(account_id: AccountId) -> Self {
        Self::with_valid_start(account_id, Utc::now())
    }

    pub fn with_valid_start(account_id: AccountId, valid_start: DateTime<Utc>) -> Self {
        Self {
            account_id,
            valid_start_seconds: valid_start.timestamp(),
            valid_start_nanos: valid_start.timestamp_subsec_nanos(),
        }
    }

    pub fn valid_start(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.valid_start_seconds, self.valid_start_nanos).single()
    }

    /// The `shard.realm.num-seconds-nanos` form used by the mirror node REST API.
    pub fn to_mirror_format(&self) -> String {
        format!(
            "{}-{}-{:09}",
            self.account_id, self.valid_start_seconds, self.valid_start_nanos
        )
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}.{:09}",
            self.account_id, self.valid_start_seconds, self.valid_start_nanos
        )
    }
}

impl FromStr for TransactionId {
    type Err = ParseIdError;

    /// Parses either `0.0.5@1755169980.651721264` or `0.0.5-1755169980-651721264`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseIdError::InvalidTransactionId(s.to_string());
        let trimmed = s.trim();

        let (account, seconds, nanos) = if let Some((account, start)) = trimmed.split_once('@') {
            let (seconds, nanos) = start.split_once('.').ok_or_else(err)?;
            (account, seconds, nanos)
        } else {
            let mut parts = trimmed.rsplitn(3, '-');
            let nanos = parts.next().ok_or_else(err)?;
            let seconds = parts.next().ok_or_else(err)?;
            let account = parts.next().ok_or_else(err)?;
            (account, seconds, nanos)
        };

        let nanos: u32 = nanos.parse().map_err(|_| err())?;
        if nanos >= 1_000_000_000 {
            return Err(err());
        }
        Ok(Self {
            account_id: account.parse().map_err(|_| err())?,
            valid_start_seconds: seconds.parse().map_err(|_| err())?,
            valid_start_nanos: nanos,
        })
    }
}

impl Serialize for TransactionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TransactionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// --- Token enumerations ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenSupplyType {
    Infinite,
    Finite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenType {
    FungibleCommon,
    NonFungibleUnique,
}

// --- Receipts ---

/// Ledger confirmation for a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub status: i32,
    #[serde(default)]
    pub account_id: Option<AccountId>,
    #[serde(default)]
    pub token_id: Option<TokenId>,
    #[serde(default)]
    pub topic_id: Option<TopicId>,
    #[serde(default)]
    pub contract_id: Option<ContractId>,
}

impl TransactionReceipt {
    pub const SUCCESS: i32 = 22;

    pub fn is_success(&self) -> bool {
        self.status == Self::SUCCESS
    }
}

// --- Mirror node models ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorKey {
    #[serde(rename = "_type")]
    pub key_type: String,
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBalance {
    pub token_id: String,
    pub balance: i64,
    #[serde(default)]
    pub decimals: Option<u32>,
    #[serde(default)]
    pub automatic_association: Option<bool>,
    #[serde(default)]
    pub created_timestamp: Option<String>,
    #[serde(default)]
    pub freeze_status: Option<String>,
    #[serde(default)]
    pub kyc_status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBalancesResponse {
    pub tokens: Vec<TokenBalance>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalance {
    pub balance: i64,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub tokens: Vec<TokenBalance>,
}

/// Raw `/accounts/{id}` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountApiResponse {
    pub account: String,
    #[serde(default)]
    pub key: Option<MirrorKey>,
    pub balance: AccountBalance,
    #[serde(default)]
    pub evm_address: Option<String>,
}

/// Account view consumed by the normaliser and the account query tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub account_id: String,
    pub account_public_key: Option<String>,
    pub balance: AccountBalance,
    pub evm_address: Option<String>,
}

impl From<AccountApiResponse> for AccountResponse {
    fn from(api: AccountApiResponse) -> Self {
        Self {
            account_id: api.account,
            account_public_key: api.key.map(|k| k.key),
            balance: api.balance,
            evm_address: api.evm_address,
        }
    }
}

/// Mirror node token document. Numeric supplies arrive as strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenInfo {
    #[serde(default)]
    pub token_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default, rename = "type")]
    pub token_type: Option<String>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub decimals: String,
    #[serde(default)]
    pub initial_supply: Option<String>,
    #[serde(default)]
    pub total_supply: Option<String>,
    #[serde(default)]
    pub max_supply: Option<String>,
    #[serde(default)]
    pub supply_type: Option<String>,
    #[serde(default)]
    pub treasury_account_id: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub freeze_default: Option<bool>,
    #[serde(default)]
    pub admin_key: Option<MirrorKey>,
    #[serde(default)]
    pub supply_key: Option<MirrorKey>,
    #[serde(default)]
    pub kyc_key: Option<MirrorKey>,
    #[serde(default)]
    pub freeze_key: Option<MirrorKey>,
    #[serde(default)]
    pub wipe_key: Option<MirrorKey>,
    #[serde(default)]
    pub pause_key: Option<MirrorKey>,
    #[serde(default)]
    pub fee_schedule_key: Option<MirrorKey>,
    #[serde(default)]
    pub metadata_key: Option<MirrorKey>,
}

impl TokenInfo {
    /// An absent value means 0. Anything else must be a whole number of decimals.
    pub fn decimals(&self) -> Result<u8, MirrorNodeError> {
        let raw = self.decimals.trim();
        if raw.is_empty() {
            return Ok(0);
        }
        raw.parse().map_err(|_| {
            let token = self.token_id.as_deref().unwrap_or("unknown");
            MirrorNodeError::InvalidResponse(format!("decimals '{}' for token {}", raw, token))
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicMessage {
    pub topic_id: String,
    pub message: String,
    pub consensus_timestamp: String,
    #[serde(default)]
    pub sequence_number: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicMessagesApiResponse {
    pub messages: Vec<TopicMessage>,
    #[serde(default)]
    pub links: Option<Links>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Links {
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicMessagesResponse {
    pub topic_id: String,
    pub messages: Vec<TopicMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicMessagesQueryParams {
    pub topic_id: String,
    pub lower_timestamp: String,
    pub upper_timestamp: String,
    pub limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transfer {
    pub account: String,
    pub amount: i64,
    #[serde(default)]
    pub is_approval: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionData {
    pub result: String,
    pub consensus_timestamp: String,
    pub transaction_hash: String,
    pub charged_tx_fee: i64,
    pub name: String,
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub memo_base64: Option<String>,
    #[serde(default)]
    pub transfers: Vec<Transfer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDetailsResponse {
    pub transactions: Vec<TransactionData>,
}

/// Subset of `/contracts/results/{id}` used to read a factory's return value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractResultResponse {
    #[serde(default)]
    pub contract_id: Option<String>,
    #[serde(default)]
    pub call_result: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub extra: Option<Value>,
}
