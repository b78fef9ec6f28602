//! Ledger client seam.
//!
//! Everything that needs the network goes through [`LedgerClient`]. The shipped
//! implementation, [`RelayLedgerClient`], forwards frozen transactions to an
//! operator-run signing relay over JSON-RPC; tests plug in their own.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

use super::models::{AccountId, LedgerId, PublicKey, TransactionReceipt};
use super::transaction::{Transaction, TransactionError};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("no ledger relay is configured; set LEDGER_RELAY_URL to submit transactions")]
    NotConfigured,
    #[error("ledger request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("ledger relay error: {0}")]
    Rpc(String),
    #[error("transaction {transaction_id} failed with status {status}")]
    ReceiptStatus { transaction_id: String, status: i32 },
    #[error("unexpected ledger response: {0}")]
    Decode(String),
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

#[async_trait]
pub trait LedgerClient: Send + Sync {
    fn ledger_id(&self) -> LedgerId;

    fn operator_account_id(&self) -> Option<AccountId>;

    fn operator_public_key(&self) -> Option<PublicKey>;

    /// Submits a frozen transaction and waits for its receipt.
    async fn submit(&self, tx: &Transaction) -> Result<TransactionReceipt, LedgerError>;
}

pub struct RelayLedgerClient {
    http: Client,
    ledger_id: LedgerId,
    operator_account_id: Option<AccountId>,
    operator_public_key: Option<PublicKey>,
    relay_url: Option<Url>,
    relay_token: Option<SecretString>,
}

impl RelayLedgerClient {
    pub fn new(ledger_id: LedgerId) -> Self {
        Self {
            http: Client::new(),
            ledger_id,
            operator_account_id: None,
            operator_public_key: None,
            relay_url: None,
            relay_token: None,
        }
    }

    pub fn with_operator(mut self, account_id: Option<AccountId>, public_key: Option<PublicKey>) -> Self {
        self.operator_account_id = account_id;
        self.operator_public_key = public_key;
        self
    }

    pub fn with_relay(mut self, url: Url, token: Option<SecretString>) -> Self {
        self.relay_url = Some(url);
        self.relay_token = token;
        self
    }
}

#[async_trait]
impl LedgerClient for RelayLedgerClient {
    fn ledger_id(&self) -> LedgerId {
        self.ledger_id
    }

    fn operator_account_id(&self) -> Option<AccountId> {
        self.operator_account_id
    }

    fn operator_public_key(&self) -> Option<PublicKey> {
        self.operator_public_key.clone()
    }

    async fn submit(&self, tx: &Transaction) -> Result<TransactionReceipt, LedgerError> {
        let relay_url = self.relay_url.as_ref().ok_or(LedgerError::NotConfigured)?;
        let bytes = tx.to_bytes()?;
        let transaction_id = tx.transaction_id().map(|id| id.to_string()).unwrap_or_default();

        let payload = json!({
            "jsonrpc": "2.0",
            "method": "ledger_submitTransaction",
            "params": {
                "network": self.ledger_id.to_string(),
                "transaction": format!("0x{}", hex::encode(bytes)),
            },
            "id": uuid::Uuid::new_v4().to_string()
        });
        debug!("Submitting {} transaction {} to relay", tx.body().kind(), transaction_id);

        let mut request = self.http.post(relay_url.as_str()).json(&payload);
        if let Some(token) = &self.relay_token {
            request = request.bearer_auth(token.expose_secret());
        }
        let v: Value = request.send().await?.json().await?;
        if let Some(err) = v.get("error") {
            error!("Relay rejected transaction {}: {}", transaction_id, err);
            return Err(LedgerError::Rpc(err.to_string()));
        }

        let receipt: TransactionReceipt = serde_json::from_value(v["result"].clone())
            .map_err(|e| LedgerError::Decode(e.to_string()))?;
        if !receipt.is_success() {
            return Err(LedgerError::ReceiptStatus {
                transaction_id,
                status: receipt.status,
            });
        }
        Ok(receipt)
    }
}
