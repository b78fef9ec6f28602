// src/blockchain/services/mirrornode.rs

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::blockchain::models::{
    AccountApiResponse, AccountResponse, ContractResultResponse, Hbar, LedgerId, TokenBalancesResponse,
    TokenInfo, TopicMessage, TopicMessagesApiResponse, TopicMessagesQueryParams, TopicMessagesResponse,
    TransactionDetailsResponse, TransactionId,
};
use crate::config::Context;

const MAINNET_URL: &str = "https://mainnet-public.mirrornode.hedera.com/api/v1";
const TESTNET_URL: &str = "https://testnet.mirrornode.hedera.com/api/v1";
const PREVIEWNET_URL: &str = "https://previewnet.mirrornode.hedera.com/api/v1";
const LOCAL_URL: &str = "http://localhost:5551/api/v1";

#[derive(Error, Debug)]
pub enum MirrorNodeError {
    #[error("mirror node request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0} not found on the mirror node")]
    NotFound(String),
    #[error("mirror node returned {status} for {path}")]
    Status { status: u16, path: String },
    #[error("invalid mirror node URL: {0}")]
    InvalidUrl(String),
    #[error("mirror node returned an unusable {0}")]
    InvalidResponse(String),
}

/// Read-only ledger queries.
#[async_trait]
pub trait MirrorNodeService: Send + Sync {
    /// `account` may be a native id or an EVM address.
    async fn get_account(&self, account: &str) -> Result<AccountResponse, MirrorNodeError>;

    async fn get_account_hbar_balance(&self, account: &str) -> Result<Hbar, MirrorNodeError>;

    async fn get_account_token_balances(
        &self,
        account: &str,
        token_id: Option<&str>,
    ) -> Result<TokenBalancesResponse, MirrorNodeError>;

    async fn get_token_info(&self, token_id: &str) -> Result<TokenInfo, MirrorNodeError>;

    /// `transaction_id` is in mirror format (`0.0.x-seconds-nanos`).
    async fn get_transaction_details(
        &self,
        transaction_id: &str,
        nonce: Option<u32>,
    ) -> Result<TransactionDetailsResponse, MirrorNodeError>;

    async fn get_topic_messages(
        &self,
        params: &TopicMessagesQueryParams,
    ) -> Result<TopicMessagesResponse, MirrorNodeError>;

    async fn get_contract_result(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<ContractResultResponse, MirrorNodeError>;
}

pub fn default_mirror_url(ledger: LedgerId) -> &'static str {
    match ledger {
        LedgerId::Mainnet => MAINNET_URL,
        LedgerId::Testnet => TESTNET_URL,
        LedgerId::Previewnet => PREVIEWNET_URL,
        LedgerId::Local => LOCAL_URL,
    }
}

/// The context override if one is set, otherwise the public mirror node for `ledger`.
pub fn get_mirrornode_service(context: &Context, ledger: LedgerId) -> Arc<dyn MirrorNodeService> {
    match &context.mirrornode_service {
        Some(service) => service.clone(),
        None => Arc::new(HederaMirrorNodeClient::for_ledger(ledger)),
    }
}

#[derive(Clone)]
pub struct HederaMirrorNodeClient {
    http: Client,
    base_url: String,
}

impl HederaMirrorNodeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn for_ledger(ledger: LedgerId) -> Self {
        Self::new(default_mirror_url(ledger))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T, MirrorNodeError> {
        debug!("GET {}", url);
        let res = self.http.get(url).send().await?;
        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Err(MirrorNodeError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            return Err(MirrorNodeError::Status {
                status: status.as_u16(),
                path: url.to_string(),
            });
        }
        Ok(res.json::<T>().await?)
    }

    /// Resolves a `links.next` value, which is an absolute path on the same host.
    fn next_url(&self, next: &str) -> Result<String, MirrorNodeError> {
        let base = Url::parse(&self.base_url).map_err(|e| MirrorNodeError::InvalidUrl(e.to_string()))?;
        base.join(next)
            .map(|u| u.to_string())
            .map_err(|e| MirrorNodeError::InvalidUrl(e.to_string()))
    }
}

#[async_trait]
impl MirrorNodeService for HederaMirrorNodeClient {
    async fn get_account(&self, account: &str) -> Result<AccountResponse, MirrorNodeError> {
        let url = format!("{}/accounts/{}", self.base_url, account);
        let raw: AccountApiResponse = self.get_json(&url, &format!("Account {}", account)).await?;
        Ok(raw.into())
    }

    async fn get_account_hbar_balance(&self, account: &str) -> Result<Hbar, MirrorNodeError> {
        let info = self.get_account(account).await?;
        Ok(Hbar::from_tinybars(info.balance.balance))
    }

    async fn get_account_token_balances(
        &self,
        account: &str,
        token_id: Option<&str>,
    ) -> Result<TokenBalancesResponse, MirrorNodeError> {
        let mut url = format!("{}/accounts/{}/tokens", self.base_url, account);
        if let Some(token) = token_id {
            url.push_str(&format!("?token.id={}", token));
        }
        self.get_json(&url, &format!("Token balances for {}", account)).await
    }

    async fn get_token_info(&self, token_id: &str) -> Result<TokenInfo, MirrorNodeError> {
        let url = format!("{}/tokens/{}", self.base_url, token_id);
        self.get_json(&url, &format!("Token {}", token_id)).await
    }

    async fn get_transaction_details(
        &self,
        transaction_id: &str,
        nonce: Option<u32>,
    ) -> Result<TransactionDetailsResponse, MirrorNodeError> {
        let mut url = format!("{}/transactions/{}", self.base_url, transaction_id);
        if let Some(n) = nonce {
            url.push_str(&format!("?nonce={}", n));
        }
        self.get_json(&url, &format!("Transaction {}", transaction_id)).await
    }

    async fn get_topic_messages(
        &self,
        params: &TopicMessagesQueryParams,
    ) -> Result<TopicMessagesResponse, MirrorNodeError> {
        let mut url = format!(
            "{}/topics/{}/messages?limit={}&order=desc",
            self.base_url, params.topic_id, params.limit
        );
        if !params.lower_timestamp.is_empty() {
            url.push_str(&format!("&timestamp=gte:{}", params.lower_timestamp));
        }
        if !params.upper_timestamp.is_empty() {
            url.push_str(&format!("&timestamp=lte:{}", params.upper_timestamp));
        }

        let limit = params.limit as usize;
        let mut messages: Vec<TopicMessage> = Vec::new();
        let mut next = Some(url);
        while let Some(page_url) = next.take() {
            let page: TopicMessagesApiResponse = self
                .get_json(&page_url, &format!("Topic {}", params.topic_id))
                .await?;
            messages.extend(page.messages);
            if messages.len() >= limit {
                messages.truncate(limit);
                break;
            }
            if let Some(link) = page.links.and_then(|l| l.next) {
                next = Some(self.next_url(&link)?);
            }
        }

        for message in messages.iter_mut() {
            if let Ok(decoded) = STANDARD.decode(message.message.as_bytes()) {
                message.message = String::from_utf8_lossy(&decoded).into_owned();
            }
        }

        Ok(TopicMessagesResponse {
            topic_id: params.topic_id.clone(),
            messages,
        })
    }

    async fn get_contract_result(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<ContractResultResponse, MirrorNodeError> {
        let id = transaction_id.to_mirror_format();
        let url = format!("{}/contracts/results/{}", self.base_url, id);
        self.get_json(&url, &format!("Contract result for {}", id)).await
    }
}
