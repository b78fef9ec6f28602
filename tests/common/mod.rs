//! Shared fakes for the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use hedera_agent_toolkit::{
    blockchain::{
        client::{LedgerClient, LedgerError},
        models::{
            AccountBalance, AccountId, AccountResponse, ContractResultResponse, Hbar, LedgerId, PublicKey,
            TokenBalancesResponse, TokenId, TokenInfo, TopicId, TopicMessagesQueryParams, TopicMessagesResponse,
            TransactionDetailsResponse, TransactionId, TransactionReceipt,
        },
        services::mirrornode::{MirrorNodeError, MirrorNodeService},
        transaction::Transaction,
    },
    config::{AgentMode, Context},
};

pub const OPERATOR_KEY: &str = "302a300506032b6570032100e0c8ec2758a5879ffac226a13c0c516b799e72e35141a0dd828f94d37988a4b7";
pub const ACCOUNT_KEY: &str = "302a300506032b65700321001f3a5c8e7b9d0f2468ace13579bdf02468ace13579bdf02468ace13579bdf024";

pub fn operator_key() -> PublicKey {
    OPERATOR_KEY.parse().unwrap()
}

pub fn account_key() -> PublicKey {
    ACCOUNT_KEY.parse().unwrap()
}

/// Records every submitted transaction and answers with a canned receipt.
pub struct FakeLedgerClient {
    pub operator: Option<AccountId>,
    pub operator_key: Option<PublicKey>,
    pub receipt: TransactionReceipt,
    pub fail_with: Option<String>,
    pub submitted: Mutex<Vec<Transaction>>,
}

impl FakeLedgerClient {
    pub fn new() -> Self {
        Self {
            operator: Some(AccountId::from_num(2)),
            operator_key: Some(operator_key()),
            receipt: TransactionReceipt {
                status: TransactionReceipt::SUCCESS,
                account_id: None,
                token_id: None,
                topic_id: None,
                contract_id: None,
            },
            fail_with: None,
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn without_operator() -> Self {
        Self {
            operator: None,
            operator_key: None,
            ..Self::new()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::new()
        }
    }

    pub fn with_receipt(mut self, f: impl FnOnce(&mut TransactionReceipt)) -> Self {
        f(&mut self.receipt);
        self
    }

    pub fn submissions(&self) -> Vec<Transaction> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerClient for FakeLedgerClient {
    fn ledger_id(&self) -> LedgerId {
        LedgerId::Testnet
    }

    fn operator_account_id(&self) -> Option<AccountId> {
        self.operator
    }

    fn operator_public_key(&self) -> Option<PublicKey> {
        self.operator_key.clone()
    }

    async fn submit(&self, tx: &Transaction) -> Result<TransactionReceipt, LedgerError> {
        self.submitted.lock().unwrap().push(tx.clone());
        match &self.fail_with {
            Some(message) => Err(LedgerError::Rpc(message.clone())),
            None => Ok(self.receipt.clone()),
        }
    }
}

/// In-memory mirror node keyed by the identifiers a test registers.
#[derive(Default)]
pub struct FakeMirrorNode {
    pub accounts: HashMap<String, AccountResponse>,
    pub tokens: HashMap<String, TokenInfo>,
    pub contract_result: Option<ContractResultResponse>,
    pub requests: Mutex<Vec<String>>,
}

impl FakeMirrorNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account under both its native id and its EVM address.
    pub fn with_account(mut self, account_id: &str, evm_address: Option<&str>, key: Option<&str>) -> Self {
        let account = AccountResponse {
            account_id: account_id.to_string(),
            account_public_key: key.map(str::to_string),
            balance: AccountBalance {
                balance: 150_000_000,
                timestamp: None,
                tokens: Vec::new(),
            },
            evm_address: evm_address.map(str::to_string),
        };
        if let Some(evm) = evm_address {
            self.accounts.insert(evm.to_lowercase(), account.clone());
        }
        self.accounts.insert(account_id.to_string(), account);
        self
    }

    pub fn with_token(self, token_id: &str, decimals: u8) -> Self {
        self.with_raw_token_decimals(token_id, &decimals.to_string())
    }

    /// Registers a token whose `decimals` field is returned exactly as given.
    pub fn with_raw_token_decimals(mut self, token_id: &str, decimals: &str) -> Self {
        self.tokens.insert(
            token_id.to_string(),
            TokenInfo {
                token_id: Some(token_id.to_string()),
                name: "Test Token".to_string(),
                symbol: "TT".to_string(),
                decimals: decimals.to_string(),
                ..TokenInfo::default()
            },
        );
        self
    }

    pub fn with_contract_result(mut self, call_result: &str) -> Self {
        self.contract_result = Some(ContractResultResponse {
            contract_id: Some("0.0.6471814".to_string()),
            call_result: Some(call_result.to_string()),
            result: Some("SUCCESS".to_string()),
            extra: None,
        });
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, request: String) {
        self.requests.lock().unwrap().push(request);
    }
}

#[async_trait]
impl MirrorNodeService for FakeMirrorNode {
    async fn get_account(&self, account: &str) -> Result<AccountResponse, MirrorNodeError> {
        self.record(format!("account {}", account));
        self.accounts
            .get(&account.to_lowercase())
            .cloned()
            .ok_or_else(|| MirrorNodeError::NotFound(format!("Account {}", account)))
    }

    async fn get_account_hbar_balance(&self, account: &str) -> Result<Hbar, MirrorNodeError> {
        let info = self.get_account(account).await?;
        Ok(Hbar::from_tinybars(info.balance.balance))
    }

    async fn get_account_token_balances(
        &self,
        account: &str,
        _token_id: Option<&str>,
    ) -> Result<TokenBalancesResponse, MirrorNodeError> {
        self.record(format!("token balances {}", account));
        Ok(TokenBalancesResponse { tokens: Vec::new() })
    }

    async fn get_token_info(&self, token_id: &str) -> Result<TokenInfo, MirrorNodeError> {
        self.record(format!("token {}", token_id));
        self.tokens
            .get(token_id)
            .cloned()
            .ok_or_else(|| MirrorNodeError::NotFound(format!("Token {}", token_id)))
    }

    async fn get_transaction_details(
        &self,
        transaction_id: &str,
        _nonce: Option<u32>,
    ) -> Result<TransactionDetailsResponse, MirrorNodeError> {
        self.record(format!("transaction {}", transaction_id));
        Err(MirrorNodeError::NotFound(format!("Transaction {}", transaction_id)))
    }

    async fn get_topic_messages(
        &self,
        params: &TopicMessagesQueryParams,
    ) -> Result<TopicMessagesResponse, MirrorNodeError> {
        self.record(format!("topic {}", params.topic_id));
        Ok(TopicMessagesResponse {
            topic_id: params.topic_id.clone(),
            messages: Vec::new(),
        })
    }

    async fn get_contract_result(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<ContractResultResponse, MirrorNodeError> {
        self.record(format!("contract result {}", transaction_id.to_mirror_format()));
        self.contract_result
            .clone()
            .ok_or_else(|| MirrorNodeError::NotFound(format!("Contract result for {}", transaction_id)))
    }
}

pub fn context(mode: AgentMode, account_id: Option<u64>) -> Context {
    Context {
        mode,
        account_id: account_id.map(AccountId::from_num),
        mirrornode_service: None,
    }
}

/// Context that routes every mirror node lookup to `mirror`.
pub fn context_with_mirror(mode: AgentMode, account_id: Option<u64>, mirror: Arc<FakeMirrorNode>) -> Context {
    Context {
        mirrornode_service: Some(mirror as Arc<dyn MirrorNodeService>),
        ..context(mode, account_id)
    }
}

pub fn token_id(num: u64) -> TokenId {
    TokenId::from_num(num)
}

pub fn topic_id(num: u64) -> TopicId {
    TopicId::from_num(num)
}
