// src/config.rs

use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, Context as _, Result};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::blockchain::client::RelayLedgerClient;
use crate::blockchain::models::{AccountId, ContractId, LedgerId, PublicKey};
use crate::blockchain::services::mirrornode::{HederaMirrorNodeClient, MirrorNodeService};

/// How built transactions leave the toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentMode {
    /// Sign and submit through the ledger client.
    #[default]
    Autonomous,
    /// Freeze and hand back unsigned bytes for out-of-band signing.
    ReturnBytes,
}

impl FromStr for AgentMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "autonomous" => Ok(AgentMode::Autonomous),
            "returnbytes" => Ok(AgentMode::ReturnBytes),
            other => Err(anyhow!("unknown agent mode '{}'", other)),
        }
    }
}

impl fmt::Display for AgentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentMode::Autonomous => f.write_str("autonomous"),
            AgentMode::ReturnBytes => f.write_str("returnBytes"),
        }
    }
}

/// Per-session settings handed to every tool call. Never mutated after construction.
#[derive(Clone, Default)]
pub struct Context {
    pub mode: AgentMode,
    pub account_id: Option<AccountId>,
    pub mirrornode_service: Option<Arc<dyn MirrorNodeService>>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("mode", &self.mode)
            .field("account_id", &self.account_id)
            .field("mirrornode_service", &self.mirrornode_service.as_ref().map(|_| "override"))
            .finish()
    }
}

// All configuration, loaded once at startup from the environment (and .env).
#[derive(Debug)]
pub struct Config {
    // Server settings
    pub port: u16,
    pub mcp_mode: bool,

    // Network
    pub network: LedgerId,
    pub mirror_node_url: Option<Url>,

    // Agent behaviour
    pub agent_mode: AgentMode,
    pub account_id: Option<AccountId>,
    /// Allow-list of tool methods; `None` exposes every tool.
    pub tools: Option<Vec<String>>,

    // Operator and submission relay
    pub operator_account_id: Option<AccountId>,
    pub operator_public_key: Option<PublicKey>,
    pub ledger_relay_url: Option<Url>,
    pub ledger_relay_token: Option<SecretString>,

    // Token factory overrides
    pub erc20_factory_address: Option<ContractId>,
    pub erc721_factory_address: Option<ContractId>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            mcp_mode: false,
            network: LedgerId::Testnet,
            mirror_node_url: None,
            agent_mode: AgentMode::Autonomous,
            account_id: None,
            tools: None,
            operator_account_id: None,
            operator_public_key: None,
            ledger_relay_url: None,
            ledger_relay_token: None,
            erc20_factory_address: None,
            erc721_factory_address: None,
        }
    }
}

fn parse_opt<T, F>(get: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match get(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow!("{} is invalid: {}", key, e)),
        None => Ok(None),
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_source(|key| env::var(key).ok())
    }

    /// Builds a configuration from any key lookup.
    pub fn from_source<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = get("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .context("PORT must be a valid number")?;

        let network = parse_opt::<LedgerId, _>(&get, "HEDERA_NETWORK")?.unwrap_or(LedgerId::Testnet);
        let agent_mode = match get("AGENT_MODE") {
            Some(mode) if !mode.trim().is_empty() => mode.parse().context("AGENT_MODE is invalid")?,
            _ => AgentMode::Autonomous,
        };

        let tools = get("TOOLS").and_then(|list| {
            let methods: Vec<String> = list
                .split(',')
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect();
            (!methods.is_empty()).then_some(methods)
        });

        let ledger_relay_token = get("LEDGER_RELAY_TOKEN")
            .filter(|t| !t.is_empty())
            .map(SecretString::new);

        Ok(Config {
            port,
            mcp_mode: get("MCP_MODE").is_some(),
            network,
            mirror_node_url: parse_opt(&get, "MIRROR_NODE_URL")?,
            agent_mode,
            account_id: parse_opt(&get, "ACCOUNT_ID")?,
            tools,
            operator_account_id: parse_opt(&get, "OPERATOR_ACCOUNT_ID")?,
            operator_public_key: parse_opt(&get, "OPERATOR_PUBLIC_KEY")?,
            ledger_relay_url: parse_opt(&get, "LEDGER_RELAY_URL")?,
            ledger_relay_token,
            erc20_factory_address: parse_opt(&get, "ERC20_FACTORY_ADDRESS")?,
            erc721_factory_address: parse_opt(&get, "ERC721_FACTORY_ADDRESS")?,
        })
    }

    /// The immutable per-session context handed to every tool.
    pub fn context(&self) -> Context {
        let mirrornode_service = self.mirror_node_url.as_ref().map(|url| {
            Arc::new(HederaMirrorNodeClient::new(url.as_str())) as Arc<dyn MirrorNodeService>
        });
        Context {
            mode: self.agent_mode,
            account_id: self.account_id,
            mirrornode_service,
        }
    }

    pub fn ledger_client(&self) -> RelayLedgerClient {
        let client = RelayLedgerClient::new(self.network)
            .with_operator(self.operator_account_id, self.operator_public_key.clone());
        match &self.ledger_relay_url {
            Some(url) => {
                let token = self
                    .ledger_relay_token
                    .as_ref()
                    .map(|t| SecretString::new(t.expose_secret().clone()));
                client.with_relay(url.clone(), token)
            }
            None => client,
        }
    }
}
