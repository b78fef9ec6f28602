//! # Tools
//!
//! A tool is one agent-callable operation: a stable `method` name, a
//! human-readable name and description, a JSON schema for its parameters and
//! an async `execute`. Every tool follows the same pipeline:
//!
//! ```text
//! params (JSON) -> raw record -> normaliser -> builder -> strategy dispatcher
//! ```
//!
//! Queries stop after the mirror node call and render a summary instead.
//!
//! Errors never cross the tool boundary. [`Tool::execute`] catches every
//! [`ToolError`] and returns [`ToolOutput::Failure`] with its message.
//!
//! Tools are grouped into [`Plugin`]s and assembled into a [`Toolkit`], which
//! can be restricted to an allow-list of methods.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::blockchain::client::LedgerClient;
use crate::blockchain::models::ContractId;
use crate::blockchain::services::strategy::{ExecuteStrategyResult, TransactionOutcome};
use crate::config::Context;
use crate::error::ToolError;

pub mod account;
pub mod consensus;
pub mod evm;
pub mod prompt;
pub mod queries;
pub mod token;

pub use prompt::PromptGenerator;

/// Result of a tool call as the agent sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolOutput {
    /// Human-readable failure message.
    Failure(String),
    Transaction(TransactionOutcome),
    Query(QueryResult),
    Deployed(DeployResult),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub raw: Value,
    #[serde(rename = "humanMessage")]
    pub human_message: String,
}

/// Executed factory deployment plus the address of the new token contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployResult {
    #[serde(flatten)]
    pub result: ExecuteStrategyResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub erc20_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub erc721_address: Option<String>,
    pub message: String,
}

impl ToolOutput {
    pub fn is_error(&self) -> bool {
        matches!(self, ToolOutput::Failure(_))
    }

    /// Text shown to a human or fed back to the model.
    pub fn human_message(&self) -> String {
        match self {
            ToolOutput::Failure(message) => message.clone(),
            ToolOutput::Transaction(TransactionOutcome::Executed(result)) => result.human_message.clone(),
            ToolOutput::Transaction(TransactionOutcome::Bytes(result)) => {
                format!("Unsigned transaction bytes: {}", result.bytes)
            }
            ToolOutput::Query(result) => result.human_message.clone(),
            ToolOutput::Deployed(result) => result.message.clone(),
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| Value::String(e.to_string()))
    }
}

impl From<TransactionOutcome> for ToolOutput {
    fn from(outcome: TransactionOutcome) -> Self {
        ToolOutput::Transaction(outcome)
    }
}

impl From<QueryResult> for ToolOutput {
    fn from(result: QueryResult) -> Self {
        ToolOutput::Query(result)
    }
}

/// Deserialises tool arguments into a raw parameter record. A missing
/// argument object is treated as `{}`.
pub fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, ToolError> {
    let params = if params.is_null() { json!({}) } else { params };
    Ok(serde_json::from_value(params)?)
}

#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable identifier used to call the tool.
    fn method(&self) -> &'static str;

    fn name(&self) -> &'static str;

    fn description(&self, context: &Context) -> String;

    /// JSON schema of the accepted arguments.
    fn parameters(&self) -> Value;

    async fn run(
        &self,
        client: &dyn LedgerClient,
        context: &Context,
        params: Value,
    ) -> Result<ToolOutput, ToolError>;

    async fn execute(&self, client: &dyn LedgerClient, context: &Context, params: Value) -> ToolOutput {
        info!("Executing tool {}", self.method());
        match self.run(client, context, params).await {
            Ok(output) => output,
            Err(e) => {
                error!("Tool {} failed: {}", self.method(), e);
                ToolOutput::Failure(e.to_string())
            }
        }
    }
}

/// A named group of tools.
pub struct Plugin {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub tools: Vec<Arc<dyn Tool>>,
}

/// Every plugin shipped with the toolkit.
pub fn core_plugins(erc20_factory: Option<ContractId>, erc721_factory: Option<ContractId>) -> Vec<Plugin> {
    vec![
        account::core_account_plugin(),
        token::core_hts_plugin(),
        consensus::core_consensus_plugin(),
        queries::core_queries_plugin(),
        evm::core_evm_plugin(erc20_factory, erc721_factory),
    ]
}

/// The set of tools exposed to an agent.
pub struct Toolkit {
    tools: Vec<Arc<dyn Tool>>,
    by_method: HashMap<&'static str, usize>,
}

impl Toolkit {
    /// Collects the tools of `plugins`. With an allow-list, only the named
    /// methods are kept; unknown names are ignored.
    pub fn new(plugins: Vec<Plugin>, allow: Option<&[String]>) -> Self {
        let mut tools: Vec<Arc<dyn Tool>> = Vec::new();
        let mut by_method = HashMap::new();
        for tool in plugins.into_iter().flat_map(|p| p.tools) {
            if let Some(allow) = allow {
                if !allow.iter().any(|m| m == tool.method()) {
                    continue;
                }
            }
            if by_method.contains_key(tool.method()) {
                continue;
            }
            by_method.insert(tool.method(), tools.len());
            tools.push(tool);
        }
        info!("Toolkit ready with {} tools", tools.len());
        Self { tools, by_method }
    }

    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    pub fn get(&self, method: &str) -> Option<Arc<dyn Tool>> {
        self.by_method.get(method).map(|i| self.tools[*i].clone())
    }

    /// Tool listing in the MCP `tools/list` shape.
    pub fn describe(&self, context: &Context) -> Vec<Value> {
        self.tools
            .iter()
            .map(|tool| {
                json!({
                    "name": tool.method(),
                    "title": tool.name(),
                    "description": tool.description(context),
                    "inputSchema": tool.parameters(),
                })
            })
            .collect()
    }

    /// Runs `method`, or returns `None` if it is not part of the toolkit.
    pub async fn execute(
        &self,
        method: &str,
        client: &dyn LedgerClient,
        context: &Context,
        params: Value,
    ) -> Option<ToolOutput> {
        let tool = self.get(method)?;
        Some(tool.execute(client, context, params).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_filters_methods() {
        let allow = vec!["transfer_hbar_tool".to_string(), "no_such_tool".to_string()];
        let toolkit = Toolkit::new(core_plugins(None, None), Some(&allow));
        assert_eq!(toolkit.tools().len(), 1);
        assert!(toolkit.get("transfer_hbar_tool").is_some());
        assert!(toolkit.get("create_account_tool").is_none());
    }

    #[test]
    fn every_method_is_unique() {
        let toolkit = Toolkit::new(core_plugins(None, None), None);
        assert_eq!(toolkit.tools().len(), 23);
        let described = toolkit.describe(&Context::default());
        assert!(described.iter().all(|t| t["inputSchema"]["type"] == "object"));
    }

    #[test]
    fn failure_serialises_as_plain_string() {
        let output = ToolOutput::Failure("boom".to_string());
        assert_eq!(output.to_value(), json!("boom"));
        assert!(output.is_error());
    }
}
