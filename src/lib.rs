// src/lib.rs

use std::sync::Arc;

// Re-export commonly used types
pub use blockchain::client::{LedgerClient, RelayLedgerClient};
pub use config::{AgentMode, Config, Context};
pub use error::ToolError;
pub use tools::{Tool, ToolOutput, Toolkit};

// Re-export modules
pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod mcp;
pub mod params;
pub mod tools;
pub mod utils;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
    /// Per-session context handed to every tool call
    pub context: Arc<Context>,
    /// Submits transactions to the ledger
    pub client: Arc<dyn LedgerClient>,
    /// Tools exposed to agents
    pub toolkit: Arc<Toolkit>,
}

impl AppState {
    pub fn new(config: Config, client: Arc<dyn LedgerClient>) -> Self {
        let context = config.context();
        let toolkit = Toolkit::new(
            tools::core_plugins(config.erc20_factory_address, config.erc721_factory_address),
            config.tools.as_deref(),
        );
        Self {
            config: Arc::new(config),
            context: Arc::new(context),
            client,
            toolkit: Arc::new(toolkit),
        }
    }
}
