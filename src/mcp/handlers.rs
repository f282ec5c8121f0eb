//! MCP method handlers

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

use super::dispatch::{Dispatcher, HandlerResult};
use super::protocol::ErrorBody;
use super::tools::{parse_params, Tool, ALL_TOOLS};
use crate::ayd::Backend;

/// MCP protocol revision this server speaks
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Name advertised in `initialize`
pub const SERVER_NAME: &str = "Ayd Server";

/// What `initialize` tells the client about this server
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ToolsCallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Handlers for the Ayd-backed MCP methods
pub struct AydHandlers {
    backend: Box<dyn Backend>,
    /// Shown to the client in `initialize` instructions
    ayd_url: String,
    info: ServerInfo,
}

impl AydHandlers {
    pub fn new(backend: Box<dyn Backend>, ayd_url: impl Into<String>, info: ServerInfo) -> Self {
        Self {
            backend,
            ayd_url: ayd_url.into(),
            info,
        }
    }

    pub fn initialize(&self, _params: Value) -> HandlerResult {
        Ok(Some(json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": self.info,
            "instructions": format!(
                "Ayd is a simple service monitoring tool. This server provides status information and monitoring log for the services that are monitoring by Ayd running on {}.",
                self.ayd_url
            ),
        })))
    }

    pub fn tools_list(&self, _params: Value) -> HandlerResult {
        let tools: Vec<_> = ALL_TOOLS.iter().map(|t| t.info()).collect();
        Ok(Some(json!({ "tools": tools })))
    }

    /// Second-level dispatch on the tool name carried in params
    pub fn tools_call(&self, params: Value) -> HandlerResult {
        let req: ToolsCallParams = parse_params(params)?;
        let tool = Tool::from_name(&req.name)
            .ok_or_else(|| ErrorBody::invalid_params(format!("Unknown tool name: {}", req.name)))?;

        debug!(tool = tool.name(), "tools/call");
        let result = tool.call(self.backend.as_ref(), req.arguments)?;
        serde_json::to_value(result)
            .map(Some)
            .map_err(|e| ErrorBody::internal(format!("Failed to encode result: {}", e)))
    }
}

/// Acknowledge without replying
pub fn ignore(_params: Value) -> HandlerResult {
    Ok(None)
}

pub fn pong(_params: Value) -> HandlerResult {
    Ok(Some(json!({})))
}

/// Register every MCP method this server answers
pub fn register(dispatcher: &mut Dispatcher, handlers: AydHandlers) {
    let handlers = Arc::new(handlers);

    let h = Arc::clone(&handlers);
    dispatcher.register("initialize", move |p: Value| h.initialize(p));
    dispatcher.register("notifications/initialized", ignore);
    dispatcher.register("ping", pong);
    let h = Arc::clone(&handlers);
    dispatcher.register("tools/list", move |p: Value| h.tools_list(p));
    dispatcher.register("tools/call", move |p: Value| handlers.tools_call(p));
}
