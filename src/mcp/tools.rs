//! Ayd tools exposed through `tools/list` and `tools/call`

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::protocol::ErrorBody;
use crate::ayd::{Backend, BackendError, LogQuery, ProbeHistory};

/// Every tool this server offers, in listing order
pub const ALL_TOOLS: [Tool; 4] = [
    Tool::ListTargets,
    Tool::GetStatusOverview,
    Tool::GetTargetStatus,
    Tool::ReadLog,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    ListTargets,
    GetStatusOverview,
    GetTargetStatus,
    ReadLog,
}

/// Entry of the `tools/list` result
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Content {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

/// Result of `tools/call`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<Content>,
    pub is_error: bool,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content {
                kind: "text",
                text: text.into(),
            }],
            is_error: false,
        }
    }
}

#[derive(Deserialize)]
struct TargetStatusArgs {
    #[serde(default)]
    uri: String,
}

impl Tool {
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_TOOLS.into_iter().find(|t| t.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Tool::ListTargets => "listTargets",
            Tool::GetStatusOverview => "getStatusOverview",
            Tool::GetTargetStatus => "getTargetStatus",
            Tool::ReadLog => "readLog",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Tool::ListTargets => "List all targets that are monitoring by Ayd.",
            Tool::GetStatusOverview => "Get the overview of the status of all targets.",
            Tool::GetTargetStatus => "Get the latest status of a specific target URL.",
            Tool::ReadLog => "Read the monitoring log.",
        }
    }

    pub fn input_schema(self) -> Value {
        match self {
            Tool::ListTargets | Tool::GetStatusOverview => json!({
                "type": "object",
                "properties": {}
            }),
            Tool::GetTargetStatus => json!({
                "type": "object",
                "properties": {
                    "uri": {
                        "type": "string",
                        "description": "The target URL that you want to get the status."
                    }
                },
                "required": ["uri"]
            }),
            Tool::ReadLog => json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query for the log. It can include target URI, status, and message in the log record."
                    },
                    "since": {
                        "type": "string",
                        "description": "The time that you want to read the log since, in RFC3339 format."
                    },
                    "until": {
                        "type": "string",
                        "description": "The time that you want to read the log until, in RFC3339 format."
                    }
                }
            }),
        }
    }

    pub fn info(self) -> ToolInfo {
        ToolInfo {
            name: self.name(),
            description: self.description(),
            input_schema: self.input_schema(),
        }
    }

    /// Run the tool against `backend` with the caller's `arguments`
    pub fn call(self, backend: &dyn Backend, arguments: Value) -> Result<ToolResult, ErrorBody> {
        match self {
            Tool::ListTargets => list_targets(backend),
            Tool::GetStatusOverview => status_overview(backend),
            Tool::GetTargetStatus => target_status(backend, arguments),
            Tool::ReadLog => read_log(backend, arguments),
        }
    }
}

/// Decode tool or method arguments, reporting failures as InvalidParams
pub fn parse_params<T: serde::de::DeserializeOwned>(params: Value) -> Result<T, ErrorBody> {
    serde_json::from_value(params)
        .map_err(|e| ErrorBody::invalid_params(format!("Failed to parse parameters: {}", e)))
}

/// Map a backend failure to InternalError, naming what was being loaded
fn backend_error(what: &str, err: BackendError) -> ErrorBody {
    if err.is_decode() {
        ErrorBody::internal(format!("Failed to load {}: {}", what, err))
    } else {
        ErrorBody::internal(format!("Failed to fetch {}: {}", what, err))
    }
}

fn list_targets(backend: &dyn Backend) -> Result<ToolResult, ErrorBody> {
    let mut targets = backend.targets().map_err(|e| backend_error("targets", e))?;
    targets.sort();
    Ok(ToolResult::text(targets.join("\n")))
}

fn overview_line(history: &ProbeHistory) -> String {
    let updated = history.updated.to_rfc3339();
    match history.latest() {
        Some(record) => format!(
            "Target <{}> reported {} in {:?} at {}",
            history.target,
            history.status,
            record.latency(),
            updated
        ),
        None => format!(
            "Target <{}> reported {} at {}",
            history.target, history.status, updated
        ),
    }
}

fn status_overview(backend: &dyn Backend) -> Result<ToolResult, ErrorBody> {
    let report = backend
        .report()
        .map_err(|e| ErrorBody::internal(format!("Failed to fetch status from Ayd: {}", e)))?;

    let lines: Vec<String> = report.probe_history.values().map(overview_line).collect();
    Ok(ToolResult::text(lines.join("\n")))
}

fn target_status(backend: &dyn Backend, arguments: Value) -> Result<ToolResult, ErrorBody> {
    let args: TargetStatusArgs = parse_params(arguments)?;
    if args.uri.is_empty() {
        return Err(ErrorBody::invalid_params("No URIs specified"));
    }

    let report = backend
        .report()
        .map_err(|e| ErrorBody::internal(format!("Failed to fetch status from Ayd: {}", e)))?;

    // Unknown targets are a normal answer, not a protocol error
    let Some(history) = report.target(&args.uri) else {
        return Ok(ToolResult::text(format!("No such target: {}", args.uri)));
    };

    let summary = json!({
        "uri": history.target,
        "status": history.status,
        "last_log": history.latest(),
    });
    Ok(ToolResult::text(summary.to_string()))
}

fn read_log(backend: &dyn Backend, arguments: Value) -> Result<ToolResult, ErrorBody> {
    let query: LogQuery = parse_params(arguments)?;
    let records = backend.log(&query).map_err(|e| backend_error("log", e))?;

    let lines: Vec<String> = records.iter().map(|r| r.to_line()).collect();
    Ok(ToolResult::text(lines.join("\n")))
}
