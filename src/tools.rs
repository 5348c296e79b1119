//! Tool Boundary
//!
//! The surface an external language-model orchestrator drives. The model
//! emits function calls (`{"tool": "...", "args": {...}}`); [`TransferAgent`]
//! applies each one to the session, runs the stage policy, and answers with a
//! flat [`ToolResponse`] record.
//!
//! Deciding *which* tool to call and *what* to say is the model's job and is
//! not handled here.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::{debug, info};

use crate::country::CountryLookup;
use crate::session::{Session, TransferCoordinator, TransferError, advance, missing_fields};

/// Tracing target for per-call session snapshots
pub const TARGET_SESSION: &str = "SENDMONEY::SESSION";

/// Names of the six tools, in the order they are declared to the model
pub const TOOL_NAMES: [&str; 6] = [
    "set_destination",
    "set_amount",
    "calculate_usd_from_target",
    "set_transfer_details",
    "confirm_transfer",
    "cancel_transfer_session",
];

// ============================================================================
// Tool Calls
// ============================================================================

/// Raw function call as emitted by the model
#[derive(Debug, Clone, Deserialize)]
pub struct RawToolCall {
    pub tool: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SetDestinationArgs {
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SetAmountArgs {
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TargetAmountArgs {
    pub target_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TransferDetailsArgs {
    #[serde(default)]
    pub beneficiary: Option<String>,
    #[serde(default)]
    pub delivery_method: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConfirmArgs {
    pub confirmed: bool,
}

/// A validated call to one of the six transfer operations
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    SetDestination(SetDestinationArgs),
    SetAmount(SetAmountArgs),
    CalculateUsdFromTarget(TargetAmountArgs),
    SetTransferDetails(TransferDetailsArgs),
    ConfirmTransfer(ConfirmArgs),
    CancelTransferSession,
}

/// Errors turning model output into a [`ToolCall`]
#[derive(Debug, Error)]
pub enum ToolCallError {
    #[error("Malformed tool call: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ToolCallError {
    pub fn code(&self) -> &'static str {
        match self {
            ToolCallError::Malformed(_) => "malformed_call",
            ToolCallError::UnknownTool(_) => "unknown_tool",
            ToolCallError::InvalidArguments { .. } => "invalid_arguments",
        }
    }
}

impl ToolCall {
    /// Build a call from a tool name and its JSON arguments
    pub fn from_parts(tool: &str, args: Value) -> Result<Self, ToolCallError> {
        fn parse<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, ToolCallError> {
            serde_json::from_value(args).map_err(|source| ToolCallError::InvalidArguments {
                tool: tool.to_string(),
                source,
            })
        }

        match tool {
            "set_destination" => parse(tool, args).map(ToolCall::SetDestination),
            "set_amount" => parse(tool, args).map(ToolCall::SetAmount),
            "calculate_usd_from_target" => parse(tool, args).map(ToolCall::CalculateUsdFromTarget),
            "set_transfer_details" => {
                // Both arguments are optional, so a missing args object is fine
                let args = if args.is_null() { json!({}) } else { args };
                parse(tool, args).map(ToolCall::SetTransferDetails)
            }
            "confirm_transfer" => parse(tool, args).map(ToolCall::ConfirmTransfer),
            "cancel_transfer_session" => Ok(ToolCall::CancelTransferSession),
            other => Err(ToolCallError::UnknownTool(other.to_string())),
        }
    }

    /// Parse one JSON-encoded call (`{"tool": ..., "args": ...}`)
    pub fn from_json(line: &str) -> Result<Self, ToolCallError> {
        let raw: RawToolCall = serde_json::from_str(line).map_err(ToolCallError::Malformed)?;
        Self::from_parts(&raw.tool, raw.args)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::SetDestination(_) => "set_destination",
            ToolCall::SetAmount(_) => "set_amount",
            ToolCall::CalculateUsdFromTarget(_) => "calculate_usd_from_target",
            ToolCall::SetTransferDetails(_) => "set_transfer_details",
            ToolCall::ConfirmTransfer(_) => "confirm_transfer",
            ToolCall::CancelTransferSession => "cancel_transfer_session",
        }
    }
}

// ============================================================================
// Tool Responses
// ============================================================================

/// Outcome record returned to the model after each call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    pub message: String,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl ToolResponse {
    pub fn ok<T: Serialize>(body: &T, message: String) -> Self {
        let data = match serde_json::to_value(body) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        Self {
            success: true,
            error_kind: None,
            message,
            data,
        }
    }

    pub fn from_transfer_error(err: &TransferError) -> Self {
        Self {
            success: false,
            error_kind: Some(err.code().to_string()),
            message: err.to_string(),
            data: err.details(),
        }
    }

    pub fn from_call_error(err: &ToolCallError) -> Self {
        Self {
            success: false,
            error_kind: Some(err.code().to_string()),
            message: err.to_string(),
            data: Map::new(),
        }
    }
}

// ============================================================================
// TransferAgent
// ============================================================================

/// Applies tool calls to a session and re-evaluates its stage after each one
pub struct TransferAgent {
    coordinator: TransferCoordinator,
}

impl TransferAgent {
    pub fn new(coordinator: TransferCoordinator) -> Self {
        Self { coordinator }
    }

    pub fn coordinator(&self) -> &TransferCoordinator {
        &self.coordinator
    }

    pub fn new_session(&self) -> Session {
        self.coordinator.new_session()
    }

    /// Run one operation, then the stage policy
    pub fn dispatch(&self, session: &mut Session, call: ToolCall) -> ToolResponse {
        let coord = &self.coordinator;
        let tool = call.name();

        let response = match call {
            ToolCall::SetDestination(args) => respond(
                coord.set_destination(session, &args.country),
                |r| r.message(),
            ),
            ToolCall::SetAmount(args) => {
                respond(coord.set_amount(session, args.amount), |r| r.message())
            }
            ToolCall::CalculateUsdFromTarget(args) => respond(
                coord.calculate_usd_from_target(session, args.target_amount),
                |r| r.message(),
            ),
            ToolCall::SetTransferDetails(args) => respond(
                coord.set_transfer_details(
                    session,
                    args.beneficiary.as_deref(),
                    args.delivery_method.as_deref(),
                ),
                |r| r.message(),
            ),
            ToolCall::ConfirmTransfer(args) => respond(
                coord.confirm_transfer(session, args.confirmed),
                |r| r.message(),
            ),
            ToolCall::CancelTransferSession => {
                let reset = coord.cancel_transfer_session(session);
                ToolResponse::ok(&reset, reset.message())
            }
        };

        self.apply_policy(session, tool);
        response
    }

    /// Parse and run one JSON-encoded call. A call that does not parse
    /// leaves the session untouched.
    pub fn handle_json(&self, session: &mut Session, line: &str) -> ToolResponse {
        match ToolCall::from_json(line) {
            Ok(call) => self.dispatch(session, call),
            Err(e) => {
                debug!(error_kind = e.code(), "Rejected tool call: {}", e);
                ToolResponse::from_call_error(&e)
            }
        }
    }

    fn apply_policy(&self, session: &mut Session, tool: &str) {
        let before = session.stage();
        *session = advance(std::mem::take(session));
        let after = session.stage();

        if before != after {
            info!(tool, from = %before, to = %after, "Stage advanced");
        } else {
            let missing: Vec<&str> = missing_fields(session).iter().map(|f| f.as_str()).collect();
            debug!(tool, stage = %after, ?missing, "Stage unchanged");
        }
        tracing::trace!(target: TARGET_SESSION, tool, state = %session.snapshot(), "Session state");
    }
}

fn respond<T: Serialize>(
    result: Result<T, TransferError>,
    message: impl FnOnce(&T) -> String,
) -> ToolResponse {
    match result {
        Ok(body) => {
            let msg = message(&body);
            ToolResponse::ok(&body, msg)
        }
        Err(e) => ToolResponse::from_transfer_error(&e),
    }
}

// ============================================================================
// Tool Declarations
// ============================================================================

/// Function declarations for the six tools, in JSON-schema form
pub fn tool_definitions(lookup: &dyn CountryLookup) -> Value {
    let countries = lookup.supported_country_names();
    json!([
        {
            "name": "set_destination",
            "description": format!(
                "Set the destination country and load its currency, exchange rate and delivery methods. Supported: {}.",
                countries.join(", ")
            ),
            "parameters": {
                "type": "object",
                "properties": {
                    "country": { "type": "string", "description": "Destination country name" }
                },
                "required": ["country"]
            }
        },
        {
            "name": "set_amount",
            "description": "Set the USD amount to send (greater than 0, at most 10000).",
            "parameters": {
                "type": "object",
                "properties": {
                    "amount": { "type": "number", "description": "Amount in USD" }
                },
                "required": ["amount"]
            }
        },
        {
            "name": "calculate_usd_from_target",
            "description": "Compute the USD amount needed for the beneficiary to receive a given amount in the destination currency.",
            "parameters": {
                "type": "object",
                "properties": {
                    "target_amount": { "type": "number", "description": "Amount the beneficiary should receive, in destination currency" }
                },
                "required": ["target_amount"]
            }
        },
        {
            "name": "set_transfer_details",
            "description": "Set the beneficiary's full name and/or the delivery method. Both are optional.",
            "parameters": {
                "type": "object",
                "properties": {
                    "beneficiary": { "type": "string", "description": "Recipient's full legal name" },
                    "delivery_method": { "type": "string", "description": "One of the destination's available methods" }
                }
            }
        },
        {
            "name": "confirm_transfer",
            "description": "Finalize the transfer (true) or go back to make changes (false).",
            "parameters": {
                "type": "object",
                "properties": {
                    "confirmed": { "type": "boolean" }
                },
                "required": ["confirmed"]
            }
        },
        {
            "name": "cancel_transfer_session",
            "description": "Abandon the current transfer and reset the session.",
            "parameters": { "type": "object", "properties": {} }
        }
    ])
}
