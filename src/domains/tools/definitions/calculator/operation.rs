//! Fixed-operation arithmetic tool.
//!
//! Applies one operation from a closed set to two operands and prints the
//! result with two decimals.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::domains::tools::ToolError;
use crate::domains::tools::common::success_result;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Supported arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

impl Operation {
    /// Apply the operation, rejecting out-of-domain inputs.
    pub fn apply(self, x: f64, y: f64) -> Result<f64, ToolError> {
        let value = match self {
            Self::Add => x + y,
            Self::Subtract => x - y,
            Self::Multiply => x * y,
            Self::Divide => {
                if y == 0.0 {
                    return Err(ToolError::domain("division by zero"));
                }
                x / y
            }
            Self::Modulo => {
                if y == 0.0 {
                    return Err(ToolError::domain("modulo by zero"));
                }
                x % y
            }
            Self::Power => x.powf(y),
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(ToolError::domain(format!(
                "{:?} of {} and {} is not a finite number",
                self, x, y
            )))
        }
    }
}

/// Parameters for the arithmetic tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ArithmeticParams {
    /// The operation to perform.
    #[schemars(description = "Operation: add, subtract, multiply, divide, modulo, or power")]
    pub operation: Operation,

    /// First operand.
    #[schemars(description = "First number")]
    pub x: f64,

    /// Second operand.
    #[schemars(description = "Second number")]
    pub y: f64,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Arithmetic tool - one fixed operation over two numbers.
pub struct ArithmeticTool;

impl ArithmeticTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "arithmetic";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Perform a basic arithmetic operation (add, subtract, multiply, divide, modulo, power) on two numbers";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all, fields(operation = ?params.operation))]
    pub fn execute(params: &ArithmeticParams) -> CallToolResult {
        info!("Arithmetic tool called: x={}, y={}", params.x, params.y);

        match params.operation.apply(params.x, params.y) {
            Ok(value) => success_result(format!("{:.2}", value)),
            Err(e) => e.into_call_result(),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub fn http_handler(arguments: serde_json::Value) -> Result<serde_json::Value, String> {
        let params: ArithmeticParams =
            serde_json::from_value(arguments).map_err(|e| format!("Invalid parameters: {}", e))?;

        let result = Self::execute(&params);
        Ok(crate::domains::tools::common::http_result(result))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ArithmeticParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>() -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            async move {
                let params: ArithmeticParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params))
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
