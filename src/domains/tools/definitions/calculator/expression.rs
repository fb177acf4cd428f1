//! Free-form expression calculator tool.
//!
//! Expressions are parsed by `meval` and evaluated against a fixed
//! environment of constants and functions. Results print with six
//! significant digits.

use std::f64::consts::{E, PI};

use futures::FutureExt;
use meval::Expr;
use meval::tokenizer::{Operation as Op, Token};
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::domains::tools::ToolError;
use crate::domains::tools::common::success_result;

use super::format_significant;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the calculate tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CalculateParams {
    /// Mathematical expression to evaluate.
    #[schemars(
        description = "Mathematical expression to evaluate. Supports +, -, *, /, %, ^, sqrt(), sin(), cos(), tan(), asin(), acos(), atan(), log(), ln(), abs(), ceil(), floor(), round(), pow(), pi, e"
    )]
    pub expression: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Calculator tool - evaluates mathematical expressions.
pub struct CalculateTool;

impl CalculateTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "calculate";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Evaluate mathematical expressions using natural syntax (e.g., '2 + 3 * 4', 'sin(pi/4)', 'sqrt(16)')";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all, fields(expression = %params.expression))]
    pub fn execute(params: &CalculateParams) -> CallToolResult {
        info!("Calculate tool called");

        match evaluate(&params.expression) {
            Ok(value) => success_result(format_significant(value, 6)),
            Err(e) => e.into_call_result(),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub fn http_handler(arguments: serde_json::Value) -> Result<serde_json::Value, String> {
        let expression = arguments
            .get("expression")
            .and_then(|v| v.as_str())
            .ok_or_else(|| "Missing or invalid 'expression' parameter".to_string())?
            .to_string();

        let result = Self::execute(&CalculateParams { expression });
        Ok(crate::domains::tools::common::http_result(result))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<CalculateParams>(),
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
                let params: CalculateParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params))
            }
            .boxed()
        })
    }
}

// ============================================================================
// Evaluation
// ============================================================================

/// Evaluate an expression against the calculator environment.
///
/// `meval` parses the expression into RPN; the tokens are evaluated here so
/// every intermediate value can be checked. Division or modulo by zero, an
/// out-of-domain function argument or any non-finite intermediate result is a
/// domain error, even when later operations would bring the value back into
/// range (`atan(1/0)`, `pow(sqrt(-4), 0)`).
pub fn evaluate(expression: &str) -> Result<f64, ToolError> {
    let expr: Expr = expression.parse().map_err(compilation_error)?;

    let mut stack: Vec<f64> = Vec::with_capacity(16);
    for token in expr.iter() {
        let value = match token {
            Token::Number(n) => *n,
            Token::Var(name) => constant(name)
                .ok_or_else(|| compilation_error(format!("unknown variable `{}`", name)))?,
            Token::Unary(Op::Plus) => pop(&mut stack)?,
            Token::Unary(Op::Minus) => -pop(&mut stack)?,
            Token::Binary(op) => {
                let right = pop(&mut stack)?;
                let left = pop(&mut stack)?;
                binary(*op, left, right)?
            }
            Token::Func(name, Some(arity)) => {
                let split = stack
                    .len()
                    .checked_sub(*arity)
                    .ok_or_else(|| evaluation_error("malformed expression"))?;
                let args = stack.split_off(split);
                call(name, &args)?
            }
            other => return Err(evaluation_error(format!("unexpected token {:?}", other))),
        };

        if !value.is_finite() {
            return Err(ToolError::domain(if value.is_nan() {
                "undefined result"
            } else {
                "numeric overflow"
            }));
        }
        stack.push(value);
    }

    let value = pop(&mut stack)?;
    if !stack.is_empty() {
        return Err(evaluation_error("malformed expression"));
    }

    debug!(value, "Expression evaluated");
    Ok(value)
}

fn compilation_error(detail: impl std::fmt::Display) -> ToolError {
    ToolError::invalid_arguments(format!("Expression compilation error: {}", detail))
}

fn evaluation_error(detail: impl std::fmt::Display) -> ToolError {
    ToolError::invalid_arguments(format!("Expression evaluation error: {}", detail))
}

fn pop(stack: &mut Vec<f64>) -> Result<f64, ToolError> {
    stack
        .pop()
        .ok_or_else(|| evaluation_error("malformed expression"))
}

fn check(in_domain: bool, reason: &str) -> Result<(), ToolError> {
    if in_domain {
        Ok(())
    } else {
        Err(ToolError::domain(reason))
    }
}

fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(PI),
        "e" => Some(E),
        _ => None,
    }
}

fn binary(op: Op, left: f64, right: f64) -> Result<f64, ToolError> {
    Ok(match op {
        Op::Plus => left + right,
        Op::Minus => left - right,
        Op::Times => left * right,
        Op::Div => {
            check(right != 0.0, "division by zero")?;
            left / right
        }
        Op::Rem => {
            check(right != 0.0, "modulo by zero")?;
            left % right
        }
        Op::Pow => power(left, right)?,
    })
}

fn power(base: f64, exponent: f64) -> Result<f64, ToolError> {
    check(!(base == 0.0 && exponent < 0.0), "division by zero")?;
    Ok(base.powf(exponent))
}

/// Number of arguments each supported function takes.
fn arity(name: &str) -> Option<usize> {
    match name {
        "sqrt" | "sin" | "cos" | "tan" | "asin" | "acos" | "atan" | "log" | "ln" | "abs"
        | "ceil" | "floor" | "round" => Some(1),
        "pow" => Some(2),
        _ => None,
    }
}

fn call(name: &str, args: &[f64]) -> Result<f64, ToolError> {
    let unit_range = |x: f64| (-1.0..=1.0).contains(&x);

    match (name, args) {
        ("sqrt", &[x]) => {
            check(x >= 0.0, "square root of a negative number")?;
            Ok(x.sqrt())
        }
        ("sin", &[x]) => Ok(x.sin()),
        ("cos", &[x]) => Ok(x.cos()),
        ("tan", &[x]) => Ok(x.tan()),
        ("asin", &[x]) => {
            check(unit_range(x), "asin argument outside [-1, 1]")?;
            Ok(x.asin())
        }
        ("acos", &[x]) => {
            check(unit_range(x), "acos argument outside [-1, 1]")?;
            Ok(x.acos())
        }
        ("atan", &[x]) => Ok(x.atan()),
        ("log", &[x]) => {
            check(x > 0.0, "logarithm of a non-positive number")?;
            Ok(x.log10())
        }
        ("ln", &[x]) => {
            check(x > 0.0, "logarithm of a non-positive number")?;
            Ok(x.ln())
        }
        ("abs", &[x]) => Ok(x.abs()),
        ("ceil", &[x]) => Ok(x.ceil()),
        ("floor", &[x]) => Ok(x.floor()),
        ("round", &[x]) => Ok(x.round()),
        ("pow", &[x, y]) => power(x, y),
        _ => Err(match arity(name) {
            Some(expected) => compilation_error(format!(
                "function `{}` takes {} argument(s), got {}",
                name,
                expected,
                args.len()
            )),
            None => compilation_error(format!("unknown function `{}`", name)),
        }),
    }
}

// ============================================================================
// Tests
// ============================================================================
