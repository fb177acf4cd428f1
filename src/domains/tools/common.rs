//! Common utilities shared across tools.
//!
//! Result builders, argument normalization, and the JSON shape returned by
//! the HTTP transport handlers.

use rmcp::model::{CallToolResult, Content};
use tracing::warn;

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Create a success result with text content.
pub fn success_result(content: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(content)])
}

/// Treat absent and empty optional string arguments the same way.
///
/// Whitespace is not stripped: `"  "` is a value and is passed on as given.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Serialize a tool result the way the HTTP transport returns it.
#[cfg(feature = "http")]
pub fn http_result(result: CallToolResult) -> serde_json::Value {
    serde_json::json!({
        "content": result.content,
        "isError": result.is_error.unwrap_or(false)
    })
}

/// Extract an optional string argument for HTTP handlers.
#[cfg(feature = "http")]
pub fn optional_string_arg(arguments: &serde_json::Value, key: &str) -> Option<String> {
    arguments
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

/// First text block of a result (test helper).
#[cfg(test)]
pub fn result_text(result: &CallToolResult) -> String {
    match &result.content[0].raw {
        rmcp::model::RawContent::Text(text) => text.text.clone(),
        _ => panic!("Expected text content"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_result_flagged() {
        let result = error_result("boom");
        assert_eq!(result.is_error, Some(true));
        assert_eq!(result_text(&result), "boom");
    }

    #[test]
    fn test_success_result_not_flagged() {
        let result = success_result("ok".to_string());
        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(result_text(&result), "ok");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("London")), Some("London"));
        assert_eq!(non_empty(Some("  ")), Some("  "));
        assert_eq!(non_empty(Some("")), None);
        assert_eq!(non_empty(None), None);
    }
}
