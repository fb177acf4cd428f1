//! Tool-specific error types.
//!
//! Every variant is recovered at the tool boundary and surfaced to the client
//! as an error-flagged text result (see [`ToolError::into_call_result`]).

use rmcp::model::CallToolResult;
use thiserror::Error;

use super::common::error_result;

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// The arguments could not be used (e.g. an expression that does not compile).
    #[error("{0}")]
    InvalidArguments(String),

    /// A required configuration value (e.g. an API key) is absent.
    #[error("{0}")]
    MissingConfiguration(String),

    /// No explicit location/IP was given and the client IP is unknown.
    #[error("Could not determine client IP address")]
    MissingClientIp,

    /// The IP-based location fallback failed.
    #[error("Failed to get location from IP: {0}")]
    LocationResolutionFailed(Box<ToolError>),

    /// Network or transport failure talking to an upstream API.
    #[error("{0}")]
    UpstreamFetchFailed(String),

    /// The upstream answered with a non-success HTTP status or status field.
    #[error("{0}")]
    UpstreamStatusFailed(String),

    /// The upstream body could not be parsed.
    #[error("{0}")]
    MalformedUpstreamPayload(String),

    /// Arithmetic out of domain (division by zero, sqrt of a negative, ...).
    #[error("Domain error: {0}")]
    DomainError(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "missing configuration" error.
    pub fn missing_configuration(msg: impl Into<String>) -> Self {
        Self::MissingConfiguration(msg.into())
    }

    /// Wrap a geolocation failure.
    pub fn location_resolution_failed(inner: ToolError) -> Self {
        Self::LocationResolutionFailed(Box::new(inner))
    }

    /// Create a new "upstream fetch failed" error.
    pub fn upstream_fetch(msg: impl Into<String>) -> Self {
        Self::UpstreamFetchFailed(msg.into())
    }

    /// Create a new "upstream status failed" error.
    pub fn upstream_status(msg: impl Into<String>) -> Self {
        Self::UpstreamStatusFailed(msg.into())
    }

    /// Create a new "malformed upstream payload" error.
    pub fn malformed_payload(msg: impl Into<String>) -> Self {
        Self::MalformedUpstreamPayload(msg.into())
    }

    /// Create a new arithmetic domain error.
    pub fn domain(msg: impl Into<String>) -> Self {
        Self::DomainError(msg.into())
    }

    /// Convert into the error-flagged tool result sent to the client.
    pub fn into_call_result(self) -> CallToolResult {
        error_result(&self.to_string())
    }
}
