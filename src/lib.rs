//! LazyMCP server library
//!
//! This crate provides a Model Context Protocol (MCP) server exposing a small
//! set of stateless tools: an arithmetic calculator, client IP detection, IP
//! geolocation, and current/forecast weather lookups.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP server handler and the
//!   transports (STDIO, TCP, HTTP)
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: the MCP tools, one module per tool family
//!     (`calculator`, `network`, `weather`)
//!
//! # Example
//!
//! ```rust,no_run
//! use lazy_mcp_server::{core::McpServer, core::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config);
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
