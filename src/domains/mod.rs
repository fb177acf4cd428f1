//! Domains module containing business logic organized by bounded contexts.
//!
//! Each subdomain represents a specific area of functionality within the MCP
//! server. Only tools are exposed; the server advertises no resources or
//! prompts.

pub mod tools;
