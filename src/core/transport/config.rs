//! Transport configuration types.
//!
//! The transport also decides where a tool call's client address comes from:
//! TCP uses the socket peer, HTTP optionally honours reverse-proxy headers.

use serde::{Deserialize, Serialize};

#[cfg(any(feature = "tcp", feature = "http"))]
const DEFAULT_HOST: &str = "127.0.0.1";

#[cfg(feature = "tcp")]
const DEFAULT_TCP_PORT: u16 = 3000;

#[cfg(feature = "http")]
const DEFAULT_HTTP_PORT: u16 = 8080;

#[cfg(feature = "http")]
const DEFAULT_RPC_PATH: &str = "/mcp";

/// Which transport the server runs, with its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Standard input/output transport. No client address is known.
    #[cfg(feature = "stdio")]
    Stdio,

    /// Line-delimited JSON-RPC over TCP; each peer is its own client.
    #[cfg(feature = "tcp")]
    Tcp(TcpConfig),

    /// JSON-RPC over HTTP POST.
    #[cfg(feature = "http")]
    Http(HttpConfig),
}

/// TCP transport configuration.
#[cfg(feature = "tcp")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TcpConfig {
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

/// HTTP transport configuration.
#[cfg(feature = "http")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Path of the JSON-RPC endpoint.
    #[serde(default = "default_rpc_path")]
    pub rpc_path: String,

    /// Allow cross-origin browser clients.
    #[serde(default = "enabled")]
    pub enable_cors: bool,

    /// Take the client address from `X-Forwarded-For`, `X-Real-IP` or
    /// `CF-Connecting-IP` before the socket peer. Turn off when the server
    /// is reachable without a proxy that sets these headers.
    #[serde(default = "enabled")]
    pub trust_proxy_headers: bool,
}

#[cfg(any(feature = "tcp", feature = "http"))]
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

#[cfg(feature = "http")]
fn default_rpc_path() -> String {
    DEFAULT_RPC_PATH.to_string()
}

#[cfg(feature = "http")]
fn enabled() -> bool {
    true
}

/// Read `name`, falling back to `default` when unset.
#[cfg(any(feature = "tcp", feature = "http"))]
fn env_or(name: &str, default: impl FnOnce() -> String) -> String {
    std::env::var(name).unwrap_or_else(|_| default())
}

/// Read a port, falling back to `default` when unset or not a port number.
#[cfg(any(feature = "tcp", feature = "http"))]
fn env_port(name: &str, default: u16) -> u16 {
    std::env::var(name)
        .ok()
        .and_then(|p| p.trim().parse().ok())
        .unwrap_or(default)
}

/// Boolean switch: anything but `false`/`0` counts as on.
#[cfg(feature = "http")]
fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| {
            let v = v.trim().to_lowercase();
            v != "false" && v != "0"
        })
        .unwrap_or(default)
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "stdio")]
        {
            return Self::Stdio;
        }

        #[cfg(all(not(feature = "stdio"), feature = "tcp"))]
        {
            return Self::Tcp(TcpConfig::default());
        }

        #[cfg(all(not(feature = "stdio"), not(feature = "tcp"), feature = "http"))]
        {
            return Self::Http(HttpConfig::default());
        }

        #[cfg(not(any(feature = "stdio", feature = "tcp", feature = "http")))]
        {
            compile_error!("At least one transport feature must be enabled: stdio, tcp, or http");
        }
    }
}

#[cfg(feature = "tcp")]
impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_TCP_PORT,
            host: default_host(),
        }
    }
}

#[cfg(feature = "tcp")]
impl TcpConfig {
    /// `MCP_TCP_HOST` and `MCP_TCP_PORT`.
    pub fn from_env() -> Self {
        Self {
            port: env_port("MCP_TCP_PORT", DEFAULT_TCP_PORT),
            host: env_or("MCP_TCP_HOST", default_host),
        }
    }
}

#[cfg(feature = "http")]
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_HTTP_PORT,
            host: default_host(),
            rpc_path: default_rpc_path(),
            enable_cors: true,
            trust_proxy_headers: true,
        }
    }
}

#[cfg(feature = "http")]
impl HttpConfig {
    /// `MCP_HTTP_HOST`, `MCP_HTTP_PORT`, `MCP_HTTP_PATH`, `MCP_HTTP_CORS` and
    /// `MCP_HTTP_TRUST_PROXY`.
    pub fn from_env() -> Self {
        Self {
            port: env_port("MCP_HTTP_PORT", DEFAULT_HTTP_PORT),
            host: env_or("MCP_HTTP_HOST", default_host),
            rpc_path: env_or("MCP_HTTP_PATH", default_rpc_path),
            enable_cors: env_flag("MCP_HTTP_CORS", true),
            trust_proxy_headers: env_flag("MCP_HTTP_TRUST_PROXY", true),
        }
    }
}

impl TransportConfig {
    #[cfg(feature = "tcp")]
    pub fn tcp(port: u16, host: impl Into<String>) -> Self {
        Self::Tcp(TcpConfig {
            port,
            host: host.into(),
        })
    }

    #[cfg(feature = "http")]
    pub fn http(port: u16, host: impl Into<String>) -> Self {
        Self::Http(HttpConfig {
            port,
            host: host.into(),
            ..Default::default()
        })
    }

    /// Select the transport named by `MCP_TRANSPORT`.
    ///
    /// Unknown or disabled names fall back to the default transport.
    pub fn from_env() -> Self {
        let transport = std::env::var("MCP_TRANSPORT")
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        match transport.as_str() {
            #[cfg(feature = "tcp")]
            "tcp" => Self::Tcp(TcpConfig::from_env()),
            #[cfg(feature = "http")]
            "http" => Self::Http(HttpConfig::from_env()),
            _ => Self::default(),
        }
    }

    /// One-line summary for the startup log, including where client
    /// addresses come from.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO (no client address)".to_string(),
            #[cfg(feature = "tcp")]
            Self::Tcp(cfg) => format!("TCP on {}:{} (client address: peer)", cfg.host, cfg.port),
            #[cfg(feature = "http")]
            Self::Http(cfg) => format!(
                "HTTP on {}:{}{} (client address: {})",
                cfg.host,
                cfg.port,
                cfg.rpc_path,
                if cfg.trust_proxy_headers {
                    "proxy headers, then peer"
                } else {
                    "peer"
                }
            ),
        }
    }
}
