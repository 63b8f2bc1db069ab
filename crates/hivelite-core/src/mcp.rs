//! Builtin MCP registry.
//!
//! Three remote MCP servers ship with the plugin: web search (Exa),
//! library documentation (Context7) and public code search (grep.app).
//! The table is built once per process and never mutated; callers get a
//! filtered copy keyed by MCP name.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::config::env_keys::mcp as mcp_keys;
use crate::config::env_optional;

pub const WEBSEARCH: &str = "websearch";
pub const CONTEXT7: &str = "context7";
pub const GREP_APP: &str = "grep_app";

const BUILTIN_NAMES: &[&str] = &[WEBSEARCH, CONTEXT7, GREP_APP];

/// Descriptor for a remote MCP server, in the shape the host agent expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum McpConfig {
    Remote {
        url: String,
        enabled: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        headers: Option<BTreeMap<String, String>>,
        #[serde(default)]
        oauth: bool,
    },
}

impl McpConfig {
    fn remote(url: &str, headers: Option<BTreeMap<String, String>>) -> Self {
        McpConfig::Remote {
            url: url.to_string(),
            enabled: true,
            headers,
            oauth: false,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            McpConfig::Remote { url, .. } => url,
        }
    }

    pub fn is_builtin(name: &str) -> bool {
        BUILTIN_NAMES.contains(&name)
    }
}

/// Single-header map from an optional API key.
fn api_key_header(header: &str, env_key: &str) -> Option<BTreeMap<String, String>> {
    env_optional(env_key, &[]).map(|key| BTreeMap::from([(header.to_string(), key)]))
}

fn builtin_table() -> &'static BTreeMap<&'static str, McpConfig> {
    static TABLE: OnceLock<BTreeMap<&'static str, McpConfig>> = OnceLock::new();
    TABLE.get_or_init(|| {
        BTreeMap::from([
            (
                WEBSEARCH,
                McpConfig::remote(
                    "https://mcp.exa.ai/mcp?tools=web_search_exa",
                    api_key_header("x-api-key", mcp_keys::EXA_API_KEY),
                ),
            ),
            (
                CONTEXT7,
                McpConfig::remote(
                    "https://mcp.context7.com/mcp",
                    api_key_header(mcp_keys::CONTEXT7_API_KEY, mcp_keys::CONTEXT7_API_KEY),
                ),
            ),
            (GREP_APP, McpConfig::remote("https://mcp.grep.app", None)),
        ])
    })
}

/// Names of every builtin MCP, in registry order.
pub fn builtin_mcp_names() -> &'static [&'static str] {
    BUILTIN_NAMES
}

/// All builtin MCPs except the disabled ones. Unknown names are ignored.
pub fn create_builtin_mcps<S: AsRef<str>>(disabled: &[S]) -> BTreeMap<String, McpConfig> {
    for name in disabled {
        if !McpConfig::is_builtin(name.as_ref()) {
            tracing::debug!(name = name.as_ref(), "Ignoring unknown MCP in disable list");
        }
    }
    builtin_table()
        .iter()
        .filter(|(name, _)| !disabled.iter().any(|d| d.as_ref() == **name))
        .map(|(name, cfg)| (name.to_string(), cfg.clone()))
        .collect()
}
