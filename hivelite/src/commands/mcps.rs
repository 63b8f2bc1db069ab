//! `hivelite mcps`

use hivelite_core::mcp::create_builtin_mcps;
use hivelite_core::tool_success;

/// Builtin MCP table minus the config-level and flag-level disable lists.
pub fn cmd_mcps(config_disabled: &[String], flag_disabled: &[String]) -> String {
    let disabled: Vec<&str> = config_disabled
        .iter()
        .chain(flag_disabled)
        .map(|s| s.trim())
        .collect();
    let mcps = create_builtin_mcps(&disabled);
    tracing::debug!(enabled = mcps.len(), disabled = disabled.len(), "Builtin MCPs resolved");
    tool_success(&mcps)
}
