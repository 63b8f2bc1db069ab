pub mod config;
pub mod mcp;
pub mod observability;
pub mod slug;
pub mod tool_result;

pub use config::BeadsMode;
pub use tool_result::{tool_error, tool_success, ToolResult, ToolWarning, WarningSeverity};
