//! Tool result envelope shared by every tool-facing command.
//!
//! Wire shape: `{"success": bool, "data"?, "error"?, "hints"?, "warnings"?}`.
//! Absent fields are omitted, never `null`. A success envelope never carries
//! `error`/`hints`; a failure envelope never carries `data`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Severity of a [`ToolWarning`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}

/// A typed, non-fatal warning attached to a tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolWarning {
    /// Machine-readable tag, e.g. `"blocked_tasks"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: WarningSeverity,
    pub message: String,
    /// The item the warning is about (task folder, feature name, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

impl ToolWarning {
    pub fn new(kind: &str, severity: WarningSeverity, message: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            severity,
            message: message.into(),
            affected: None,
            count: None,
        }
    }

    #[must_use]
    pub fn affected(mut self, item: impl Into<String>) -> Self {
        self.affected = Some(item.into());
        self
    }

    #[must_use]
    pub fn count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }
}

/// Tagged outcome of one tool invocation. Built through [`ToolResult::ok`] or
/// [`ToolResult::err`] so the success/error invariant always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hints: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<ToolWarning>>,
}

impl ToolResult {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            hints: None,
            warnings: None,
        }
    }

    pub fn err(message: impl Into<String>, hints: Option<Vec<String>>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            hints,
            warnings: None,
        }
    }

    /// Attach warnings. An empty list leaves the field absent.
    #[must_use]
    pub fn with_warnings(mut self, warnings: Vec<ToolWarning>) -> Self {
        self.warnings = if warnings.is_empty() { None } else { Some(warnings) };
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn hints(&self) -> Option<&[String]> {
        self.hints.as_deref()
    }

    pub fn warnings(&self) -> Option<&[ToolWarning]> {
        self.warnings.as_deref()
    }

    /// Pretty-printed JSON. Never fails: a serialization problem is reported
    /// as a failure envelope.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            let fallback = json!({
                "success": false,
                "error": format!("Failed to serialize tool result: {}", e),
            });
            format!("{:#}", fallback)
        })
    }

    /// Parse an envelope, rejecting shapes that break the success/error invariant.
    pub fn parse(raw: &str) -> serde_json::Result<Self> {
        use serde::de::Error as _;
        let parsed: Self = serde_json::from_str(raw)?;
        if parsed.success && (parsed.error.is_some() || parsed.hints.is_some()) {
            return Err(serde_json::Error::custom(
                "success envelope must not carry error or hints",
            ));
        }
        if !parsed.success && parsed.data.is_some() {
            return Err(serde_json::Error::custom(
                "failure envelope must not carry data",
            ));
        }
        Ok(parsed)
    }
}

/// Serialize `data` into a success envelope.
///
/// If `data` cannot be represented as JSON the result is a failure envelope
/// describing why, so callers always get a parseable document.
pub fn tool_success<T: Serialize + ?Sized>(data: &T) -> String {
    match serde_json::to_value(data) {
        Ok(value) => ToolResult::ok(value).to_json(),
        Err(e) => tool_error(&format!("Failed to serialize tool output: {}", e), None),
    }
}

/// Serialize a failure envelope with optional remediation hints.
pub fn tool_error(message: &str, hints: Option<&[&str]>) -> String {
    let hints = hints.map(|h| h.iter().map(|s| s.to_string()).collect());
    ToolResult::err(message, hints).to_json()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_success_shape() {
        let raw = tool_success(&json!({"a": 1}));
        let v: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(v, json!({"success": true, "data": {"a": 1}}));
        assert!(v.get("error").is_none());
        assert!(v.get("warnings").is_none());
    }

    #[test]
    fn test_error_shape() {
        let raw = tool_error("bad", Some(&["try x"]));
        let v: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(v, json!({"success": false, "error": "bad", "hints": ["try x"]}));
        assert!(v.get("data").is_none());
    }

    #[test]
    fn test_error_without_hints_omits_field() {
        let v: Value = serde_json::from_str(&tool_error("nope", None)).unwrap();
        assert_eq!(v, json!({"success": false, "error": "nope"}));
    }

    #[test]
    fn test_parse_keeps_logical_shape() {
        let parsed = ToolResult::parse(&tool_error("bad", Some(&["try x", "try y"]))).unwrap();
        assert!(!parsed.is_success());
        assert_eq!(parsed.error(), Some("bad"));
        assert_eq!(parsed.hints().unwrap(), ["try x", "try y"]);
        assert!(parsed.data().is_none());

        let parsed = ToolResult::parse(&tool_success(&vec!["x", "y"])).unwrap();
        assert!(parsed.is_success());
        assert_eq!(parsed.data(), Some(&json!(["x", "y"])));
        assert!(parsed.error().is_none());
    }

    #[test]
    fn test_parse_rejects_mixed_envelopes() {
        assert!(ToolResult::parse(r#"{"success": true, "data": 1, "error": "x"}"#).is_err());
        assert!(ToolResult::parse(r#"{"success": false, "data": 1, "error": "x"}"#).is_err());
    }

    #[test]
    fn test_warnings_serialized_with_type_tag() {
        let result = ToolResult::ok(json!({"tasks": 3})).with_warnings(vec![ToolWarning::new(
            "blocked_tasks",
            WarningSeverity::Warning,
            "1 task is blocked",
        )
        .affected("02-api")
        .count(1)]);
        let v: Value = serde_json::from_str(&result.to_json()).unwrap();
        assert_eq!(
            v["warnings"],
            json!([{
                "type": "blocked_tasks",
                "severity": "warning",
                "message": "1 task is blocked",
                "affected": "02-api",
                "count": 1
            }])
        );
        let empty = ToolResult::ok(json!(null)).with_warnings(Vec::new());
        assert!(empty.warnings().is_none());
    }

    #[test]
    fn test_unserializable_data_becomes_error() {
        let mut bad: HashMap<(u8, u8), u8> = HashMap::new();
        bad.insert((1, 2), 3);
        let parsed = ToolResult::parse(&tool_success(&bad)).unwrap();
        assert!(!parsed.is_success());
        assert!(parsed.error().unwrap().contains("Failed to serialize tool output"));
    }
}
