//! 按领域分组的配置结构体
//!
//! 配置文件（JSON）提供基础值，环境变量覆盖，统一 fallback 逻辑。

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::env_keys::{mcp as mcp_keys, observability as obv_keys, project};
use super::loader::{env_bool, env_list, env_optional, env_or};

/// Errors raised by strict config parsing.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid beads mode '{0}' (expected 'on' or 'off')")]
    InvalidBeadsMode(String),
}

/// Selects which store family tracks features, tasks and plans for a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BeadsMode {
    On,
    #[default]
    Off,
}

impl BeadsMode {
    /// Permissive parse: `"on"` selects beads, every other value falls back to `Off`.
    pub fn from_flag(value: &str) -> Self {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "on" => BeadsMode::On,
            "off" => BeadsMode::Off,
            other => {
                tracing::warn!(value = other, "Unrecognized beads mode, using filesystem stores");
                BeadsMode::Off
            }
        }
    }

    /// Strict parse: rejects anything other than `on` / `off`.
    pub fn parse_strict(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "on" => Ok(BeadsMode::On),
            "off" => Ok(BeadsMode::Off),
            _ => Err(ConfigError::InvalidBeadsMode(value.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BeadsMode::On => "on",
            BeadsMode::Off => "off",
        }
    }
}

impl FromStr for BeadsMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_strict(s)
    }
}

impl fmt::Display for BeadsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// On-disk config file shape (`beadsMode`, `disableMcps`, `projectRoot`).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    #[serde(default)]
    beads_mode: Option<String>,
    #[serde(default)]
    disable_mcps: Vec<String>,
    #[serde(default)]
    project_root: Option<String>,
}

/// 插件级配置：存储模式、禁用的内置 MCP、项目根目录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiveConfig {
    pub beads_mode: BeadsMode,
    pub disable_mcps: Vec<String>,
    pub project_root: PathBuf,
}

impl Default for HiveConfig {
    fn default() -> Self {
        Self {
            beads_mode: BeadsMode::Off,
            disable_mcps: Vec::new(),
            project_root: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

impl HiveConfig {
    /// 读取配置文件，再应用环境变量覆盖（会自动加载 .env）
    pub fn load() -> anyhow::Result<Self> {
        super::loader::load_dotenv();
        let explicit =
            env_optional(project::HIVELITE_CONFIG, project::CONFIG_ALIASES).map(PathBuf::from);
        let default_path = Self::default_config_path();
        let base = Self::base_config(explicit.as_deref(), default_path.as_deref())?;
        Ok(base.with_overrides(
            env_optional(project::HIVELITE_BEADS_MODE, project::BEADS_MODE_ALIASES),
            env_list(mcp_keys::HIVELITE_DISABLE_MCPS, mcp_keys::DISABLE_MCPS_ALIASES),
            env_optional(project::HIVELITE_PROJECT_ROOT, project::PROJECT_ROOT_ALIASES),
        ))
    }

    /// `<config_dir>/hivelite/config.json`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("hivelite").join("config.json"))
    }

    /// 显式指定的配置文件（HIVELITE_CONFIG）必须存在；默认路径缺失时使用默认值
    pub fn base_config(explicit: Option<&Path>, default_path: Option<&Path>) -> anyhow::Result<Self> {
        match (explicit, default_path) {
            (Some(path), _) => Self::from_file(path),
            (None, Some(path)) if path.is_file() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let file: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        let defaults = Self::default();
        Ok(Self {
            beads_mode: file
                .beads_mode
                .as_deref()
                .map(BeadsMode::from_flag)
                .unwrap_or(defaults.beads_mode),
            disable_mcps: file.disable_mcps,
            project_root: file
                .project_root
                .map(PathBuf::from)
                .unwrap_or(defaults.project_root),
        })
    }

    /// Env values replace file values; an unset variable keeps the current value.
    pub fn with_overrides(
        mut self,
        beads_mode: Option<String>,
        disable_mcps: Option<Vec<String>>,
        project_root: Option<String>,
    ) -> Self {
        if let Some(mode) = beads_mode {
            self.beads_mode = BeadsMode::from_flag(&mode);
        }
        if let Some(list) = disable_mcps {
            self.disable_mcps = list;
        }
        if let Some(root) = project_root {
            self.project_root = PathBuf::from(root);
        }
        self
    }
}

/// 可观测性配置：quiet、log_level、log_json
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
}

impl ObservabilityConfig {
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(|| {
            super::loader::load_dotenv();
            Self {
                quiet: env_bool(obv_keys::HIVELITE_QUIET, obv_keys::QUIET_ALIASES, false),
                log_level: env_or(
                    obv_keys::HIVELITE_LOG_LEVEL,
                    obv_keys::LOG_LEVEL_ALIASES,
                    || "hivelite=info".to_string(),
                ),
                log_json: env_bool(obv_keys::HIVELITE_LOG_JSON, obv_keys::LOG_JSON_ALIASES, false),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beads_mode_permissive() {
        assert_eq!(BeadsMode::from_flag("on"), BeadsMode::On);
        assert_eq!(BeadsMode::from_flag(" ON "), BeadsMode::On);
        assert_eq!(BeadsMode::from_flag("off"), BeadsMode::Off);
        assert_eq!(BeadsMode::from_flag("yes"), BeadsMode::Off);
        assert_eq!(BeadsMode::from_flag(""), BeadsMode::Off);
    }

    #[test]
    fn test_beads_mode_strict() {
        assert_eq!(BeadsMode::parse_strict("On").unwrap(), BeadsMode::On);
        assert_eq!("off".parse::<BeadsMode>().unwrap(), BeadsMode::Off);
        let err = BeadsMode::parse_strict("maybe").unwrap_err();
        assert!(err.to_string().contains("maybe"));
    }

    #[test]
    fn test_beads_mode_serde_lowercase() {
        assert_eq!(serde_json::to_string(&BeadsMode::On).unwrap(), "\"on\"");
        let mode: BeadsMode = serde_json::from_str("\"off\"").unwrap();
        assert_eq!(mode, BeadsMode::Off);
    }

    #[test]
    fn test_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"beadsMode": "on", "disableMcps": ["websearch"], "projectRoot": "/srv/app"}"#,
        )
        .unwrap();
        let cfg = HiveConfig::from_file(&path).unwrap();
        assert_eq!(cfg.beads_mode, BeadsMode::On);
        assert_eq!(cfg.disable_mcps, vec!["websearch"]);
        assert_eq!(cfg.project_root, PathBuf::from("/srv/app"));
    }

    #[test]
    fn test_from_file_unknown_mode_falls_back() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{"beadsMode": "sometimes"}"#).unwrap();
        let cfg = HiveConfig::from_file(&path).unwrap();
        assert_eq!(cfg.beads_mode, BeadsMode::Off);
        assert!(cfg.disable_mcps.is_empty());
    }

    #[test]
    fn test_from_file_malformed() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = HiveConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope.json");
        let err = HiveConfig::base_config(Some(&missing), None).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));

        let cfg = HiveConfig::base_config(None, Some(&missing)).unwrap();
        assert_eq!(cfg.beads_mode, BeadsMode::Off);

        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{"beadsMode": "on"}"#).unwrap();
        let cfg = HiveConfig::base_config(Some(&path), Some(&missing)).unwrap();
        assert_eq!(cfg.beads_mode, BeadsMode::On);
    }

    #[test]
    fn test_with_overrides() {
        let cfg = HiveConfig::default().with_overrides(
            Some("on".to_string()),
            Some(vec!["context7".to_string()]),
            None,
        );
        assert_eq!(cfg.beads_mode, BeadsMode::On);
        assert_eq!(cfg.disable_mcps, vec!["context7"]);
        assert_eq!(cfg.project_root, HiveConfig::default().project_root);
    }
}
