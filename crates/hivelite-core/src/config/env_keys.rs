//! 环境变量 key 常量与别名定义
//!
//! 主变量优先使用 `HIVELITE_*`，兼容旧的 `HIVE_*`。

/// 项目与存储模式
pub mod project {
    pub const HIVELITE_PROJECT_ROOT: &str = "HIVELITE_PROJECT_ROOT";
    pub const PROJECT_ROOT_ALIASES: &[&str] = &["HIVE_PROJECT_ROOT"];

    /// "on" 使用 beads 仓库，其余值回落到文件系统布局
    pub const HIVELITE_BEADS_MODE: &str = "HIVELITE_BEADS_MODE";
    pub const BEADS_MODE_ALIASES: &[&str] = &["HIVE_BEADS_MODE"];

    /// 配置文件路径，默认 `<config_dir>/hivelite/config.json`
    pub const HIVELITE_CONFIG: &str = "HIVELITE_CONFIG";
    pub const CONFIG_ALIASES: &[&str] = &["HIVE_CONFIG"];
}

/// 内置 MCP
pub mod mcp {
    /// 逗号分隔，如 "websearch,grep_app"
    pub const HIVELITE_DISABLE_MCPS: &str = "HIVELITE_DISABLE_MCPS";
    pub const DISABLE_MCPS_ALIASES: &[&str] = &["HIVE_DISABLE_MCPS"];

    pub const EXA_API_KEY: &str = "EXA_API_KEY";
    pub const CONTEXT7_API_KEY: &str = "CONTEXT7_API_KEY";
}

/// 可观测性与日志
pub mod observability {
    pub const HIVELITE_QUIET: &str = "HIVELITE_QUIET";
    pub const QUIET_ALIASES: &[&str] = &["HIVE_QUIET"];

    pub const HIVELITE_LOG_LEVEL: &str = "HIVELITE_LOG_LEVEL";
    pub const LOG_LEVEL_ALIASES: &[&str] = &["HIVE_LOG_LEVEL"];

    pub const HIVELITE_LOG_JSON: &str = "HIVELITE_LOG_JSON";
    pub const LOG_JSON_ALIASES: &[&str] = &["HIVE_LOG_JSON"];
}
