// ==========================================
// 孵化场生产管理系统 - 配置层
// ==========================================
// 职责: 系统配置管理，支持文件与环境变量覆写
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigError, ConfigManager, ConfigResult};
