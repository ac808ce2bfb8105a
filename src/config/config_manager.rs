// ==========================================
// 孵化场生产管理系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 来源优先级: 环境变量 HATCHERY_OPS_* > JSON 配置文件 > 内置默认值
// ==========================================

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde_json::{json, Value};
use thiserror::Error;

use crate::domain::container::{EGG_TRAY_CAPACITY, SETTER_CAPACITY};
use crate::domain::types::BoxType;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "HATCHERY_OPS_";

/// 容器容量上限（枚/只）
pub const MAX_CONTAINER_CAPACITY: i64 = 100_000;

/// 孵化周期类天数上限
pub const MAX_SCHEDULE_DAYS: i64 = 365;

// ==========================================
// ConfigError - 配置错误
// ==========================================
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 (path={path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("配置文件顶层必须是 JSON 对象")]
    NotAnObject,

    #[error("配置锁获取失败: {0}")]
    LockError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Default)]
pub struct ConfigManager {
    values: Mutex<HashMap<String, String>>,
}

impl ConfigManager {
    /// 创建仅含默认值的 ConfigManager
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 文件加载配置
    ///
    /// # 参数
    /// - path: 配置文件路径，顶层为 {"key": value} 对象
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manager = Self::new();
        let count = manager.restore_config_from_snapshot(&raw)?;
        tracing::info!(path = %path.display(), count, "配置文件加载完成");
        Ok(manager)
    }

    /// 加载配置：文件存在则读取，再应用环境变量覆写
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let manager = match path {
            Some(p) if p.exists() => Self::from_file(p)?,
            Some(p) => {
                tracing::info!(path = %p.display(), "配置文件不存在，使用默认配置");
                Self::new()
            }
            None => Self::new(),
        };
        manager.apply_env_overrides()?;
        Ok(manager)
    }

    fn get_values(&self) -> ConfigResult<MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))
    }

    /// 应用进程环境变量覆写
    pub fn apply_env_overrides(&self) -> ConfigResult<usize> {
        self.apply_overrides_from(std::env::vars())
    }

    /// 应用覆写（键为环境变量名），只接受已知配置键
    pub fn apply_overrides_from<I>(&self, vars: I) -> ConfigResult<usize>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let known: HashMap<String, String> = config_keys::all()
            .into_iter()
            .map(|key| (env_var_name(&key), key))
            .collect();

        let mut values = self.get_values()?;
        let mut count = 0;
        for (name, value) in vars {
            if let Some(key) = known.get(&name) {
                tracing::debug!(env = %name, key = %key, "环境变量覆写配置");
                values.insert(key.clone(), value.trim().to_string());
                count += 1;
            }
        }
        Ok(count)
    }

    /// 读取配置值
    pub fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        Ok(self.get_values()?.get(key).cloned())
    }

    /// 读取配置值，带默认值
    pub fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入配置值（运行期覆写，不落盘）
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        self.get_values()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// 正整数配置，非法值回退默认值
    /// 取 (0, max] 区间内的整数，非法或越界时回退默认值
    fn get_positive_int(&self, key: &str, default: i64, max: i64) -> ConfigResult<i64> {
        let value = self.get_config_or_default(key, &default.to_string())?;
        match value.trim().parse::<i64>() {
            Ok(v) if v > 0 && v <= max => Ok(v),
            _ => {
                tracing::warn!(config_key = key, raw_value = %value, fallback = default, max, "配置值非法，使用默认值");
                Ok(default)
            }
        }
    }

    /// 有效配置快照（默认值 + 覆写），键有序
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let mut effective: BTreeMap<String, String> = defaults()
            .into_iter()
            .map(|(k, v)| (k, value_text(&v)))
            .collect();
        for (key, value) in self.get_values()?.iter() {
            effective.insert(key.clone(), value.clone());
        }
        Ok(serde_json::to_string(&json!(effective))?)
    }

    /// 从 JSON 对象恢复配置，返回写入的配置项数量
    ///
    /// 非字符串值按 JSON 文本保存（数字 30 → "30"）
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> ConfigResult<usize> {
        let parsed: Value = serde_json::from_str(snapshot_json)?;
        let object = parsed.as_object().ok_or(ConfigError::NotAnObject)?;

        let mut values = self.get_values()?;
        for (key, value) in object {
            values.insert(key.clone(), value_text(value));
        }
        Ok(object.len())
    }

    // ===== 容器容量 =====

    pub fn get_tray_capacity(&self) -> ConfigResult<i64> {
        self.get_positive_int(config_keys::TRAY_CAPACITY, EGG_TRAY_CAPACITY, MAX_CONTAINER_CAPACITY)
    }

    pub fn get_setter_capacity(&self) -> ConfigResult<i64> {
        self.get_positive_int(config_keys::SETTER_CAPACITY, SETTER_CAPACITY, MAX_CONTAINER_CAPACITY)
    }

    /// 箱型基础容量
    pub fn get_box_capacity(&self, box_type: BoxType) -> ConfigResult<i64> {
        self.get_positive_int(
            &config_keys::box_capacity(box_type),
            box_type.default_capacity(),
            MAX_CONTAINER_CAPACITY,
        )
    }

    // ===== 孵化周期 =====

    pub fn get_incubation_days(&self) -> ConfigResult<i64> {
        self.get_positive_int(config_keys::INCUBATION_DAYS, 21, MAX_SCHEDULE_DAYS)
    }

    pub fn get_lockdown_day(&self) -> ConfigResult<i64> {
        self.get_positive_int(config_keys::LOCKDOWN_DAY, 18, MAX_SCHEDULE_DAYS)
    }

    pub fn get_hatch_offset_days(&self) -> ConfigResult<i64> {
        self.get_positive_int(config_keys::HATCH_OFFSET_DAYS, 3, MAX_SCHEDULE_DAYS)
    }

    // ===== 校验 =====

    /// 校验模式（STRICT / PERMISSIVE），由调用方解析
    pub fn get_validation_mode(&self) -> ConfigResult<String> {
        Ok(self
            .get_config_or_default(config_keys::VALIDATION_MODE, "STRICT")?
            .trim()
            .to_uppercase())
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 配置键 → 环境变量名（tray_capacity → HATCHERY_OPS_TRAY_CAPACITY）
pub fn env_var_name(key: &str) -> String {
    format!("{}{}", ENV_PREFIX, key.replace('/', "_").to_uppercase())
}

/// 内置默认值
pub fn defaults() -> Vec<(String, Value)> {
    let mut items = vec![
        (config_keys::TRAY_CAPACITY.to_string(), json!(EGG_TRAY_CAPACITY)),
        (config_keys::SETTER_CAPACITY.to_string(), json!(SETTER_CAPACITY)),
        (config_keys::INCUBATION_DAYS.to_string(), json!(21)),
        (config_keys::LOCKDOWN_DAY.to_string(), json!(18)),
        (config_keys::HATCH_OFFSET_DAYS.to_string(), json!(3)),
        (config_keys::VALIDATION_MODE.to_string(), json!("STRICT")),
    ];
    for box_type in BoxType::ALL {
        items.push((
            config_keys::box_capacity(box_type),
            json!(box_type.default_capacity()),
        ));
    }
    items
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    use crate::domain::types::BoxType;

    // 容器容量
    pub const TRAY_CAPACITY: &str = "tray_capacity";
    pub const SETTER_CAPACITY: &str = "setter_capacity";
    pub const BOX_CAPACITY_PREFIX: &str = "box_capacity";

    // 孵化周期
    pub const INCUBATION_DAYS: &str = "incubation_days";
    pub const LOCKDOWN_DAY: &str = "lockdown_day";
    pub const HATCH_OFFSET_DAYS: &str = "hatch_offset_days";

    // 校验
    pub const VALIDATION_MODE: &str = "validation_mode";

    /// box_capacity/{type}
    pub fn box_capacity(box_type: BoxType) -> String {
        format!("{}/{}", BOX_CAPACITY_PREFIX, box_type.as_str())
    }

    pub fn all() -> Vec<String> {
        let mut keys: Vec<String> = [
            TRAY_CAPACITY,
            SETTER_CAPACITY,
            INCUBATION_DAYS,
            LOCKDOWN_DAY,
            HATCH_OFFSET_DAYS,
            VALIDATION_MODE,
        ]
        .iter()
        .map(|k| k.to_string())
        .collect();
        keys.extend(BoxType::ALL.iter().map(|t| box_capacity(*t)));
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConfigManager::new();
        assert_eq!(config.get_tray_capacity().unwrap(), 30);
        assert_eq!(config.get_setter_capacity().unwrap(), 102);
        assert_eq!(config.get_incubation_days().unwrap(), 21);
        assert_eq!(config.get_lockdown_day().unwrap(), 18);
        assert_eq!(config.get_hatch_offset_days().unwrap(), 3);
        assert_eq!(config.get_box_capacity(BoxType::Export).unwrap(), 150);
        assert_eq!(config.get_validation_mode().unwrap(), "STRICT");
    }

    #[test]
    fn test_invalid_value_falls_back_to_default() {
        let config = ConfigManager::new();
        config.set_config_value(config_keys::SETTER_CAPACITY, "zero").unwrap();
        assert_eq!(config.get_setter_capacity().unwrap(), 102);
        config.set_config_value(config_keys::SETTER_CAPACITY, "-4").unwrap();
        assert_eq!(config.get_setter_capacity().unwrap(), 102);
    }

    #[test]
    fn test_out_of_range_value_falls_back_to_default() {
        let config = ConfigManager::new();
        config
            .apply_overrides_from(vec![
                ("HATCHERY_OPS_INCUBATION_DAYS".to_string(), "999999999999999".to_string()),
                ("HATCHERY_OPS_HATCH_OFFSET_DAYS".to_string(), "366".to_string()),
                ("HATCHERY_OPS_TRAY_CAPACITY".to_string(), "9223372036854775807".to_string()),
            ])
            .unwrap();
        assert_eq!(config.get_incubation_days().unwrap(), 21);
        assert_eq!(config.get_hatch_offset_days().unwrap(), 3);
        assert_eq!(config.get_tray_capacity().unwrap(), 30);

        config.set_config_value(config_keys::LOCKDOWN_DAY, "365").unwrap();
        assert_eq!(config.get_lockdown_day().unwrap(), 365);
    }

    #[test]
    fn test_env_style_overrides() {
        let config = ConfigManager::new();
        let applied = config
            .apply_overrides_from(vec![
                ("HATCHERY_OPS_BOX_CAPACITY_SMALL".to_string(), " 60 ".to_string()),
                ("HATCHERY_OPS_VALIDATION_MODE".to_string(), "permissive".to_string()),
                ("HATCHERY_OPS_UNKNOWN".to_string(), "1".to_string()),
                ("PATH".to_string(), "/usr/bin".to_string()),
            ])
            .unwrap();
        assert_eq!(applied, 2);
        assert_eq!(config.get_box_capacity(BoxType::Small).unwrap(), 60);
        assert_eq!(config.get_validation_mode().unwrap(), "PERMISSIVE");
    }

    #[test]
    fn test_snapshot_round_trip() {
        let config = ConfigManager::new();
        config.set_config_value(config_keys::LOCKDOWN_DAY, "19").unwrap();
        let snapshot = config.get_config_snapshot().unwrap();

        let restored = ConfigManager::new();
        let count = restored.restore_config_from_snapshot(&snapshot).unwrap();
        assert_eq!(count, config_keys::all().len());
        assert_eq!(restored.get_lockdown_day().unwrap(), 19);
        assert_eq!(restored.get_tray_capacity().unwrap(), 30);
    }

    #[test]
    fn test_snapshot_rejects_non_object() {
        let config = ConfigManager::new();
        assert!(matches!(
            config.restore_config_from_snapshot("[1, 2]"),
            Err(ConfigError::NotAnObject)
        ));
    }
}
