// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 按配置装配 AppState，记录全部变更事件
// ==========================================

use std::ops::Deref;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use hatchery_ops::api::{ApiResult, ValidationMode};
use hatchery_ops::app::AppState;
use hatchery_ops::config::{config_keys, ConfigManager};
use hatchery_ops::engine::events::RecordingEventPublisher;

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 通过 Deref 直接访问 AppState 上的各环节 API
pub struct ApiTestEnv {
    pub state: AppState,
    pub events: Arc<RecordingEventPublisher>,
}

impl ApiTestEnv {
    /// 默认配置（严格模式）
    pub fn new() -> ApiResult<Self> {
        Self::with_config(ConfigManager::new())
    }

    /// 指定校验模式
    pub fn with_mode(mode: ValidationMode) -> ApiResult<Self> {
        let config = ConfigManager::new();
        config.set_config_value(config_keys::VALIDATION_MODE, &mode.to_string())?;
        Self::with_config(config)
    }

    pub fn with_config(config: ConfigManager) -> ApiResult<Self> {
        let events = Arc::new(RecordingEventPublisher::new());
        let state = AppState::with_publisher(&config, events.clone())?;
        Ok(Self { state, events })
    }
}

impl Deref for ApiTestEnv {
    type Target = AppState;

    fn deref(&self) -> &AppState {
        &self.state
    }
}

// ==========================================
// 日期工具
// ==========================================

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("无效日期")
}

pub fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).expect("无效时间")
}
