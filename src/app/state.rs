// ==========================================
// 孵化场生产管理系统 - 应用状态
// ==========================================
// 职责: 按配置装配各环节仓储与 API，管理共享实例
// ==========================================

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{
    AlertApi, ApiResult, CandlingApi, CollectionApi, HatchingApi, IncubationApi,
    IncubationSchedule, PackagingApi, RecordApi, ReportApi, SalesApi, SettingApi, ValidationMode,
};
use crate::config::ConfigManager;
use crate::domain::container::StageRecord;
use crate::domain::types::BoxType;
use crate::engine::events::{NoOpEventPublisher, StoreEventPublisher};
use crate::repository::InMemoryStore;

/// 应用状态
///
/// 各环节 API 共享同一组记录仓储，跨环节约束（来源占用、删除保护）
/// 读取的是同一份数据
pub struct AppState {
    /// 生效的校验模式
    pub validation_mode: ValidationMode,

    pub collection_api: Arc<CollectionApi>,
    pub setting_api: Arc<SettingApi>,
    pub candling_api: Arc<CandlingApi>,
    pub incubation_api: Arc<IncubationApi>,
    pub hatching_api: Arc<HatchingApi>,
    pub packaging_api: Arc<PackagingApi>,
    pub sales_api: Arc<SalesApi>,
    pub alert_api: Arc<AlertApi>,
    pub report_api: Arc<ReportApi>,

    /// 事件发布器
    pub event_publisher: Arc<dyn StoreEventPublisher>,
}

impl AppState {
    /// 按配置创建应用状态（不发布事件）
    pub fn new(config: &ConfigManager) -> ApiResult<Self> {
        Self::with_publisher(config, Arc::new(NoOpEventPublisher))
    }

    /// 按配置创建应用状态
    ///
    /// # 错误
    /// - ConfigError: 配置读取失败
    /// - InvalidInput: 容器容量不为正
    pub fn with_publisher(
        config: &ConfigManager,
        event_publisher: Arc<dyn StoreEventPublisher>,
    ) -> ApiResult<Self> {
        let validation_mode = parse_validation_mode(&config.get_validation_mode()?);
        let tray_capacity = config.get_tray_capacity()?;
        let setter_capacity = config.get_setter_capacity()?;
        let schedule = IncubationSchedule {
            incubation_days: config.get_incubation_days()?,
            lockdown_day: config.get_lockdown_day()?,
            hatch_offset_days: config.get_hatch_offset_days()?,
        };
        let mut box_capacities = BTreeMap::new();
        for box_type in BoxType::ALL {
            box_capacities.insert(box_type, config.get_box_capacity(box_type)?);
        }

        tracing::info!(
            mode = %validation_mode,
            tray_capacity,
            setter_capacity,
            "初始化AppState"
        );

        // ==========================================
        // 记录仓储（各 API 共享）
        // ==========================================
        let collections = record_api(&event_publisher, validation_mode);
        let settings = record_api(&event_publisher, validation_mode);
        let candling = record_api(&event_publisher, validation_mode);
        let incubation = record_api(&event_publisher, validation_mode);
        let lockdown = record_api(&event_publisher, validation_mode);
        let hatching = record_api(&event_publisher, validation_mode);
        let packaging = record_api(&event_publisher, validation_mode);
        let sales = record_api(&event_publisher, validation_mode);
        let alerts = record_api(&event_publisher, validation_mode);

        // ==========================================
        // API 层
        // ==========================================
        let collection_api = Arc::new(CollectionApi::new(
            collections.clone(),
            settings.clone(),
            tray_capacity,
        ));
        let setting_api = Arc::new(SettingApi::new(
            settings.clone(),
            collections,
            setter_capacity,
        )?);
        let candling_api = Arc::new(CandlingApi::new(candling, settings, setter_capacity));
        let incubation_api = Arc::new(IncubationApi::new(incubation, lockdown, schedule));
        let hatching_api = Arc::new(HatchingApi::new(hatching.clone(), packaging.clone()));
        let packaging_api = Arc::new(PackagingApi::new(packaging, hatching, box_capacities));
        let sales_api = Arc::new(SalesApi::new(sales));
        let alert_api = Arc::new(AlertApi::new(alerts));

        let report_api = Arc::new(ReportApi::new(
            Arc::clone(&collection_api),
            Arc::clone(&setting_api),
            Arc::clone(&candling_api),
            Arc::clone(&incubation_api),
            Arc::clone(&hatching_api),
            Arc::clone(&packaging_api),
            Arc::clone(&sales_api),
            Arc::clone(&alert_api),
        ));

        Ok(Self {
            validation_mode,
            collection_api,
            setting_api,
            candling_api,
            incubation_api,
            hatching_api,
            packaging_api,
            sales_api,
            alert_api,
            report_api,
            event_publisher,
        })
    }
}

fn record_api<R: StageRecord>(
    event_publisher: &Arc<dyn StoreEventPublisher>,
    mode: ValidationMode,
) -> RecordApi<R> {
    RecordApi::new(
        Arc::new(InMemoryStore::<R>::new()),
        Arc::clone(event_publisher),
        mode,
    )
}

/// 解析校验模式，无法识别时回退为严格模式
fn parse_validation_mode(raw: &str) -> ValidationMode {
    raw.parse().unwrap_or_else(|e| {
        tracing::warn!(value = raw, error = %e, "校验模式配置无效，使用 STRICT");
        ValidationMode::Strict
    })
}

/// 获取默认配置文件路径
///
/// 优先级: 环境变量 HATCHERY_OPS_CONFIG_PATH > 用户配置目录 > 当前目录
pub fn get_default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("HATCHERY_OPS_CONFIG_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    match dirs::config_dir() {
        Some(dir) => dir.join("hatchery-ops").join("config.json"),
        None => PathBuf::from("./hatchery-ops.json"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validation_mode() {
        assert_eq!(parse_validation_mode("permissive"), ValidationMode::Permissive);
        assert_eq!(parse_validation_mode("STRICT"), ValidationMode::Strict);
        assert_eq!(parse_validation_mode("lenient"), ValidationMode::Strict);
    }

    #[test]
    fn test_get_default_config_path() {
        let path = get_default_config_path();
        assert!(path.to_string_lossy().ends_with(".json"));
    }

    #[test]
    fn test_app_state_from_default_config() {
        let config = ConfigManager::new();
        let state = AppState::new(&config).unwrap();
        assert_eq!(state.validation_mode, ValidationMode::Strict);
        assert_eq!(state.packaging_api.base_capacity(BoxType::Large), 200);
        assert_eq!(state.incubation_api.schedule(), IncubationSchedule::default());
    }
}
