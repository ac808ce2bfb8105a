// ==========================================
// 孵化场生产管理系统 - 核心库
// ==========================================
// 范围: 收蛋 → 上蛋 → 照蛋 → 孵化/落盘 → 出雏 → 装箱 → 销售
// 核心: 容器口径派生总数、累计损耗台账、来源池分配
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 表单层 - 字段输入与编辑器
pub mod form;

// 数据仓储层 - 数据访问
pub mod repository;

// 配置层 - 系统配置
pub mod config;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配
pub mod app;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AlertSeverity, AlertStatus, BoxType, CandlingKind, HatchStatus, PackagingStatus,
    SaleStatus, Stage, ValidationViolation,
};

// 领域记录
pub use domain::{
    compute_total, Alert, CandlingEntry, EggCollection, EggSetting, HatchingRecord, IncubationBatch,
    LockdownBatch, PackagingBatch, SaleRecord, StageRecord,
};

// 引擎
pub use engine::{decompose_total, SourcePoolAllocator, TotalCalculator};

// API
pub use api::{ApiError, ApiResult, ReportApi, ValidationMode};

// 应用
pub use app::AppState;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "孵化场生产管理系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
