// ==========================================
// 孵化场生产管理系统 - 领域模型层
// ==========================================
// 职责: 定义各生产阶段记录、类型、容器口径
// 红线: 不含数据访问逻辑
// ==========================================

pub mod alert;
pub mod candling;
pub mod collection;
pub mod container;
pub mod hatching;
pub mod incubation;
pub mod metrics;
pub mod packaging;
pub mod sale;
pub mod setting;
pub mod types;

// 重导出核心类型
pub use alert::Alert;
pub use candling::CandlingEntry;
pub use collection::{CollectionTotals, EggCollection};
pub use container::{
    compute_total, ContainerCounts, ContainerSpec, StageRecord, UnitSource, EGG_TRAY_CAPACITY,
    MAX_FIELD_VALUE, SETTER_CAPACITY,
};
pub use hatching::HatchingRecord;
pub use incubation::{IncubationBatch, LockdownBatch};
pub use packaging::{BoxConfig, PackagingBatch};
pub use sale::SaleRecord;
pub use setting::EggSetting;
pub use types::{
    AlertSeverity, AlertStatus, BoxType, CandlingKind, HatchStatus, PackagingStatus,
    SaleStatus, Stage, ValidationViolation,
};
