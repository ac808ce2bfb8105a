// ==========================================
// 孵化场生产管理系统 - API 层
// ==========================================
// 职责: 各生产环节的业务接口，负责校验、错误转换与跨环节约束
// ==========================================

pub mod alert_api;
pub mod candling_api;
pub mod collection_api;
pub mod error;
pub mod hatching_api;
pub mod incubation_api;
pub mod packaging_api;
pub mod record_api;
pub mod report_api;
pub mod sales_api;
pub mod setting_api;
pub mod validator;

// 重导出核心类型
pub use alert_api::{AlertApi, AlertStats};
pub use candling_api::{CandlingApi, CandlingStats};
pub use collection_api::CollectionApi;
pub use error::{ApiError, ApiResult};
pub use hatching_api::{HatchingApi, HatchingStats};
pub use incubation_api::{IncubationApi, IncubationSchedule, IncubationStats, TransferResult};
pub use packaging_api::{PackagingApi, PackagingStats};
pub use record_api::RecordApi;
pub use report_api::{
    DashboardOverview, HatchRateReport, ProductionSummary, ReportApi, SalesSummary,
};
pub use sales_api::{SalesApi, SalesStats};
pub use setting_api::{SettingApi, SettingStats};
pub use validator::{validate_record, ValidationMode};
