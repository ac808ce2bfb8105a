// ==========================================
// 孵化场生产管理系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供记录存取接口，屏蔽存储细节
// ==========================================

pub mod error;
pub mod store;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use store::{InMemoryStore, RecordStore};
