// ==========================================
// 孵化场生产管理系统 - 应用层
// ==========================================
// 职责: 应用状态装配、数据快照载入
// ==========================================

pub mod snapshot;
pub mod state;

// 重导出
pub use snapshot::{apply_snapshot, load_snapshot, read_snapshot, DataSnapshot, SnapshotError};
pub use state::{get_default_config_path, AppState};
