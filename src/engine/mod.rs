// ==========================================
// 孵化场生产管理系统 - 引擎层
// ==========================================
// 职责: 容器分解、累计损耗台账、来源池分配、变更事件
// 红线: Engine 不访问存储，输入输出均为内存数据
// ==========================================

pub mod allocator;
pub mod calculator;
pub mod error;
pub mod events;
pub mod ledger;

// 重导出核心引擎
pub use allocator::{check_exclusive, SourcePoolAllocator, SourceSelection};
pub use calculator::{decompose_total, TotalCalculator};
pub use error::{EngineError, EngineResult};
pub use events::{
    NoOpEventPublisher, RecordingEventPublisher, StoreEvent, StoreEventKind, StoreEventPublisher,
};
pub use ledger::{prefix_sums, recalculate_cumulative};
