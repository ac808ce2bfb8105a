// ==========================================
// 孵化场生产管理系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("容器容量必须大于0: capacity={0}")]
    InvalidCapacity(i64),

    #[error("待分解总数不能为负: total={0}")]
    NegativeTotal(i64),

    #[error("来源记录已被占用: source_id={source_id}, owner_id={owner_id}")]
    SourceAlreadyClaimed { source_id: i64, owner_id: i64 },

    #[error("来源记录不存在: source_id={0}")]
    UnknownSource(i64),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
