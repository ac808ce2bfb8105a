// ==========================================
// 孵化场生产管理系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换下层错误为用户友好的错误消息
// ==========================================

use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::types::ValidationViolation;
use crate::engine::error::EngineError;
use crate::form::EditorError;
use crate::repository::error::RepositoryError;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    /// 字段级校验失败（带违规明细）
    #[error("数据校验失败: {reason}")]
    ValidationFailed {
        reason: String,
        violations: Vec<ValidationViolation>,
    },

    // ==========================================
    // 基础设施错误
    // ==========================================
    #[error("存储错误: {0}")]
    StorageError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 由违规列表构造校验错误
    pub fn validation(violations: Vec<ValidationViolation>) -> Self {
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        ApiError::ValidationFailed {
            reason: format!("{}项字段违规 [{}]", violations.len(), fields.join(", ")),
            violations,
        }
    }

    /// 校验失败时的违规明细
    pub fn violations(&self) -> &[ValidationViolation] {
        match self {
            ApiError::ValidationFailed { violations, .. } => violations,
            _ => &[],
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::StorageError(format!("存储锁获取失败: {}", msg))
            }
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
        }
    }
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidCapacity(_) => ApiError::InvalidInput(err.to_string()),
            EngineError::NegativeTotal(_) => ApiError::BusinessRuleViolation(err.to_string()),
            EngineError::SourceAlreadyClaimed { .. } => {
                ApiError::BusinessRuleViolation(err.to_string())
            }
            EngineError::UnknownSource(id) => {
                ApiError::NotFound(format!("来源记录(id={})不存在", id))
            }
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<EditorError> for ApiError {
    fn from(err: EditorError) -> Self {
        match err {
            EditorError::Invalid(violations) => ApiError::validation(violations),
            EditorError::NotOpen => ApiError::InvalidStateTransition {
                from: "Closed".to_string(),
                to: "Submit".to_string(),
            },
            EditorError::Busy(state) => ApiError::InvalidStateTransition {
                from: state.to_string(),
                to: "Open".to_string(),
            },
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
