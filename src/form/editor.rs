// ==========================================
// 孵化场生产管理系统 - 通用记录编辑器
// ==========================================
// 状态机:
//   Closed → Creating / Editing → Closed
//   Closed → ConfirmingDelete → Closed
// 编辑器只管理草稿，不直接访问存储；
// submit / confirm_delete 的结果交给 API 层落库
// ==========================================

use thiserror::Error;

use crate::domain::container::StageRecord;
use crate::domain::types::ValidationViolation;
use crate::form::field::FormRecord;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("编辑器未打开")]
    NotOpen,

    #[error("编辑器已处于 {0} 状态")]
    Busy(&'static str),

    #[error("草稿校验未通过: {} 项", .0.len())]
    Invalid(Vec<ValidationViolation>),
}

/// 编辑器状态
#[derive(Debug, Clone, PartialEq)]
pub enum EditorState<R> {
    Closed,
    Creating { draft: R },
    Editing { draft: R },
    ConfirmingDelete { record_id: i64 },
}

impl<R> EditorState<R> {
    pub fn name(&self) -> &'static str {
        match self {
            EditorState::Closed => "Closed",
            EditorState::Creating { .. } => "Creating",
            EditorState::Editing { .. } => "Editing",
            EditorState::ConfirmingDelete { .. } => "ConfirmingDelete",
        }
    }
}

/// 提交结果
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<R> {
    Create(R),
    Update(R),
}

impl<R> Submission<R> {
    pub fn into_record(self) -> R {
        match self {
            Submission::Create(r) | Submission::Update(r) => r,
        }
    }
}

// ==========================================
// RecordEditor
// ==========================================
#[derive(Debug, Clone)]
pub struct RecordEditor<R: StageRecord> {
    state: EditorState<R>,
}

impl<R: StageRecord> Default for RecordEditor<R> {
    fn default() -> Self {
        Self {
            state: EditorState::Closed,
        }
    }
}

impl<R: StageRecord> RecordEditor<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditorState<R> {
        &self.state
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, EditorState::Closed)
    }

    fn ensure_closed(&self) -> Result<(), EditorError> {
        if self.is_closed() {
            Ok(())
        } else {
            Err(EditorError::Busy(self.state.name()))
        }
    }

    /// 打开新建表单（草稿为空白记录）
    pub fn open_create(&mut self, mut blank: R) -> Result<(), EditorError> {
        self.ensure_closed()?;
        blank.set_id(0);
        blank.refresh_derived();
        self.state = EditorState::Creating { draft: blank };
        Ok(())
    }

    /// 打开编辑表单（草稿为已有记录的副本）
    pub fn open_edit(&mut self, record: R) -> Result<(), EditorError> {
        self.ensure_closed()?;
        self.state = EditorState::Editing { draft: record };
        Ok(())
    }

    /// 请求删除，等待确认
    pub fn request_delete(&mut self, record_id: i64) -> Result<(), EditorError> {
        self.ensure_closed()?;
        self.state = EditorState::ConfirmingDelete { record_id };
        Ok(())
    }

    pub fn draft(&self) -> Option<&R> {
        match &self.state {
            EditorState::Creating { draft } | EditorState::Editing { draft } => Some(draft),
            _ => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut R> {
        match &mut self.state {
            EditorState::Creating { draft } | EditorState::Editing { draft } => Some(draft),
            _ => None,
        }
    }

    /// 提交草稿：刷新派生字段并校验，通过后关闭编辑器
    ///
    /// 校验失败时编辑器保持打开，草稿保留
    pub fn submit(&mut self) -> Result<Submission<R>, EditorError> {
        let draft = self.draft_mut().ok_or(EditorError::NotOpen)?;
        draft.refresh_derived();
        let violations = draft.validate();
        if !violations.is_empty() {
            return Err(EditorError::Invalid(violations));
        }

        match std::mem::replace(&mut self.state, EditorState::Closed) {
            EditorState::Creating { draft } => Ok(Submission::Create(draft)),
            EditorState::Editing { draft } => Ok(Submission::Update(draft)),
            other => {
                self.state = other;
                Err(EditorError::NotOpen)
            }
        }
    }

    /// 确认删除，返回待删除的记录ID
    pub fn confirm_delete(&mut self) -> Result<i64, EditorError> {
        match self.state {
            EditorState::ConfirmingDelete { record_id } => {
                self.state = EditorState::Closed;
                Ok(record_id)
            }
            _ => Err(EditorError::NotOpen),
        }
    }

    /// 取消（任意状态回到 Closed，草稿丢弃）
    pub fn cancel(&mut self) {
        self.state = EditorState::Closed;
    }
}

impl<R: FormRecord> RecordEditor<R> {
    /// 按字段名写入原始输入
    pub fn set_field(&mut self, field: &str, raw: &str) -> Result<(), EditorError> {
        let draft = self.draft_mut().ok_or(EditorError::NotOpen)?;
        draft
            .set_field(field, raw)
            .map_err(|violation| EditorError::Invalid(vec![violation]))
    }
}
