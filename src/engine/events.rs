// ==========================================
// 孵化场生产管理系统 - 记录变更事件发布
// ==========================================
// 职责: 定义记录变更事件与发布 trait
// 说明: API 层在增删改后发布事件，订阅方自行实现
// ==========================================

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::Mutex;
use uuid::Uuid;

use crate::domain::types::Stage;

// ==========================================
// 事件类型
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreEventKind {
    /// 新建记录
    Created,
    /// 整条替换
    Updated,
    /// 删除记录
    Deleted,
    /// 台账重算
    LedgerRecalculated,
}

impl StoreEventKind {
    pub fn as_str(&self) -> &str {
        match self {
            StoreEventKind::Created => "Created",
            StoreEventKind::Updated => "Updated",
            StoreEventKind::Deleted => "Deleted",
            StoreEventKind::LedgerRecalculated => "LedgerRecalculated",
        }
    }
}

/// 记录变更事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEvent {
    /// 事件ID
    pub event_id: Uuid,
    /// 所属阶段
    pub stage: Stage,
    /// 事件类型
    pub kind: StoreEventKind,
    /// 受影响记录ID（台账重算为 None）
    pub record_id: Option<i64>,
    /// 发生时间 (UTC)
    pub occurred_at: NaiveDateTime,
}

impl StoreEvent {
    pub fn new(stage: Stage, kind: StoreEventKind, record_id: Option<i64>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            stage,
            kind,
            record_id,
            occurred_at: Utc::now().naive_utc(),
        }
    }
}

// ==========================================
// 事件发布 Trait
// ==========================================

/// 记录变更事件发布者
pub trait StoreEventPublisher: Send + Sync {
    /// 发布事件，返回事件ID
    fn publish(&self, event: StoreEvent) -> Result<String, Box<dyn Error + Send + Sync>>;
}

/// 空操作事件发布者
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

impl StoreEventPublisher for NoOpEventPublisher {
    fn publish(&self, event: StoreEvent) -> Result<String, Box<dyn Error + Send + Sync>> {
        tracing::debug!(
            "NoOpEventPublisher: 跳过事件发布 - stage={}, kind={}, record_id={:?}",
            event.stage,
            event.kind.as_str(),
            event.record_id
        );
        Ok(event.event_id.to_string())
    }
}

/// 记录型事件发布者（测试与审计展示用）
#[derive(Debug, Default)]
pub struct RecordingEventPublisher {
    events: Mutex<Vec<StoreEvent>>,
}

impl RecordingEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已发布事件快照
    pub fn events(&self) -> Vec<StoreEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl StoreEventPublisher for RecordingEventPublisher {
    fn publish(&self, event: StoreEvent) -> Result<String, Box<dyn Error + Send + Sync>> {
        let id = event.event_id.to_string();
        let mut events = self
            .events
            .lock()
            .map_err(|e| format!("锁获取失败: {}", e))?;
        events.push(event);
        Ok(id)
    }
}
