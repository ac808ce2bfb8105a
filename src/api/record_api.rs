// ==========================================
// 孵化场生产管理系统 - 通用记录 API
// ==========================================
// 职责: 单阶段记录的增删改查
// 流程: 刷新派生字段 → 校验 → 落库 → 重算累计台账 → 发布事件
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{validate_record, ValidationMode};
use crate::domain::container::StageRecord;
use crate::engine::events::{NoOpEventPublisher, StoreEvent, StoreEventKind, StoreEventPublisher};
use crate::engine::ledger::recalculate_cumulative;
use crate::form::Submission;
use crate::repository::{InMemoryStore, RecordStore};

/// 通用记录 API
pub struct RecordApi<R: StageRecord> {
    store: Arc<dyn RecordStore<R>>,
    event_publisher: Arc<dyn StoreEventPublisher>,
    mode: ValidationMode,
}

impl<R: StageRecord> Clone for RecordApi<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            event_publisher: Arc::clone(&self.event_publisher),
            mode: self.mode,
        }
    }
}

impl<R: StageRecord> RecordApi<R> {
    pub fn new(
        store: Arc<dyn RecordStore<R>>,
        event_publisher: Arc<dyn StoreEventPublisher>,
        mode: ValidationMode,
    ) -> Self {
        Self {
            store,
            event_publisher,
            mode,
        }
    }

    /// 内存仓储 + 空事件发布者
    pub fn in_memory(mode: ValidationMode) -> Self {
        Self::new(
            Arc::new(InMemoryStore::<R>::new()),
            Arc::new(NoOpEventPublisher),
            mode,
        )
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    // ===== 查询 =====

    /// 全部记录快照，按 id 升序
    pub fn list(&self) -> ApiResult<Vec<R>> {
        Ok(self.store.list()?)
    }

    pub fn find(&self, id: i64) -> ApiResult<Option<R>> {
        Ok(self.store.find_by_id(id)?)
    }

    pub fn get(&self, id: i64) -> ApiResult<R> {
        self.store.find_by_id(id)?.ok_or_else(|| {
            ApiError::NotFound(format!("{}(id={})不存在", R::STAGE, id))
        })
    }

    pub fn next_id(&self) -> ApiResult<i64> {
        Ok(self.store.next_id()?)
    }

    // ===== 变更 =====

    /// 新建记录（id ≤ 0 时分配 最大id+1）
    pub fn create(&self, mut record: R) -> ApiResult<R> {
        record.refresh_derived();
        validate_record(&record, self.mode)?;

        let saved = self.store.insert(record)?;
        tracing::info!(stage = %R::STAGE, record_id = saved.id(), "记录已创建");
        self.after_mutation(StoreEventKind::Created, saved.id())?;
        self.get(saved.id())
    }

    /// 整条替换
    pub fn update(&self, mut record: R) -> ApiResult<R> {
        record.refresh_derived();
        validate_record(&record, self.mode)?;

        let id = record.id();
        self.store.replace(record)?;
        tracing::info!(stage = %R::STAGE, record_id = id, "记录已更新");
        self.after_mutation(StoreEventKind::Updated, id)?;
        self.get(id)
    }

    /// 删除记录，返回被删除的记录
    pub fn delete(&self, id: i64) -> ApiResult<R> {
        let removed = self.store.delete(id)?;
        tracing::info!(stage = %R::STAGE, record_id = id, "记录已删除");
        self.after_mutation(StoreEventKind::Deleted, id)?;
        Ok(removed)
    }

    /// 提交编辑器结果
    pub fn submit(&self, submission: Submission<R>) -> ApiResult<R> {
        match submission {
            Submission::Create(record) => self.create(record),
            Submission::Update(record) => self.update(record),
        }
    }

    /// 重算累计损耗台账（全量，按 id 升序）
    ///
    /// # 返回
    /// - 最后一条记录的累计值，空集合为 0
    pub fn recalculate_ledger(&self) -> ApiResult<i64> {
        let mut records = self.store.list()?;
        let latest = recalculate_cumulative(&mut records);
        self.store.replace_all(records)?;
        self.publish(StoreEvent::new(R::STAGE, StoreEventKind::LedgerRecalculated, None));
        Ok(latest)
    }

    fn after_mutation(&self, kind: StoreEventKind, record_id: i64) -> ApiResult<()> {
        if R::KEEPS_LOSS_LEDGER {
            self.recalculate_ledger()?;
        }
        self.publish(StoreEvent::new(R::STAGE, kind, Some(record_id)));
        Ok(())
    }

    fn publish(&self, event: StoreEvent) {
        let kind = event.kind;
        if let Err(e) = self.event_publisher.publish(event) {
            tracing::warn!(stage = %R::STAGE, kind = kind.as_str(), "记录变更事件发布失败: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hatching::HatchingRecord;
    use crate::engine::events::RecordingEventPublisher;
    use chrono::NaiveDate;

    fn hatch(loss: i64) -> HatchingRecord {
        let mut r = HatchingRecord::blank(NaiveDate::from_ymd_opt(2023, 4, 9).unwrap());
        r.batch_id = "B1001".to_string();
        r.quantity = 500;
        r.hatched_eggs = 450;
        r.unhatched_eggs = loss;
        r
    }

    fn api() -> (RecordApi<HatchingRecord>, Arc<RecordingEventPublisher>) {
        let publisher = Arc::new(RecordingEventPublisher::new());
        let api = RecordApi::new(
            Arc::new(InMemoryStore::<HatchingRecord>::new()),
            publisher.clone(),
            ValidationMode::Strict,
        );
        (api, publisher)
    }

    #[test]
    fn test_ledger_follows_every_mutation() {
        let (api, _) = api();
        api.create(hatch(8)).unwrap();
        api.create(hatch(15)).unwrap();
        let third = api.create(hatch(0)).unwrap();
        assert_eq!(third.cumulative_loss, 23);

        let ledger: Vec<i64> = api.list().unwrap().iter().map(|r| r.cumulative_loss).collect();
        assert_eq!(ledger, vec![8, 23, 23]);

        api.delete(1).unwrap();
        let ledger: Vec<i64> = api.list().unwrap().iter().map(|r| r.cumulative_loss).collect();
        assert_eq!(ledger, vec![15, 15]);

        let mut second = api.get(2).unwrap();
        second.unhatched_eggs = 5;
        api.update(second).unwrap();
        let ledger: Vec<i64> = api.list().unwrap().iter().map(|r| r.cumulative_loss).collect();
        assert_eq!(ledger, vec![5, 5]);
    }

    #[test]
    fn test_events_published() {
        let (api, publisher) = api();
        api.create(hatch(1)).unwrap();
        api.delete(1).unwrap();

        let kinds: Vec<StoreEventKind> = publisher.events().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                StoreEventKind::LedgerRecalculated,
                StoreEventKind::Created,
                StoreEventKind::LedgerRecalculated,
                StoreEventKind::Deleted,
            ]
        );
    }

    #[test]
    fn test_missing_record() {
        let (api, _) = api();
        assert!(matches!(api.get(3), Err(ApiError::NotFound(_))));
        assert!(matches!(api.delete(3), Err(ApiError::NotFound(_))));
        let mut r = hatch(0);
        r.id = 3;
        assert!(matches!(api.update(r), Err(ApiError::NotFound(_))));
    }
}
