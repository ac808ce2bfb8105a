// ==========================================
// 孵化场生产管理系统 - 收蛋 API
// ==========================================
// 职责: 收蛋记录增删改查、表尾合计
// 约束: 已被上蛋记录占用的收蛋记录不可删除
// ==========================================

use chrono::NaiveDate;

use crate::api::error::{ApiError, ApiResult};
use crate::api::record_api::RecordApi;
use crate::domain::collection::{CollectionTotals, EggCollection};
use crate::domain::setting::EggSetting;
use crate::engine::allocator::SourcePoolAllocator;
use crate::i18n::t_with_args;

pub struct CollectionApi {
    records: RecordApi<EggCollection>,
    settings: RecordApi<EggSetting>,
    tray_capacity: i64,
}

impl CollectionApi {
    pub fn new(
        records: RecordApi<EggCollection>,
        settings: RecordApi<EggSetting>,
        tray_capacity: i64,
    ) -> Self {
        Self {
            records,
            settings,
            tray_capacity,
        }
    }

    /// 新建表单默认值
    pub fn blank(&self, date: NaiveDate) -> EggCollection {
        let mut record = EggCollection::blank(date);
        record.tray_capacity = self.tray_capacity;
        record
    }

    pub fn list(&self) -> ApiResult<Vec<EggCollection>> {
        self.records.list()
    }

    pub fn get(&self, id: i64) -> ApiResult<EggCollection> {
        self.records.get(id)
    }

    pub fn create(&self, mut record: EggCollection) -> ApiResult<EggCollection> {
        record.tray_capacity = self.tray_capacity;
        self.records.create(record)
    }

    pub fn update(&self, mut record: EggCollection) -> ApiResult<EggCollection> {
        record.tray_capacity = self.tray_capacity;
        self.records.update(record)
    }

    /// 删除收蛋记录
    ///
    /// # 错误
    /// - BusinessRuleViolation: 记录已被上蛋记录占用
    pub fn delete(&self, id: i64) -> ApiResult<EggCollection> {
        let settings = self.settings.list()?;
        let claims = SourcePoolAllocator::claims(&settings, None);
        if let Some(owner) = claims.get(&id) {
            return Err(ApiError::BusinessRuleViolation(t_with_args(
                "validation.source_claimed",
                &[("source", &id.to_string()), ("owner", &owner.to_string())],
            )));
        }
        self.records.delete(id)
    }

    /// 表尾合计
    pub fn totals(&self) -> ApiResult<CollectionTotals> {
        Ok(CollectionTotals::from_entries(&self.records.list()?))
    }

    pub fn records(&self) -> &RecordApi<EggCollection> {
        &self.records
    }
}
