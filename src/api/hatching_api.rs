// ==========================================
// 孵化场生产管理系统 - 出雏 API
// ==========================================
// 职责: 出雏记录增删改查、完成出雏、出雏率统计
// 累计损耗台账由 RecordApi 在每次变更后整表重算
// 约束: 已被装箱记录占用的出雏记录不可删除，也不可退回孵化中
// ==========================================

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::record_api::RecordApi;
use crate::domain::hatching::HatchingRecord;
use crate::domain::packaging::PackagingBatch;
use crate::domain::types::HatchStatus;
use crate::engine::allocator::SourcePoolAllocator;
use crate::domain::metrics::{average, round2};
use crate::i18n::t_with_args;

/// 出雏统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HatchingStats {
    pub total_hatched: i64,
    pub cumulative_loss: i64,
    pub completed_count: usize,
    pub in_progress_count: usize,
    /// 已完成记录的平均出雏率
    pub average_hatch_rate: f64,
}

pub struct HatchingApi {
    records: RecordApi<HatchingRecord>,
    packaging: RecordApi<PackagingBatch>,
}

impl HatchingApi {
    pub fn new(records: RecordApi<HatchingRecord>, packaging: RecordApi<PackagingBatch>) -> Self {
        Self { records, packaging }
    }

    pub fn list(&self) -> ApiResult<Vec<HatchingRecord>> {
        self.records.list()
    }

    pub fn get(&self, id: i64) -> ApiResult<HatchingRecord> {
        self.records.get(id)
    }

    pub fn create(&self, record: HatchingRecord) -> ApiResult<HatchingRecord> {
        self.records.create(record)
    }

    /// 修改出雏记录
    ///
    /// # 错误
    /// - BusinessRuleViolation: 记录已被装箱占用且状态改为非完成
    pub fn update(&self, record: HatchingRecord) -> ApiResult<HatchingRecord> {
        if !record.is_completed() {
            self.ensure_unclaimed(record.id)?;
        }
        self.records.update(record)
    }

    /// 删除出雏记录
    ///
    /// # 错误
    /// - BusinessRuleViolation: 记录已被装箱记录占用
    pub fn delete(&self, id: i64) -> ApiResult<HatchingRecord> {
        self.ensure_unclaimed(id)?;
        self.records.delete(id)
    }

    fn ensure_unclaimed(&self, id: i64) -> ApiResult<()> {
        let batches = self.packaging.list()?;
        let claims = SourcePoolAllocator::claims(&batches, None);
        match claims.get(&id) {
            Some(owner) => Err(ApiError::BusinessRuleViolation(t_with_args(
                "validation.source_claimed",
                &[("source", &id.to_string()), ("owner", &owner.to_string())],
            ))),
            None => Ok(()),
        }
    }

    /// 标记出雏完成（已完成的记录保持不变）
    pub fn complete(&self, id: i64) -> ApiResult<HatchingRecord> {
        let mut record = self.records.get(id)?;
        if record.is_completed() {
            return Ok(record);
        }
        record.status = HatchStatus::Completed;
        self.records.update(record)
    }

    pub fn stats(&self) -> ApiResult<HatchingStats> {
        let records = self.records.list()?;
        let completed: Vec<&HatchingRecord> = records.iter().filter(|r| r.is_completed()).collect();
        let rates: Vec<f64> = completed.iter().map(|r| r.hatch_rate()).collect();

        Ok(HatchingStats {
            total_hatched: records.iter().map(|r| r.hatched_eggs).sum(),
            cumulative_loss: records.last().map(|r| r.cumulative_loss).unwrap_or(0),
            completed_count: completed.len(),
            in_progress_count: records.len() - completed.len(),
            average_hatch_rate: round2(average(&rates)),
        })
    }

    pub fn records(&self) -> &RecordApi<HatchingRecord> {
        &self.records
    }
}
