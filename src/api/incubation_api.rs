// ==========================================
// 孵化场生产管理系统 - 孵化与落盘 API
// ==========================================
// 职责:
// 1. 孵化批次增删改查、孵化进度
// 2. 落盘批次增删改查、待转移列表、转入出雏器
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::record_api::RecordApi;
use crate::domain::incubation::{add_days, IncubationBatch, LockdownBatch};
use crate::domain::metrics::{average, incubation_progress, round2};

/// 孵化周期参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncubationSchedule {
    pub incubation_days: i64,
    pub lockdown_day: i64,
    pub hatch_offset_days: i64,
}

impl Default for IncubationSchedule {
    fn default() -> Self {
        Self {
            incubation_days: 21,
            lockdown_day: 18,
            hatch_offset_days: 3,
        }
    }
}

/// 转入出雏器结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResult {
    pub batch: LockdownBatch,
    /// 默认出雏日 = 转移日 + 出雏偏移天数
    pub hatch_date: NaiveDate,
}

/// 孵化统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncubationStats {
    pub active_batches: usize,
    pub eggs_in_incubation: i64,
    pub average_progress: f64,
    pub lockdown_batches: usize,
    pub pending_transfers: usize,
}

pub struct IncubationApi {
    incubation: RecordApi<IncubationBatch>,
    lockdown: RecordApi<LockdownBatch>,
    schedule: IncubationSchedule,
}

impl IncubationApi {
    pub fn new(
        incubation: RecordApi<IncubationBatch>,
        lockdown: RecordApi<LockdownBatch>,
        schedule: IncubationSchedule,
    ) -> Self {
        Self {
            incubation,
            lockdown,
            schedule,
        }
    }

    pub fn schedule(&self) -> IncubationSchedule {
        self.schedule
    }

    // ==========================================
    // 孵化批次
    // ==========================================

    pub fn list_incubation(&self) -> ApiResult<Vec<IncubationBatch>> {
        self.incubation.list()
    }

    /// 新建孵化批次，未填预计出雏日时按孵化周期推算
    ///
    /// # 错误
    /// - InvalidInput: 推算日期超出日期范围
    pub fn create_incubation(&self, mut batch: IncubationBatch) -> ApiResult<IncubationBatch> {
        if batch.expected_hatch_date.is_none()
            && batch
                .derive_expected_hatch_date(self.schedule.incubation_days)
                .is_none()
        {
            return Err(ApiError::InvalidInput(format!(
                "预计出雏日超出日期范围: {} + {} 天",
                batch.start_date, self.schedule.incubation_days
            )));
        }
        self.incubation.create(batch)
    }

    pub fn update_incubation(&self, batch: IncubationBatch) -> ApiResult<IncubationBatch> {
        self.incubation.update(batch)
    }

    pub fn delete_incubation(&self, id: i64) -> ApiResult<IncubationBatch> {
        self.incubation.delete(id)
    }

    /// 孵化进度（百分比，封顶 100）
    pub fn progress(&self, id: i64) -> ApiResult<f64> {
        let batch = self.incubation.get(id)?;
        Ok(self.progress_of(&batch))
    }

    pub fn progress_of(&self, batch: &IncubationBatch) -> f64 {
        incubation_progress(batch.day_number, self.schedule.incubation_days)
    }

    // ==========================================
    // 落盘批次
    // ==========================================

    pub fn list_lockdown(&self) -> ApiResult<Vec<LockdownBatch>> {
        self.lockdown.list()
    }

    pub fn create_lockdown(&self, batch: LockdownBatch) -> ApiResult<LockdownBatch> {
        self.lockdown.create(batch)
    }

    pub fn update_lockdown(&self, batch: LockdownBatch) -> ApiResult<LockdownBatch> {
        self.lockdown.update(batch)
    }

    pub fn delete_lockdown(&self, id: i64) -> ApiResult<LockdownBatch> {
        self.lockdown.delete(id)
    }

    /// 待转移批次: 未转移且天数 ≥ 落盘日
    pub fn pending_transfers(&self) -> ApiResult<Vec<LockdownBatch>> {
        let lockdown_day = self.schedule.lockdown_day;
        Ok(self
            .lockdown
            .list()?
            .into_iter()
            .filter(|b| b.is_pending_transfer(lockdown_day))
            .collect())
    }

    /// 转入出雏器
    ///
    /// # 错误
    /// - InvalidInput: 出雏器ID为空，或出雏日超出日期范围
    /// - InvalidStateTransition: 批次已转移
    pub fn transfer(
        &self,
        id: i64,
        hatcher_id: &str,
        transfer_date: NaiveDate,
    ) -> ApiResult<TransferResult> {
        let hatcher_id = hatcher_id.trim();
        if hatcher_id.is_empty() {
            return Err(ApiError::InvalidInput("出雏器ID不能为空".to_string()));
        }

        let mut batch = self.lockdown.get(id)?;
        if batch.is_transferred() {
            return Err(ApiError::InvalidStateTransition {
                from: format!("transferred({})", batch.transferred_to.unwrap_or_default()),
                to: format!("transferred({})", hatcher_id),
            });
        }

        let hatch_date = add_days(transfer_date, self.schedule.hatch_offset_days).ok_or_else(|| {
            ApiError::InvalidInput(format!(
                "出雏日超出日期范围: {} + {} 天",
                transfer_date, self.schedule.hatch_offset_days
            ))
        })?;

        batch.transferred_to = Some(hatcher_id.to_string());
        batch.transfer_date = Some(transfer_date);
        let batch = self.lockdown.update(batch)?;

        tracing::info!(
            batch_id = %batch.batch_id,
            hatcher = hatcher_id,
            "落盘批次已转入出雏器"
        );

        Ok(TransferResult { batch, hatch_date })
    }

    // ==========================================
    // 统计
    // ==========================================

    pub fn stats(&self) -> ApiResult<IncubationStats> {
        let batches = self.incubation.list()?;
        let progresses: Vec<f64> = batches.iter().map(|b| self.progress_of(b)).collect();
        let lockdowns = self.lockdown.list()?;
        let lockdown_day = self.schedule.lockdown_day;

        Ok(IncubationStats {
            active_batches: progresses.iter().filter(|p| **p < 100.0).count(),
            eggs_in_incubation: batches.iter().map(|b| b.quantity).sum(),
            average_progress: round2(average(&progresses)),
            lockdown_batches: lockdowns.len(),
            pending_transfers: lockdowns
                .iter()
                .filter(|b| b.is_pending_transfer(lockdown_day))
                .count(),
        })
    }
}
