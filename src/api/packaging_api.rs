// ==========================================
// 孵化场生产管理系统 - 装箱 API
// ==========================================
// 职责:
// 1. 箱型配置（基础容量 + 附加容量）
// 2. 装箱计划: 已完成出雏记录的可装箱雏数 → 箱数
// 3. 装箱记录增删改查、统计
// 红线:
// - 仅已完成的出雏记录可以装箱
// - 一条出雏记录最多被一条装箱记录占用
// ==========================================

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::record_api::RecordApi;
use crate::domain::container::StageRecord;
use crate::domain::hatching::HatchingRecord;
use crate::domain::packaging::{BoxConfig, PackagingBatch};
use crate::domain::types::{BoxType, PackagingStatus};
use crate::engine::allocator::{check_exclusive, SourcePoolAllocator, SourceSelection};
use crate::engine::calculator::TotalCalculator;
use crate::i18n::t_with_args;

/// 装箱统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagingStats {
    pub batch_count: usize,
    pub pending_count: usize,
    /// 已完成装箱记录的装箱雏数合计
    pub total_chicks_packed: i64,
    /// 未被占用的已完成出雏记录的可装箱雏数
    pub available_chicks: i64,
}

pub struct PackagingApi {
    records: RecordApi<PackagingBatch>,
    hatching: RecordApi<HatchingRecord>,
    base_capacities: BTreeMap<BoxType, i64>,
}

impl PackagingApi {
    /// # 参数
    /// - base_capacities: 各箱型基础容量（缺省取箱型默认容量）
    pub fn new(
        records: RecordApi<PackagingBatch>,
        hatching: RecordApi<HatchingRecord>,
        base_capacities: BTreeMap<BoxType, i64>,
    ) -> Self {
        Self {
            records,
            hatching,
            base_capacities,
        }
    }

    // ==========================================
    // 箱型配置
    // ==========================================

    /// 全部箱型的基础配置
    pub fn box_configs(&self) -> Vec<BoxConfig> {
        BoxType::ALL
            .iter()
            .map(|t| BoxConfig::new(*t, self.base_capacity(*t)))
            .collect()
    }

    pub fn base_capacity(&self, box_type: BoxType) -> i64 {
        self.base_capacities
            .get(&box_type)
            .copied()
            .unwrap_or_else(|| box_type.default_capacity())
    }

    /// 箱型配置（可带附加容量）
    ///
    /// # 错误
    /// - InvalidInput: 附加容量为负
    pub fn box_config(&self, box_type: BoxType, bonus: Option<i64>) -> ApiResult<BoxConfig> {
        let config = BoxConfig::new(box_type, self.base_capacity(box_type));
        match bonus {
            Some(b) if b < 0 => Err(ApiError::InvalidInput(t_with_args(
                "validation.non_negative",
                &[("field", "bonusCapacity")],
            ))),
            Some(b) if b > 0 => Ok(config.with_bonus(b)),
            _ => Ok(config),
        }
    }

    pub fn blank(&self, date: NaiveDate, box_type: BoxType) -> PackagingBatch {
        PackagingBatch::blank(date, BoxConfig::new(box_type, self.base_capacity(box_type)))
    }

    // ==========================================
    // 来源（出雏记录）
    // ==========================================

    /// 其他装箱记录占用的出雏记录（出雏ID → 装箱ID）
    pub fn claims(&self, editing: Option<i64>) -> ApiResult<BTreeMap<i64, i64>> {
        let batches = self.records.list()?;
        Ok(SourcePoolAllocator::claims(&batches, editing))
    }

    /// 可装箱的出雏记录: 已完成且未被占用
    pub fn packable_sources(&self, editing: Option<i64>) -> ApiResult<Vec<HatchingRecord>> {
        let claimed: BTreeSet<i64> = self.claims(editing)?.into_keys().collect();
        Ok(self
            .hatching
            .list()?
            .into_iter()
            .filter(|h| h.is_completed() && !claimed.contains(&h.id))
            .collect())
    }

    /// 计算装箱方案
    ///
    /// # 错误
    /// - NotFound: 出雏记录不存在
    /// - BusinessRuleViolation: 出雏未完成 / 已被其他装箱记录占用
    /// - InvalidInput: 箱容量不为正
    pub fn plan_packaging(
        &self,
        hatch_id: i64,
        box_config: BoxConfig,
        editing: Option<i64>,
    ) -> ApiResult<SourceSelection> {
        let hatch = self.completed_source(hatch_id, editing)?;
        let calculator = TotalCalculator::with_capacity(box_config.total_capacity())?;
        let allocator = SourcePoolAllocator::new(calculator);
        Ok(allocator.select_sources(&[&hatch])?)
    }

    /// 按记录的出雏来源与箱型回填箱数，雏鸡品种为空时取出雏记录的品种
    pub fn apply_plan(&self, batch: &mut PackagingBatch) -> ApiResult<SourceSelection> {
        let editing = editing_id(batch);
        let selection = self.plan_packaging(batch.hatch_batch_id, batch.box_config, editing)?;
        batch.apply_counts(selection.counts);

        if batch.type_of_chicks.trim().is_empty() || batch.batch_id.trim().is_empty() {
            let hatch = self.hatching.get(batch.hatch_batch_id)?;
            if batch.type_of_chicks.trim().is_empty() {
                batch.type_of_chicks = hatch.type_of_chicks;
            }
            if batch.batch_id.trim().is_empty() {
                batch.batch_id = hatch.batch_id;
            }
        }
        Ok(selection)
    }

    fn completed_source(&self, hatch_id: i64, editing: Option<i64>) -> ApiResult<HatchingRecord> {
        let claims = self.claims(editing)?;
        check_exclusive(&[hatch_id], &claims)?;

        let hatch = self.hatching.find(hatch_id)?.ok_or_else(|| {
            ApiError::NotFound(t_with_args(
                "validation.source_missing",
                &[("source", &hatch_id.to_string())],
            ))
        })?;
        if !hatch.is_completed() {
            return Err(ApiError::BusinessRuleViolation(t_with_args(
                "validation.hatch_not_completed",
                &[("source", &hatch_id.to_string())],
            )));
        }
        Ok(hatch)
    }

    // ==========================================
    // 增删改查
    // ==========================================

    pub fn list(&self) -> ApiResult<Vec<PackagingBatch>> {
        self.records.list()
    }

    pub fn get(&self, id: i64) -> ApiResult<PackagingBatch> {
        self.records.get(id)
    }

    pub fn create(&self, batch: PackagingBatch) -> ApiResult<PackagingBatch> {
        self.check_source(&batch)?;
        self.records.create(batch)
    }

    pub fn update(&self, batch: PackagingBatch) -> ApiResult<PackagingBatch> {
        self.check_source(&batch)?;
        self.records.update(batch)
    }

    pub fn delete(&self, id: i64) -> ApiResult<PackagingBatch> {
        self.records.delete(id)
    }

    /// 标记装箱完成
    pub fn complete(&self, id: i64) -> ApiResult<PackagingBatch> {
        let mut batch = self.records.get(id)?;
        batch.status = PackagingStatus::Completed;
        self.records.update(batch)
    }

    fn check_source(&self, batch: &PackagingBatch) -> ApiResult<()> {
        // 未选择来源时交由记录校验报告必填
        if batch.hatch_batch_id <= 0 {
            return Ok(());
        }
        self.completed_source(batch.hatch_batch_id, editing_id(batch))
            .map(|_| ())
    }

    // ==========================================
    // 统计
    // ==========================================

    pub fn stats(&self) -> ApiResult<PackagingStats> {
        let batches = self.records.list()?;
        let available_chicks = self
            .packable_sources(None)?
            .iter()
            .map(|h| h.packable_chicks())
            .sum();

        Ok(PackagingStats {
            batch_count: batches.len(),
            pending_count: batches.iter().filter(|b| !b.is_completed()).count(),
            total_chicks_packed: batches
                .iter()
                .filter(|b| b.is_completed())
                .map(|b| b.chicks_packed)
                .sum(),
            available_chicks,
        })
    }

    pub fn records(&self) -> &RecordApi<PackagingBatch> {
        &self.records
    }
}

fn editing_id(batch: &PackagingBatch) -> Option<i64> {
    if batch.id() > 0 {
        Some(batch.id())
    } else {
        None
    }
}
