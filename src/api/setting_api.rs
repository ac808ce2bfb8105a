// ==========================================
// 孵化场生产管理系统 - 上蛋 API
// ==========================================
// 职责:
// 1. 上蛋记录增删改查（剔除蛋累计台账由 RecordApi 维护）
// 2. 收蛋来源池: 可用蛋数、可选收蛋记录、来源选择 → 上蛋盘数
// 红线: 一条收蛋记录最多被一条上蛋记录占用
// ==========================================

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiResult;
use crate::api::record_api::RecordApi;
use crate::domain::collection::EggCollection;
use crate::domain::container::StageRecord;
use crate::domain::setting::EggSetting;
use crate::engine::allocator::{check_exclusive, SourcePoolAllocator, SourceSelection};
use crate::engine::calculator::TotalCalculator;
use crate::engine::error::EngineError;

/// 上蛋统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingStats {
    pub batch_count: usize,
    pub total_eggs_set: i64,
    pub cumulative_reject_eggs: i64,
    pub available_eggs: i64,
}

pub struct SettingApi {
    records: RecordApi<EggSetting>,
    collections: RecordApi<EggCollection>,
    allocator: SourcePoolAllocator,
    setter_capacity: i64,
}

impl SettingApi {
    /// # 错误
    /// - InvalidInput: 上蛋盘容量不为正
    pub fn new(
        records: RecordApi<EggSetting>,
        collections: RecordApi<EggCollection>,
        setter_capacity: i64,
    ) -> ApiResult<Self> {
        let calculator = TotalCalculator::with_capacity(setter_capacity)?;
        Ok(Self {
            records,
            collections,
            allocator: SourcePoolAllocator::new(calculator),
            setter_capacity,
        })
    }

    pub fn blank(&self, date: NaiveDate) -> EggSetting {
        let mut record = EggSetting::blank(date);
        record.setter_capacity = self.setter_capacity;
        record
    }

    pub fn list(&self) -> ApiResult<Vec<EggSetting>> {
        self.records.list()
    }

    pub fn get(&self, id: i64) -> ApiResult<EggSetting> {
        self.records.get(id)
    }

    // ==========================================
    // 来源池
    // ==========================================

    /// 其他上蛋记录占用的收蛋记录（收蛋ID → 上蛋ID）
    pub fn claims(&self, editing: Option<i64>) -> ApiResult<BTreeMap<i64, i64>> {
        let settings = self.records.list()?;
        Ok(SourcePoolAllocator::claims(&settings, editing))
    }

    fn claimed_ids(&self, editing: Option<i64>) -> ApiResult<BTreeSet<i64>> {
        Ok(self.claims(editing)?.into_keys().collect())
    }

    /// 可上蛋数（未占用收蛋记录的总蛋数）
    pub fn available_eggs(&self, editing: Option<i64>) -> ApiResult<i64> {
        let collections = self.collections.list()?;
        let claimed = self.claimed_ids(editing)?;
        Ok(SourcePoolAllocator::available_pool(&collections, &claimed))
    }

    /// 可选收蛋记录（编辑时包含自身已占用的记录）
    pub fn available_collections(&self, editing: Option<i64>) -> ApiResult<Vec<EggCollection>> {
        let collections = self.collections.list()?;
        let claimed = self.claimed_ids(editing)?;
        Ok(SourcePoolAllocator::available_sources(&collections, &claimed)
            .into_iter()
            .cloned()
            .collect())
    }

    /// 选择收蛋记录并分解为上蛋盘数
    pub fn select_collections(
        &self,
        collection_ids: &[i64],
        editing: Option<i64>,
    ) -> ApiResult<SourceSelection> {
        let collections = self.collections.list()?;
        let claims = self.claims(editing)?;
        Ok(self
            .allocator
            .select_by_ids(&collections, collection_ids, &claims)?)
    }

    /// 按记录当前的 collection_ids 回填盘数与蛋种
    ///
    /// 蛋种为空时取第一条收蛋记录的蛋种
    pub fn apply_selection(&self, setting: &mut EggSetting) -> ApiResult<SourceSelection> {
        let editing = editing_id(setting);
        let selection = self.select_collections(&setting.collection_ids, editing)?;

        setting.collection_ids = selection.source_ids.clone();
        setting.setter_capacity = self.setter_capacity;
        setting.apply_counts(selection.counts);

        if setting.type_of_eggs.trim().is_empty() {
            if let Some(first) = selection.source_ids.first() {
                if let Some(collection) = self.collections.find(*first)? {
                    setting.type_of_eggs = collection.type_of_eggs;
                }
            }
        }
        Ok(selection)
    }

    // ==========================================
    // 增删改
    // ==========================================

    /// 新建上蛋记录（校验来源存在且未被占用）
    pub fn create(&self, mut setting: EggSetting) -> ApiResult<EggSetting> {
        setting.setter_capacity = self.setter_capacity;
        self.check_sources(&setting)?;
        self.records.create(setting)
    }

    pub fn update(&self, mut setting: EggSetting) -> ApiResult<EggSetting> {
        setting.setter_capacity = self.setter_capacity;
        self.check_sources(&setting)?;
        self.records.update(setting)
    }

    /// 删除上蛋记录，释放其占用的收蛋记录
    pub fn delete(&self, id: i64) -> ApiResult<EggSetting> {
        self.records.delete(id)
    }

    fn check_sources(&self, setting: &EggSetting) -> ApiResult<()> {
        let claims = self.claims(editing_id(setting))?;
        check_exclusive(&setting.collection_ids, &claims)?;

        for id in &setting.collection_ids {
            if self.collections.find(*id)?.is_none() {
                return Err(EngineError::UnknownSource(*id).into());
            }
        }
        Ok(())
    }

    // ==========================================
    // 统计
    // ==========================================

    pub fn stats(&self) -> ApiResult<SettingStats> {
        let settings = self.records.list()?;
        Ok(SettingStats {
            batch_count: settings.len(),
            total_eggs_set: settings.iter().map(|s| s.eggs_set).sum(),
            cumulative_reject_eggs: settings
                .last()
                .map(|s| s.cumulative_reject_eggs)
                .unwrap_or(0),
            available_eggs: self.available_eggs(None)?,
        })
    }

    pub fn records(&self) -> &RecordApi<EggSetting> {
        &self.records
    }
}

fn editing_id(setting: &EggSetting) -> Option<i64> {
    if setting.id() > 0 {
        Some(setting.id())
    } else {
        None
    }
}
