// ==========================================
// 孵化场生产管理系统 - 照蛋 API
// ==========================================
// 职责: 受精蛋/无精蛋照蛋记录、受精率
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiResult;
use crate::api::record_api::RecordApi;
use crate::domain::candling::CandlingEntry;
use crate::domain::setting::EggSetting;
use crate::domain::types::CandlingKind;
use crate::domain::metrics::{fertility_rate, round2};

/// 照蛋统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandlingStats {
    pub fertile_eggs: i64,
    pub clear_eggs: i64,
    pub fertility_rate: f64,
}

pub struct CandlingApi {
    records: RecordApi<CandlingEntry>,
    settings: RecordApi<EggSetting>,
    setter_capacity: i64,
}

impl CandlingApi {
    pub fn new(
        records: RecordApi<CandlingEntry>,
        settings: RecordApi<EggSetting>,
        setter_capacity: i64,
    ) -> Self {
        Self {
            records,
            settings,
            setter_capacity,
        }
    }

    /// 新建表单默认值；指定上蛋记录时带出批次号与标签
    pub fn blank(
        &self,
        kind: CandlingKind,
        date: NaiveDate,
        setting_id: Option<i64>,
    ) -> ApiResult<CandlingEntry> {
        let mut entry = CandlingEntry::blank(kind, date);
        entry.setter_capacity = self.setter_capacity;
        if let Some(id) = setting_id {
            let setting = self.settings.get(id)?;
            entry.label = setting.batch_id.clone();
            entry.batch_id = setting.batch_id;
        }
        Ok(entry)
    }

    /// 可选批次号（来自上蛋记录）
    pub fn batch_options(&self) -> ApiResult<Vec<String>> {
        Ok(self
            .settings
            .list()?
            .into_iter()
            .map(|s| s.batch_id)
            .collect())
    }

    pub fn list(&self, kind: CandlingKind) -> ApiResult<Vec<CandlingEntry>> {
        Ok(self
            .records
            .list()?
            .into_iter()
            .filter(|e| e.kind == kind)
            .collect())
    }

    pub fn get(&self, id: i64) -> ApiResult<CandlingEntry> {
        self.records.get(id)
    }

    pub fn create(&self, mut entry: CandlingEntry) -> ApiResult<CandlingEntry> {
        entry.setter_capacity = self.setter_capacity;
        self.records.create(entry)
    }

    pub fn update(&self, mut entry: CandlingEntry) -> ApiResult<CandlingEntry> {
        entry.setter_capacity = self.setter_capacity;
        self.records.update(entry)
    }

    pub fn delete(&self, id: i64) -> ApiResult<CandlingEntry> {
        self.records.delete(id)
    }

    pub fn stats(&self) -> ApiResult<CandlingStats> {
        let entries = self.records.list()?;
        let total_of = |kind: CandlingKind| -> i64 {
            entries
                .iter()
                .filter(|e| e.kind == kind)
                .map(|e| e.total_eggs)
                .sum()
        };
        let fertile_eggs = total_of(CandlingKind::Fertile);
        let clear_eggs = total_of(CandlingKind::Clear);

        Ok(CandlingStats {
            fertile_eggs,
            clear_eggs,
            fertility_rate: round2(fertility_rate(fertile_eggs, clear_eggs)),
        })
    }

    pub fn records(&self) -> &RecordApi<CandlingEntry> {
        &self.records
    }
}
