// ==========================================
// 孵化场生产管理系统 - 出雏记录
// ==========================================
// 口径:
// - 损耗 = 未出雏 + 淘汰雏 + 死雏，进入累计损耗台账
// - 可装箱雏数 = 出雏数 − 淘汰雏 − 死雏
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::container::{require_count, require_text, StageRecord, UnitSource};
use crate::domain::metrics::hatch_rate;
use crate::domain::types::{HatchStatus, Stage, ValidationViolation};

// ==========================================
// HatchingRecord - 出雏记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HatchingRecord {
    pub id: i64,
    pub batch_id: String,
    #[serde(default)]
    pub label: String,
    pub hatch_date: NaiveDate,
    #[serde(default)]
    pub type_of_chicks: String,
    #[serde(default)]
    pub quantity: i64, // 入孵数
    #[serde(default)]
    pub hatched_eggs: i64,
    #[serde(default)]
    pub unhatched_eggs: i64,
    #[serde(default)]
    pub cull_chicks: i64,
    #[serde(default)]
    pub dead_chicks: i64,
    #[serde(default)]
    pub status: HatchStatus,
    #[serde(default)]
    pub notes: String,

    // ===== 派生字段 =====
    #[serde(default)]
    pub loss_count: i64,
    #[serde(default)]
    pub cumulative_loss: i64,
}

impl HatchingRecord {
    pub fn blank(hatch_date: NaiveDate) -> Self {
        Self {
            id: 0,
            batch_id: String::new(),
            label: String::new(),
            hatch_date,
            type_of_chicks: String::new(),
            quantity: 0,
            hatched_eggs: 0,
            unhatched_eggs: 0,
            cull_chicks: 0,
            dead_chicks: 0,
            status: HatchStatus::InProgress,
            notes: String::new(),
            loss_count: 0,
            cumulative_loss: 0,
        }
    }

    pub fn calculate_loss(&self) -> i64 {
        self.unhatched_eggs + self.cull_chicks + self.dead_chicks
    }

    pub fn hatch_rate(&self) -> f64 {
        hatch_rate(self.hatched_eggs, self.quantity)
    }

    pub fn packable_chicks(&self) -> i64 {
        self.hatched_eggs - self.cull_chicks - self.dead_chicks
    }

    pub fn is_completed(&self) -> bool {
        self.status == HatchStatus::Completed
    }
}

impl StageRecord for HatchingRecord {
    const STAGE: Stage = Stage::Hatching;
    const KEEPS_LOSS_LEDGER: bool = true;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn refresh_derived(&mut self) {
        self.loss_count = self.calculate_loss();
    }

    fn validate(&self) -> Vec<ValidationViolation> {
        let mut v = Vec::new();
        require_text(&mut v, "batchId", &self.batch_id, self.id);
        require_count(&mut v, "quantity", self.quantity, self.id);
        require_count(&mut v, "hatchedEggs", self.hatched_eggs, self.id);
        require_count(&mut v, "unhatchedEggs", self.unhatched_eggs, self.id);
        require_count(&mut v, "cullChicks", self.cull_chicks, self.id);
        require_count(&mut v, "deadChicks", self.dead_chicks, self.id);
        v
    }

    fn derived_total(&self) -> Option<(&'static str, i64)> {
        Some(("packableChicks", self.packable_chicks()))
    }

    fn loss_count(&self) -> i64 {
        self.loss_count
    }

    fn cumulative_loss(&self) -> i64 {
        self.cumulative_loss
    }

    fn set_cumulative_loss(&mut self, value: i64) {
        self.cumulative_loss = value;
    }
}

impl UnitSource for HatchingRecord {
    fn source_id(&self) -> i64 {
        self.id
    }

    fn available_units(&self) -> i64 {
        self.packable_chicks()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loss_and_packable_chicks() {
        let mut r = HatchingRecord::blank(NaiveDate::from_ymd_opt(2023, 4, 9).unwrap());
        r.batch_id = "B1001".to_string();
        r.quantity = 500;
        r.hatched_eggs = 420;
        r.unhatched_eggs = 80;
        r.cull_chicks = 12;
        r.dead_chicks = 8;
        r.refresh_derived();

        assert_eq!(r.loss_count, 100);
        assert_eq!(r.packable_chicks(), 400);
        assert!((r.hatch_rate() - 84.0).abs() < 1e-9);
    }
}
