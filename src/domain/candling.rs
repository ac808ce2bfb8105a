// ==========================================
// 孵化场生产管理系统 - 照蛋记录
// ==========================================
// 口径: 总蛋数 = 满盘 × 盘容量 + (未满盘 > 0 ? 未满盘枚数 : 0)
// 受精蛋与无精蛋共用记录结构，以 kind 区分
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::container::{
    compute_total, require_count, require_text, ContainerCounts, StageRecord, SETTER_CAPACITY,
};
use crate::domain::types::{CandlingKind, Stage, ValidationViolation};

fn default_setter_capacity() -> i64 {
    SETTER_CAPACITY
}

// ==========================================
// CandlingEntry - 照蛋记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandlingEntry {
    pub id: i64,
    pub kind: CandlingKind,
    pub batch_id: String, // 上蛋批次号
    #[serde(default)]
    pub label: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub day: i64, // 孵化第几天
    #[serde(default)]
    pub full_setters: i64,
    #[serde(default)]
    pub unfull_setters: i64,
    #[serde(default)]
    pub unfull_setter_count: i64,

    // ===== 派生字段 =====
    #[serde(default = "default_setter_capacity")]
    pub setter_capacity: i64,
    #[serde(default)]
    pub total_eggs: i64,
}

impl CandlingEntry {
    pub fn blank(kind: CandlingKind, date: NaiveDate) -> Self {
        Self {
            id: 0,
            kind,
            batch_id: String::new(),
            label: String::new(),
            date,
            day: 0,
            full_setters: 0,
            unfull_setters: 0,
            unfull_setter_count: 0,
            setter_capacity: SETTER_CAPACITY,
            total_eggs: 0,
        }
    }

    pub fn counts(&self) -> ContainerCounts {
        ContainerCounts::new(self.full_setters, self.unfull_setters, self.unfull_setter_count)
    }

    /// 未满盘数为 0 时，未满盘枚数不计入
    pub fn calculate_total_eggs(&self) -> i64 {
        let partial = if self.unfull_setters > 0 {
            self.unfull_setter_count
        } else {
            0
        };
        compute_total(self.full_setters, partial, 0, self.setter_capacity)
    }
}

impl StageRecord for CandlingEntry {
    const STAGE: Stage = Stage::Candling;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn refresh_derived(&mut self) {
        self.total_eggs = self.calculate_total_eggs();
    }

    fn validate(&self) -> Vec<ValidationViolation> {
        let mut v = Vec::new();
        require_text(&mut v, "batchId", &self.batch_id, self.id);
        require_count(&mut v, "day", self.day, self.id);
        require_count(&mut v, "fullSetters", self.full_setters, self.id);
        require_count(&mut v, "unfullSetters", self.unfull_setters, self.id);
        require_count(&mut v, "unfullSetterCount", self.unfull_setter_count, self.id);
        v
    }

    fn derived_total(&self) -> Option<(&'static str, i64)> {
        Some(("totalEggs", self.total_eggs))
    }

    fn partial_fill(&self) -> Option<(i64, i64)> {
        Some((self.unfull_setter_count, self.setter_capacity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_count_ignored_without_partial_setter() {
        let mut e = CandlingEntry::blank(CandlingKind::Fertile, NaiveDate::from_ymd_opt(2023, 10, 25).unwrap());
        e.full_setters = 9;
        e.unfull_setters = 0;
        e.unfull_setter_count = 40;
        e.refresh_derived();
        assert_eq!(e.total_eggs, 918);

        e.unfull_setters = 1;
        e.refresh_derived();
        assert_eq!(e.total_eggs, 958);
    }
}
