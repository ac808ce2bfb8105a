// ==========================================
// 孵化场生产管理系统 - 装箱记录
// ==========================================
// 口径:
// - 箱容量 = 基础容量 + 附加容量（附加容量可选）
// - 装箱雏数 = 满箱 × 箱容量 + 未满箱雏数
// - 一条出雏记录至多被一条装箱记录占用
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::container::{
    compute_total, id_of, require_count, require_text, ContainerCounts, ContainerSpec,
    StageRecord,
};
use crate::domain::types::{BoxType, PackagingStatus, Stage, ValidationViolation};
use crate::i18n::t_with_args;

// ==========================================
// BoxConfig - 箱型配置
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxConfig {
    pub box_type: BoxType,
    pub base_capacity: i64,
    #[serde(default)]
    pub bonus_capacity: Option<i64>,
}

impl BoxConfig {
    pub fn new(box_type: BoxType, base_capacity: i64) -> Self {
        Self {
            box_type,
            base_capacity,
            bonus_capacity: None,
        }
    }

    pub fn with_bonus(mut self, bonus: i64) -> Self {
        self.bonus_capacity = Some(bonus);
        self
    }

    pub fn total_capacity(&self) -> i64 {
        self.base_capacity.saturating_add(self.bonus_capacity.unwrap_or(0))
    }

    /// 容量不为正时返回 None
    pub fn container_spec(&self) -> Option<ContainerSpec> {
        ContainerSpec::new(self.total_capacity())
    }
}

impl Default for BoxConfig {
    fn default() -> Self {
        Self::new(BoxType::Medium, BoxType::Medium.default_capacity())
    }
}

// ==========================================
// PackagingBatch - 装箱记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagingBatch {
    pub id: i64,
    #[serde(default)]
    pub batch_id: String,
    #[serde(default)]
    pub label: String,
    pub packaging_date: NaiveDate,
    #[serde(default)]
    pub hatch_batch_id: i64, // 来源出雏记录ID，0 表示未选择
    #[serde(default)]
    pub box_config: BoxConfig,
    #[serde(default)]
    pub type_of_chicks: String,
    #[serde(default)]
    pub full_boxes: i64,
    #[serde(default)]
    pub unfull_boxes: i64,
    #[serde(default)]
    pub unfull_box_count: i64,
    #[serde(default)]
    pub status: PackagingStatus,
    #[serde(default)]
    pub assigned_to: String,
    #[serde(default)]
    pub notes: String,

    // ===== 派生字段 =====
    #[serde(default)]
    pub chicks_packed: i64,
}

impl PackagingBatch {
    pub fn blank(packaging_date: NaiveDate, box_config: BoxConfig) -> Self {
        Self {
            id: 0,
            batch_id: String::new(),
            label: String::new(),
            packaging_date,
            hatch_batch_id: 0,
            box_config,
            type_of_chicks: String::new(),
            full_boxes: 0,
            unfull_boxes: 0,
            unfull_box_count: 0,
            status: PackagingStatus::Pending,
            assigned_to: String::new(),
            notes: String::new(),
            chicks_packed: 0,
        }
    }

    pub fn counts(&self) -> ContainerCounts {
        ContainerCounts::new(self.full_boxes, self.unfull_boxes, self.unfull_box_count)
    }

    pub fn apply_counts(&mut self, counts: ContainerCounts) {
        self.full_boxes = counts.full_containers;
        self.unfull_boxes = counts.partial_containers;
        self.unfull_box_count = counts.partial_unit_count;
        self.chicks_packed = self.calculate_chicks_packed();
    }

    pub fn calculate_chicks_packed(&self) -> i64 {
        compute_total(
            self.full_boxes,
            self.unfull_box_count,
            0,
            self.box_config.total_capacity(),
        )
    }

    pub fn is_completed(&self) -> bool {
        self.status == PackagingStatus::Completed
    }
}

impl StageRecord for PackagingBatch {
    const STAGE: Stage = Stage::Packaging;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn refresh_derived(&mut self) {
        self.chicks_packed = self.calculate_chicks_packed();
    }

    fn validate(&self) -> Vec<ValidationViolation> {
        let mut v = Vec::new();
        if self.hatch_batch_id <= 0 {
            v.push(ValidationViolation::new(
                "hatchBatchId",
                id_of(self.id),
                t_with_args("validation.required", &[("field", "hatchBatchId")]),
            ));
        }
        require_text(&mut v, "typeOfChicks", &self.type_of_chicks, self.id);
        require_count(&mut v, "boxCapacity", self.box_config.total_capacity(), self.id);
        require_count(&mut v, "fullBoxes", self.full_boxes, self.id);
        require_count(&mut v, "unfullBoxes", self.unfull_boxes, self.id);
        require_count(&mut v, "unfullBoxCount", self.unfull_box_count, self.id);
        v
    }

    fn derived_total(&self) -> Option<(&'static str, i64)> {
        Some(("chicksPacked", self.chicks_packed))
    }

    fn partial_fill(&self) -> Option<(i64, i64)> {
        Some((self.unfull_box_count, self.box_config.total_capacity()))
    }

    fn source_ids(&self) -> Vec<i64> {
        if self.hatch_batch_id > 0 {
            vec![self.hatch_batch_id]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_config_bonus_capacity() {
        let cfg = BoxConfig::new(BoxType::Small, 50).with_bonus(2);
        assert_eq!(cfg.total_capacity(), 52);
        assert_eq!(BoxConfig::new(BoxType::Large, 200).total_capacity(), 200);
        assert!(BoxConfig::new(BoxType::Small, 0).container_spec().is_none());
    }

    #[test]
    fn test_chicks_packed_uses_box_capacity() {
        let date = NaiveDate::from_ymd_opt(2023, 4, 10).unwrap();
        let mut batch = PackagingBatch::blank(date, BoxConfig::new(BoxType::Medium, 100));
        batch.apply_counts(ContainerCounts::new(3, 1, 75));
        assert_eq!(batch.chicks_packed, 375);
        assert_eq!(batch.source_ids(), Vec::<i64>::new());

        batch.hatch_batch_id = 4;
        assert_eq!(batch.source_ids(), vec![4]);
    }
}
