// ==========================================
// 孵化场生产管理系统 - 上蛋记录
// ==========================================
// 口径:
// - 上蛋数 = 满盘 × 盘容量 + 未满盘枚数（剔除蛋不扣减）
// - 剔除蛋 = 脏蛋 + 破损蛋，进入累计剔除台账
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::container::{
    compute_total, id_of, require_count, require_text, ContainerCounts, StageRecord,
    SETTER_CAPACITY,
};
use crate::domain::types::{Stage, ValidationViolation};
use crate::i18n::t;

fn default_setter_capacity() -> i64 {
    SETTER_CAPACITY
}

// ==========================================
// EggSetting - 上蛋记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EggSetting {
    pub id: i64,
    #[serde(default)]
    pub batch_id: String,
    pub setting_date: NaiveDate,
    #[serde(default)]
    pub collection_ids: Vec<i64>, // 占用的收蛋记录
    #[serde(default)]
    pub type_of_eggs: String,
    #[serde(default)]
    pub full_setters: i64,
    #[serde(default)]
    pub unfull_setters: i64,
    #[serde(default)]
    pub unfull_setter_eggs: i64,
    #[serde(default)]
    pub dirty_eggs: i64,
    #[serde(default)]
    pub damaged_eggs: i64,
    #[serde(default)]
    pub notes: String,

    // ===== 派生字段 =====
    #[serde(default = "default_setter_capacity")]
    pub setter_capacity: i64,
    #[serde(default)]
    pub eggs_set: i64,
    #[serde(default)]
    pub reject_eggs: i64,
    #[serde(default)]
    pub cumulative_reject_eggs: i64,
}

impl EggSetting {
    pub fn blank(setting_date: NaiveDate) -> Self {
        Self {
            id: 0,
            batch_id: generate_batch_id(),
            setting_date,
            collection_ids: Vec::new(),
            type_of_eggs: String::new(),
            full_setters: 0,
            unfull_setters: 0,
            unfull_setter_eggs: 0,
            dirty_eggs: 0,
            damaged_eggs: 0,
            notes: String::new(),
            setter_capacity: SETTER_CAPACITY,
            eggs_set: 0,
            reject_eggs: 0,
            cumulative_reject_eggs: 0,
        }
    }

    pub fn counts(&self) -> ContainerCounts {
        ContainerCounts::new(self.full_setters, self.unfull_setters, self.unfull_setter_eggs)
    }

    /// 用来源分解结果填充容器字段
    pub fn apply_counts(&mut self, counts: ContainerCounts) {
        self.full_setters = counts.full_containers;
        self.unfull_setters = counts.partial_containers;
        self.unfull_setter_eggs = counts.partial_unit_count;
        self.eggs_set = self.calculate_eggs_set();
    }

    pub fn calculate_eggs_set(&self) -> i64 {
        compute_total(self.full_setters, self.unfull_setter_eggs, 0, self.setter_capacity)
    }
}

/// 生成批次号（字母 + 4 位数字，如 B9201）
pub fn generate_batch_id() -> String {
    const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let seed = Uuid::new_v4().as_u128();
    let letter = LETTERS[(seed % LETTERS.len() as u128) as usize] as char;
    let number = 1000 + ((seed >> 8) % 9000) as u32;
    format!("{}{}", letter, number)
}

impl StageRecord for EggSetting {
    const STAGE: Stage = Stage::EggSetting;
    const KEEPS_LOSS_LEDGER: bool = true;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn refresh_derived(&mut self) {
        if self.batch_id.trim().is_empty() {
            self.batch_id = generate_batch_id();
        }
        self.eggs_set = self.calculate_eggs_set();
        self.reject_eggs = self.dirty_eggs + self.damaged_eggs;
    }

    fn validate(&self) -> Vec<ValidationViolation> {
        let mut v = Vec::new();
        if self.collection_ids.is_empty() {
            v.push(ValidationViolation::new(
                "collectionIds",
                id_of(self.id),
                t("validation.no_sources"),
            ));
        }
        require_text(&mut v, "typeOfEggs", &self.type_of_eggs, self.id);
        require_count(&mut v, "fullSetters", self.full_setters, self.id);
        require_count(&mut v, "unfullSetters", self.unfull_setters, self.id);
        require_count(&mut v, "unfullSetterEggs", self.unfull_setter_eggs, self.id);
        require_count(&mut v, "dirtyEggs", self.dirty_eggs, self.id);
        require_count(&mut v, "damagedEggs", self.damaged_eggs, self.id);
        v
    }

    fn derived_total(&self) -> Option<(&'static str, i64)> {
        Some(("eggsSet", self.eggs_set))
    }

    fn partial_fill(&self) -> Option<(i64, i64)> {
        Some((self.unfull_setter_eggs, self.setter_capacity))
    }

    fn loss_count(&self) -> i64 {
        self.reject_eggs
    }

    fn cumulative_loss(&self) -> i64 {
        self.cumulative_reject_eggs
    }

    fn set_cumulative_loss(&mut self, value: i64) {
        self.cumulative_reject_eggs = value;
    }

    fn source_ids(&self) -> Vec<i64> {
        self.collection_ids.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_batch_id_shape() {
        for _ in 0..50 {
            let id = generate_batch_id();
            assert_eq!(id.len(), 5);
            let mut chars = id.chars();
            assert!(chars.next().unwrap().is_ascii_uppercase());
            let number: u32 = chars.as_str().parse().unwrap();
            assert!((1000..=9999).contains(&number));
        }
    }

    #[test]
    fn test_refresh_derived_sums_rejects() {
        let mut s = EggSetting::blank(NaiveDate::from_ymd_opt(2023, 10, 16).unwrap());
        s.full_setters = 10;
        s.unfull_setters = 1;
        s.unfull_setter_eggs = 45;
        s.dirty_eggs = 5;
        s.damaged_eggs = 3;
        s.refresh_derived();
        assert_eq!(s.eggs_set, 1065);
        assert_eq!(s.reject_eggs, 8);
        // 剔除蛋不从上蛋数中扣减
        assert_eq!(s.derived_total(), Some(("eggsSet", 1065)));
    }

    #[test]
    fn test_requires_collections() {
        let s = EggSetting::blank(NaiveDate::from_ymd_opt(2023, 10, 16).unwrap());
        let fields: Vec<String> = s.validate().into_iter().map(|v| v.field).collect();
        assert!(fields.contains(&"collectionIds".to_string()));
        assert!(fields.contains(&"typeOfEggs".to_string()));
    }
}
