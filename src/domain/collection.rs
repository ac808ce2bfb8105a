// ==========================================
// 孵化场生产管理系统 - 收蛋记录
// ==========================================
// 口径: 总蛋数 = 满托 × 托容量 + 未满托枚数 − 破损蛋
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::container::{
    compute_total, require_count, require_text, ContainerCounts, StageRecord, UnitSource,
    EGG_TRAY_CAPACITY,
};
use crate::domain::types::{Stage, ValidationViolation};

/// 默认禽类
pub const DEFAULT_ANIMAL_TYPE: &str = "Chicken";

fn default_tray_capacity() -> i64 {
    EGG_TRAY_CAPACITY
}

// ==========================================
// EggCollection - 收蛋记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EggCollection {
    pub id: i64,
    pub farmer_name: String,  // 农户
    pub label: String,        // 标签 (I/II/III...)
    pub animal_type: String,  // 禽类
    pub type_of_eggs: String, // 蛋种
    #[serde(default)]
    pub full_trays: i64, // 满托数
    #[serde(default)]
    pub unfull_trays: i64, // 未满托数
    #[serde(default)]
    pub unfull_tray_count: i64, // 未满托枚数
    #[serde(default)]
    pub damaged_eggs: i64, // 破损蛋
    pub date: NaiveDate,

    // ===== 派生字段 =====
    #[serde(default = "default_tray_capacity")]
    pub tray_capacity: i64,
    #[serde(default)]
    pub total_eggs: i64,
}

impl EggCollection {
    /// 新建空白记录（表单默认值）
    pub fn blank(date: NaiveDate) -> Self {
        Self {
            id: 0,
            farmer_name: String::new(),
            label: String::new(),
            animal_type: DEFAULT_ANIMAL_TYPE.to_string(),
            type_of_eggs: String::new(),
            full_trays: 0,
            unfull_trays: 0,
            unfull_tray_count: 0,
            damaged_eggs: 0,
            date,
            tray_capacity: EGG_TRAY_CAPACITY,
            total_eggs: 0,
        }
    }

    pub fn counts(&self) -> ContainerCounts {
        ContainerCounts::new(self.full_trays, self.unfull_trays, self.unfull_tray_count)
    }

    /// 计算总蛋数（不修改记录）
    pub fn calculate_total_eggs(&self) -> i64 {
        compute_total(
            self.full_trays,
            self.unfull_tray_count,
            self.damaged_eggs,
            self.tray_capacity,
        )
    }
}

impl StageRecord for EggCollection {
    const STAGE: Stage = Stage::EggCollection;

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
        require_text(&mut v, "farmerName", &self.farmer_name, self.id);
        require_text(&mut v, "label", &self.label, self.id);
        require_text(&mut v, "animalType", &self.animal_type, self.id);
        require_text(&mut v, "typeOfEggs", &self.type_of_eggs, self.id);
        require_count(&mut v, "fullTrays", self.full_trays, self.id);
        require_count(&mut v, "unfullTrays", self.unfull_trays, self.id);
        require_count(&mut v, "unfullTrayCount", self.unfull_tray_count, self.id);
        require_count(&mut v, "damagedEggs", self.damaged_eggs, self.id);
        v
    }

    fn derived_total(&self) -> Option<(&'static str, i64)> {
        Some(("totalEggs", self.total_eggs))
    }

    fn partial_fill(&self) -> Option<(i64, i64)> {
        Some((self.unfull_tray_count, self.tray_capacity))
    }

    fn loss_count(&self) -> i64 {
        self.damaged_eggs
    }
}

impl UnitSource for EggCollection {
    fn source_id(&self) -> i64 {
        self.id
    }

    fn available_units(&self) -> i64 {
        self.calculate_total_eggs()
    }
}

// ==========================================
// CollectionTotals - 表尾合计
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionTotals {
    pub full_trays: i64,
    pub unfull_trays: i64,
    pub unfull_tray_count: i64,
    pub damaged_eggs: i64,
    pub total_eggs: i64,
}

impl CollectionTotals {
    pub fn from_entries(entries: &[EggCollection]) -> Self {
        entries.iter().fold(Self::default(), |acc, e| Self {
            full_trays: acc.full_trays.saturating_add(e.full_trays),
            unfull_trays: acc.unfull_trays.saturating_add(e.unfull_trays),
            unfull_tray_count: acc.unfull_tray_count.saturating_add(e.unfull_tray_count),
            damaged_eggs: acc.damaged_eggs.saturating_add(e.damaged_eggs),
            total_eggs: acc.total_eggs.saturating_add(e.calculate_total_eggs()),
        })
    }
}
