// ==========================================
// 孵化场生产管理系统 - 容器与生产记录抽象
// ==========================================
// 职责: 容器规格、容器计数、派生总数公式、各阶段记录的统一接口
// 红线: 不含数据访问逻辑
// ==========================================

use crate::domain::types::{Stage, ValidationViolation};
use crate::i18n::t_with_args;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 蛋托容量（枚/托）
pub const EGG_TRAY_CAPACITY: i64 = 30;

/// 上蛋盘容量（枚/盘）
pub const SETTER_CAPACITY: i64 = 102;

/// 计数字段上限，超出的输入在录入时截断、在校验时拒绝
pub const MAX_FIELD_VALUE: i64 = 1_000_000_000;

/// 正向计算总数
///
/// total = full × capacity + partial_unit_count − loss
///
/// 不做负数截断，调用方根据校验模式决定如何处理负数结果。
/// 溢出时饱和到 i64 边界，由校验拒绝超限字段。
pub fn compute_total(full_containers: i64, partial_unit_count: i64, loss_count: i64, capacity: i64) -> i64 {
    full_containers
        .saturating_mul(capacity)
        .saturating_add(partial_unit_count)
        .saturating_sub(loss_count)
}

// ==========================================
// ContainerSpec - 容器规格
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSpec {
    capacity: i64,
}

impl ContainerSpec {
    pub const EGG_TRAY: ContainerSpec = ContainerSpec {
        capacity: EGG_TRAY_CAPACITY,
    };
    pub const SETTER: ContainerSpec = ContainerSpec {
        capacity: SETTER_CAPACITY,
    };

    /// 创建容器规格，容量必须大于 0
    pub fn new(capacity: i64) -> Option<Self> {
        if capacity > 0 {
            Some(Self { capacity })
        } else {
            None
        }
    }

    pub fn capacity(&self) -> i64 {
        self.capacity
    }
}

// ==========================================
// ContainerCounts - 容器计数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContainerCounts {
    pub full_containers: i64,    // 满容器数
    pub partial_containers: i64, // 未满容器数（约定 0 或 1）
    pub partial_unit_count: i64, // 未满容器内数量
}

impl ContainerCounts {
    pub fn new(full_containers: i64, partial_containers: i64, partial_unit_count: i64) -> Self {
        Self {
            full_containers,
            partial_containers,
            partial_unit_count,
        }
    }

    /// 毛数量（不扣损耗）
    pub fn gross_units(&self, spec: ContainerSpec) -> i64 {
        compute_total(self.full_containers, self.partial_unit_count, 0, spec.capacity())
    }
}

impl fmt::Display for ContainerCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} 满 + {} 未满({})",
            self.full_containers, self.partial_containers, self.partial_unit_count
        )
    }
}

// ==========================================
// Trait: UnitSource - 上游来源
// ==========================================
pub trait UnitSource {
    fn source_id(&self) -> i64;

    /// 可供下游使用的数量
    fn available_units(&self) -> i64;
}

// ==========================================
// Trait: StageRecord - 阶段记录统一接口
// ==========================================
// 用途: 通用仓储/编辑器/API 依赖此接口，不关心具体记录形状
pub trait StageRecord: Clone + fmt::Debug + Send + Sync + 'static {
    /// 所属阶段
    const STAGE: Stage;

    /// 是否维护累计损耗台账
    const KEEPS_LOSS_LEDGER: bool = false;

    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);

    /// 重算派生字段（保存前调用）
    fn refresh_derived(&mut self) {}

    /// 必填项/非负校验
    fn validate(&self) -> Vec<ValidationViolation> {
        Vec::new()
    }

    /// 派生总数（字段名, 值），无派生总数的阶段返回 None
    fn derived_total(&self) -> Option<(&'static str, i64)> {
        None
    }

    /// 未满容器校验: (未满数量, 容量)
    fn partial_fill(&self) -> Option<(i64, i64)> {
        None
    }

    fn loss_count(&self) -> i64 {
        0
    }

    fn cumulative_loss(&self) -> i64 {
        0
    }

    fn set_cumulative_loss(&mut self, _value: i64) {}

    /// 引用的上游记录ID
    fn source_ids(&self) -> Vec<i64> {
        Vec::new()
    }
}

// ==========================================
// 校验辅助
// ==========================================

/// 必填文本
pub(crate) fn require_text(
    violations: &mut Vec<ValidationViolation>,
    field: &str,
    value: &str,
    record_id: i64,
) {
    if value.trim().is_empty() {
        violations.push(ValidationViolation::new(
            field,
            id_of(record_id),
            t_with_args("validation.required", &[("field", field)]),
        ));
    }
}

/// 计数字段: 非负且不超过 MAX_FIELD_VALUE
pub(crate) fn require_count(
    violations: &mut Vec<ValidationViolation>,
    field: &str,
    value: i64,
    record_id: i64,
) {
    if value < 0 {
        violations.push(ValidationViolation::new(
            field,
            id_of(record_id),
            t_with_args("validation.non_negative", &[("field", field)]),
        ));
    } else if value > MAX_FIELD_VALUE {
        violations.push(ValidationViolation::new(
            field,
            id_of(record_id),
            t_with_args(
                "validation.too_large",
                &[("field", field), ("max", &MAX_FIELD_VALUE.to_string())],
            ),
        ));
    }
}

/// 非负小数
pub(crate) fn require_non_negative_decimal(
    violations: &mut Vec<ValidationViolation>,
    field: &str,
    value: f64,
    record_id: i64,
) {
    if value < 0.0 || value.is_nan() {
        violations.push(ValidationViolation::new(
            field,
            id_of(record_id),
            t_with_args("validation.non_negative", &[("field", field)]),
        ));
    }
}

/// 新建记录 id 为 0，对外显示为 None
pub(crate) fn id_of(record_id: i64) -> Option<i64> {
    if record_id > 0 {
        Some(record_id)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_spec_rejects_zero_capacity() {
        assert!(ContainerSpec::new(0).is_none());
        assert!(ContainerSpec::new(-5).is_none());
        assert_eq!(ContainerSpec::new(102), Some(ContainerSpec::SETTER));
    }

    #[test]
    fn test_gross_units() {
        let counts = ContainerCounts::new(34, 1, 22);
        assert_eq!(counts.gross_units(ContainerSpec::EGG_TRAY), 1042);
    }

    #[test]
    fn test_compute_total_without_loss() {
        assert_eq!(compute_total(34, 22, 0, 30), 1042);
    }

    #[test]
    fn test_compute_total_with_damaged_eggs() {
        // 34 托 + 22 枚 - 3 枚破损
        assert_eq!(compute_total(34, 22, 3, 30), 1039);
    }

    #[test]
    fn test_compute_total_is_not_clamped() {
        assert_eq!(compute_total(0, 5, 12, 30), -7);
    }

    #[test]
    fn test_compute_total_saturates_on_overflow() {
        assert_eq!(compute_total(i64::MAX, 1, 0, 30), i64::MAX);
        assert_eq!(compute_total(i64::MIN, 0, 1, 30), i64::MIN);
        let counts = ContainerCounts::new(i64::MAX, 1, i64::MAX);
        assert_eq!(counts.gross_units(ContainerSpec::SETTER), i64::MAX);
    }

    #[test]
    fn test_require_count_rejects_out_of_range() {
        let mut v = Vec::new();
        require_count(&mut v, "fullTrays", MAX_FIELD_VALUE, 1);
        assert!(v.is_empty());
        require_count(&mut v, "fullTrays", MAX_FIELD_VALUE + 1, 1);
        require_count(&mut v, "damagedEggs", -1, 1);
        let fields: Vec<&str> = v.iter().map(|x| x.field.as_str()).collect();
        assert_eq!(fields, vec!["fullTrays", "damagedEggs"]);
    }
}
