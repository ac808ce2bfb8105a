// ==========================================
// 孵化场生产管理系统 - 派生总数计算器
// ==========================================
// 职责: 容器计数 → 总数（正向），总数 → 容器计数（反向分解）
// 约束: 整数运算，不取整，不截断负数
// ==========================================

use crate::domain::container::{compute_total, ContainerCounts, ContainerSpec};
use crate::engine::error::{EngineError, EngineResult};

/// 反向分解总数
///
/// # 规则
/// - full = floor(total / capacity)
/// - partial_unit_count = total mod capacity
/// - partial_containers = 余数 > 0 ? 1 : 0
///
/// # 错误
/// - capacity ≤ 0 → InvalidCapacity
/// - total < 0 → NegativeTotal
pub fn decompose_total(total: i64, capacity: i64) -> EngineResult<ContainerCounts> {
    if capacity <= 0 {
        return Err(EngineError::InvalidCapacity(capacity));
    }
    if total < 0 {
        return Err(EngineError::NegativeTotal(total));
    }

    let full_containers = total / capacity;
    let remainder = total % capacity;

    Ok(ContainerCounts {
        full_containers,
        partial_containers: if remainder > 0 { 1 } else { 0 },
        partial_unit_count: remainder,
    })
}

// ==========================================
// TotalCalculator - 绑定容器规格的计算器
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct TotalCalculator {
    spec: ContainerSpec,
}

impl TotalCalculator {
    pub fn new(spec: ContainerSpec) -> Self {
        Self { spec }
    }

    /// 按容量创建，容量非法时返回错误
    pub fn with_capacity(capacity: i64) -> EngineResult<Self> {
        ContainerSpec::new(capacity)
            .map(Self::new)
            .ok_or(EngineError::InvalidCapacity(capacity))
    }

    pub fn spec(&self) -> ContainerSpec {
        self.spec
    }

    pub fn total(&self, counts: &ContainerCounts, loss_count: i64) -> i64 {
        compute_total(
            counts.full_containers,
            counts.partial_unit_count,
            loss_count,
            self.spec.capacity(),
        )
    }

    pub fn decompose(&self, total: i64) -> EngineResult<ContainerCounts> {
        decompose_total(total, self.spec.capacity())
    }
}
