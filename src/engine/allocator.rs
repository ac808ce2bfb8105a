// ==========================================
// 孵化场生产管理系统 - 来源池分配器
// ==========================================
// 职责: 计算上游未占用总数，绑定下游记录与来源记录
// 红线: 一条来源记录同一时刻最多被一条下游记录占用
// ==========================================

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::container::{ContainerCounts, StageRecord, UnitSource};
use crate::engine::calculator::TotalCalculator;
use crate::engine::error::{EngineError, EngineResult};

// ==========================================
// SourceSelection - 选择结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSelection {
    pub source_ids: Vec<i64>,
    pub total_units: i64,
    pub counts: ContainerCounts,
}

// ==========================================
// SourcePoolAllocator
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct SourcePoolAllocator {
    calculator: TotalCalculator,
}

impl SourcePoolAllocator {
    pub fn new(calculator: TotalCalculator) -> Self {
        Self { calculator }
    }

    /// 收集下游记录已占用的来源ID → 占用者ID
    ///
    /// # 参数
    /// - consumers: 下游记录
    /// - editing: 正在编辑的下游记录ID，其自身占用不计入
    pub fn claims<C: StageRecord>(consumers: &[C], editing: Option<i64>) -> BTreeMap<i64, i64> {
        let mut claims = BTreeMap::new();
        for consumer in consumers {
            if Some(consumer.id()) == editing {
                continue;
            }
            for source_id in consumer.source_ids() {
                claims.entry(source_id).or_insert(consumer.id());
            }
        }
        claims
    }

    /// 未占用来源总数
    pub fn available_pool<S: UnitSource>(sources: &[S], claimed: &BTreeSet<i64>) -> i64 {
        sources
            .iter()
            .filter(|s| !claimed.contains(&s.source_id()))
            .map(|s| s.available_units())
            .sum()
    }

    /// 未占用来源列表
    pub fn available_sources<'a, S: UnitSource>(
        sources: &'a [S],
        claimed: &BTreeSet<i64>,
    ) -> Vec<&'a S> {
        sources
            .iter()
            .filter(|s| !claimed.contains(&s.source_id()))
            .collect()
    }

    /// 选择来源并反向分解为容器计数
    pub fn select_sources<S: UnitSource>(&self, chosen: &[&S]) -> EngineResult<SourceSelection> {
        let total_units: i64 = chosen.iter().map(|s| s.available_units()).sum();
        let counts = self.calculator.decompose(total_units)?;

        Ok(SourceSelection {
            source_ids: chosen.iter().map(|s| s.source_id()).collect(),
            total_units,
            counts,
        })
    }

    /// 按ID选择来源：校验存在性与独占性后再分解
    pub fn select_by_ids<S: UnitSource>(
        &self,
        sources: &[S],
        ids: &[i64],
        claims: &BTreeMap<i64, i64>,
    ) -> EngineResult<SourceSelection> {
        check_exclusive(ids, claims)?;

        let mut chosen = Vec::with_capacity(ids.len());
        let mut seen = BTreeSet::new();
        for id in ids {
            if !seen.insert(*id) {
                continue;
            }
            let source = sources
                .iter()
                .find(|s| s.source_id() == *id)
                .ok_or(EngineError::UnknownSource(*id))?;
            chosen.push(source);
        }

        self.select_sources(&chosen)
    }
}

/// 独占性校验：任一来源已被其他下游记录占用即失败
pub fn check_exclusive(ids: &[i64], claims: &BTreeMap<i64, i64>) -> EngineResult<()> {
    for id in ids {
        if let Some(owner_id) = claims.get(id) {
            return Err(EngineError::SourceAlreadyClaimed {
                source_id: *id,
                owner_id: *owner_id,
            });
        }
    }
    Ok(())
}
