// ==========================================
// 孵化场生产管理系统 - 累计损耗台账
// ==========================================
// 职责: 按记录ID升序维护累计损耗（前缀和）
// 规则: 任一记录新增/修改/删除后，整表重算
// ==========================================

use crate::domain::container::StageRecord;

/// 整表重算累计损耗
///
/// 记录先按 id 升序排序，再逐条写入
/// cumulative[i] = cumulative[i-1] + loss[i]
///
/// # 返回
/// 最后一条记录的累计值（空表为 0）
pub fn recalculate_cumulative<R: StageRecord>(records: &mut [R]) -> i64 {
    records.sort_by_key(|r| r.id());

    let mut running = 0_i64;
    for record in records.iter_mut() {
        running = running.saturating_add(record.loss_count());
        record.set_cumulative_loss(running);
    }

    tracing::debug!(
        stage = %R::STAGE,
        records = records.len(),
        cumulative = running,
        "累计损耗台账已重算"
    );

    running
}

/// 损耗序列的前缀和
pub fn prefix_sums(losses: &[i64]) -> Vec<i64> {
    losses
        .iter()
        .scan(0_i64, |acc, loss| {
            *acc = acc.saturating_add(*loss);
            Some(*acc)
        })
        .collect()
}
