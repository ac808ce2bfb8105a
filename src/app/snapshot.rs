// ==========================================
// 孵化场生产管理系统 - 数据快照加载
// ==========================================
// 职责: 从 JSON 快照批量载入各环节记录
// 载入顺序按生产流程: 收蛋 → 上蛋 → 照蛋 → 孵化/落盘 → 出雏 → 装箱 → 销售 → 告警
// 每条记录都经由 API 创建，派生字段与累计台账随之重算
// ==========================================

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::ApiError;
use crate::app::state::AppState;
use crate::domain::{
    Alert, CandlingEntry, EggCollection, EggSetting, HatchingRecord, IncubationBatch,
    LockdownBatch, PackagingBatch, SaleRecord,
};

/// 数据快照，各环节记录列表，缺省为空
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataSnapshot {
    pub collections: Vec<EggCollection>,
    pub settings: Vec<EggSetting>,
    pub candling: Vec<CandlingEntry>,
    pub incubation: Vec<IncubationBatch>,
    pub lockdown: Vec<LockdownBatch>,
    pub hatching: Vec<HatchingRecord>,
    pub packaging: Vec<PackagingBatch>,
    pub sales: Vec<SaleRecord>,
    pub alerts: Vec<Alert>,
}

impl DataSnapshot {
    pub fn record_count(&self) -> usize {
        self.collections.len()
            + self.settings.len()
            + self.candling.len()
            + self.incubation.len()
            + self.lockdown.len()
            + self.hatching.len()
            + self.packaging.len()
            + self.sales.len()
            + self.alerts.len()
    }
}

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("读取快照失败 {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("快照格式错误: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("载入{section}失败: {source}")]
    Load {
        section: &'static str,
        #[source]
        source: ApiError,
    },
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// 读取快照文件
pub fn read_snapshot(path: &Path) -> SnapshotResult<DataSnapshot> {
    let raw = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&raw)?)
}

/// 读取快照文件并载入应用状态
///
/// # 返回
/// - 载入的记录条数
pub fn load_snapshot(state: &AppState, path: &Path) -> SnapshotResult<usize> {
    let snapshot = read_snapshot(path)?;
    let count = apply_snapshot(state, snapshot)?;
    tracing::info!(path = %path.display(), count, "数据快照载入完成");
    Ok(count)
}

/// 载入快照记录
///
/// 上蛋记录未填盘数时按所选收蛋记录回填；装箱记录未填箱数时按出雏记录回填
pub fn apply_snapshot(state: &AppState, snapshot: DataSnapshot) -> SnapshotResult<usize> {
    let count = snapshot.record_count();

    for record in snapshot.collections {
        state
            .collection_api
            .create(record)
            .map_err(section("collections"))?;
    }

    for mut setting in snapshot.settings {
        if setting.full_setters == 0 && setting.unfull_setters == 0 {
            state
                .setting_api
                .apply_selection(&mut setting)
                .map_err(section("settings"))?;
        }
        state
            .setting_api
            .create(setting)
            .map_err(section("settings"))?;
    }

    for entry in snapshot.candling {
        state
            .candling_api
            .create(entry)
            .map_err(section("candling"))?;
    }

    for batch in snapshot.incubation {
        state
            .incubation_api
            .create_incubation(batch)
            .map_err(section("incubation"))?;
    }

    for batch in snapshot.lockdown {
        state
            .incubation_api
            .create_lockdown(batch)
            .map_err(section("lockdown"))?;
    }

    for record in snapshot.hatching {
        state
            .hatching_api
            .create(record)
            .map_err(section("hatching"))?;
    }

    for mut batch in snapshot.packaging {
        if batch.full_boxes == 0 && batch.unfull_boxes == 0 && batch.hatch_batch_id > 0 {
            state
                .packaging_api
                .apply_plan(&mut batch)
                .map_err(section("packaging"))?;
        }
        state
            .packaging_api
            .create(batch)
            .map_err(section("packaging"))?;
    }

    for sale in snapshot.sales {
        state.sales_api.create(sale).map_err(section("sales"))?;
    }

    for alert in snapshot.alerts {
        // 保留快照中的处理状态
        state
            .alert_api
            .records()
            .create(alert)
            .map_err(section("alerts"))?;
    }

    Ok(count)
}

fn section(name: &'static str) -> impl Fn(ApiError) -> SnapshotError {
    move |source| SnapshotError::Load {
        section: name,
        source,
    }
}
