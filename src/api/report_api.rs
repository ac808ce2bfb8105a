// ==========================================
// 孵化场生产管理系统 - 报表 API
// ==========================================
// 职责: 跨环节聚合查询
// 1. 出雏率报表（以孵化批次入孵数为分母）
// 2. 按品种汇总孵化批次
// 3. 按日期汇总销售
// 4. 驾驶舱总览
// ==========================================

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::alert_api::{AlertApi, AlertStats};
use crate::api::candling_api::{CandlingApi, CandlingStats};
use crate::api::collection_api::CollectionApi;
use crate::api::error::ApiResult;
use crate::api::hatching_api::{HatchingApi, HatchingStats};
use crate::api::incubation_api::{IncubationApi, IncubationStats};
use crate::api::packaging_api::{PackagingApi, PackagingStats};
use crate::api::sales_api::{SalesApi, SalesStats};
use crate::api::setting_api::{SettingApi, SettingStats};
use crate::domain::collection::CollectionTotals;
use crate::domain::metrics::{percentage, round2};

/// 出雏率报表
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HatchRateReport {
    /// Σ孵化批次入孵数
    pub total_incubated: i64,
    pub total_hatched: i64,
    pub hatch_rate: f64,
}

/// 按品种的孵化汇总
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionSummary {
    pub breed: String,
    pub batch_count: usize,
    pub total_quantity: i64,
}

/// 按日期的销售汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub date: NaiveDate,
    pub total_amount: f64,
    pub total_quantity: i64,
}

/// 驾驶舱总览
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub collection: CollectionTotals,
    pub setting: SettingStats,
    pub candling: CandlingStats,
    pub incubation: IncubationStats,
    pub hatching: HatchingStats,
    pub packaging: PackagingStats,
    pub sales: SalesStats,
    pub alerts: AlertStats,
    pub hatch_rate: HatchRateReport,
    pub production: Vec<ProductionSummary>,
    pub daily_sales: Vec<SalesSummary>,
}

pub struct ReportApi {
    collection: Arc<CollectionApi>,
    setting: Arc<SettingApi>,
    candling: Arc<CandlingApi>,
    incubation: Arc<IncubationApi>,
    hatching: Arc<HatchingApi>,
    packaging: Arc<PackagingApi>,
    sales: Arc<SalesApi>,
    alerts: Arc<AlertApi>,
}

impl ReportApi {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        collection: Arc<CollectionApi>,
        setting: Arc<SettingApi>,
        candling: Arc<CandlingApi>,
        incubation: Arc<IncubationApi>,
        hatching: Arc<HatchingApi>,
        packaging: Arc<PackagingApi>,
        sales: Arc<SalesApi>,
        alerts: Arc<AlertApi>,
    ) -> Self {
        Self {
            collection,
            setting,
            candling,
            incubation,
            hatching,
            packaging,
            sales,
            alerts,
        }
    }

    /// 出雏率 = Σ出雏数 / Σ孵化批次入孵数 × 100，无孵化批次时为 0
    pub fn hatch_rate_report(&self) -> ApiResult<HatchRateReport> {
        let total_incubated: i64 = self
            .incubation
            .list_incubation()?
            .iter()
            .map(|b| b.quantity)
            .sum();
        let total_hatched: i64 = self.hatching.list()?.iter().map(|h| h.hatched_eggs).sum();

        Ok(HatchRateReport {
            total_incubated,
            total_hatched,
            hatch_rate: round2(percentage(total_hatched, total_incubated)),
        })
    }

    /// 按品种汇总孵化批次，按品种名排序
    pub fn production_summary(&self) -> ApiResult<Vec<ProductionSummary>> {
        let mut groups: BTreeMap<String, (usize, i64)> = BTreeMap::new();
        for batch in self.incubation.list_incubation()? {
            let entry = groups.entry(batch.breed).or_default();
            entry.0 += 1;
            entry.1 += batch.quantity;
        }

        Ok(groups
            .into_iter()
            .map(|(breed, (batch_count, total_quantity))| ProductionSummary {
                breed,
                batch_count,
                total_quantity,
            })
            .collect())
    }

    /// 按日期汇总销售（不含已取消），按日期排序
    pub fn sales_summary(&self) -> ApiResult<Vec<SalesSummary>> {
        let mut groups: BTreeMap<NaiveDate, (f64, i64)> = BTreeMap::new();
        for sale in self.sales.list()?.iter().filter(|s| !s.is_cancelled()) {
            let entry = groups.entry(sale.date).or_default();
            entry.0 += sale.total_amount;
            entry.1 += sale.quantity;
        }

        Ok(groups
            .into_iter()
            .map(|(date, (amount, quantity))| SalesSummary {
                date,
                total_amount: round2(amount),
                total_quantity: quantity,
            })
            .collect())
    }

    pub fn dashboard_overview(&self) -> ApiResult<DashboardOverview> {
        tracing::debug!("生成驾驶舱总览");
        Ok(DashboardOverview {
            collection: self.collection.totals()?,
            setting: self.setting.stats()?,
            candling: self.candling.stats()?,
            incubation: self.incubation.stats()?,
            hatching: self.hatching.stats()?,
            packaging: self.packaging.stats()?,
            sales: self.sales.stats()?,
            alerts: self.alerts.stats()?,
            hatch_rate: self.hatch_rate_report()?,
            production: self.production_summary()?,
            daily_sales: self.sales_summary()?,
        })
    }
}
