// ==========================================
// 孵化场生产管理系统 - 销售 API
// ==========================================
// 职责: 销售记录增删改查、收入与欠款统计
// 约束: 发票号唯一；已取消的销售不计入统计
// ==========================================

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::record_api::RecordApi;
use crate::domain::sale::SaleRecord;
use crate::domain::types::SaleStatus;
use crate::domain::metrics::round2;

/// 销售统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesStats {
    pub sale_count: usize,
    pub pending_count: usize,
    pub chicks_sold: i64,
    pub total_revenue: f64,
    pub outstanding_balance: f64,
}

pub struct SalesApi {
    records: RecordApi<SaleRecord>,
}

impl SalesApi {
    pub fn new(records: RecordApi<SaleRecord>) -> Self {
        Self { records }
    }

    pub fn list(&self) -> ApiResult<Vec<SaleRecord>> {
        self.records.list()
    }

    pub fn get(&self, id: i64) -> ApiResult<SaleRecord> {
        self.records.get(id)
    }

    pub fn create(&self, sale: SaleRecord) -> ApiResult<SaleRecord> {
        self.check_invoice_unique(&sale)?;
        self.records.create(sale)
    }

    pub fn update(&self, sale: SaleRecord) -> ApiResult<SaleRecord> {
        self.check_invoice_unique(&sale)?;
        self.records.update(sale)
    }

    pub fn delete(&self, id: i64) -> ApiResult<SaleRecord> {
        self.records.delete(id)
    }

    /// 取消销售
    pub fn cancel(&self, id: i64) -> ApiResult<SaleRecord> {
        let mut sale = self.records.get(id)?;
        if sale.status == SaleStatus::Completed {
            return Err(ApiError::InvalidStateTransition {
                from: sale.status.to_string(),
                to: SaleStatus::Cancelled.to_string(),
            });
        }
        sale.status = SaleStatus::Cancelled;
        self.records.update(sale)
    }

    fn check_invoice_unique(&self, sale: &SaleRecord) -> ApiResult<()> {
        let invoice = sale.invoice_number.trim();
        if invoice.is_empty() {
            return Ok(());
        }
        let duplicate = self
            .records
            .list()?
            .into_iter()
            .any(|s| s.id != sale.id && s.invoice_number.trim() == invoice);
        if duplicate {
            return Err(ApiError::BusinessRuleViolation(format!(
                "发票号已存在: {}",
                invoice
            )));
        }
        Ok(())
    }

    pub fn stats(&self) -> ApiResult<SalesStats> {
        let sales = self.records.list()?;
        let live: Vec<&SaleRecord> = sales.iter().filter(|s| !s.is_cancelled()).collect();

        Ok(SalesStats {
            sale_count: live.len(),
            pending_count: live
                .iter()
                .filter(|s| s.status == SaleStatus::Pending)
                .count(),
            chicks_sold: live.iter().map(|s| s.quantity).sum(),
            total_revenue: round2(live.iter().map(|s| s.total_amount).sum()),
            outstanding_balance: round2(live.iter().map(|s| s.balance).sum()),
        })
    }

    pub fn records(&self) -> &RecordApi<SaleRecord> {
        &self.records
    }
}
