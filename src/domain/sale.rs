// ==========================================
// 孵化场生产管理系统 - 销售记录
// ==========================================
// 金额 = 数量 × 单价（四舍五入到分）
// 余额 = 金额 − 已付
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::container::{
    require_count, require_non_negative_decimal, require_text, StageRecord,
};
use crate::domain::metrics::{line_amount, round2};
use crate::domain::types::{SaleStatus, Stage, ValidationViolation};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub id: i64,
    pub invoice_number: String,
    #[serde(default)]
    pub batch_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub customer: String,
    #[serde(default)]
    pub product_type: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub paid: f64,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub status: SaleStatus,
    #[serde(default)]
    pub notes: String,

    // ===== 派生字段 =====
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub balance: f64,
}

impl SaleRecord {
    pub fn blank(date: NaiveDate) -> Self {
        Self {
            id: 0,
            invoice_number: String::new(),
            batch_id: String::new(),
            date,
            customer: String::new(),
            product_type: String::new(),
            quantity: 0,
            unit_price: 0.0,
            paid: 0.0,
            payment_method: String::new(),
            status: SaleStatus::Pending,
            notes: String::new(),
            total_amount: 0.0,
            balance: 0.0,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == SaleStatus::Cancelled
    }
}

impl StageRecord for SaleRecord {
    const STAGE: Stage = Stage::Sales;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn refresh_derived(&mut self) {
        self.total_amount = line_amount(self.quantity, self.unit_price);
        self.balance = round2(self.total_amount - self.paid);
    }

    fn validate(&self) -> Vec<ValidationViolation> {
        let mut v = Vec::new();
        require_text(&mut v, "invoiceNumber", &self.invoice_number, self.id);
        require_text(&mut v, "customer", &self.customer, self.id);
        require_text(&mut v, "productType", &self.product_type, self.id);
        require_count(&mut v, "quantity", self.quantity, self.id);
        require_non_negative_decimal(&mut v, "unitPrice", self.unit_price, self.id);
        require_non_negative_decimal(&mut v, "paid", self.paid, self.id);
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_and_balance() {
        let mut sale = SaleRecord::blank(NaiveDate::from_ymd_opt(2023, 4, 12).unwrap());
        sale.invoice_number = "INV-2023-001".to_string();
        sale.customer = "Green Valley Farms".to_string();
        sale.product_type = "Day-old Chicks".to_string();
        sale.quantity = 500;
        sale.unit_price = 1.25;
        sale.paid = 400.0;
        sale.refresh_derived();

        assert!((sale.total_amount - 625.0).abs() < 1e-9);
        assert!((sale.balance - 225.0).abs() < 1e-9);
        assert!(sale.validate().is_empty());
    }
}
