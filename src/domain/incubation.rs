// ==========================================
// 孵化场生产管理系统 - 孵化与落盘
// ==========================================
// 孵化批次: 进度 = min(天数 / 孵化周期 × 100, 100)
// 落盘批次: 达到落盘日且未转入出雏器 → 待转移
// 温湿度为录入值，不对接设备
// ==========================================

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::container::{
    require_count, require_non_negative_decimal, require_text, StageRecord,
};
use crate::domain::types::{Stage, ValidationViolation};

// ==========================================
// IncubationBatch - 孵化批次
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncubationBatch {
    pub id: i64,
    pub batch_id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub breed: String, // 品种，产量汇总按此分组
    pub start_date: NaiveDate,
    #[serde(default)]
    pub expected_hatch_date: Option<NaiveDate>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub temperature: f64,
    #[serde(default)]
    pub humidity: f64,
    #[serde(default)]
    pub day_number: i64,
    #[serde(default)]
    pub notes: String,
}

/// 日期加天数，超出日期范围时返回 None
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|d| date.checked_add_signed(d))
}

impl IncubationBatch {
    /// 新建表单默认值
    pub fn blank(start_date: NaiveDate) -> Self {
        Self {
            id: 0,
            batch_id: String::new(),
            label: String::new(),
            breed: String::new(),
            start_date,
            expected_hatch_date: None,
            quantity: 0,
            temperature: 0.0,
            humidity: 0.0,
            day_number: 0,
            notes: String::new(),
        }
    }

    /// 预计出雏日 = 入孵日 + 孵化周期
    ///
    /// 超出日期范围时不写入，返回 None
    pub fn derive_expected_hatch_date(&mut self, incubation_days: i64) -> Option<NaiveDate> {
        let date = add_days(self.start_date, incubation_days)?;
        self.expected_hatch_date = Some(date);
        Some(date)
    }
}

impl StageRecord for IncubationBatch {
    const STAGE: Stage = Stage::Incubation;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn validate(&self) -> Vec<ValidationViolation> {
        let mut v = Vec::new();
        require_text(&mut v, "batchId", &self.batch_id, self.id);
        require_text(&mut v, "breed", &self.breed, self.id);
        require_count(&mut v, "quantity", self.quantity, self.id);
        require_count(&mut v, "dayNumber", self.day_number, self.id);
        require_non_negative_decimal(&mut v, "humidity", self.humidity, self.id);
        v
    }
}

// ==========================================
// LockdownBatch - 落盘批次
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockdownBatch {
    pub id: i64,
    pub batch_id: String,
    #[serde(default)]
    pub label: String,
    pub start_date: NaiveDate,
    pub lockdown_date: NaiveDate,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub incubator_id: String,
    #[serde(default)]
    pub transferred_to: Option<String>, // 出雏器ID，未转移为 None
    #[serde(default)]
    pub transfer_date: Option<NaiveDate>,
    #[serde(default)]
    pub humidity: f64,
    #[serde(default)]
    pub temperature: f64,
    #[serde(default)]
    pub notification_sent: bool,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub day: i64,
}

impl LockdownBatch {
    /// 新建表单默认值，落盘日默认与入孵日相同
    pub fn blank(start_date: NaiveDate) -> Self {
        Self {
            id: 0,
            batch_id: String::new(),
            label: String::new(),
            start_date,
            lockdown_date: start_date,
            quantity: 0,
            incubator_id: String::new(),
            transferred_to: None,
            transfer_date: None,
            humidity: 0.0,
            temperature: 0.0,
            notification_sent: false,
            notes: String::new(),
            day: 0,
        }
    }

    pub fn is_transferred(&self) -> bool {
        self.transferred_to
            .as_deref()
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false)
    }

    /// 待转移: 未转移且天数达到落盘日
    pub fn is_pending_transfer(&self, lockdown_day: i64) -> bool {
        !self.is_transferred() && self.day >= lockdown_day
    }
}

impl StageRecord for LockdownBatch {
    const STAGE: Stage = Stage::Lockdown;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn refresh_derived(&mut self) {
        // 空字符串视为未转移
        if !self.is_transferred() {
            self.transferred_to = None;
            self.transfer_date = None;
        }
    }

    fn validate(&self) -> Vec<ValidationViolation> {
        let mut v = Vec::new();
        require_text(&mut v, "batchId", &self.batch_id, self.id);
        require_text(&mut v, "incubatorId", &self.incubator_id, self.id);
        require_count(&mut v, "quantity", self.quantity, self.id);
        require_count(&mut v, "day", self.day, self.id);
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lockdown(day: i64, transferred_to: Option<&str>) -> LockdownBatch {
        LockdownBatch {
            id: 1,
            batch_id: "B1002".to_string(),
            label: "House II".to_string(),
            start_date: NaiveDate::from_ymd_opt(2023, 3, 20).unwrap(),
            lockdown_date: NaiveDate::from_ymd_opt(2023, 4, 8).unwrap(),
            quantity: 600,
            incubator_id: "inc2".to_string(),
            transferred_to: transferred_to.map(|s| s.to_string()),
            transfer_date: None,
            humidity: 65.0,
            temperature: 37.2,
            notification_sent: false,
            notes: String::new(),
            day,
        }
    }

    #[test]
    fn test_pending_transfer() {
        assert!(lockdown(18, None).is_pending_transfer(18));
        assert!(!lockdown(15, None).is_pending_transfer(18));
        assert!(!lockdown(18, Some("hat1")).is_pending_transfer(18));
        assert!(lockdown(19, Some("  ")).is_pending_transfer(18));
    }

    #[test]
    fn test_expected_hatch_date() {
        let mut batch = IncubationBatch {
            id: 1,
            batch_id: "B9201".to_string(),
            label: "II".to_string(),
            breed: "Kuroiler".to_string(),
            start_date: NaiveDate::from_ymd_opt(2023, 6, 10).unwrap(),
            expected_hatch_date: None,
            quantity: 1065,
            temperature: 37.5,
            humidity: 55.0,
            day_number: 7,
            notes: String::new(),
        };
        batch.derive_expected_hatch_date(21);
        assert_eq!(batch.expected_hatch_date, NaiveDate::from_ymd_opt(2023, 7, 1));
        assert!(batch.validate().is_empty());
    }

    #[test]
    fn test_expected_hatch_date_out_of_range() {
        let mut batch = IncubationBatch::blank(NaiveDate::MAX);
        assert_eq!(batch.derive_expected_hatch_date(21), None);
        assert_eq!(batch.expected_hatch_date, None);

        let start = NaiveDate::from_ymd_opt(2023, 6, 10).unwrap();
        assert_eq!(add_days(start, i64::MAX), None);
        assert_eq!(add_days(start, 3), NaiveDate::from_ymd_opt(2023, 6, 13));
    }
}
