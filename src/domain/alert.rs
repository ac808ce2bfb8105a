// ==========================================
// 孵化场生产管理系统 - 告警
// ==========================================
// 状态流转: active → acknowledged → resolved
//           active → resolved
// resolved 为终态
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::container::{require_text, StageRecord};
use crate::domain::types::{AlertSeverity, AlertStatus, Stage, ValidationViolation};

/// 人工处理时未填写处理说明的默认文案
pub fn manual_resolution_note(at: NaiveDateTime) -> String {
    format!("Manually resolved at {}", at.format("%Y-%m-%d %H:%M:%S"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: i64,
    pub alert_type: String,
    pub severity: AlertSeverity,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub threshold: String,
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: AlertStatus,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
}

impl Alert {
    pub fn new(alert_type: &str, severity: AlertSeverity, timestamp: NaiveDateTime) -> Self {
        Self {
            id: 0,
            alert_type: alert_type.to_string(),
            severity,
            source: String::new(),
            value: String::new(),
            threshold: String::new(),
            timestamp,
            message: String::new(),
            status: AlertStatus::Active,
            duration: None,
            resolution: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AlertStatus::Active
    }

    /// 判断能否流转到目标状态
    pub fn can_transition_to(&self, target: AlertStatus) -> bool {
        matches!(
            (self.status, target),
            (AlertStatus::Active, AlertStatus::Acknowledged)
                | (AlertStatus::Active, AlertStatus::Resolved)
                | (AlertStatus::Acknowledged, AlertStatus::Resolved)
        )
    }
}

impl StageRecord for Alert {
    const STAGE: Stage = Stage::Alerts;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn validate(&self) -> Vec<ValidationViolation> {
        let mut v = Vec::new();
        require_text(&mut v, "alertType", &self.alert_type, self.id);
        require_text(&mut v, "message", &self.message, self.id);
        v
    }
}
