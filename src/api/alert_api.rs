// ==========================================
// 孵化场生产管理系统 - 告警 API
// ==========================================
// 职责: 告警登记、确认、处理、统计
// 状态流转: active → acknowledged → resolved / active → resolved
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::record_api::RecordApi;
use crate::domain::alert::{manual_resolution_note, Alert};
use crate::domain::types::{AlertSeverity, AlertStatus};

/// 告警统计（未解决告警按级别计数）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertStats {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
    pub acknowledged: usize,
    pub resolved: usize,
}

pub struct AlertApi {
    records: RecordApi<Alert>,
}

impl AlertApi {
    pub fn new(records: RecordApi<Alert>) -> Self {
        Self { records }
    }

    pub fn list(&self) -> ApiResult<Vec<Alert>> {
        self.records.list()
    }

    /// 按状态筛选
    pub fn list_by_status(&self, status: AlertStatus) -> ApiResult<Vec<Alert>> {
        Ok(self
            .records
            .list()?
            .into_iter()
            .filter(|a| a.status == status)
            .collect())
    }

    pub fn get(&self, id: i64) -> ApiResult<Alert> {
        self.records.get(id)
    }

    /// 登记告警（状态强制为 active）
    pub fn raise(&self, mut alert: Alert) -> ApiResult<Alert> {
        alert.status = AlertStatus::Active;
        alert.resolution = None;
        alert.duration = None;
        self.records.create(alert)
    }

    pub fn delete(&self, id: i64) -> ApiResult<Alert> {
        self.records.delete(id)
    }

    /// 确认告警
    pub fn acknowledge(&self, id: i64) -> ApiResult<Alert> {
        let mut alert = self.records.get(id)?;
        ensure_transition(&alert, AlertStatus::Acknowledged)?;
        alert.status = AlertStatus::Acknowledged;
        self.records.update(alert)
    }

    /// 处理告警
    ///
    /// # 参数
    /// - notes: 处理说明，为空时写入 "Manually resolved at <时间>"
    /// - at: 处理时间，用于计算持续时长
    pub fn resolve(&self, id: i64, notes: Option<&str>, at: NaiveDateTime) -> ApiResult<Alert> {
        let mut alert = self.records.get(id)?;
        ensure_transition(&alert, AlertStatus::Resolved)?;

        let resolution = match notes.map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => manual_resolution_note(at),
        };
        alert.status = AlertStatus::Resolved;
        alert.resolution = Some(resolution);
        alert.duration = Some(format_duration(alert.timestamp, at));

        let alert = self.records.update(alert)?;
        tracing::info!(alert_id = alert.id, alert_type = %alert.alert_type, "告警已处理");
        Ok(alert)
    }

    pub fn stats(&self) -> ApiResult<AlertStats> {
        let alerts = self.records.list()?;
        let open = |severity: AlertSeverity| {
            alerts
                .iter()
                .filter(|a| a.status != AlertStatus::Resolved && a.severity == severity)
                .count()
        };

        Ok(AlertStats {
            critical: open(AlertSeverity::Critical),
            warning: open(AlertSeverity::Warning),
            info: open(AlertSeverity::Info),
            acknowledged: alerts
                .iter()
                .filter(|a| a.status == AlertStatus::Acknowledged)
                .count(),
            resolved: alerts
                .iter()
                .filter(|a| a.status == AlertStatus::Resolved)
                .count(),
        })
    }

    pub fn records(&self) -> &RecordApi<Alert> {
        &self.records
    }
}

fn ensure_transition(alert: &Alert, target: AlertStatus) -> ApiResult<()> {
    if alert.can_transition_to(target) {
        Ok(())
    } else {
        Err(ApiError::InvalidStateTransition {
            from: alert.status.to_string(),
            to: target.to_string(),
        })
    }
}

/// 持续时长，如 "2h 15m"；处理时间早于告警时间按 0 计
fn format_duration(from: NaiveDateTime, to: NaiveDateTime) -> String {
    let minutes = (to - from).num_minutes().max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}
