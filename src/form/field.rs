// ==========================================
// 孵化场生产管理系统 - 表单字段
// ==========================================
// 职责: 表单原始输入 → 类型化字段值
// 规则:
// - 数值字段为空或非法时按 0 处理（与录入页面行为一致）
// - 数值字段超出 ±MAX_FIELD_VALUE 时截断到边界，交由校验拒绝
// - 日期字段格式 YYYY-MM-DD，非法时返回字段违规
// - 枚举字段去空格转小写后交由记录自行解析
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::container::{id_of, StageRecord, MAX_FIELD_VALUE};
use crate::domain::types::ValidationViolation;
use crate::i18n::t_with_args;

/// 日期输入格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ==========================================
// FieldKind / FieldValue
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Numeric,
    Decimal,
    Date,
    Enum,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum FieldValue {
    Numeric(i64),
    Decimal(f64),
    Date(NaiveDate),
    Enum(String),
    Text(String),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Numeric(_) => FieldKind::Numeric,
            FieldValue::Decimal(_) => FieldKind::Decimal,
            FieldValue::Date(_) => FieldKind::Date,
            FieldValue::Enum(_) => FieldKind::Enum,
            FieldValue::Text(_) => FieldKind::Text,
        }
    }

    pub fn as_int(&self) -> i64 {
        match self {
            FieldValue::Numeric(n) => *n,
            FieldValue::Decimal(d) => *d as i64,
            _ => 0,
        }
    }

    pub fn as_decimal(&self) -> f64 {
        match self {
            FieldValue::Numeric(n) => *n as f64,
            FieldValue::Decimal(d) => *d,
            _ => 0.0,
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Numeric(n) => n.to_string(),
            FieldValue::Decimal(d) => d.to_string(),
            FieldValue::Date(d) => d.format(DATE_FORMAT).to_string(),
            FieldValue::Enum(s) | FieldValue::Text(s) => s.clone(),
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

/// 整数输入：空白或非法 → 0，超限 → ±MAX_FIELD_VALUE
pub fn coerce_int(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0;
    }
    let value = match trimmed.parse::<i64>() {
        Ok(n) => n,
        Err(_) => match trimmed.parse::<f64>() {
            Ok(d) if d.is_finite() => {
                d.trunc().clamp(-MAX_FIELD_VALUE as f64, MAX_FIELD_VALUE as f64) as i64
            }
            _ => {
                tracing::debug!(raw = %raw, "数值输入非法，按 0 处理");
                return 0;
            }
        },
    };
    let clamped = value.clamp(-MAX_FIELD_VALUE, MAX_FIELD_VALUE);
    if clamped != value {
        tracing::debug!(raw = %raw, max = MAX_FIELD_VALUE, "数值输入超限，截断到上限");
    }
    clamped
}

/// 小数输入：空白或非法 → 0.0
pub fn coerce_decimal(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(d) if d.is_finite() => d,
        _ => 0.0,
    }
}

/// 解析原始输入
pub fn parse_field(
    kind: FieldKind,
    field: &str,
    raw: &str,
    record_id: i64,
) -> Result<FieldValue, ValidationViolation> {
    match kind {
        FieldKind::Numeric => Ok(FieldValue::Numeric(coerce_int(raw))),
        FieldKind::Decimal => Ok(FieldValue::Decimal(coerce_decimal(raw))),
        FieldKind::Date => NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
            .map(FieldValue::Date)
            .map_err(|_| {
                ValidationViolation::new(
                    field,
                    id_of(record_id),
                    t_with_args("validation.invalid_date", &[("field", field), ("value", raw)]),
                )
            }),
        FieldKind::Enum => Ok(FieldValue::Enum(raw.trim().to_lowercase())),
        FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
    }
}

/// 枚举取值非法
pub(crate) fn invalid_option(field: &str, value: &str, record_id: i64) -> ValidationViolation {
    ValidationViolation::new(
        field,
        id_of(record_id),
        t_with_args("validation.invalid_option", &[("field", field), ("value", value)]),
    )
}

// ==========================================
// Trait: FormRecord - 可由表单编辑的记录
// ==========================================

pub trait FormRecord: StageRecord {
    /// 字段类型，未知字段返回 None
    fn field_kind(field: &str) -> Option<FieldKind>;

    /// 写入已解析的字段值（不刷新派生字段）
    fn apply_field(&mut self, field: &str, value: FieldValue) -> Result<(), ValidationViolation>;

    /// 原始输入 → 解析 → 写入 → 刷新派生字段
    fn set_field(&mut self, field: &str, raw: &str) -> Result<(), ValidationViolation> {
        let kind = Self::field_kind(field).ok_or_else(|| {
            ValidationViolation::new(
                field,
                id_of(self.id()),
                t_with_args("validation.unknown_field", &[("field", field)]),
            )
        })?;
        let value = parse_field(kind, field, raw, self.id())?;
        self.apply_field(field, value)?;
        self.refresh_derived();
        Ok(())
    }
}
