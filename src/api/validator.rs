// ==========================================
// 孵化场生产管理系统 - 记录校验器
// ==========================================
// 职责: 落库前的统一校验
// - 必填/非负字段违规: 任何模式下都拒绝
// - 派生总数为负: Strict 拒绝，Permissive 记录警告后放行
// - 未满容器数量 ≥ 容器容量: 仅警告
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::container::{id_of, StageRecord};
use crate::domain::types::ValidationViolation;
use crate::i18n::t_with_args;

// ==========================================
// ValidationMode - 校验模式
// ==========================================

/// 校验模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationMode {
    /// 严格模式：派生总数为负时拒绝保存
    #[default]
    Strict,
    /// 宽松模式：记录警告但允许保存
    Permissive,
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationMode::Strict => write!(f, "STRICT"),
            ValidationMode::Permissive => write!(f, "PERMISSIVE"),
        }
    }
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "STRICT" => Ok(ValidationMode::Strict),
            "PERMISSIVE" => Ok(ValidationMode::Permissive),
            other => Err(format!("未知校验模式: {}", other)),
        }
    }
}

// ==========================================
// 校验入口
// ==========================================

/// 校验待保存记录
///
/// # 返回
/// - Ok(warnings): 可以保存，附带放行的警告
/// - Err(ApiError::ValidationFailed): 拒绝保存
pub fn validate_record<R: StageRecord>(
    record: &R,
    mode: ValidationMode,
) -> ApiResult<Vec<ValidationViolation>> {
    let violations = record.validate();
    if !violations.is_empty() {
        return Err(ApiError::validation(violations));
    }

    let mut warnings = Vec::new();

    if let Some((field, total)) = record.derived_total() {
        if total < 0 {
            let violation = ValidationViolation::new(
                field,
                id_of(record.id()),
                t_with_args(
                    "validation.negative_total",
                    &[("field", field), ("value", &total.to_string())],
                ),
            );
            match mode {
                ValidationMode::Strict => {
                    return Err(ApiError::validation(vec![violation]));
                }
                ValidationMode::Permissive => {
                    // Permissive模式下，记录警告但允许保存
                    tracing::warn!(
                        stage = %R::STAGE,
                        record_id = record.id(),
                        field,
                        total,
                        "Permissive模式: 派生总数为负，仍然保存"
                    );
                    warnings.push(violation);
                }
            }
        }
    }

    if let Some((count, capacity)) = record.partial_fill() {
        if capacity > 0 && count >= capacity {
            tracing::warn!(
                stage = %R::STAGE,
                record_id = record.id(),
                count,
                capacity,
                "未满容器数量不小于容器容量"
            );
            warnings.push(ValidationViolation::new(
                "partialContainerUnitCount",
                id_of(record.id()),
                t_with_args(
                    "validation.partial_overflow",
                    &[("value", &count.to_string()), ("capacity", &capacity.to_string())],
                ),
            ));
        }
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::collection::EggCollection;
    use chrono::NaiveDate;

    fn collection(full: i64, count: i64, damaged: i64) -> EggCollection {
        let mut e = EggCollection::blank(NaiveDate::from_ymd_opt(2023, 10, 15).unwrap());
        e.farmer_name = "Kikulwe".to_string();
        e.label = "I".to_string();
        e.type_of_eggs = "Layer eggs".to_string();
        e.full_trays = full;
        e.unfull_trays = if count > 0 { 1 } else { 0 };
        e.unfull_tray_count = count;
        e.damaged_eggs = damaged;
        e.refresh_derived();
        e
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("strict".parse::<ValidationMode>(), Ok(ValidationMode::Strict));
        assert_eq!(" Permissive ".parse::<ValidationMode>(), Ok(ValidationMode::Permissive));
        assert!("autofix".parse::<ValidationMode>().is_err());
        assert_eq!(ValidationMode::default(), ValidationMode::Strict);
    }

    #[test]
    fn test_negative_total_by_mode() {
        let record = collection(0, 5, 12);
        assert_eq!(record.total_eggs, -7);

        let err = validate_record(&record, ValidationMode::Strict).unwrap_err();
        assert_eq!(err.violations()[0].field, "totalEggs");

        let warnings = validate_record(&record, ValidationMode::Permissive).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "totalEggs");
    }

    #[test]
    fn test_required_fields_rejected_in_any_mode() {
        let mut record = collection(1, 0, 0);
        record.farmer_name.clear();
        assert!(validate_record(&record, ValidationMode::Permissive).is_err());
    }

    #[test]
    fn test_partial_overflow_is_warning_only() {
        let record = collection(2, 31, 0);
        let warnings = validate_record(&record, ValidationMode::Strict).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "partialContainerUnitCount");
    }
}
