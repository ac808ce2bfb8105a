// ==========================================
// 孵化场生产管理系统 - 生产指标
// ==========================================
// 职责: 受精率、出雏率、孵化进度、金额等比率类计算
// ==========================================

/// 百分比，分母为 0 时返回 0
pub fn percentage(numerator: i64, denominator: i64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64 * 100.0
}

/// 保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 受精率 = 受精蛋 / (受精蛋 + 无精蛋) × 100
pub fn fertility_rate(fertile: i64, clear: i64) -> f64 {
    percentage(fertile, fertile + clear)
}

/// 单批出雏率 = 出雏数 / 入孵数 × 100
pub fn hatch_rate(hatched: i64, quantity: i64) -> f64 {
    percentage(hatched, quantity)
}

/// 平均值，空序列返回 0
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// 孵化进度 = min(天数 / 孵化周期 × 100, 100)
pub fn incubation_progress(day_number: i64, incubation_days: i64) -> f64 {
    if incubation_days <= 0 {
        return 0.0;
    }
    percentage(day_number, incubation_days).clamp(0.0, 100.0)
}

/// 金额 = 数量 × 单价，按分取整
pub fn line_amount(quantity: i64, unit_price: f64) -> f64 {
    round2(quantity as f64 * unit_price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_zero_denominator() {
        assert_eq!(percentage(5, 0), 0.0);
        assert_eq!(fertility_rate(0, 0), 0.0);
    }

    #[test]
    fn test_fertility_rate() {
        assert!((fertility_rate(900, 100) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_incubation_progress_is_capped() {
        assert!((incubation_progress(7, 21) - 33.333).abs() < 0.01);
        assert_eq!(incubation_progress(25, 21), 100.0);
        assert_eq!(incubation_progress(3, 0), 0.0);
    }

    #[test]
    fn test_line_amount_rounds_to_cents() {
        assert_eq!(line_amount(182, 1.2), 218.4);
        assert_eq!(line_amount(320, 2.45), 784.0);
    }

    #[test]
    fn test_average() {
        assert_eq!(average(&[]), 0.0);
        assert_eq!(average(&[80.0, 90.0]), 85.0);
    }
}
