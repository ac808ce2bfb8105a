// ==========================================
// 告警 / 销售 API 集成测试
// ==========================================
// 测试范围:
// 1. 告警状态流转: 确认、处理、终态
// 2. 销售金额与欠款、发票号唯一、取消后不计入统计
// ==========================================

mod helpers;

use helpers::api_test_helper::*;
use helpers::test_data_builder::*;

use hatchery_ops::api::ApiError;
use hatchery_ops::domain::types::{AlertSeverity, AlertStatus, SaleStatus};
use hatchery_ops::domain::Alert;

// ==========================================
// 告警
// ==========================================

fn raise(env: &ApiTestEnv, severity: AlertSeverity) -> Alert {
    let mut alert = Alert::new("temperature", severity, datetime(2023, 10, 20, 8, 0));
    alert.source = "Incubator 3".to_string();
    alert.value = "38.9".to_string();
    alert.threshold = "38.0".to_string();
    alert.message = "Temperature above threshold".to_string();
    env.alert_api.raise(alert).expect("登记失败")
}

#[test]
fn test_alert_确认后处理() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let alert = raise(&env, AlertSeverity::Critical);
    assert_eq!(alert.status, AlertStatus::Active);

    let acknowledged = env.alert_api.acknowledge(alert.id).expect("确认失败");
    assert_eq!(acknowledged.status, AlertStatus::Acknowledged);

    let resolved = env
        .alert_api
        .resolve(alert.id, Some("Vent opened"), datetime(2023, 10, 20, 10, 15))
        .expect("处理失败");
    assert_eq!(resolved.status, AlertStatus::Resolved);
    assert_eq!(resolved.resolution.as_deref(), Some("Vent opened"));
    assert_eq!(resolved.duration.as_deref(), Some("2h 15m"));
}

#[test]
fn test_alert_无说明时写入默认文案() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let alert = raise(&env, AlertSeverity::Warning);

    let resolved = env
        .alert_api
        .resolve(alert.id, Some("   "), datetime(2023, 10, 20, 8, 45))
        .expect("处理失败");
    assert_eq!(
        resolved.resolution.as_deref(),
        Some("Manually resolved at 2023-10-20 08:45:00")
    );
    assert_eq!(resolved.duration.as_deref(), Some("0h 45m"));
}

#[test]
fn test_alert_已处理为终态() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let alert = raise(&env, AlertSeverity::Info);
    env.alert_api
        .resolve(alert.id, None, datetime(2023, 10, 20, 9, 0))
        .unwrap();

    let err = env
        .alert_api
        .resolve(alert.id, None, datetime(2023, 10, 20, 9, 30))
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidStateTransition { .. }));

    let err = env.alert_api.acknowledge(alert.id).unwrap_err();
    assert!(matches!(err, ApiError::InvalidStateTransition { .. }));
}

#[test]
fn test_alert_stats() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let critical = raise(&env, AlertSeverity::Critical);
    raise(&env, AlertSeverity::Critical);
    let warning = raise(&env, AlertSeverity::Warning);
    raise(&env, AlertSeverity::Info);

    env.alert_api.acknowledge(critical.id).unwrap();
    env.alert_api
        .resolve(warning.id, None, datetime(2023, 10, 20, 9, 0))
        .unwrap();

    let stats = env.alert_api.stats().unwrap();
    assert_eq!(stats.critical, 2);
    assert_eq!(stats.warning, 0);
    assert_eq!(stats.info, 1);
    assert_eq!(stats.acknowledged, 1);
    assert_eq!(stats.resolved, 1);

    let active = env.alert_api.list_by_status(AlertStatus::Active).unwrap();
    assert_eq!(active.len(), 2);
}

// ==========================================
// 销售
// ==========================================

#[test]
fn test_sale_金额与欠款() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let sale = env
        .sales_api
        .create(
            SaleBuilder::new("INV-001")
                .quantity(500)
                .unit_price(1.25)
                .paid(400.0)
                .build(),
        )
        .expect("创建失败");

    assert_eq!(sale.total_amount, 625.0);
    assert_eq!(sale.balance, 225.0);
}

#[test]
fn test_sale_发票号唯一() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    env.sales_api
        .create(SaleBuilder::new("INV-001").quantity(10).unit_price(2.0).build())
        .unwrap();
    let err = env
        .sales_api
        .create(SaleBuilder::new("INV-001").quantity(20).unit_price(2.0).build())
        .unwrap_err();
    assert!(matches!(err, ApiError::BusinessRuleViolation(_)));

    // 修改自身不算重复
    let mut own = env.sales_api.get(1).unwrap();
    own.paid = 20.0;
    let own = env.sales_api.update(own).expect("修改失败");
    assert_eq!(own.balance, 0.0);
}

#[test]
fn test_sale_stats_不含已取消() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    env.sales_api
        .create(
            SaleBuilder::new("INV-001")
                .quantity(500)
                .unit_price(1.25)
                .paid(400.0)
                .build(),
        )
        .unwrap();
    let second = env
        .sales_api
        .create(
            SaleBuilder::new("INV-002")
                .quantity(100)
                .unit_price(1.5)
                .paid(150.0)
                .status(SaleStatus::Completed)
                .build(),
        )
        .unwrap();
    let third = env
        .sales_api
        .create(SaleBuilder::new("INV-003").quantity(40).unit_price(2.0).build())
        .unwrap();

    env.sales_api.cancel(third.id).expect("取消失败");
    assert!(matches!(
        env.sales_api.cancel(second.id),
        Err(ApiError::InvalidStateTransition { .. })
    ));

    let stats = env.sales_api.stats().unwrap();
    assert_eq!(stats.sale_count, 2);
    assert_eq!(stats.pending_count, 1);
    assert_eq!(stats.chicks_sold, 600);
    assert_eq!(stats.total_revenue, 775.0);
    assert_eq!(stats.outstanding_balance, 225.0);
}
