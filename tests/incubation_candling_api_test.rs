// ==========================================
// 孵化 / 落盘 / 照蛋 API 集成测试
// ==========================================
// 测试范围:
// 1. 孵化批次: 预计出雏日推算、孵化进度封顶
// 2. 落盘批次: 待转移列表、转入出雏器
// 3. 照蛋: 按类型列表、从上蛋记录带出批次号
// ==========================================

mod helpers;

use std::sync::Arc;

use helpers::api_test_helper::*;
use helpers::test_data_builder::*;

use hatchery_ops::api::{ApiError, IncubationApi, IncubationSchedule, RecordApi, ValidationMode};
use hatchery_ops::domain::types::CandlingKind;
use hatchery_ops::domain::{IncubationBatch, LockdownBatch};
use hatchery_ops::engine::events::NoOpEventPublisher;
use hatchery_ops::repository::InMemoryStore;

// ==========================================
// 孵化批次
// ==========================================

#[test]
fn test_create_incubation_推算预计出雏日() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let saved = env
        .incubation_api
        .create_incubation(IncubationBuilder::new("B9201").quantity(1065).build())
        .expect("创建失败");
    assert_eq!(saved.expected_hatch_date, Some(date(2023, 11, 6)));

    // 已填写的预计出雏日保持不变
    let mut manual = IncubationBuilder::new("B9202").quantity(500).build();
    manual.expected_hatch_date = Some(date(2023, 11, 8));
    let manual = env.incubation_api.create_incubation(manual).unwrap();
    assert_eq!(manual.expected_hatch_date, Some(date(2023, 11, 8)));
}

#[test]
fn test_create_incubation_品种必填() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let err = env
        .incubation_api
        .create_incubation(IncubationBuilder::new("B9201").breed(" ").quantity(10).build())
        .unwrap_err();
    assert!(err.violations().iter().any(|v| v.field == "breed"));
}

#[test]
fn test_create_incubation_日期越界() {
    let api = IncubationApi::new(
        RecordApi::new(
            Arc::new(InMemoryStore::<IncubationBatch>::new()),
            Arc::new(NoOpEventPublisher),
            ValidationMode::Strict,
        ),
        RecordApi::new(
            Arc::new(InMemoryStore::<LockdownBatch>::new()),
            Arc::new(NoOpEventPublisher),
            ValidationMode::Strict,
        ),
        IncubationSchedule {
            incubation_days: i64::MAX,
            ..IncubationSchedule::default()
        },
    );

    let err = api
        .create_incubation(IncubationBuilder::new("B9201").quantity(10).build())
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
    assert!(api.list_incubation().unwrap().is_empty());
}

#[test]
fn test_progress_封顶100() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let day7 = env
        .incubation_api
        .create_incubation(IncubationBuilder::new("B9201").quantity(100).day(7).build())
        .unwrap();
    let day25 = env
        .incubation_api
        .create_incubation(IncubationBuilder::new("B9202").quantity(200).day(25).build())
        .unwrap();

    let progress = env.incubation_api.progress(day7.id).unwrap();
    assert!((progress - 33.33).abs() < 0.01);
    assert_eq!(env.incubation_api.progress(day25.id).unwrap(), 100.0);
    assert!(matches!(
        env.incubation_api.progress(99),
        Err(ApiError::NotFound(_))
    ));

    let stats = env.incubation_api.stats().unwrap();
    assert_eq!(stats.active_batches, 1);
    assert_eq!(stats.eggs_in_incubation, 300);
}

// ==========================================
// 落盘批次
// ==========================================

#[test]
fn test_pending_transfers_达到落盘日且未转移() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    for builder in [
        LockdownBuilder::new("L1").day(18),
        LockdownBuilder::new("L2").day(17),
        LockdownBuilder::new("L3").day(19).transferred_to("HAT-2"),
        LockdownBuilder::new("L4").day(20),
    ] {
        env.incubation_api
            .create_lockdown(builder.build())
            .expect("创建失败");
    }

    let pending: Vec<String> = env
        .incubation_api
        .pending_transfers()
        .unwrap()
        .into_iter()
        .map(|b| b.batch_id)
        .collect();
    assert_eq!(pending, vec!["L1".to_string(), "L4".to_string()]);
    assert_eq!(env.incubation_api.stats().unwrap().pending_transfers, 2);
}

#[test]
fn test_transfer_出雏日为转移日加偏移() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let batch = env
        .incubation_api
        .create_lockdown(LockdownBuilder::new("L1").day(18).build())
        .unwrap();

    let result = env
        .incubation_api
        .transfer(batch.id, " HAT-1 ", date(2023, 11, 3))
        .expect("转移失败");
    assert_eq!(result.hatch_date, date(2023, 11, 6));
    assert_eq!(result.batch.transferred_to.as_deref(), Some("HAT-1"));
    assert_eq!(result.batch.transfer_date, Some(date(2023, 11, 3)));
    assert!(env.incubation_api.pending_transfers().unwrap().is_empty());
}

#[test]
fn test_transfer_出雏器为空() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let batch = env
        .incubation_api
        .create_lockdown(LockdownBuilder::new("L1").day(18).build())
        .unwrap();

    let err = env
        .incubation_api
        .transfer(batch.id, "   ", date(2023, 11, 3))
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
    assert_eq!(env.incubation_api.pending_transfers().unwrap().len(), 1);
}

#[test]
fn test_transfer_出雏日越界时不转移() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let batch = env
        .incubation_api
        .create_lockdown(LockdownBuilder::new("L1").day(18).build())
        .unwrap();

    let err = env
        .incubation_api
        .transfer(batch.id, "HAT-1", chrono::NaiveDate::MAX)
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
    assert_eq!(env.incubation_api.pending_transfers().unwrap().len(), 1);
}

#[test]
fn test_transfer_已转移不可重复() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let batch = env
        .incubation_api
        .create_lockdown(LockdownBuilder::new("L1").day(18).build())
        .unwrap();
    env.incubation_api
        .transfer(batch.id, "HAT-1", date(2023, 11, 3))
        .unwrap();

    let err = env
        .incubation_api
        .transfer(batch.id, "HAT-2", date(2023, 11, 4))
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidStateTransition { .. }));

    let stored = env.incubation_api.list_lockdown().unwrap();
    assert_eq!(stored[0].transferred_to.as_deref(), Some("HAT-1"));
}

// ==========================================
// 照蛋
// ==========================================

#[test]
fn test_candling_按类型列表与带出批次号() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let collection = env
        .collection_api
        .create(CollectionBuilder::new("Kikulwe").trays(34, 1, 22).build())
        .unwrap();
    let mut setting = env.setting_api.blank(date(2023, 10, 16));
    setting.collection_ids = vec![collection.id];
    env.setting_api.apply_selection(&mut setting).unwrap();
    let setting = env.setting_api.create(setting).unwrap();

    let mut fertile = env
        .candling_api
        .blank(CandlingKind::Fertile, date(2023, 10, 23), Some(setting.id))
        .expect("带出批次号失败");
    assert_eq!(fertile.batch_id, setting.batch_id);
    assert_eq!(fertile.label, setting.batch_id);
    fertile.full_setters = 9;
    fertile.unfull_setters = 1;
    fertile.unfull_setter_count = 40;
    env.candling_api.create(fertile).expect("创建失败");

    let mut clear = env
        .candling_api
        .blank(CandlingKind::Clear, date(2023, 10, 23), Some(setting.id))
        .unwrap();
    clear.unfull_setters = 1;
    clear.unfull_setter_count = 51;
    env.candling_api.create(clear).expect("创建失败");

    let fertile_rows = env.candling_api.list(CandlingKind::Fertile).unwrap();
    assert_eq!(fertile_rows.len(), 1);
    assert_eq!(fertile_rows[0].total_eggs, 958);
    let clear_rows = env.candling_api.list(CandlingKind::Clear).unwrap();
    assert_eq!(clear_rows.len(), 1);
    assert_eq!(clear_rows[0].total_eggs, 51);

    assert!(matches!(
        env.candling_api.blank(CandlingKind::Clear, date(2023, 10, 23), Some(99)),
        Err(ApiError::NotFound(_))
    ));
}
