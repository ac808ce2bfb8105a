// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::NaiveDate;

use hatchery_ops::domain::types::{HatchStatus, SaleStatus};
use hatchery_ops::domain::{
    EggCollection, HatchingRecord, IncubationBatch, LockdownBatch, SaleRecord,
};

use super::api_test_helper::date;

// ==========================================
// EggCollection 构建器
// ==========================================

pub struct CollectionBuilder {
    record: EggCollection,
}

impl CollectionBuilder {
    pub fn new(farmer_name: &str) -> Self {
        let mut record = EggCollection::blank(date(2023, 10, 15));
        record.farmer_name = farmer_name.to_string();
        record.label = "I".to_string();
        record.type_of_eggs = "Broiler".to_string();
        Self { record }
    }

    pub fn eggs_type(mut self, type_of_eggs: &str) -> Self {
        self.record.type_of_eggs = type_of_eggs.to_string();
        self
    }

    pub fn trays(mut self, full: i64, unfull: i64, unfull_count: i64) -> Self {
        self.record.full_trays = full;
        self.record.unfull_trays = unfull;
        self.record.unfull_tray_count = unfull_count;
        self
    }

    pub fn damaged(mut self, damaged: i64) -> Self {
        self.record.damaged_eggs = damaged;
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.record.date = date;
        self
    }

    pub fn build(self) -> EggCollection {
        self.record
    }
}

// ==========================================
// HatchingRecord 构建器
// ==========================================

pub struct HatchingBuilder {
    record: HatchingRecord,
}

impl HatchingBuilder {
    pub fn new(batch_id: &str) -> Self {
        let mut record = HatchingRecord::blank(date(2023, 11, 5));
        record.batch_id = batch_id.to_string();
        record.type_of_chicks = "Broiler".to_string();
        Self { record }
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.record.quantity = quantity;
        self
    }

    pub fn hatched(mut self, hatched: i64) -> Self {
        self.record.hatched_eggs = hatched;
        self
    }

    /// 未出雏、淘汰、死雏
    pub fn losses(mut self, unhatched: i64, cull: i64, dead: i64) -> Self {
        self.record.unhatched_eggs = unhatched;
        self.record.cull_chicks = cull;
        self.record.dead_chicks = dead;
        self
    }

    pub fn completed(mut self) -> Self {
        self.record.status = HatchStatus::Completed;
        self
    }

    pub fn build(self) -> HatchingRecord {
        self.record
    }
}

// ==========================================
// SaleRecord 构建器
// ==========================================

pub struct SaleBuilder {
    record: SaleRecord,
}

impl SaleBuilder {
    pub fn new(invoice_number: &str) -> Self {
        let mut record = SaleRecord::blank(date(2023, 11, 10));
        record.invoice_number = invoice_number.to_string();
        record.customer = "Nakato Poultry".to_string();
        record.product_type = "Day-old chicks".to_string();
        Self { record }
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.record.quantity = quantity;
        self
    }

    pub fn unit_price(mut self, unit_price: f64) -> Self {
        self.record.unit_price = unit_price;
        self
    }

    pub fn paid(mut self, paid: f64) -> Self {
        self.record.paid = paid;
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.record.date = date;
        self
    }

    pub fn status(mut self, status: SaleStatus) -> Self {
        self.record.status = status;
        self
    }

    pub fn build(self) -> SaleRecord {
        self.record
    }
}

// ==========================================
// IncubationBatch 构建器
// ==========================================

pub struct IncubationBuilder {
    record: IncubationBatch,
}

impl IncubationBuilder {
    pub fn new(batch_id: &str) -> Self {
        let mut record = IncubationBatch::blank(date(2023, 10, 16));
        record.batch_id = batch_id.to_string();
        record.breed = "Kuroiler".to_string();
        record.temperature = 37.5;
        record.humidity = 55.0;
        Self { record }
    }

    pub fn breed(mut self, breed: &str) -> Self {
        self.record.breed = breed.to_string();
        self
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.record.quantity = quantity;
        self
    }

    pub fn day(mut self, day_number: i64) -> Self {
        self.record.day_number = day_number;
        self
    }

    pub fn start(mut self, start_date: NaiveDate) -> Self {
        self.record.start_date = start_date;
        self
    }

    pub fn build(self) -> IncubationBatch {
        self.record
    }
}

// ==========================================
// LockdownBatch 构建器
// ==========================================

pub struct LockdownBuilder {
    record: LockdownBatch,
}

impl LockdownBuilder {
    pub fn new(batch_id: &str) -> Self {
        let mut record = LockdownBatch::blank(date(2023, 10, 16));
        record.batch_id = batch_id.to_string();
        record.lockdown_date = date(2023, 11, 3);
        record.incubator_id = "INC-01".to_string();
        record.quantity = 1000;
        Self { record }
    }

    pub fn day(mut self, day: i64) -> Self {
        self.record.day = day;
        self
    }

    pub fn transferred_to(mut self, hatcher_id: &str) -> Self {
        self.record.transferred_to = Some(hatcher_id.to_string());
        self.record.transfer_date = Some(date(2023, 11, 3));
        self
    }

    pub fn build(self) -> LockdownBatch {
        self.record
    }
}
