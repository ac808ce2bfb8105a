// ==========================================
// 孵化场生产管理系统 - 各阶段表单字段映射
// ==========================================
// 字段名与序列化字段名 (camelCase) 保持一致
// ==========================================

use chrono::NaiveDate;

use crate::domain::candling::CandlingEntry;
use crate::domain::collection::EggCollection;
use crate::domain::container::id_of;
use crate::domain::hatching::HatchingRecord;
use crate::domain::sale::SaleRecord;
use crate::domain::setting::EggSetting;
use crate::domain::types::{HatchStatus, SaleStatus, ValidationViolation};
use crate::form::field::{invalid_option, FieldKind, FieldValue, FormRecord};
use crate::i18n::t_with_args;

fn date_of(field: &str, value: &FieldValue, record_id: i64) -> Result<NaiveDate, ValidationViolation> {
    value.as_date().ok_or_else(|| {
        ValidationViolation::new(
            field,
            id_of(record_id),
            t_with_args(
                "validation.invalid_date",
                &[("field", field), ("value", &value.as_text())],
            ),
        )
    })
}

fn unknown(field: &str, record_id: i64) -> ValidationViolation {
    ValidationViolation::new(
        field,
        id_of(record_id),
        t_with_args("validation.unknown_field", &[("field", field)]),
    )
}

// ==========================================
// 收蛋
// ==========================================
impl FormRecord for EggCollection {
    fn field_kind(field: &str) -> Option<FieldKind> {
        match field {
            "farmerName" | "label" | "animalType" | "typeOfEggs" => Some(FieldKind::Text),
            "fullTrays" | "unfullTrays" | "unfullTrayCount" | "damagedEggs" => {
                Some(FieldKind::Numeric)
            }
            "date" => Some(FieldKind::Date),
            _ => None,
        }
    }

    fn apply_field(&mut self, field: &str, value: FieldValue) -> Result<(), ValidationViolation> {
        match field {
            "farmerName" => self.farmer_name = value.as_text(),
            "label" => self.label = value.as_text(),
            "animalType" => self.animal_type = value.as_text(),
            "typeOfEggs" => self.type_of_eggs = value.as_text(),
            "fullTrays" => self.full_trays = value.as_int(),
            "unfullTrays" => self.unfull_trays = value.as_int(),
            "unfullTrayCount" => self.unfull_tray_count = value.as_int(),
            "damagedEggs" => self.damaged_eggs = value.as_int(),
            "date" => self.date = date_of(field, &value, self.id)?,
            _ => return Err(unknown(field, self.id)),
        }
        Ok(())
    }
}

// ==========================================
// 上蛋（来源收蛋记录通过分配器选择，不走表单字段）
// ==========================================
impl FormRecord for EggSetting {
    fn field_kind(field: &str) -> Option<FieldKind> {
        match field {
            "batchId" | "typeOfEggs" | "notes" => Some(FieldKind::Text),
            "fullSetters" | "unfullSetters" | "unfullSetterEggs" | "dirtyEggs" | "damagedEggs" => {
                Some(FieldKind::Numeric)
            }
            "settingDate" => Some(FieldKind::Date),
            _ => None,
        }
    }

    fn apply_field(&mut self, field: &str, value: FieldValue) -> Result<(), ValidationViolation> {
        match field {
            "batchId" => self.batch_id = value.as_text(),
            "typeOfEggs" => self.type_of_eggs = value.as_text(),
            "notes" => self.notes = value.as_text(),
            "fullSetters" => self.full_setters = value.as_int(),
            "unfullSetters" => self.unfull_setters = value.as_int(),
            "unfullSetterEggs" => self.unfull_setter_eggs = value.as_int(),
            "dirtyEggs" => self.dirty_eggs = value.as_int(),
            "damagedEggs" => self.damaged_eggs = value.as_int(),
            "settingDate" => self.setting_date = date_of(field, &value, self.id)?,
            _ => return Err(unknown(field, self.id)),
        }
        Ok(())
    }
}

// ==========================================
// 照蛋
// ==========================================
impl FormRecord for CandlingEntry {
    fn field_kind(field: &str) -> Option<FieldKind> {
        match field {
            "batchId" | "label" => Some(FieldKind::Text),
            "day" | "fullSetters" | "unfullSetters" | "unfullSetterCount" => {
                Some(FieldKind::Numeric)
            }
            "date" => Some(FieldKind::Date),
            _ => None,
        }
    }

    fn apply_field(&mut self, field: &str, value: FieldValue) -> Result<(), ValidationViolation> {
        match field {
            "batchId" => self.batch_id = value.as_text(),
            "label" => self.label = value.as_text(),
            "day" => self.day = value.as_int(),
            "fullSetters" => self.full_setters = value.as_int(),
            "unfullSetters" => self.unfull_setters = value.as_int(),
            "unfullSetterCount" => self.unfull_setter_count = value.as_int(),
            "date" => self.date = date_of(field, &value, self.id)?,
            _ => return Err(unknown(field, self.id)),
        }
        Ok(())
    }
}

// ==========================================
// 出雏
// ==========================================
impl FormRecord for HatchingRecord {
    fn field_kind(field: &str) -> Option<FieldKind> {
        match field {
            "batchId" | "label" | "typeOfChicks" | "notes" => Some(FieldKind::Text),
            "quantity" | "hatchedEggs" | "unhatchedEggs" | "cullChicks" | "deadChicks" => {
                Some(FieldKind::Numeric)
            }
            "hatchDate" => Some(FieldKind::Date),
            "status" => Some(FieldKind::Enum),
            _ => None,
        }
    }

    fn apply_field(&mut self, field: &str, value: FieldValue) -> Result<(), ValidationViolation> {
        match field {
            "batchId" => self.batch_id = value.as_text(),
            "label" => self.label = value.as_text(),
            "typeOfChicks" => self.type_of_chicks = value.as_text(),
            "notes" => self.notes = value.as_text(),
            "quantity" => self.quantity = value.as_int(),
            "hatchedEggs" => self.hatched_eggs = value.as_int(),
            "unhatchedEggs" => self.unhatched_eggs = value.as_int(),
            "cullChicks" => self.cull_chicks = value.as_int(),
            "deadChicks" => self.dead_chicks = value.as_int(),
            "hatchDate" => self.hatch_date = date_of(field, &value, self.id)?,
            "status" => {
                let raw = value.as_text();
                self.status = raw
                    .parse::<HatchStatus>()
                    .map_err(|_| invalid_option(field, &raw, self.id))?;
            }
            _ => return Err(unknown(field, self.id)),
        }
        Ok(())
    }
}

// ==========================================
// 销售
// ==========================================
impl FormRecord for SaleRecord {
    fn field_kind(field: &str) -> Option<FieldKind> {
        match field {
            "invoiceNumber" | "batchId" | "customer" | "productType" | "paymentMethod"
            | "notes" => Some(FieldKind::Text),
            "quantity" => Some(FieldKind::Numeric),
            "unitPrice" | "paid" => Some(FieldKind::Decimal),
            "date" => Some(FieldKind::Date),
            "status" => Some(FieldKind::Enum),
            _ => None,
        }
    }

    fn apply_field(&mut self, field: &str, value: FieldValue) -> Result<(), ValidationViolation> {
        match field {
            "invoiceNumber" => self.invoice_number = value.as_text(),
            "batchId" => self.batch_id = value.as_text(),
            "customer" => self.customer = value.as_text(),
            "productType" => self.product_type = value.as_text(),
            "paymentMethod" => self.payment_method = value.as_text(),
            "notes" => self.notes = value.as_text(),
            "quantity" => self.quantity = value.as_int(),
            "unitPrice" => self.unit_price = value.as_decimal(),
            "paid" => self.paid = value.as_decimal(),
            "date" => self.date = date_of(field, &value, self.id)?,
            "status" => {
                let raw = value.as_text();
                self.status = raw
                    .parse::<SaleStatus>()
                    .map_err(|_| invalid_option(field, &raw, self.id))?;
            }
            _ => return Err(unknown(field, self.id)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 10, 15).unwrap()
    }

    #[test]
    fn test_collection_form_updates_total() {
        let mut c = EggCollection::blank(day());
        c.set_field("fullTrays", "34").unwrap();
        c.set_field("unfullTrays", "1").unwrap();
        c.set_field("unfullTrayCount", "22").unwrap();
        c.set_field("damagedEggs", "3").unwrap();
        assert_eq!(c.total_eggs, 1039);

        // 清空输入 → 0
        c.set_field("damagedEggs", "").unwrap();
        assert_eq!(c.damaged_eggs, 0);
        assert_eq!(c.total_eggs, 1042);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut c = EggCollection::blank(day());
        let err = c.set_field("colour", "brown").unwrap_err();
        assert_eq!(err.field, "colour");
    }

    #[test]
    fn test_hatching_status_enum() {
        let mut h = HatchingRecord::blank(day());
        h.set_field("status", "Completed").unwrap();
        assert_eq!(h.status, HatchStatus::Completed);
        assert!(h.set_field("status", "done").is_err());
        assert_eq!(h.status, HatchStatus::Completed);
    }

    #[test]
    fn test_sale_decimal_fields() {
        let mut s = SaleRecord::blank(day());
        s.set_field("quantity", "200").unwrap();
        s.set_field("unitPrice", "1.5").unwrap();
        s.set_field("paid", "abc").unwrap();
        assert_eq!(s.total_amount, 300.0);
        assert_eq!(s.balance, 300.0);
    }

    #[test]
    fn test_candling_date_field() {
        let mut e = CandlingEntry::blank(crate::domain::types::CandlingKind::Clear, day());
        e.set_field("date", "2023-10-20").unwrap();
        assert_eq!(e.date, NaiveDate::from_ymd_opt(2023, 10, 20).unwrap());
        assert!(e.set_field("date", "20-10-2023").is_err());
    }
}
