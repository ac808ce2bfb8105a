// ==========================================
// 孵化场生产管理系统 - 记录仓储
// ==========================================
// 红线: Repository 不含业务逻辑（派生字段、台账由 API 层维护）
// 存储: 进程内 BTreeMap，按 id 升序，进程退出即丢失
// ==========================================

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::container::StageRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};

// ==========================================
// Trait: RecordStore
// ==========================================

/// 单阶段记录仓储
///
/// 读操作返回快照（克隆），调用方修改快照不影响存储
pub trait RecordStore<R: StageRecord>: Send + Sync {
    /// 全部记录，按 id 升序
    fn list(&self) -> RepositoryResult<Vec<R>>;

    fn find_by_id(&self, id: i64) -> RepositoryResult<Option<R>>;

    /// 下一个可用 id = 最大 id + 1，空集合为 1
    fn next_id(&self) -> RepositoryResult<i64>;

    /// 插入记录；id ≤ 0 时分配新 id，返回落库后的记录
    fn insert(&self, record: R) -> RepositoryResult<R>;

    /// 按 id 整条替换
    fn replace(&self, record: R) -> RepositoryResult<()>;

    /// 按 id 删除，返回被删除的记录
    fn delete(&self, id: i64) -> RepositoryResult<R>;

    /// 整表替换（台账重算后回写）
    fn replace_all(&self, records: Vec<R>) -> RepositoryResult<()>;

    fn count(&self) -> RepositoryResult<usize> {
        Ok(self.list()?.len())
    }
}

// ==========================================
// InMemoryStore
// ==========================================

/// 内存仓储
pub struct InMemoryStore<R: StageRecord> {
    records: Mutex<BTreeMap<i64, R>>,
}

impl<R: StageRecord> Default for InMemoryStore<R> {
    fn default() -> Self {
        Self {
            records: Mutex::new(BTreeMap::new()),
        }
    }
}

impl<R: StageRecord> InMemoryStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取存储锁
    fn get_records(&self) -> RepositoryResult<MutexGuard<'_, BTreeMap<i64, R>>> {
        self.records
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn not_found(id: i64) -> RepositoryError {
        RepositoryError::NotFound {
            entity: R::STAGE.to_string(),
            id: id.to_string(),
        }
    }
}

impl<R: StageRecord> RecordStore<R> for InMemoryStore<R> {
    fn list(&self) -> RepositoryResult<Vec<R>> {
        let records = self.get_records()?;
        Ok(records.values().cloned().collect())
    }

    fn find_by_id(&self, id: i64) -> RepositoryResult<Option<R>> {
        let records = self.get_records()?;
        Ok(records.get(&id).cloned())
    }

    fn next_id(&self) -> RepositoryResult<i64> {
        let records = self.get_records()?;
        Ok(records.keys().next_back().map(|max| max + 1).unwrap_or(1))
    }

    fn insert(&self, mut record: R) -> RepositoryResult<R> {
        let mut records = self.get_records()?;
        if record.id() <= 0 {
            let id = records.keys().next_back().map(|max| max + 1).unwrap_or(1);
            record.set_id(id);
        } else if records.contains_key(&record.id()) {
            return Err(RepositoryError::UniqueConstraintViolation(format!(
                "{} id={} 已存在",
                R::STAGE,
                record.id()
            )));
        }
        records.insert(record.id(), record.clone());
        Ok(record)
    }

    fn replace(&self, record: R) -> RepositoryResult<()> {
        let mut records = self.get_records()?;
        match records.get_mut(&record.id()) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(Self::not_found(record.id())),
        }
    }

    fn delete(&self, id: i64) -> RepositoryResult<R> {
        let mut records = self.get_records()?;
        records.remove(&id).ok_or_else(|| Self::not_found(id))
    }

    fn replace_all(&self, new_records: Vec<R>) -> RepositoryResult<()> {
        let mut records = self.get_records()?;
        records.clear();
        for record in new_records {
            records.insert(record.id(), record);
        }
        Ok(())
    }

    fn count(&self) -> RepositoryResult<usize> {
        Ok(self.get_records()?.len())
    }
}
