//! redb-based entity store
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `collections` | slot name | JSON array | 四个集合各占一个槽位 |
//!
//! 槽位：`accounts` / `departments` / `employees` / `workflows`。
//! 启动时整体加载，每次变更后整体重写 —— 记录从不部分持久化。
//!
//! # 并发
//!
//! 内存集合由单把 `tokio::sync::Mutex` 保护：同一时刻只有一个请求
//! 在 读取 → 变更 → 落盘 的临界区内，变更总是在响应延迟之前完成。

mod projection;

pub use projection::{project_account, project_department, project_employee};

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};

use shared::models::{Account, Department, Employee, Workflow};

/// Table holding one durable slot per collection: key = slot name,
/// value = JSON-serialized ordered sequence of records
const COLLECTIONS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("collections");

const ACCOUNTS_SLOT: &str = "accounts";
const DEPARTMENTS_SLOT: &str = "departments";
const EMPLOYEES_SLOT: &str = "employees";
const WORKFLOWS_SLOT: &str = "workflows";

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// 内存中的四个集合
///
/// 新 id 的分配规则统一为 `max(existing) + 1`（空集合从 1 开始）。
#[derive(Debug, Default)]
pub struct Collections {
    pub accounts: Vec<Account>,
    pub departments: Vec<Department>,
    pub employees: Vec<Employee>,
    pub workflows: Vec<Workflow>,
}

impl Collections {
    pub fn next_account_id(&self) -> i64 {
        self.accounts.iter().map(|a| a.id).max().unwrap_or(0) + 1
    }

    pub fn next_department_id(&self) -> i64 {
        self.departments.iter().map(|d| d.id).max().unwrap_or(0) + 1
    }

    /// 员工记录 id 是字符串类型，数值部分按同样的规则递增
    pub fn next_employee_id(&self) -> i64 {
        self.employees
            .iter()
            .filter_map(|e| e.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0)
            + 1
    }

    pub fn next_workflow_id(&self) -> i64 {
        self.workflows.iter().map(|w| w.id).max().unwrap_or(0) + 1
    }

    pub fn account_by_id(&self, id: i64) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn department_by_id(&self, id: i64) -> Option<&Department> {
        self.departments.iter().find(|d| d.id == id)
    }

    pub fn employee_by_id(&self, id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }
}

/// Entity store backed by redb
///
/// 打开时把四个槽位整体读入内存；每个变更操作在持有锁的情况下
/// 改写内存集合并同步落盘对应槽位。
pub struct EntityStore {
    db: Arc<Database>,
    collections: Mutex<Collections>,
}

impl EntityStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        Self::from_database(db)
    }

    /// Open an in-memory database (tests and ephemeral simulations)
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::from_database(db)
    }

    fn from_database(db: Database) -> StoreResult<Self> {
        // Create the table up front so loads never race a missing table
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(COLLECTIONS_TABLE)?;
        }
        write_txn.commit()?;

        let collections = Self::load(&db)?;
        tracing::debug!(
            accounts = collections.accounts.len(),
            departments = collections.departments.len(),
            employees = collections.employees.len(),
            workflows = collections.workflows.len(),
            "entity store loaded"
        );

        Ok(Self {
            db: Arc::new(db),
            collections: Mutex::new(collections),
        })
    }

    /// 整体加载四个槽位；缺失的槽位视为空集合
    fn load(db: &Database) -> StoreResult<Collections> {
        Ok(Collections {
            accounts: Self::load_slot(db, ACCOUNTS_SLOT)?,
            departments: Self::load_slot(db, DEPARTMENTS_SLOT)?,
            employees: Self::load_slot(db, EMPLOYEES_SLOT)?,
            workflows: Self::load_slot(db, WORKFLOWS_SLOT)?,
        })
    }

    fn load_slot<T: DeserializeOwned>(db: &Database, slot: &str) -> StoreResult<Vec<T>> {
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(COLLECTIONS_TABLE)?;

        match table.get(slot)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Ok(Vec::new()),
        }
    }

    fn flush_slot<T: Serialize>(&self, slot: &str, records: &[T]) -> StoreResult<()> {
        let value = serde_json::to_vec(records)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(COLLECTIONS_TABLE)?;
            table.insert(slot, value.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// 获取集合的独占访问权
    ///
    /// 调用方在同一个临界区内完成变更与落盘。
    pub async fn lock(&self) -> MutexGuard<'_, Collections> {
        self.collections.lock().await
    }

    // ========== Flush Operations ==========

    pub fn flush_accounts(&self, accounts: &[Account]) -> StoreResult<()> {
        self.flush_slot(ACCOUNTS_SLOT, accounts)
    }

    pub fn flush_departments(&self, departments: &[Department]) -> StoreResult<()> {
        self.flush_slot(DEPARTMENTS_SLOT, departments)
    }

    pub fn flush_employees(&self, employees: &[Employee]) -> StoreResult<()> {
        self.flush_slot(EMPLOYEES_SLOT, employees)
    }

    pub fn flush_workflows(&self, workflows: &[Workflow]) -> StoreResult<()> {
        self.flush_slot(WORKFLOWS_SLOT, workflows)
    }
}
