mod inmemory;
mod mysql;

pub use inmemory::InMemoryStore;
pub use mysql::MySqlStore;

use crate::{model::company::Company, utils::db_utils::MapperError};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("mapper error: {0}")]
    Mapper(#[from] MapperError),
    #[error("in-memory store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// How a raw salary statement reaches the database inside a unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPath {
    /// Positional statement executed directly on the transaction.
    RawSql,
    /// Named-parameter statement rewritten and bound by `db_utils`.
    Mapper,
}

/// Access to companies and their employees.
#[async_trait::async_trait]
pub trait CompanyStore: Send + Sync {
    /// Company row only, `employees` left empty.
    async fn find_company(&self, company_id: i32) -> StoreResult<Option<Company>>;

    /// Company with all of its employees, ordered by id.
    async fn find_company_with_employees(&self, company_id: i32) -> StoreResult<Option<Company>>;

    /// Persists the company timestamp and the salary of every loaded employee
    /// in one implicit transaction.
    async fn save_company(&self, company: &Company) -> StoreResult<()>;

    /// Single set-based `salary = salary * factor` update. Returns affected rows.
    async fn increase_salaries(&self, company_id: i32, factor: Decimal) -> StoreResult<u64>;

    /// Single set-based delete of employees earning strictly more than `threshold`.
    async fn delete_employees_above(
        &self,
        company_id: i32,
        threshold: Decimal,
    ) -> StoreResult<u64>;

    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>>;
}

/// A transaction shared by raw statements and company saves.
///
/// Dropping a unit of work without calling `commit` rolls it back.
#[async_trait::async_trait]
pub trait UnitOfWork: Send {
    async fn increase_salaries(
        &mut self,
        company_id: i32,
        factor: Decimal,
        path: ExecutionPath,
    ) -> StoreResult<u64>;

    /// Persists the company timestamp. Employees attached to `company` are ignored.
    async fn save_company(&mut self, company: &Company) -> StoreResult<()>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;
}
