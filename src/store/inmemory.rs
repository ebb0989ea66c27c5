use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::{CompanyStore, ExecutionPath, StoreError, StoreResult, UnitOfWork};
use crate::model::{
    company::Company,
    employee::{Employee, to_column_scale},
};

#[derive(Debug, Default)]
struct Tables {
    companies: BTreeMap<i32, Option<DateTime<Utc>>>,
    employees: BTreeMap<i32, Employee>,
}

impl Tables {
    fn company(&self, company_id: i32) -> Option<Company> {
        self.companies.get(&company_id).map(|last| Company {
            id: company_id,
            last_salaries_update_utc: *last,
            employees: Vec::new(),
        })
    }

    fn employees_of(&self, company_id: i32) -> Vec<Employee> {
        self.employees
            .values()
            .filter(|e| e.company_id == company_id)
            .cloned()
            .collect()
    }

    fn set_timestamp(&mut self, company: &Company) {
        if let Some(stored) = self.companies.get_mut(&company.id) {
            if let Some(at) = company.last_salaries_update_utc {
                if stored.is_none_or(|previous| previous < at) {
                    *stored = Some(at);
                }
            }
        }
    }

    fn increase_salaries(&mut self, company_id: i32, factor: Decimal) -> u64 {
        let mut affected = 0;
        for employee in self.employees.values_mut() {
            if employee.company_id == company_id {
                employee.salary = to_column_scale(employee.salary * factor);
                affected += 1;
            }
        }
        affected
    }
}

/// `CompanyStore` kept in process memory.
///
/// Used by the test suite and by `STORE_BACKEND=memory`. A unit of work
/// records its writes and applies them on commit.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Company 1 earning 1000 and 2000, company 2 earning 3000.
    pub fn with_demo_data() -> StoreResult<Self> {
        let store = Self::new();
        store.insert_company(Company::new(1))?;
        store.insert_company(Company::new(2))?;
        store.insert_employee(Employee::new(1, 1, Decimal::new(1000, 0)))?;
        store.insert_employee(Employee::new(2, 1, Decimal::new(2000, 0)))?;
        store.insert_employee(Employee::new(3, 2, Decimal::new(3000, 0)))?;
        Ok(store)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Inserts or replaces a company row. Attached employees are ignored.
    pub fn insert_company(&self, company: Company) -> StoreResult<()> {
        self.lock()?
            .companies
            .insert(company.id, company.last_salaries_update_utc);
        Ok(())
    }

    /// Inserts or replaces an employee. The salary is rounded to column scale.
    pub fn insert_employee(&self, mut employee: Employee) -> StoreResult<()> {
        employee.salary = to_column_scale(employee.salary);
        self.lock()?.employees.insert(employee.id, employee);
        Ok(())
    }

    /// Every employee of every company, ordered by id.
    pub fn all_employees(&self) -> StoreResult<Vec<Employee>> {
        Ok(self.lock()?.employees.values().cloned().collect())
    }
}

#[async_trait::async_trait]
impl CompanyStore for InMemoryStore {
    async fn find_company(&self, company_id: i32) -> StoreResult<Option<Company>> {
        Ok(self.lock()?.company(company_id))
    }

    async fn find_company_with_employees(&self, company_id: i32) -> StoreResult<Option<Company>> {
        let tables = self.lock()?;
        Ok(tables.company(company_id).map(|mut company| {
            company.employees = tables.employees_of(company_id);
            company
        }))
    }

    async fn save_company(&self, company: &Company) -> StoreResult<()> {
        let mut tables = self.lock()?;
        tables.set_timestamp(company);
        for employee in &company.employees {
            if let Some(stored) = tables.employees.get_mut(&employee.id) {
                if stored.company_id == company.id {
                    stored.salary = to_column_scale(employee.salary);
                }
            }
        }
        Ok(())
    }

    async fn increase_salaries(&self, company_id: i32, factor: Decimal) -> StoreResult<u64> {
        Ok(self.lock()?.increase_salaries(company_id, factor))
    }

    async fn delete_employees_above(
        &self,
        company_id: i32,
        threshold: Decimal,
    ) -> StoreResult<u64> {
        let mut tables = self.lock()?;
        let before = tables.employees.len();
        tables
            .employees
            .retain(|_, e| !(e.company_id == company_id && e.salary > threshold));
        Ok((before - tables.employees.len()) as u64)
    }

    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>> {
        Ok(Box::new(InMemoryUnitOfWork {
            tables: Arc::clone(&self.tables),
            pending: Vec::new(),
        }))
    }
}

/// Write recorded by a unit of work, applied to the live tables on commit.
#[derive(Debug, Clone)]
enum PendingWrite {
    IncreaseSalaries { company_id: i32, factor: Decimal },
    SetTimestamp(Company),
}

/// Records writes and replays them under the lock on commit, so rows the
/// unit of work never touched keep whatever other writers stored meanwhile.
pub struct InMemoryUnitOfWork {
    tables: Arc<Mutex<Tables>>,
    pending: Vec<PendingWrite>,
}

#[async_trait::async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn increase_salaries(
        &mut self,
        company_id: i32,
        factor: Decimal,
        _path: ExecutionPath,
    ) -> StoreResult<u64> {
        let affected = {
            let tables = self.tables.lock().map_err(|_| StoreError::Poisoned)?;
            tables
                .employees
                .values()
                .filter(|e| e.company_id == company_id)
                .count() as u64
        };
        self.pending
            .push(PendingWrite::IncreaseSalaries { company_id, factor });
        Ok(affected)
    }

    async fn save_company(&mut self, company: &Company) -> StoreResult<()> {
        let mut company = company.clone();
        company.employees.clear();
        self.pending.push(PendingWrite::SetTimestamp(company));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let this = *self;
        let mut tables = this.tables.lock().map_err(|_| StoreError::Poisoned)?;
        for write in this.pending {
            match write {
                PendingWrite::IncreaseSalaries { company_id, factor } => {
                    tables.increase_salaries(company_id, factor);
                }
                PendingWrite::SetTimestamp(company) => tables.set_timestamp(&company),
            }
        }
        Ok(())
    }
}
