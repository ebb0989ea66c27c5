use rust_decimal::Decimal;
use sqlx::{MySql, MySqlConnection, MySqlPool, Transaction};
use tracing::debug;

use super::{CompanyStore, ExecutionPath, StoreResult, UnitOfWork};
use crate::{
    model::{
        company::Company,
        employee::{Employee, to_column_scale},
    },
    utils::db_utils::{self, SqlValue},
};

const SELECT_COMPANY: &str = r#"
    SELECT id, last_salaries_update_utc
    FROM companies
    WHERE id = ?
"#;

const SELECT_EMPLOYEES: &str = r#"
    SELECT id, company_id, salary
    FROM employees
    WHERE company_id = ?
    ORDER BY id
"#;

// Keeps the stored value when it is already later than the new one.
const UPDATE_COMPANY_TIMESTAMP: &str = r#"
    UPDATE companies
    SET last_salaries_update_utc = CASE
        WHEN last_salaries_update_utc IS NULL OR last_salaries_update_utc < ? THEN ?
        ELSE last_salaries_update_utc
    END
    WHERE id = ?
"#;

const UPDATE_EMPLOYEE_SALARY: &str = r#"
    UPDATE employees
    SET salary = ?
    WHERE id = ? AND company_id = ?
"#;

const INCREASE_SALARIES: &str = r#"
    UPDATE employees
    SET salary = salary * ?
    WHERE company_id = ?
"#;

const INCREASE_SALARIES_NAMED: &str = r#"
    UPDATE employees
    SET salary = salary * @Factor
    WHERE company_id = @CompanyId
"#;

const DELETE_EMPLOYEES_ABOVE: &str = r#"
    DELETE FROM employees
    WHERE company_id = ? AND salary > ?
"#;

/// `CompanyStore` backed by a MySQL connection pool.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

async fn update_company_timestamp(conn: &mut MySqlConnection, company: &Company) -> StoreResult<()> {
    sqlx::query(UPDATE_COMPANY_TIMESTAMP)
        .bind(company.last_salaries_update_utc)
        .bind(company.last_salaries_update_utc)
        .bind(company.id)
        .execute(conn)
        .await?;
    Ok(())
}

#[async_trait::async_trait]
impl CompanyStore for MySqlStore {
    async fn find_company(&self, company_id: i32) -> StoreResult<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(SELECT_COMPANY)
            .bind(company_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(company)
    }

    async fn find_company_with_employees(&self, company_id: i32) -> StoreResult<Option<Company>> {
        // Both selects share the snapshot taken by the first read (REPEATABLE READ).
        let mut tx = self.pool.begin().await?;

        let company = sqlx::query_as::<_, Company>(SELECT_COMPANY)
            .bind(company_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(mut company) = company else {
            tx.commit().await?;
            return Ok(None);
        };

        company.employees = sqlx::query_as::<_, Employee>(SELECT_EMPLOYEES)
            .bind(company_id)
            .fetch_all(&mut *tx)
            .await?;
        tx.commit().await?;

        debug!(company_id, employees = company.employees.len(), "Loaded company with employees");
        Ok(Some(company))
    }

    async fn save_company(&self, company: &Company) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        update_company_timestamp(&mut tx, company).await?;

        for employee in &company.employees {
            sqlx::query(UPDATE_EMPLOYEE_SALARY)
                .bind(to_column_scale(employee.salary))
                .bind(employee.id)
                .bind(company.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn increase_salaries(&self, company_id: i32, factor: Decimal) -> StoreResult<u64> {
        let result = sqlx::query(INCREASE_SALARIES)
            .bind(factor)
            .bind(company_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_employees_above(
        &self,
        company_id: i32,
        threshold: Decimal,
    ) -> StoreResult<u64> {
        let result = sqlx::query(DELETE_EMPLOYEES_ABOVE)
            .bind(company_id)
            .bind(threshold)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(MySqlUnitOfWork { tx }))
    }
}

pub struct MySqlUnitOfWork {
    tx: Transaction<'static, MySql>,
}

#[async_trait::async_trait]
impl UnitOfWork for MySqlUnitOfWork {
    async fn increase_salaries(
        &mut self,
        company_id: i32,
        factor: Decimal,
        path: ExecutionPath,
    ) -> StoreResult<u64> {
        let affected = match path {
            ExecutionPath::RawSql => sqlx::query(INCREASE_SALARIES)
                .bind(factor)
                .bind(company_id)
                .execute(&mut *self.tx)
                .await?
                .rows_affected(),
            ExecutionPath::Mapper => {
                let statement = db_utils::build_named_sql(
                    INCREASE_SALARIES_NAMED,
                    &[
                        ("CompanyId", SqlValue::I32(company_id)),
                        ("Factor", SqlValue::Decimal(factor)),
                    ],
                )?;
                db_utils::execute(&mut *self.tx, statement).await?
            }
        };
        Ok(affected)
    }

    async fn save_company(&mut self, company: &Company) -> StoreResult<()> {
        update_company_timestamp(&mut self.tx, company).await
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
