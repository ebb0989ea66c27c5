use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use tracing::info;

const CREATE_COMPANIES: &str = r#"
    CREATE TABLE IF NOT EXISTS companies (
        id INT NOT NULL AUTO_INCREMENT PRIMARY KEY,
        last_salaries_update_utc DATETIME(6) NULL
    )
"#;

const CREATE_EMPLOYEES: &str = r#"
    CREATE TABLE IF NOT EXISTS employees (
        id INT NOT NULL AUTO_INCREMENT PRIMARY KEY,
        company_id INT NOT NULL,
        salary DECIMAL(18, 2) NOT NULL,
        INDEX ix_employees_company_id (company_id),
        CONSTRAINT fk_employees_company FOREIGN KEY (company_id)
            REFERENCES companies (id) ON DELETE CASCADE
    )
"#;

pub async fn init_db(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<MySqlPool> {
    MySqlPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect(database_url)
        .await
        .context("Failed to connect to database")
}

/// Creates the `companies` and `employees` tables when they are missing.
pub async fn ensure_schema(pool: &MySqlPool) -> Result<()> {
    sqlx::query(CREATE_COMPANIES)
        .execute(pool)
        .await
        .context("Failed to create companies table")?;
    sqlx::query(CREATE_EMPLOYEES)
        .execute(pool)
        .await
        .context("Failed to create employees table")?;

    info!("Database schema ready");
    Ok(())
}
