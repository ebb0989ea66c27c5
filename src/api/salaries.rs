use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, instrument, warn};
use utoipa::IntoParams;

use super::error::ApiError;
use crate::{
    model::company::{Company, salary_increase_factor},
    store::{CompanyStore, ExecutionPath},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CompanyQuery {
    /// Company whose employees get the raise
    #[param(example = 1)]
    pub company_id: i32,
}

pub(crate) fn require_company(
    company: Option<Company>,
    company_id: i32,
) -> Result<Company, ApiError> {
    company.ok_or_else(|| {
        warn!(company_id, "Company not found");
        ApiError::CompanyNotFound(company_id)
    })
}

/// Increase salaries by loading every employee and saving the changes
#[utoipa::path(
    put,
    path = "/increase-salaries",
    params(CompanyQuery),
    responses(
        (status = 204, description = "Salaries increased by 10%"),
        (status = 404, description = "Company not found", body = Object, example = json!({
            "message": "The company with Id 99 was not found."
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Salaries"
)]
#[instrument(skip_all, fields(company_id = query.company_id))]
pub async fn increase_salaries(
    store: web::Data<dyn CompanyStore>,
    query: web::Query<CompanyQuery>,
) -> Result<HttpResponse, ApiError> {
    let company_id = query.company_id;

    let mut company = require_company(
        store.find_company_with_employees(company_id).await?,
        company_id,
    )?;

    company.increase_salaries(salary_increase_factor());
    company.mark_salaries_updated(Utc::now());

    store.save_company(&company).await?;

    info!(employees = company.employees.len(), "Salaries increased");
    Ok(HttpResponse::NoContent().finish())
}

/// Increase salaries with a single set-based update
///
/// Leaves the company's `last_salaries_update_utc` untouched.
#[utoipa::path(
    put,
    path = "/increase-salaries-v2",
    params(CompanyQuery),
    responses(
        (status = 204, description = "Salaries increased by 10%"),
        (status = 404, description = "Company not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Salaries"
)]
#[instrument(skip_all, fields(company_id = query.company_id))]
pub async fn increase_salaries_v2(
    store: web::Data<dyn CompanyStore>,
    query: web::Query<CompanyQuery>,
) -> Result<HttpResponse, ApiError> {
    let company_id = query.company_id;

    let company = require_company(store.find_company(company_id).await?, company_id)?;

    let affected = store
        .increase_salaries(company.id, salary_increase_factor())
        .await?;

    info!(affected, "Salaries increased");
    Ok(HttpResponse::NoContent().finish())
}

async fn increase_in_unit_of_work(
    store: &dyn CompanyStore,
    company_id: i32,
    path: ExecutionPath,
) -> Result<HttpResponse, ApiError> {
    let mut company = require_company(store.find_company(company_id).await?, company_id)?;

    let mut uow = store.begin().await?;

    let affected = uow
        .increase_salaries(company.id, salary_increase_factor(), path)
        .await?;
    company.mark_salaries_updated(Utc::now());
    uow.save_company(&company).await?;

    uow.commit().await?;

    info!(affected, ?path, "Salaries increased");
    Ok(HttpResponse::NoContent().finish())
}

/// Increase salaries with raw SQL inside an explicit transaction
#[utoipa::path(
    put,
    path = "/increase-salaries-sql",
    params(CompanyQuery),
    responses(
        (status = 204, description = "Salaries increased by 10%"),
        (status = 404, description = "Company not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Salaries"
)]
#[instrument(skip_all, fields(company_id = query.company_id))]
pub async fn increase_salaries_sql(
    store: web::Data<dyn CompanyStore>,
    query: web::Query<CompanyQuery>,
) -> Result<HttpResponse, ApiError> {
    increase_in_unit_of_work(store.get_ref(), query.company_id, ExecutionPath::RawSql).await
}

/// Increase salaries with a named-parameter statement run by the SQL mapper
/// inside an explicit transaction
#[utoipa::path(
    put,
    path = "/increase-salaries-sql-dapper",
    params(CompanyQuery),
    responses(
        (status = 204, description = "Salaries increased by 10%"),
        (status = 404, description = "Company not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Salaries"
)]
#[instrument(skip_all, fields(company_id = query.company_id))]
pub async fn increase_salaries_sql_mapper(
    store: web::Data<dyn CompanyStore>,
    query: web::Query<CompanyQuery>,
) -> Result<HttpResponse, ApiError> {
    increase_in_unit_of_work(store.get_ref(), query.company_id, ExecutionPath::Mapper).await
}
