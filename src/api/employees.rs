use actix_web::{HttpResponse, web};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::IntoParams;

use super::{error::ApiError, salaries::require_company};
use crate::store::CompanyStore;

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DeleteEmployeesQuery {
    #[param(example = 1)]
    pub company_id: i32,

    /// Employees earning strictly more than this are deleted
    #[param(example = "1500", value_type = String)]
    pub salary_threshold: Decimal,
}

/// Delete a company's employees above a salary threshold
#[utoipa::path(
    delete,
    path = "/delete-employees",
    params(DeleteEmployeesQuery),
    responses(
        (status = 204, description = "Matching employees deleted, zero matches included"),
        (status = 404, description = "Company not found", body = Object, example = json!({
            "message": "The company with Id 99 was not found."
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employees"
)]
#[instrument(skip_all, fields(company_id = query.company_id, threshold = %query.salary_threshold))]
pub async fn delete_employees(
    store: web::Data<dyn CompanyStore>,
    query: web::Query<DeleteEmployeesQuery>,
) -> Result<HttpResponse, ApiError> {
    let company_id = query.company_id;

    let company = require_company(store.find_company(company_id).await?, company_id)?;

    let deleted = store
        .delete_employees_above(company.id, query.salary_threshold)
        .await?;

    info!(deleted, "Employees deleted");
    Ok(HttpResponse::NoContent().finish())
}
