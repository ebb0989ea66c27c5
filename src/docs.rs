use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Awesome Company API",
        version = "1.0.0",
        description = r#"
## Salary Adjustment Service

Bulk salary adjustments and employee purges for a company.

### 🔹 Update strategies
All four endpoints raise every employee's salary by **10%**:
- **increase-salaries**: load every employee, mutate in memory, save
- **increase-salaries-v2**: one set-based `UPDATE`; does *not* touch `last_salaries_update_utc`
- **increase-salaries-sql**: raw SQL and the company save in one explicit transaction
- **increase-salaries-sql-dapper**: same as above, statement built by the named-parameter SQL mapper

### 📦 Responses
- `204 No Content` on success
- `404` with a JSON `message` when the company does not exist

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::salaries::increase_salaries,
        crate::api::salaries::increase_salaries_v2,
        crate::api::salaries::increase_salaries_sql,
        crate::api::salaries::increase_salaries_sql_mapper,

        crate::api::employees::delete_employees
    ),
    tags(
        (name = "Salaries", description = "Salary adjustment APIs"),
        (name = "Employees", description = "Employee purge APIs"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route_without_unused_schemas() {
        let doc = ApiDoc::openapi();

        let mut paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        paths.sort();
        assert_eq!(
            paths,
            vec![
                "/delete-employees",
                "/increase-salaries",
                "/increase-salaries-sql",
                "/increase-salaries-sql-dapper",
                "/increase-salaries-v2",
            ]
        );

        let schemas = doc.components.map(|c| c.schemas).unwrap_or_default();
        assert!(!schemas.contains_key("Employee"));
    }
}
