use rust_decimal::Decimal;
use sqlx::{Executor, MySql};
use thiserror::Error;


/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    I32(i32),
    Decimal(Decimal),
}

#[derive(Debug, Error, PartialEq)]
pub enum MapperError {
    #[error("statement references @{0} but no such parameter was supplied")]
    UnknownParameter(String),
}


/// ===============================
/// Positional SQL statement
/// ===============================
#[derive(Debug)]
pub struct SqlStatement {
    pub sql: String,
    pub values: Vec<SqlValue>,
}


/// ===============================
/// Build a statement from named parameters
/// ===============================
///
/// Rewrites every `@Name` token into a `?` placeholder and binds the value
/// supplied under that name, in the order the tokens appear. A name may be
/// referenced more than once. `@@` is left alone so MySQL system variables
/// still work.
pub fn build_named_sql(
    sql: &str,
    params: &[(&str, SqlValue)],
) -> Result<SqlStatement, MapperError> {
    let mut rewritten = String::with_capacity(sql.len());
    let mut values = Vec::new();
    let mut chars = sql.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != '@' {
            rewritten.push(c);
            continue;
        }

        if let Some((_, '@')) = chars.peek() {
            rewritten.push_str("@@");
            chars.next();
            continue;
        }

        let start = i + c.len_utf8();
        let mut end = start;
        while let Some(&(j, n)) = chars.peek() {
            if n.is_ascii_alphanumeric() || n == '_' {
                end = j + n.len_utf8();
                chars.next();
            } else {
                break;
            }
        }

        if end == start {
            rewritten.push(c);
            continue;
        }

        let name = &sql[start..end];
        let value = params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| MapperError::UnknownParameter(name.to_string()))?;

        rewritten.push('?');
        values.push(value);
    }

    Ok(SqlStatement {
        sql: rewritten,
        values,
    })
}


/// ===============================
/// Execute the statement
/// ===============================
pub async fn execute<'e, E>(executor: E, statement: SqlStatement) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = MySql>,
{
    let mut query = sqlx::query(&statement.sql);

    for value in statement.values {
        query = match value {
            SqlValue::I32(v) => query.bind(v),
            SqlValue::Decimal(v) => query.bind(v),
        };
    }

    let result = query.execute(executor).await?;
    Ok(result.rows_affected())
}
