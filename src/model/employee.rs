use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Scale of the `employees.salary` column (`DECIMAL(18,2)`).
pub const SALARY_SCALE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    pub id: i32,
    pub company_id: i32,
    pub salary: Decimal,
}

impl Employee {
    pub fn new(id: i32, company_id: i32, salary: Decimal) -> Self {
        Self {
            id,
            company_id,
            salary,
        }
    }

    /// Multiplies the salary in place. The result is not rounded here;
    /// rounding happens when the value is written to the column.
    pub fn increase_salary(&mut self, factor: Decimal) {
        self.salary *= factor;
    }
}

/// Rounds a salary the way the database column stores it.
pub fn to_column_scale(salary: Decimal) -> Decimal {
    salary.round_dp_with_strategy(SALARY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increase_salary_compounds() {
        let mut employee = Employee::new(1, 1, Decimal::new(1000, 0));
        employee.increase_salary(Decimal::new(11, 1));
        employee.increase_salary(Decimal::new(11, 1));
        assert_eq!(to_column_scale(employee.salary), Decimal::new(121000, 2));
    }

    #[test]
    fn column_scale_rounds_half_away_from_zero() {
        assert_eq!(to_column_scale(Decimal::new(10005, 3)), Decimal::new(1001, 2));
        assert_eq!(to_column_scale(Decimal::new(10004, 3)), Decimal::new(1000, 2));
    }
}
