use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::employee::Employee;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    pub id: i32,
    pub last_salaries_update_utc: Option<DateTime<Utc>>,

    /// Only populated when the company was loaded together with its employees.
    #[sqlx(skip)]
    #[serde(default)]
    pub employees: Vec<Employee>,
}

impl Company {
    pub fn new(id: i32) -> Self {
        Self {
            id,
            last_salaries_update_utc: None,
            employees: Vec::new(),
        }
    }

    pub fn increase_salaries(&mut self, factor: Decimal) {
        for employee in self.employees.iter_mut() {
            employee.increase_salary(factor);
        }
    }

    /// Records a completed salary adjustment. The timestamp never moves backwards.
    pub fn mark_salaries_updated(&mut self, at: DateTime<Utc>) {
        self.last_salaries_update_utc = Some(match self.last_salaries_update_utc {
            Some(previous) if previous > at => previous,
            _ => at,
        });
    }
}

/// 10% raise applied by every salary adjustment.
pub fn salary_increase_factor() -> Decimal {
    Decimal::new(11, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn increases_every_loaded_employee() {
        let mut company = Company::new(1);
        company.employees = vec![
            Employee::new(1, 1, Decimal::new(1000, 0)),
            Employee::new(2, 1, Decimal::new(2000, 0)),
        ];

        company.increase_salaries(salary_increase_factor());

        let salaries: Vec<Decimal> = company.employees.iter().map(|e| e.salary).collect();
        assert_eq!(salaries, vec![Decimal::new(1100, 0), Decimal::new(2200, 0)]);
    }

    #[test]
    fn salaries_update_timestamp_is_monotonic() {
        let now = Utc::now();
        let mut company = Company::new(1);

        company.mark_salaries_updated(now);
        company.mark_salaries_updated(now - Duration::minutes(5));
        assert_eq!(company.last_salaries_update_utc, Some(now));

        let later = now + Duration::seconds(1);
        company.mark_salaries_updated(later);
        assert_eq!(company.last_salaries_update_utc, Some(later));
    }
}
