use std::collections::BTreeMap;

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};

use crate::budget::{allocate, WeekAllocation, WEEKS_PER_MONTH};
use crate::database::db::queries;
use crate::database::models::{totals_by_week, ExpenseStatus, FixedExpense, WeeklyExpense};

/// Direct-SQLite gateway client for the TUI. One call per user action, no
/// retry; failures bubble up to the status line.
#[derive(Clone)]
pub struct Client {
    pool: Pool<Sqlite>,
}

impl Client {
    pub async fn sqlite(db_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(db_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    // ============= Income =============

    pub async fn total_income(&self) -> Result<Decimal> {
        Ok(queries::get_total_income(&self.pool).await?)
    }

    pub async fn set_total_income(&self, value: Decimal) -> Result<Decimal> {
        Ok(queries::set_total_income(&self.pool, value).await?)
    }

    // ============= Fixed expenses =============

    pub async fn list_fixed(&self) -> Result<Vec<FixedExpense>> {
        Ok(queries::list_fixed_expenses(&self.pool).await?)
    }

    pub async fn total_fixed(&self) -> Result<Decimal> {
        Ok(queries::total_fixed_expenses(&self.pool).await?)
    }

    pub async fn create_fixed(
        &self,
        description: &str,
        amount: Decimal,
        date: NaiveDate,
        notes: Option<&str>,
    ) -> Result<FixedExpense> {
        Ok(queries::create_fixed_expense(
            &self.pool,
            description,
            amount,
            date,
            notes,
            ExpenseStatus::Pending,
        )
        .await?)
    }

    /// Rewrites the record with a new status; None when the id is gone.
    pub async fn set_fixed_status(
        &self,
        expense: &FixedExpense,
        status: ExpenseStatus,
    ) -> Result<Option<FixedExpense>> {
        Ok(queries::update_fixed_expense(
            &self.pool,
            expense.id,
            &expense.description,
            expense.amount,
            expense.date,
            expense.notes.as_deref(),
            status,
        )
        .await?)
    }

    pub async fn delete_fixed(&self, id: i64) -> Result<bool> {
        Ok(queries::delete_fixed_expense(&self.pool, id).await?)
    }

    // ============= Weekly expenses =============

    pub async fn list_weekly(&self) -> Result<BTreeMap<u8, Vec<WeeklyExpense>>> {
        Ok(queries::list_weekly_expenses(&self.pool).await?)
    }

    pub async fn create_weekly(
        &self,
        week: u8,
        description: &str,
        amount: Decimal,
        date: NaiveDate,
    ) -> Result<WeeklyExpense> {
        Ok(queries::create_weekly_expense(&self.pool, week, description, amount, date).await?)
    }

    pub async fn delete_weekly(&self, id: i64) -> Result<bool> {
        Ok(queries::delete_weekly_expense(&self.pool, id).await?)
    }

    pub async fn clear_week(&self, week: u8) -> Result<u64> {
        Ok(queries::clear_week(&self.pool, week).await?)
    }

    pub async fn clear_all_weeks(&self) -> Result<u64> {
        Ok(queries::clear_all_weeks(&self.pool).await?)
    }

    // ============= Allocation =============

    /// Recomputes the four-week allocation from the current store.
    pub async fn allocations(&self) -> Result<[WeekAllocation; WEEKS_PER_MONTH]> {
        let income = queries::get_total_income(&self.pool).await?;
        let fixed = queries::total_fixed_expenses(&self.pool).await?;
        let grouped = queries::list_weekly_expenses(&self.pool).await?;

        let spending = totals_by_week(&grouped);
        Ok(allocate(income, fixed, &spending)?)
    }
}
