pub mod fixed_expense;
pub mod weekly_expense;

pub use fixed_expense::{ExpenseStatus, FixedExpense};
pub use weekly_expense::{totals_by_week, WeeklyExpense};
