use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    Pending,
    Paid,
}

impl Default for ExpenseStatus {
    fn default() -> Self {
        ExpenseStatus::Pending
    }
}

impl ExpenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
        }
    }

    /// Anything that isn't recognizably paid counts as pending.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("paid") {
            Self::Paid
        } else {
            Self::Pending
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Pending => Self::Paid,
            Self::Paid => Self::Pending,
        }
    }
}

/// A recurring monthly cost, deducted from income before weekly allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedExpense {
    pub id: i64,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub status: ExpenseStatus,
}
