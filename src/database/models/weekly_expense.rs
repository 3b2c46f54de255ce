use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::budget::WEEKS_PER_MONTH;

/// A discretionary cost charged against one of the four weekly buckets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyExpense {
    pub id: i64,
    pub week: u8,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

/// Sums each week's expenses into the allocator's input order (week 1 first).
pub fn totals_by_week(
    grouped: &BTreeMap<u8, Vec<WeeklyExpense>>,
) -> [Decimal; WEEKS_PER_MONTH] {
    let mut totals = [Decimal::ZERO; WEEKS_PER_MONTH];
    for (week, expenses) in grouped {
        if let Some(slot) = totals.get_mut((*week as usize).wrapping_sub(1)) {
            *slot = expenses.iter().map(|e| e.amount).sum();
        }
    }
    totals
}
