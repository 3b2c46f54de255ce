use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// The monthly remainder is split into this many weekly buckets.
pub const WEEKS_PER_MONTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    #[error("weekly spending must cover exactly 4 weeks, got {0}")]
    InvalidInput(usize),
}

/// One week's slice of the monthly budget. Derived on every read, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WeekAllocation {
    pub week: u8,
    pub base_allocation: Decimal,
    pub effective_allocation: Decimal,
    pub spent: Decimal,
    pub available: Decimal,
    pub deficit_carried_to_next: Decimal,
}

impl WeekAllocation {
    /// Share of the effective allocation still available, clamped to [0, 100].
    /// Zero when there is no effective allocation to measure against.
    pub fn available_percent(&self) -> f64 {
        if self.effective_allocation <= Decimal::ZERO {
            return 0.0;
        }
        let pct = (self.available / self.effective_allocation * Decimal::from(100u32))
            .to_f64()
            .unwrap_or(0.0);
        pct.clamp(0.0, 100.0)
    }
}

/// Distributes the monthly remainder (income minus fixed expenses) across four
/// weeks, carrying overspend forward as a deficit against the next week.
///
/// Weeks are processed in order: week 1 gets the base allocation untouched, and
/// each later week's effective allocation is the base minus whatever the
/// previous week overspent, clamped at zero. Inputs are assumed pre-validated
/// non-negative decimals; no rounding happens here.
pub fn allocate(
    total_income: Decimal,
    total_fixed_expenses: Decimal,
    weekly_spending: &[Decimal],
) -> Result<[WeekAllocation; WEEKS_PER_MONTH], AllocationError> {
    if weekly_spending.len() != WEEKS_PER_MONTH {
        return Err(AllocationError::InvalidInput(weekly_spending.len()));
    }

    // May be negative when fixed expenses exceed income; the per-week clamp
    // below is what keeps effective allocations at zero in that case.
    let remainder = total_income - total_fixed_expenses;
    let base_allocation = remainder / Decimal::from(WEEKS_PER_MONTH as u32);

    let mut deficit = Decimal::ZERO;
    let mut weeks = [WeekAllocation::default(); WEEKS_PER_MONTH];
    for (i, slot) in weeks.iter_mut().enumerate() {
        let effective = (base_allocation - deficit).max(Decimal::ZERO);
        let spent = weekly_spending[i];

        let (available, new_deficit) = if spent > effective {
            (Decimal::ZERO, spent - effective)
        } else {
            (effective - spent, Decimal::ZERO)
        };

        *slot = WeekAllocation {
            week: (i + 1) as u8,
            base_allocation,
            effective_allocation: effective,
            spent,
            available,
            deficit_carried_to_next: new_deficit,
        };
        deficit = new_deficit;
    }

    Ok(weeks)
}
