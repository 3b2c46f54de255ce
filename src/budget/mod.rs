pub mod allocator;
pub mod money;

pub use allocator::{allocate, AllocationError, WeekAllocation, WEEKS_PER_MONTH};
