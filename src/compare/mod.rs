//! Value comparison module
//!
//! Evaluates a single `(left, operator, right)` predicate across the
//! ordering, containment, set membership, null check and pattern families.

mod coerce;
mod comparator;
mod pattern;


pub use coerce::{to_instant, to_number, to_numeric, values_equal, Numeric};
pub use comparator::{compare, compare_dates, compare_ordering};
pub use pattern::like_pattern;
