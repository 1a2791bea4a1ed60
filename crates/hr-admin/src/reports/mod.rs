//! Report pipelines over already-fetched collections.
//!
//! Everything here is a pure function of its inputs plus an explicit `now`; callers recompute on
//! every change instead of patching earlier results.

mod aggregate;
pub mod export;
mod filter;
pub mod fleet;
mod grouping;
mod range;
pub mod talent;

pub use aggregate::{aggregate, FieldExtractors, ReportRecord, ReportSummary};
pub use filter::{matches_entity, EntityScoped, ReportFilterSpec};
pub use grouping::{group_by_month, group_groceries_by_month, MonthGroup, MonthGrouping};
pub use range::{matches_date_range, DateRangeSelector, NamedRange, ParseRangeError};
