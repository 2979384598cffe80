//! Calendar projection and output shaping.
//!
//! Resolves an estimate's day offsets to real dates through the business
//! calendar and condenses a run into a summary for reporting.

mod dates;
mod summary;

pub use dates::{Aggregator, DayResolver, JobDates, ResolvedDay};
pub use summary::{DaySummary, ScheduleSummary, StationSummary};
