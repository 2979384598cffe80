//! Day-offset to calendar-date resolution.
//!
//! Day 1 is the first business day on or after the epoch. Later days are
//! reached by walking forward through the business calendar in ascending
//! day order, each step starting from the previous resolved date. Skipped
//! weekend and holiday days accumulate into a calendar-day offset, so every
//! resolved day also knows how much real time has elapsed since day 1.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::models::{BusinessCalendar, Estimate, Job};

/// A day index resolved to a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDay {
    /// Calendar date of the working day.
    pub date: NaiveDate,
    /// Calendar days elapsed since day 1 (business days plus skipped days).
    pub calendar_offset: u32,
}

/// Resolves 1-based working-day indices to dates.
#[derive(Debug, Clone)]
pub struct DayResolver<'a> {
    calendar: &'a BusinessCalendar,
    first_day: NaiveDate,
}

impl<'a> DayResolver<'a> {
    /// Creates a resolver whose day 1 is the first business day on or after
    /// `epoch`.
    pub fn new(calendar: &'a BusinessCalendar, epoch: NaiveDate) -> Result<Self> {
        Ok(Self {
            calendar,
            first_day: calendar.next_business_day(epoch)?,
        })
    }

    /// Date of day 1.
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Resolves a set of day indices in one forward pass.
    ///
    /// Day 0 is treated as day 1.
    pub fn resolve(&self, days: &BTreeSet<u32>) -> Result<BTreeMap<u32, ResolvedDay>> {
        let mut resolved = BTreeMap::new();
        let mut cursor_day: u32 = 1;
        let mut cursor = ResolvedDay {
            date: self.first_day,
            calendar_offset: 0,
        };

        for &day in days {
            let day = day.max(1);
            let work_days = day - cursor_day;
            if work_days > 0 {
                let step = self.calendar.offset(cursor.date, i64::from(work_days))?;
                cursor = ResolvedDay {
                    date: step.date,
                    calendar_offset: cursor.calendar_offset + step.calendar_days(work_days),
                };
                cursor_day = day;
            }
            resolved.insert(day, cursor);
        }

        Ok(resolved)
    }
}

/// Calendar dates for one job, shaped for write-back.
///
/// Untracked jobs carry `None` everywhere so stale values get cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDates {
    /// Job ID.
    pub job_id: String,
    /// Job name.
    pub job_name: String,
    /// Date of the first working day.
    pub start_date: Option<NaiveDate>,
    /// Date of the last working day.
    pub end_date: Option<NaiveDate>,
    /// Working days attributed to the job.
    pub total_working_days: Option<u32>,
}

impl JobDates {
    /// Dates for a job that is not estimated.
    pub fn cleared(job_id: impl Into<String>, job_name: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            job_name: job_name.into(),
            start_date: None,
            end_date: None,
            total_working_days: None,
        }
    }

    /// Whether the job has estimated dates.
    pub fn is_scheduled(&self) -> bool {
        self.start_date.is_some()
    }
}

/// Maps an estimate onto calendar dates.
#[derive(Debug, Clone)]
pub struct Aggregator<'a> {
    resolver: DayResolver<'a>,
    tracked_category: Option<&'a str>,
}

impl<'a> Aggregator<'a> {
    /// Creates an aggregator anchored at `epoch`.
    pub fn new(
        calendar: &'a BusinessCalendar,
        epoch: NaiveDate,
        tracked_category: Option<&'a str>,
    ) -> Result<Self> {
        Ok(Self {
            resolver: DayResolver::new(calendar, epoch)?,
            tracked_category,
        })
    }

    /// Resolves every scheduled job to dates, in estimate order.
    ///
    /// Jobs outside the tracked category get cleared dates.
    pub fn resolve(&self, estimate: &Estimate, jobs: &[Job]) -> Result<Vec<JobDates>> {
        let tracked = |job_id: &str| {
            jobs.iter()
                .find(|j| j.id == job_id)
                .map_or(true, |j| j.is_tracked(self.tracked_category))
        };

        let needed: BTreeSet<u32> = estimate
            .jobs
            .iter()
            .filter(|j| tracked(j.job_id.as_str()))
            .flat_map(|j| [j.start_day, j.end_day])
            .collect();
        let days = self.resolver.resolve(&needed)?;

        let dates = estimate
            .jobs
            .iter()
            .map(|j| {
                if !tracked(j.job_id.as_str()) {
                    return JobDates::cleared(&j.job_id, &j.job_name);
                }
                let start = days.get(&j.start_day.max(1)).map(|d| d.date);
                let end = days.get(&j.end_day.max(1)).map(|d| d.date);
                debug!(job = %j.job_id, ?start, ?end, "resolved job dates");
                JobDates {
                    job_id: j.job_id.clone(),
                    job_name: j.job_name.clone(),
                    start_date: start,
                    end_date: end,
                    total_working_days: Some(j.working_days),
                }
            })
            .collect();

        Ok(dates)
    }
}
