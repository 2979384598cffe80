//! Condensed run summary for reporting and diagnostics.

use serde::{Deserialize, Serialize};

use super::JobDates;
use crate::config::EstimationStrategy;
use crate::models::{Estimate, SimulationDayRecord};

/// A station's state at the end of a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSummary {
    /// Workstation name.
    pub station_name: String,
    /// Name of the job held at day end.
    pub current_job: Option<String>,
    /// Whether the station ends the day empty.
    pub is_idle: bool,
}

/// One day of the activity log, reduced to names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    /// Day index (1-based).
    pub day: u32,
    /// Names of jobs admitted this day.
    pub jobs_started: Vec<String>,
    /// Names of jobs completed this day.
    pub jobs_completed: Vec<String>,
    /// Station states, in pipeline order.
    pub stations: Vec<StationSummary>,
}

impl From<&SimulationDayRecord> for DaySummary {
    fn from(record: &SimulationDayRecord) -> Self {
        Self {
            day: record.day,
            jobs_started: record.jobs_started.iter().map(|j| j.job_name.clone()).collect(),
            jobs_completed: record
                .jobs_completed
                .iter()
                .map(|j| j.job_name.clone())
                .collect(),
            stations: record
                .stations
                .iter()
                .map(|s| StationSummary {
                    station_name: s.station_name.clone(),
                    current_job: s.holding.as_ref().map(|j| j.job_name.clone()),
                    is_idle: s.is_idle(),
                })
                .collect(),
        }
    }
}

/// Summary of an estimation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Strategy that produced the estimate.
    pub strategy: EstimationStrategy,
    /// Days the estimate spans.
    pub total_days: u32,
    /// Jobs in the estimate.
    pub total_jobs: usize,
    /// Per-job dates.
    pub completions: Vec<JobDates>,
    /// Leading days of the activity log.
    pub daily: Vec<DaySummary>,
}

impl ScheduleSummary {
    /// Builds a summary keeping the first `diagnostic_days` days of activity.
    pub fn build(estimate: &Estimate, completions: Vec<JobDates>, diagnostic_days: usize) -> Self {
        Self {
            strategy: estimate.strategy,
            total_days: estimate.total_days,
            total_jobs: estimate.jobs.len(),
            completions,
            daily: estimate
                .days
                .iter()
                .take(diagnostic_days)
                .map(DaySummary::from)
                .collect(),
        }
    }

    /// Number of jobs with estimated dates.
    pub fn scheduled_count(&self) -> usize {
        self.completions.iter().filter(|c| c.is_scheduled()).count()
    }
}
