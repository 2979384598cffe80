//! Estimate (solution) model.
//!
//! An estimate is the day-offset schedule produced by one estimator
//! strategy: per-job start/end days and, for the flow-shop simulation,
//! a day-by-day activity log.
//!
//! # Day Numbering
//! Days are 1-based business-day indices: day 1 is the first working day
//! of the run. `start_day` and `end_day` are both inclusive.

use serde::{Deserialize, Serialize};

use crate::config::EstimationStrategy;

/// A job's position in the day-offset schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledJob {
    /// Job ID.
    pub job_id: String,
    /// Job name (denormalized for reporting).
    pub job_name: String,
    /// First working day (1-based, inclusive).
    pub start_day: u32,
    /// Last working day (1-based, inclusive).
    pub end_day: u32,
    /// Working days attributed to the job.
    pub working_days: u32,
    /// Hours the job required from the pipeline.
    pub total_hours: f64,
}

/// Reference to a job in the activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRef {
    /// Job ID.
    pub job_id: String,
    /// Job name.
    pub job_name: String,
}

impl JobRef {
    /// Creates a reference.
    pub fn new(job_id: impl Into<String>, job_name: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            job_name: job_name.into(),
        }
    }
}

/// One slice of a station's day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivitySlice {
    /// Hours spent on a job.
    Work { job: JobRef, hours: f64 },
    /// Capacity left unused.
    Idle { hours: f64 },
}

impl ActivitySlice {
    /// Hours covered by the slice.
    pub fn hours(&self) -> f64 {
        match self {
            Self::Work { hours, .. } | Self::Idle { hours } => *hours,
        }
    }

    /// Whether the slice is idle time.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle { .. })
    }
}

/// What one station did during one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationActivity {
    /// Workstation ID.
    pub station_id: String,
    /// Workstation name.
    pub station_name: String,
    /// Work and idle slices in the order they happened.
    pub slices: Vec<ActivitySlice>,
    /// Job still occupying the station at the end of the day.
    pub holding: Option<JobRef>,
}

impl StationActivity {
    /// Hours worked on jobs (idle excluded).
    pub fn hours_worked(&self) -> f64 {
        self.slices
            .iter()
            .filter(|s| !s.is_idle())
            .map(ActivitySlice::hours)
            .sum()
    }

    /// Idle hours.
    pub fn idle_hours(&self) -> f64 {
        self.slices
            .iter()
            .filter(|s| s.is_idle())
            .map(ActivitySlice::hours)
            .sum()
    }

    /// Whether the station ends the day without a job.
    pub fn is_idle(&self) -> bool {
        self.holding.is_none()
    }
}

/// Activity log for one simulated day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationDayRecord {
    /// Day index (1-based).
    pub day: u32,
    /// Per-station activity, in pipeline order.
    pub stations: Vec<StationActivity>,
    /// Jobs admitted to the pipeline this day.
    pub jobs_started: Vec<JobRef>,
    /// Jobs that cleared the last station this day.
    pub jobs_completed: Vec<JobRef>,
}

/// Day-offset schedule produced by an estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Strategy that produced this estimate.
    pub strategy: EstimationStrategy,
    /// Scheduled jobs, in completion order (flow-shop) or priority order
    /// (throughput).
    pub jobs: Vec<ScheduledJob>,
    /// Day-by-day activity (flow-shop only; empty otherwise).
    pub days: Vec<SimulationDayRecord>,
    /// Number of days the schedule spans.
    pub total_days: u32,
}

impl Estimate {
    /// Finds the scheduled entry for a job.
    pub fn job(&self, job_id: &str) -> Option<&ScheduledJob> {
        self.jobs.iter().find(|j| j.job_id == job_id)
    }

    /// Number of scheduled jobs.
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Latest end day across all jobs.
    pub fn makespan_days(&self) -> u32 {
        self.jobs.iter().map(|j| j.end_day).max().unwrap_or(0)
    }
}
