//! Job (order) model.
//!
//! A job is one manufacturing order flowing through the pipeline. Its cost
//! is derived from the pipeline's stations and the job's quantity, unless
//! work has begun and a manual hour figure has been recorded.

use serde::{Deserialize, Serialize};

use super::workstation::{total_hours_per_unit, total_setup_time};
use super::Workstation;

/// Sort key used when a job has no priority.
///
/// Larger than any numeric or date-derived priority, so undated jobs are
/// admitted after every job that has one.
pub const DEFAULT_PRIORITY: i64 = i64::MAX;

/// Manufacturing status of a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManufacturingStatus {
    /// No work recorded yet.
    #[default]
    NotStarted,
    /// Work has begun.
    InProgress,
    /// Manufacturing finished.
    Complete,
    /// Any other status label from the source system.
    Other(String),
}

impl ManufacturingStatus {
    /// Parses a status label, case-insensitively.
    ///
    /// An empty label means no status has been recorded.
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "" | "not started" | "not_started" => Self::NotStarted,
            "in progress" | "in_progress" => Self::InProgress,
            "complete" | "completed" => Self::Complete,
            _ => Self::Other(label.trim().to_string()),
        }
    }

    /// Whether work on the job has begun.
    pub fn has_started(&self) -> bool {
        !matches!(self, Self::NotStarted)
    }
}

/// A job to be scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Product line; jobs outside the tracked category cost nothing.
    pub category: Option<String>,
    /// Units to produce.
    pub quantity: f64,
    /// Sort key, ascending. `None` sorts as [`DEFAULT_PRIORITY`].
    pub priority: Option<i64>,
    /// Manufacturing status.
    #[serde(default)]
    pub status: ManufacturingStatus,
    /// Recorded hours that replace the computed total once work has begun.
    pub manual_hours: Option<f64>,
}

impl Job {
    /// Creates a job with no quantity, category, or priority.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            category: None,
            quantity: 0.0,
            priority: None,
            status: ManufacturingStatus::NotStarted,
            manual_hours: None,
        }
    }

    /// Sets the job name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the quantity.
    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity;
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the manufacturing status.
    pub fn with_status(mut self, status: ManufacturingStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the manual hour override.
    pub fn with_manual_hours(mut self, hours: f64) -> Self {
        self.manual_hours = Some(hours);
        self
    }

    /// Priority used for ordering.
    #[inline]
    pub fn effective_priority(&self) -> i64 {
        self.priority.unwrap_or(DEFAULT_PRIORITY)
    }

    /// Whether the job belongs to the tracked category.
    ///
    /// With no tracked category every job is tracked.
    pub fn is_tracked(&self, tracked_category: Option<&str>) -> bool {
        match tracked_category {
            None => true,
            Some(tracked) => self.category.as_deref() == Some(tracked),
        }
    }

    /// Manual hours, if they apply (work has begun and hours are recorded).
    pub fn override_hours(&self) -> Option<f64> {
        if self.status.has_started() {
            self.manual_hours.filter(|h| *h > 0.0)
        } else {
            None
        }
    }

    /// Total hours this job needs from the whole pipeline.
    ///
    /// Manual hours win once work has begun. Otherwise tracked jobs cost
    /// `quantity × Σ hours_required + Σ setup_time`; untracked jobs cost 0.
    pub fn required_hours(&self, stations: &[Workstation], tracked_category: Option<&str>) -> f64 {
        if let Some(hours) = self.override_hours() {
            return hours;
        }
        if !self.is_tracked(tracked_category) {
            return 0.0;
        }
        self.quantity * total_hours_per_unit(stations) + total_setup_time(stations)
    }
}

/// Returns job indices in admission order: ascending priority, stable.
pub fn priority_order(jobs: &[Job]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..jobs.len()).collect();
    indices.sort_by_key(|&i| jobs[i].effective_priority());
    indices
}
