//! Run quality metrics (KPIs).
//!
//! Computes pipeline performance indicators from a completed estimate.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total Days | Days the estimate spans |
//! | Station Utilization | worked hours / (days × hours_per_day) |
//! | Avg Utilization | Mean station utilization |
//! | Idle Hours | Sum of idle capacity across stations and days |
//! | Avg Flow Time | Mean working days from start to end |
//! | Bottleneck | Station with the highest utilization |
//!
//! Station metrics need the flow-shop activity log; for estimates
//! without one they are empty or zero.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::BTreeMap;

use crate::models::Estimate;

/// Estimate performance indicators.
#[derive(Debug, Clone)]
pub struct RunKpi {
    /// Days the estimate spans.
    pub total_days: u32,
    /// Number of scheduled jobs.
    pub job_count: usize,
    /// Per-station utilization (0.0..1.0), keyed by station ID.
    pub utilization_by_station: BTreeMap<String, f64>,
    /// Average station utilization (0.0..1.0).
    pub avg_utilization: f64,
    /// Idle station hours over the whole run.
    pub total_idle_hours: f64,
    /// Mean working days per job.
    pub avg_flow_days: f64,
}

impl RunKpi {
    /// Computes KPIs from an estimate.
    ///
    /// # Arguments
    /// * `estimate` - The completed estimate.
    /// * `hours_per_day` - Daily capacity per station used for the run.
    pub fn calculate(estimate: &Estimate, hours_per_day: f64) -> Self {
        let mut worked: BTreeMap<String, f64> = BTreeMap::new();
        let mut total_idle_hours = 0.0;

        for record in &estimate.days {
            for activity in &record.stations {
                *worked.entry(activity.station_id.clone()).or_insert(0.0) +=
                    activity.hours_worked();
                total_idle_hours += activity.idle_hours();
            }
        }

        let horizon = estimate.days.len() as f64 * hours_per_day;
        let utilization_by_station: BTreeMap<String, f64> = if horizon > 0.0 {
            worked
                .into_iter()
                .map(|(id, hours)| (id, hours / horizon))
                .collect()
        } else {
            BTreeMap::new()
        };

        let avg_utilization = if utilization_by_station.is_empty() {
            0.0
        } else {
            utilization_by_station.values().sum::<f64>() / utilization_by_station.len() as f64
        };

        let avg_flow_days = if estimate.jobs.is_empty() {
            0.0
        } else {
            estimate
                .jobs
                .iter()
                .map(|j| j.working_days as f64)
                .sum::<f64>()
                / estimate.jobs.len() as f64
        };

        Self {
            total_days: estimate.total_days,
            job_count: estimate.jobs.len(),
            utilization_by_station,
            avg_utilization,
            total_idle_hours,
            avg_flow_days,
        }
    }

    /// Station with the highest utilization, if any.
    pub fn bottleneck(&self) -> Option<(&str, f64)> {
        self.utilization_by_station
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(id, u)| (id.as_str(), *u))
    }
}
