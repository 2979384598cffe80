//! Aggregate throughput estimator.
//!
//! Treats the pipeline as one pool of `hours_per_day × station_count`
//! hours per day and lays jobs end to end in priority order.
//!
//! # Algorithm
//!
//! Two accumulators carry across jobs: running hours and a day offset.
//! For each job:
//!
//! 1. `start = day_offset`
//! 2. `duration = ceil(job_hours / capacity)`
//! 3. `running += job_hours`; `day_offset += floor(running / capacity)`;
//!    `running = running mod capacity`
//!
//! Leftover hours roll into the next job instead of rounding every job up
//! to a whole day, modeling capacity shared between consecutive jobs.
//!
//! The accumulators live in [`ThroughputState`], passed into and returned
//! from every step, so no state survives between runs.

use tracing::info;

use super::{EstimateRequest, Estimator};
use crate::config::EstimationStrategy;
use crate::error::Result;
use crate::models::{Estimate, ScheduledJob};

/// Accumulators carried from one job to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThroughputState {
    /// Hours of the current day already claimed by earlier jobs.
    pub running_hours: f64,
    /// Whole days fully consumed so far (0-based offset of the current day).
    pub day_offset: u32,
}

/// Where one job lands in the aggregate model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSpan {
    /// 0-based day offset of the job's first day.
    pub start_offset: u32,
    /// Whole days the job's hours occupy on their own.
    pub duration_days: u32,
}

impl JobSpan {
    /// 1-based first day.
    pub fn start_day(&self) -> u32 {
        self.start_offset + 1
    }

    /// 1-based last day (equal to the first day for zero-duration jobs).
    pub fn end_day(&self) -> u32 {
        self.start_day() + self.duration_days.saturating_sub(1)
    }
}

/// Aggregate estimator.
#[derive(Debug, Clone, Default)]
pub struct ThroughputEstimator;

impl ThroughputEstimator {
    /// Creates an estimator.
    pub fn new() -> Self {
        Self
    }

    /// Combined daily hours of the whole pipeline.
    pub fn combined_capacity(request: &EstimateRequest) -> f64 {
        request.hours_per_day * request.workstations.len() as f64
    }

    /// Places one job and advances the accumulators.
    ///
    /// `capacity` must be positive.
    pub fn step(state: ThroughputState, job_hours: f64, capacity: f64) -> (JobSpan, ThroughputState) {
        let span = JobSpan {
            start_offset: state.day_offset,
            duration_days: (job_hours / capacity).ceil() as u32,
        };

        let running = state.running_hours + job_hours;
        let full_days = (running / capacity).floor();
        let next = ThroughputState {
            running_hours: running - full_days * capacity,
            day_offset: state.day_offset + full_days as u32,
        };

        (span, next)
    }

    /// Schedules every job from an empty state.
    pub fn run(&self, request: &EstimateRequest) -> Result<Estimate> {
        request.validate()?;

        let capacity = Self::combined_capacity(request);
        let mut state = ThroughputState::default();
        let mut jobs = Vec::with_capacity(request.jobs.len());

        for job in request.ordered_jobs() {
            let hours = request.required_hours(job);
            let (span, next) = Self::step(state, hours, capacity);
            state = next;

            jobs.push(ScheduledJob {
                job_id: job.id.clone(),
                job_name: job.name.clone(),
                start_day: span.start_day(),
                end_day: span.end_day(),
                working_days: span.duration_days,
                total_hours: hours,
            });
        }

        let total_days = jobs.iter().map(|j| j.end_day).max().unwrap_or(0);
        info!(
            jobs = jobs.len(),
            capacity,
            total_days,
            "throughput estimate finished"
        );

        Ok(Estimate {
            strategy: EstimationStrategy::Throughput,
            jobs,
            days: Vec::new(),
            total_days,
        })
    }
}

impl Estimator for ThroughputEstimator {
    fn strategy(&self) -> EstimationStrategy {
        EstimationStrategy::Throughput
    }

    fn estimate(&self, request: &EstimateRequest) -> Result<Estimate> {
        self.run(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Job, ManufacturingStatus, Workstation};

    fn stations() -> Vec<Workstation> {
        // 2 stations × 8h = 16h/day; 4h per unit; 2h setup per job.
        vec![
            Workstation::new("S1").with_hours(1.0).with_setup(2.0),
            Workstation::new("S2").with_hours(3.0),
        ]
    }

    #[test]
    fn test_step_carries_remainder() {
        let (a, s) = ThroughputEstimator::step(ThroughputState::default(), 10.0, 16.0);
        assert_eq!(a, JobSpan { start_offset: 0, duration_days: 1 });
        assert_eq!(s.day_offset, 0);
        assert!((s.running_hours - 10.0).abs() < 1e-10);

        let (b, s) = ThroughputEstimator::step(s, 10.0, 16.0);
        assert_eq!(b.start_offset, 0);
        assert_eq!(s.day_offset, 1);
        assert!((s.running_hours - 4.0).abs() < 1e-10);

        let (c, _) = ThroughputEstimator::step(s, 1.0, 16.0);
        assert_eq!(c.start_offset, 1);
    }

    #[test]
    fn test_step_exact_day_resets_running_hours() {
        let (_, s) = ThroughputEstimator::step(ThroughputState::default(), 16.0, 16.0);
        assert_eq!(s.day_offset, 1);
        assert_eq!(s.running_hours, 0.0);

        // The next job starts on a fresh day and is not pushed further.
        let (span, s) = ThroughputEstimator::step(s, 8.0, 16.0);
        assert_eq!(span.start_offset, 1);
        assert_eq!(s.day_offset, 1);
    }

    #[test]
    fn test_step_is_pure() {
        let state = ThroughputState {
            running_hours: 3.0,
            day_offset: 4,
        };
        assert_eq!(
            ThroughputEstimator::step(state, 20.0, 16.0),
            ThroughputEstimator::step(state, 20.0, 16.0)
        );
    }

    #[test]
    fn test_run_orders_by_priority() {
        let jobs = vec![
            Job::new("B").with_quantity(3.0).with_priority(2),
            Job::new("A").with_quantity(7.0).with_priority(1),
        ];
        let request = EstimateRequest::new(stations(), jobs);
        let estimate = ThroughputEstimator::new().run(&request).unwrap();

        // A: 7 × 4 + 2 = 30h → 2 days starting day 1.
        let a = estimate.job("A").unwrap();
        assert_eq!((a.start_day, a.end_day, a.working_days), (1, 2, 2));
        assert!((a.total_hours - 30.0).abs() < 1e-10);

        // B: starts after the first full day, with 14h carried.
        let b = estimate.job("B").unwrap();
        assert_eq!(b.start_day, 2);
        assert_eq!(estimate.jobs[0].job_id, "A");
        assert!(estimate.days.is_empty());
    }

    #[test]
    fn test_manual_hours_override() {
        let jobs = vec![Job::new("J1")
            .with_quantity(100.0)
            .with_category("Stock")
            .with_status(ManufacturingStatus::InProgress)
            .with_manual_hours(40.0)];
        let request = EstimateRequest::new(stations(), jobs).with_tracked_category("Custom");
        let estimate = ThroughputEstimator::new().run(&request).unwrap();

        let j1 = estimate.job("J1").unwrap();
        assert_eq!(j1.total_hours, 40.0);
        assert_eq!(j1.working_days, 3);
    }

    #[test]
    fn test_untracked_zero_hours() {
        let jobs = vec![
            Job::new("J1").with_quantity(2.0).with_category("Stock"),
            Job::new("J2").with_quantity(2.0).with_category("Custom"),
        ];
        let request = EstimateRequest::new(stations(), jobs).with_tracked_category("Custom");
        let estimate = ThroughputEstimator::new().run(&request).unwrap();

        let j1 = estimate.job("J1").unwrap();
        assert_eq!(j1.total_hours, 0.0);
        assert_eq!(j1.working_days, 0);
        assert_eq!(estimate.job("J2").unwrap().start_day, 1);
    }

    #[test]
    fn test_empty_jobs_rejected() {
        let request = EstimateRequest::new(stations(), vec![]);
        assert!(ThroughputEstimator::new()
            .run(&request)
            .unwrap_err()
            .is_configuration());
    }
}
