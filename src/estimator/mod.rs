//! Estimator strategies and run KPIs.
//!
//! Two interchangeable strategies compute a day-offset schedule for the
//! same request:
//!
//! - [`FlowShopSimulator`]: day-by-day simulation with per-station state.
//! - [`ThroughputEstimator`]: aggregate hours over combined capacity.
//!
//! The strategy is selected explicitly through
//! [`EstimationStrategy`](crate::config::EstimationStrategy).
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 6 (Flow Shops)
//! - Baker & Trietsch (2019), "Principles of Sequencing and Scheduling"

mod flow_shop;
mod kpi;
mod throughput;

pub use flow_shop::FlowShopSimulator;
pub use kpi::RunKpi;
pub use throughput::{JobSpan, ThroughputEstimator, ThroughputState};

use std::fmt::Debug;

use crate::config::{EstimationConfig, EstimationStrategy, StationCostModel, DEFAULT_MAX_DAYS};
use crate::error::{EstimateError, Result};
use crate::models::{priority_order, total_hours_per_unit, Estimate, Job, Workstation};
use crate::validation::validate_input;

/// Input container for estimation.
#[derive(Debug, Clone)]
pub struct EstimateRequest {
    /// Pipeline stations, in processing order.
    pub workstations: Vec<Workstation>,
    /// Jobs to schedule (any order; admission follows priority).
    pub jobs: Vec<Job>,
    /// Working hours per station per day.
    pub hours_per_day: f64,
    /// Only jobs in this category need pipeline hours. `None` = all jobs.
    pub tracked_category: Option<String>,
    /// Flow-shop station cost model.
    pub cost_model: StationCostModel,
    /// Simulation day cap.
    pub max_days: u32,
}

impl EstimateRequest {
    /// Creates a request with an 8-hour day and the default day cap.
    pub fn new(workstations: Vec<Workstation>, jobs: Vec<Job>) -> Self {
        Self {
            workstations,
            jobs,
            hours_per_day: 8.0,
            tracked_category: None,
            cost_model: StationCostModel::PerStation,
            max_days: DEFAULT_MAX_DAYS,
        }
    }

    /// Creates a request using the settings of a configuration.
    pub fn from_config(
        config: &EstimationConfig,
        workstations: Vec<Workstation>,
        jobs: Vec<Job>,
    ) -> Self {
        Self {
            workstations,
            jobs,
            hours_per_day: config.hours_per_day,
            tracked_category: config.tracked_category.clone(),
            cost_model: config.cost_model,
            max_days: config.max_days,
        }
    }

    /// Sets the daily hour budget.
    pub fn with_hours_per_day(mut self, hours: f64) -> Self {
        self.hours_per_day = hours;
        self
    }

    /// Restricts pipeline hours to one category.
    pub fn with_tracked_category(mut self, category: impl Into<String>) -> Self {
        self.tracked_category = Some(category.into());
        self
    }

    /// Sets the station cost model.
    pub fn with_cost_model(mut self, cost_model: StationCostModel) -> Self {
        self.cost_model = cost_model;
        self
    }

    /// Sets the simulation day cap.
    pub fn with_max_days(mut self, max_days: u32) -> Self {
        self.max_days = max_days;
        self
    }

    /// Checks the request, reporting every issue at once.
    pub fn validate(&self) -> Result<()> {
        validate_input(self.hours_per_day, &self.workstations, &self.jobs)
            .map_err(EstimateError::Configuration)
    }

    /// Jobs in admission order (ascending priority, stable).
    pub fn ordered_jobs(&self) -> Vec<&Job> {
        priority_order(&self.jobs)
            .into_iter()
            .map(|i| &self.jobs[i])
            .collect()
    }

    /// Hours a job needs from the whole pipeline.
    pub fn required_hours(&self, job: &Job) -> f64 {
        job.required_hours(&self.workstations, self.tracked_category.as_deref())
    }

    /// Hours a job is charged at each station, in pipeline order.
    ///
    /// Under [`StationCostModel::PerStation`] only untracked jobs without
    /// manual hours cost zero; quantity plays no part. Under
    /// [`StationCostModel::ScaledByQuantity`] any job that needs no
    /// pipeline hours costs zero everywhere.
    pub fn station_costs(&self, job: &Job) -> Vec<f64> {
        let zero = vec![0.0; self.workstations.len()];

        match self.cost_model {
            StationCostModel::PerStation => {
                let untracked = !job.is_tracked(self.tracked_category.as_deref());
                if untracked && job.override_hours().is_none() {
                    return zero;
                }
                self.workstations
                    .iter()
                    .map(|ws| ws.hours_required)
                    .collect()
            }
            StationCostModel::ScaledByQuantity if self.required_hours(job) <= 0.0 => zero,
            StationCostModel::ScaledByQuantity => match job.override_hours() {
                Some(hours) => split_hours(hours, &self.workstations),
                None => self
                    .workstations
                    .iter()
                    .map(|ws| ws.hours_for(job.quantity))
                    .collect(),
            },
        }
    }
}

/// Splits a total across stations in proportion to `hours_required`,
/// evenly when every station has zero per-unit hours.
fn split_hours(total: f64, stations: &[Workstation]) -> Vec<f64> {
    let per_unit = total_hours_per_unit(stations);
    if per_unit > 0.0 {
        stations
            .iter()
            .map(|ws| total * ws.hours_required / per_unit)
            .collect()
    } else {
        vec![total / stations.len() as f64; stations.len()]
    }
}

/// A strategy that turns a request into a day-offset schedule.
pub trait Estimator: Send + Sync + Debug {
    /// Strategy implemented by this estimator.
    fn strategy(&self) -> EstimationStrategy;

    /// Computes the schedule.
    ///
    /// # Errors
    /// [`EstimateError::Configuration`] if the request is invalid; nothing
    /// is computed in that case.
    fn estimate(&self, request: &EstimateRequest) -> Result<Estimate>;
}

/// Returns the estimator for a strategy.
pub fn estimator_for(strategy: EstimationStrategy) -> Box<dyn Estimator> {
    match strategy {
        EstimationStrategy::FlowShop => Box::new(FlowShopSimulator::new()),
        EstimationStrategy::Throughput => Box::new(ThroughputEstimator::new()),
    }
}
