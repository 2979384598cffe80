//! Estimation configuration.
//!
//! Selects the estimator strategy and the cost model explicitly, along
//! with the working-day budget and the external field mapping. Every
//! field has a default, so a partial JSON document is a valid config.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Which estimator computes the day-offset schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimationStrategy {
    /// Day-by-day simulation with per-station state.
    #[default]
    FlowShop,
    /// Aggregate hours over combined pipeline capacity.
    Throughput,
}

impl EstimationStrategy {
    /// Strategy name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FlowShop => "flow_shop",
            Self::Throughput => "throughput",
        }
    }
}

/// How the flow-shop simulation charges a job at each station.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationCostModel {
    /// A tracked job costs `hours_required` at each station, whatever its
    /// quantity.
    #[default]
    PerStation,
    /// A tracked job costs `quantity × hours_required + setup_time` at each
    /// station. Manual hours are split across stations in proportion to
    /// `hours_required`.
    ScaledByQuantity,
}

/// Names of the fields read from and written to the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMap {
    /// Collection holding jobs.
    pub jobs_collection: String,
    /// Collection holding workstations, in pipeline order.
    pub workstations_collection: String,
    /// Collection holding name/value settings.
    pub config_collection: String,

    /// Workstation name.
    pub workstation_name: String,
    /// Per-unit hours.
    pub workstation_hours: String,
    /// Per-job setup hours.
    pub workstation_setup: String,

    /// Job name.
    pub job_name: String,
    /// Product line.
    pub job_category: String,
    /// Manufacturing status.
    pub job_status: String,
    /// Recorded manual hours.
    pub job_manual_hours: String,
    /// Unit count.
    pub job_quantity: String,
    /// Priority sort key (number or date).
    pub job_priority: String,
    /// Install status; complete jobs are skipped.
    pub job_install_status: String,

    /// Setting name.
    pub config_name: String,
    /// Setting value.
    pub config_value: String,
    /// Setting name of the holiday list.
    pub holidays_key: String,

    /// Written: estimated start date.
    pub out_start_date: String,
    /// Written: estimated completion date.
    pub out_end_date: String,
    /// Written: working days.
    pub out_working_days: String,
}

impl Default for FieldMap {
    fn default() -> Self {
        Self {
            jobs_collection: "Jobs".into(),
            workstations_collection: "Workstations".into(),
            config_collection: "Configuration".into(),
            workstation_name: "Workstation Name".into(),
            workstation_hours: "Time per Cabinet".into(),
            workstation_setup: "Setup Time".into(),
            job_name: "Job Name".into(),
            job_category: "Cabinet Line".into(),
            job_status: "MO Status".into(),
            job_manual_hours: "MO Time".into(),
            job_quantity: "Unit Count".into(),
            job_priority: "Needs By".into(),
            job_install_status: "Install Status".into(),
            config_name: "Name".into(),
            config_value: "Value".into(),
            holidays_key: "Holidays".into(),
            out_start_date: "Est. Start Date".into(),
            out_end_date: "Est. Complete Date".into(),
            out_working_days: "Days to Complete".into(),
        }
    }
}

/// Configuration for one estimation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimationConfig {
    /// Working hours available per station per day.
    pub hours_per_day: f64,
    /// Estimator strategy.
    pub strategy: EstimationStrategy,
    /// Flow-shop station cost model.
    pub cost_model: StationCostModel,
    /// Only jobs in this category need pipeline hours. `None` = all jobs.
    pub tracked_category: Option<String>,
    /// Simulation day cap.
    pub max_days: u32,
    /// Days of activity log kept by the summary formatter.
    pub diagnostic_days: usize,
    /// External field mapping.
    pub fields: FieldMap,
}

/// Default simulation day cap.
pub const DEFAULT_MAX_DAYS: u32 = 365;

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            hours_per_day: 8.0,
            strategy: EstimationStrategy::FlowShop,
            cost_model: StationCostModel::PerStation,
            tracked_category: None,
            max_days: DEFAULT_MAX_DAYS,
            diagnostic_days: 30,
            fields: FieldMap::default(),
        }
    }
}

impl EstimationConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the daily hour budget.
    pub fn with_hours_per_day(mut self, hours: f64) -> Self {
        self.hours_per_day = hours;
        self
    }

    /// Sets the estimator strategy.
    pub fn with_strategy(mut self, strategy: EstimationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the station cost model.
    pub fn with_cost_model(mut self, cost_model: StationCostModel) -> Self {
        self.cost_model = cost_model;
        self
    }

    /// Restricts pipeline hours to one category.
    pub fn with_tracked_category(mut self, category: impl Into<String>) -> Self {
        self.tracked_category = Some(category.into());
        self
    }

    /// Sets the simulation day cap.
    pub fn with_max_days(mut self, max_days: u32) -> Self {
        self.max_days = max_days;
        self
    }

    /// Sets the field mapping.
    pub fn with_fields(mut self, fields: FieldMap) -> Self {
        self.fields = fields;
        self
    }
}
