//! Production estimation for flow-shop pipelines.
//!
//! Estimates when manufacturing jobs will start and finish as they flow
//! through an ordered sequence of fixed-capacity workstations, under a
//! daily hour budget, and projects the result onto business-day dates.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Job`, `Workstation`, `Estimate`,
//!   `Holidays`, and the business-day calendar
//! - **`estimator`**: Interchangeable strategies: `FlowShopSimulator`
//!   (day-by-day, per-station state) and `ThroughputEstimator` (aggregate)
//! - **`report`**: Day-offset to date resolution and run summaries
//! - **`store`**: Record store interface, boundary parsing, in-memory store
//! - **`pipeline`**: Load → estimate → resolve → write-back orchestration
//! - **`validation`**: Input checks run before any computation
//! - **`config`**: Strategy, cost model, and field mapping
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use u_pipeline::config::EstimationConfig;
//! use u_pipeline::models::{Holidays, Job, Workstation};
//! use u_pipeline::pipeline::{Pipeline, PipelineInputs};
//!
//! let inputs = PipelineInputs {
//!     workstations: vec![
//!         Workstation::new("cut").with_hours(4.0),
//!         Workstation::new("assemble").with_hours(4.0),
//!     ],
//!     jobs: vec![Job::new("J1").with_quantity(1.0), Job::new("J2").with_quantity(1.0)],
//!     holidays: Holidays::new(),
//! };
//! let epoch = NaiveDate::from_ymd_opt(2025, 5, 23).unwrap();
//! let (estimate, dates) = Pipeline::new(EstimationConfig::default())
//!     .plan(&inputs, epoch)
//!     .unwrap();
//!
//! assert_eq!(estimate.total_days, 1);
//! assert!(dates.iter().all(|d| d.end_date == Some(epoch)));
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Baker & Trietsch (2019), "Principles of Sequencing and Scheduling"

pub mod config;
pub mod error;
pub mod estimator;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod store;
pub mod validation;

pub use error::{EstimateError, PerRecordWriteError, Result, StoreError};
