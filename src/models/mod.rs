//! Pipeline domain models.
//!
//! Provides the data types for describing a production pipeline and the
//! day-offset schedules estimated for it.
//!
//! # Domain Mappings
//!
//! | u-pipeline | Cabinet shop | Print shop |
//! |------------|--------------|------------|
//! | Job | Order | Print run |
//! | Workstation | Cut/Edge/Assembly | Prepress/Press/Bindery |
//! | Holidays | Plant closures | Plant closures |
//! | Estimate | Production forecast | Run forecast |

pub mod calendar;
mod job;
mod schedule;
mod workstation;

pub use calendar::{BusinessCalendar, BusinessDayOffset, Holidays};
pub use job::{priority_order, Job, ManufacturingStatus, DEFAULT_PRIORITY};
pub use schedule::{
    ActivitySlice, Estimate, JobRef, ScheduledJob, SimulationDayRecord, StationActivity,
};
pub use workstation::{total_hours_per_unit, total_setup_time, Workstation};
