//! Workstation model.
//!
//! A workstation is one fixed-capacity stage of the production pipeline.
//! Every job passes through every workstation in the configured order.
//!
//! # Cost
//! `hours_required` is charged per unit passing through the station,
//! `setup_time` once per job. Both are hours and never negative.

use serde::{Deserialize, Serialize};

/// A processing stage in the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workstation {
    /// Unique workstation identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Hours consumed per unit passed through this station.
    pub hours_required: f64,
    /// One-time hours per job (default: 0).
    #[serde(default)]
    pub setup_time: f64,
}

impl Workstation {
    /// Creates a workstation with zero cost.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            hours_required: 0.0,
            setup_time: 0.0,
        }
    }

    /// Sets the workstation name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the per-unit hours.
    pub fn with_hours(mut self, hours_required: f64) -> Self {
        self.hours_required = hours_required;
        self
    }

    /// Sets the per-job setup hours.
    pub fn with_setup(mut self, setup_time: f64) -> Self {
        self.setup_time = setup_time;
        self
    }

    /// Hours this station needs for `quantity` units of one job.
    #[inline]
    pub fn hours_for(&self, quantity: f64) -> f64 {
        quantity * self.hours_required + self.setup_time
    }
}

/// Sum of per-unit hours across a pipeline.
pub fn total_hours_per_unit(stations: &[Workstation]) -> f64 {
    stations.iter().map(|s| s.hours_required).sum()
}

/// Sum of setup hours across a pipeline.
pub fn total_setup_time(stations: &[Workstation]) -> f64 {
    stations.iter().map(|s| s.setup_time).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workstation_builder() {
        let ws = Workstation::new("WS1")
            .with_name("Edge Banding")
            .with_hours(1.5)
            .with_setup(2.0);

        assert_eq!(ws.id, "WS1");
        assert_eq!(ws.name, "Edge Banding");
        assert!((ws.hours_required - 1.5).abs() < 1e-10);
        assert!((ws.setup_time - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_hours_for_quantity() {
        let ws = Workstation::new("WS1").with_hours(1.5).with_setup(2.0);
        assert!((ws.hours_for(4.0) - 8.0).abs() < 1e-10);
        assert!((ws.hours_for(0.0) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_pipeline_totals() {
        let stations = vec![
            Workstation::new("A").with_hours(2.0).with_setup(1.0),
            Workstation::new("B").with_hours(3.0),
        ];
        assert!((total_hours_per_unit(&stations) - 5.0).abs() < 1e-10);
        assert!((total_setup_time(&stations) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_setup_defaults_when_absent() {
        let ws: Workstation =
            serde_json::from_str(r#"{"id":"A","name":"Cut","hours_required":4.0}"#).unwrap();
        assert_eq!(ws.setup_time, 0.0);
    }
}
