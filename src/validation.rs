//! Input validation for estimation runs.
//!
//! Checks the pipeline and job list before any computation starts, so a
//! run either has well-formed input or computes nothing. Detects:
//! - Missing workstations or jobs
//! - Non-positive daily hour budget
//! - Duplicate IDs
//! - Negative hours, setup times, quantities, or manual hours

use std::collections::HashSet;

use crate::models::{Job, Workstation};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// No workstations were supplied.
    NoWorkstations,
    /// No jobs were supplied.
    NoJobs,
    /// The daily hour budget is zero, negative, or not finite.
    InvalidHoursPerDay,
    /// Two entities share the same ID.
    DuplicateId,
    /// A numeric field that must be non-negative is not.
    NegativeValue,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input of an estimation run.
///
/// Checks:
/// 1. At least one workstation and one job
/// 2. `hours_per_day` is finite and positive
/// 3. No duplicate workstation or job IDs
/// 4. Station hours and setup times are finite and non-negative
/// 5. Job quantities and manual hours are finite and non-negative
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    hours_per_day: f64,
    workstations: &[Workstation],
    jobs: &[Job],
) -> ValidationResult {
    let mut errors = Vec::new();

    if workstations.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoWorkstations,
            "No workstations supplied",
        ));
    }
    if jobs.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoJobs,
            "No jobs supplied",
        ));
    }
    if !(hours_per_day.is_finite() && hours_per_day > 0.0) {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidHoursPerDay,
            format!("hours_per_day must be positive, got {hours_per_day}"),
        ));
    }

    let mut station_ids = HashSet::new();
    for ws in workstations {
        if !station_ids.insert(ws.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate workstation ID: {}", ws.id),
            ));
        }
        check_non_negative(&mut errors, ws.hours_required, || {
            format!("Workstation '{}' has invalid hours_required", ws.id)
        });
        check_non_negative(&mut errors, ws.setup_time, || {
            format!("Workstation '{}' has invalid setup_time", ws.id)
        });
    }

    let mut job_ids = HashSet::new();
    for job in jobs {
        if !job_ids.insert(job.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate job ID: {}", job.id),
            ));
        }
        check_non_negative(&mut errors, job.quantity, || {
            format!("Job '{}' has invalid quantity", job.id)
        });
        if let Some(hours) = job.manual_hours {
            check_non_negative(&mut errors, hours, || {
                format!("Job '{}' has invalid manual hours", job.id)
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_non_negative(
    errors: &mut Vec<ValidationError>,
    value: f64,
    message: impl FnOnce() -> String,
) {
    if !(value.is_finite() && value >= 0.0) {
        errors.push(ValidationError::new(
            ValidationErrorKind::NegativeValue,
            format!("{} ({value})", message()),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_stations() -> Vec<Workstation> {
        vec![
            Workstation::new("S1").with_name("Cut").with_hours(2.0),
            Workstation::new("S2").with_name("Assemble").with_hours(3.0).with_setup(1.0),
        ]
    }

    fn sample_jobs() -> Vec<Job> {
        vec![
            Job::new("J1").with_quantity(2.0).with_priority(1),
            Job::new("J2").with_quantity(1.0),
        ]
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(8.0, &sample_stations(), &sample_jobs()).is_ok());
    }

    #[test]
    fn test_no_jobs() {
        let errors = validate_input(8.0, &sample_stations(), &[]).unwrap_err();
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::NoJobs));
    }

    #[test]
    fn test_no_workstations() {
        let errors = validate_input(8.0, &[], &sample_jobs()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::NoWorkstations));
    }

    #[test]
    fn test_non_positive_hours_per_day() {
        for hours in [0.0, -8.0, f64::NAN, f64::INFINITY] {
            let errors = validate_input(hours, &sample_stations(), &sample_jobs()).unwrap_err();
            assert!(errors
                .iter()
                .any(|e| e.kind == ValidationErrorKind::InvalidHoursPerDay));
        }
    }

    #[test]
    fn test_duplicate_ids() {
        let stations = vec![Workstation::new("S1"), Workstation::new("S1")];
        let jobs = vec![Job::new("J1"), Job::new("J1")];

        let errors = validate_input(8.0, &stations, &jobs).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("workstation")));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("job")));
    }

    #[test]
    fn test_negative_values() {
        let stations = vec![Workstation::new("S1").with_hours(-1.0)];
        let jobs = vec![Job::new("J1").with_quantity(-2.0).with_manual_hours(-5.0)];

        let errors = validate_input(8.0, &stations, &jobs).unwrap_err();
        let negatives = errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::NegativeValue)
            .count();
        assert_eq!(negatives, 3);
    }

    #[test]
    fn test_multiple_errors() {
        let errors = validate_input(0.0, &[], &[]).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
