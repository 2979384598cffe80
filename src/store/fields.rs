//! Boundary parsing of external records.
//!
//! External cell values come in several shapes: plain numbers and strings,
//! numbers stored as strings, single-element arrays from linked or lookup
//! fields, and `{ "name": .. }` / `{ "value": .. }` objects from select
//! fields. Everything is normalized here so the core only ever sees typed,
//! optional values. Absent or malformed values become zero/empty/`None`.

use chrono::{Datelike, NaiveDate};
use serde_json::Value;
use tracing::{debug, warn};

use super::Record;
use crate::config::FieldMap;
use crate::models::{Holidays, Job, ManufacturingStatus, Workstation};

/// Unwraps single-element arrays and `value`/`name` objects.
///
/// Returns `None` for null, empty arrays, and empty wrappers.
pub fn unwrap_cell(value: &Value) -> Option<&Value> {
    match value {
        Value::Null => None,
        Value::Array(items) => items.first().and_then(unwrap_cell),
        Value::Object(map) => match map.get("value").or_else(|| map.get("name")) {
            Some(inner) => unwrap_cell(inner),
            None => Some(value),
        },
        _ => Some(value),
    }
}

/// Reads a cell as a number, if it is one.
pub fn cell_f64(value: Option<&Value>) -> Option<f64> {
    let number = match value.and_then(unwrap_cell)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Reads a cell as a number, defaulting to zero.
pub fn cell_f64_or_zero(value: Option<&Value>) -> f64 {
    cell_f64(value).unwrap_or(0.0)
}

/// Reads a cell as text.
pub fn cell_string(value: Option<&Value>) -> Option<String> {
    match value.and_then(unwrap_cell)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reads a cell as a date, dropping any time part.
pub fn cell_date(value: Option<&Value>) -> Option<NaiveDate> {
    let text = cell_string(value)?;
    let date_part = text.split(['T', ' ']).next().unwrap_or(&text);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Reads a priority sort key.
///
/// Numbers are used as-is (rounded); dates become their day number so
/// earlier dates sort first.
pub fn cell_priority(value: Option<&Value>) -> Option<i64> {
    if let Some(n) = cell_f64(value) {
        return Some(n.round() as i64);
    }
    cell_date(value).map(|d| i64::from(d.num_days_from_ce()))
}

/// Parses a workstation record.
pub fn parse_workstation(record: &Record, fields: &FieldMap) -> Workstation {
    Workstation {
        id: record.id.clone(),
        name: cell_string(record.get(&fields.workstation_name)).unwrap_or_default(),
        hours_required: cell_f64_or_zero(record.get(&fields.workstation_hours)),
        setup_time: cell_f64_or_zero(record.get(&fields.workstation_setup)),
    }
}

/// Parses a job record.
///
/// Returns `None` for jobs whose install or manufacturing status is
/// complete; they no longer need pipeline time.
pub fn parse_job(record: &Record, fields: &FieldMap) -> Option<Job> {
    let status = cell_string(record.get(&fields.job_status))
        .map(|s| ManufacturingStatus::from_label(&s))
        .unwrap_or_default();
    let install_status = cell_string(record.get(&fields.job_install_status))
        .map(|s| ManufacturingStatus::from_label(&s))
        .unwrap_or_default();

    if status == ManufacturingStatus::Complete || install_status == ManufacturingStatus::Complete {
        debug!(job = %record.id, "skipping completed job");
        return None;
    }

    Some(Job {
        id: record.id.clone(),
        name: cell_string(record.get(&fields.job_name)).unwrap_or_default(),
        category: cell_string(record.get(&fields.job_category)),
        quantity: cell_f64_or_zero(record.get(&fields.job_quantity)).max(0.0),
        priority: cell_priority(record.get(&fields.job_priority)),
        status,
        manual_hours: cell_f64(record.get(&fields.job_manual_hours)),
    })
}

/// Reads the holiday list from configuration records.
///
/// Uses the record whose name field equals `fields.holidays_key`. The value
/// may be a separated string or an array of entries.
pub fn parse_holidays(records: &[Record], fields: &FieldMap) -> Holidays {
    let Some(record) = records.iter().find(|r| {
        cell_string(r.get(&fields.config_name)).as_deref() == Some(fields.holidays_key.as_str())
    }) else {
        warn!(key = %fields.holidays_key, "no holiday configuration found");
        return Holidays::new();
    };

    match record.get(&fields.config_value) {
        Some(Value::String(list)) => Holidays::parse_list(list),
        Some(Value::Array(items)) => {
            let list: Vec<String> = items.iter().filter_map(|v| cell_string(Some(v))).collect();
            Holidays::parse_list(&list.join(","))
        }
        _ => Holidays::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_cell_shapes() {
        assert_eq!(unwrap_cell(&json!(null)), None);
        assert_eq!(unwrap_cell(&json!([])), None);
        assert_eq!(unwrap_cell(&json!(5)), Some(&json!(5)));
        assert_eq!(unwrap_cell(&json!([{"value": 12}])), Some(&json!(12)));
        assert_eq!(unwrap_cell(&json!({"name": "In Progress"})), Some(&json!("In Progress")));
        assert_eq!(unwrap_cell(&json!([{"value": null}])), None);
    }

    #[test]
    fn test_cell_numbers() {
        assert_eq!(cell_f64(Some(&json!(" 2.5 "))), Some(2.5));
        assert_eq!(cell_f64(Some(&json!([{"value": 4}]))), Some(4.0));
        assert_eq!(cell_f64(Some(&json!("n/a"))), None);
        assert_eq!(cell_f64(None), None);
        assert_eq!(cell_f64_or_zero(Some(&json!(true))), 0.0);
    }

    #[test]
    fn test_cell_priority() {
        assert_eq!(cell_priority(Some(&json!(3))), Some(3));
        let early = cell_priority(Some(&json!("2025-06-01"))).unwrap();
        let late = cell_priority(Some(&json!("2025-06-15T00:00:00.000Z"))).unwrap();
        assert!(early < late);
        assert_eq!(cell_priority(Some(&json!("soon"))), None);
    }

    #[test]
    fn test_undated_jobs_admitted_after_dated() {
        let fields = FieldMap::default();
        let jobs: Vec<Job> = [
            Record::new("undated"),
            Record::new("late").with_field("Needs By", "2025-09-01"),
            Record::new("early").with_field("Needs By", json!([{"value": "2025-06-01"}])),
        ]
        .iter()
        .filter_map(|r| parse_job(r, &fields))
        .collect();

        let order: Vec<&str> = crate::models::priority_order(&jobs)
            .into_iter()
            .map(|i| jobs[i].id.as_str())
            .collect();
        assert_eq!(order, vec!["early", "late", "undated"]);
    }

    #[test]
    fn test_parse_workstation_defaults() {
        let fields = FieldMap::default();
        let record = Record::new("rec1")
            .with_field("Workstation Name", "Cut")
            .with_field("Time per Cabinet", "1.5");
        let ws = parse_workstation(&record, &fields);
        assert_eq!(ws.id, "rec1");
        assert_eq!(ws.name, "Cut");
        assert_eq!(ws.hours_required, 1.5);
        assert_eq!(ws.setup_time, 0.0);
    }

    #[test]
    fn test_parse_job_wrapped_fields() {
        let fields = FieldMap::default();
        let record = Record::new("recJ")
            .with_field("Job Name", "Smith Kitchen")
            .with_field("Cabinet Line", json!([{"value": "JG Customs"}]))
            .with_field("MO Status", json!({"name": "In Progress"}))
            .with_field("MO Time", 40)
            .with_field("Unit Count", json!([{"value": 12}]))
            .with_field("Needs By", "2025-07-01")
            .with_field("Install Status", json!([{"value": "Scheduled"}]));

        let job = parse_job(&record, &fields).unwrap();
        assert_eq!(job.name, "Smith Kitchen");
        assert_eq!(job.category.as_deref(), Some("JG Customs"));
        assert_eq!(job.status, ManufacturingStatus::InProgress);
        assert_eq!(job.manual_hours, Some(40.0));
        assert_eq!(job.quantity, 12.0);
        assert!(job.priority.is_some());
        assert_eq!(job.override_hours(), Some(40.0));
    }

    #[test]
    fn test_parse_job_missing_fields() {
        let job = parse_job(&Record::new("recJ"), &FieldMap::default()).unwrap();
        assert_eq!(job.name, "");
        assert_eq!(job.category, None);
        assert_eq!(job.quantity, 0.0);
        assert_eq!(job.priority, None);
        assert_eq!(job.status, ManufacturingStatus::NotStarted);
    }

    #[test]
    fn test_parse_job_skips_complete() {
        let fields = FieldMap::default();
        let installed = Record::new("a").with_field("Install Status", json!([{"value": "Complete"}]));
        let built = Record::new("b").with_field("MO Status", json!({"name": "Complete"}));
        assert!(parse_job(&installed, &fields).is_none());
        assert!(parse_job(&built, &fields).is_none());
    }

    #[test]
    fn test_parse_holidays() {
        let fields = FieldMap::default();
        let records = vec![
            Record::new("c1").with_field("Name", "Hours").with_field("Value", "8"),
            Record::new("c2")
                .with_field("Name", "Holidays")
                .with_field("Value", "12/25, 01/01, 2025-11-27"),
        ];
        let holidays = parse_holidays(&records, &fields);
        assert_eq!(holidays.len(), 3);
        assert!(holidays.contains(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
    }

    #[test]
    fn test_parse_holidays_array_and_missing() {
        let fields = FieldMap::default();
        let records = vec![Record::new("c1")
            .with_field("Name", "Holidays")
            .with_field("Value", json!(["2025-12-25", "2025-12-26"]))];
        assert_eq!(parse_holidays(&records, &fields).len(), 2);
        assert!(parse_holidays(&[], &fields).is_empty());
    }
}
