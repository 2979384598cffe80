//! Load → estimate → resolve dates → write back.
//!
//! Ties the record store, the configured estimator, and the calendar
//! together for one run. Loading and estimation fail fast; write-back
//! isolates failures per job so one bad record never blocks the rest.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::{EstimationConfig, FieldMap};
use crate::error::{PerRecordWriteError, Result};
use crate::estimator::{estimator_for, EstimateRequest, Estimator};
use crate::models::{BusinessCalendar, Estimate, Holidays, Job, Workstation};
use crate::report::{Aggregator, JobDates, ScheduleSummary};
use crate::store::fields::{parse_holidays, parse_job, parse_workstation};
use crate::store::{Fields, Query, RecordStore};

/// Typed inputs read from the store.
#[derive(Debug, Clone, Default)]
pub struct PipelineInputs {
    /// Stations, in store order.
    pub workstations: Vec<Workstation>,
    /// Open jobs, sorted by the priority field.
    pub jobs: Vec<Job>,
    /// Declared holidays.
    pub holidays: Holidays,
}

/// Outcome of a batch of per-job writes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteReport {
    /// Jobs written successfully.
    pub written: usize,
    /// Jobs whose write failed.
    pub failures: Vec<PerRecordWriteError>,
}

impl WriteReport {
    /// Whether every write succeeded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Result of a full run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Day-offset schedule.
    pub estimate: Estimate,
    /// Resolved dates and leading activity log.
    pub summary: ScheduleSummary,
    /// Write-back outcome.
    pub writes: WriteReport,
}

/// Reads workstations, open jobs (sorted by priority field), and holidays.
pub fn load_inputs<S: RecordStore>(store: &S, fields: &FieldMap) -> Result<PipelineInputs> {
    let workstations = store
        .select_records(&fields.workstations_collection, &Query::all())?
        .iter()
        .map(|r| parse_workstation(r, fields))
        .collect::<Vec<_>>();

    let job_query = Query::all().sorted_by(fields.job_priority.as_str());
    let jobs = store
        .select_records(&fields.jobs_collection, &job_query)?
        .iter()
        .filter_map(|r| parse_job(r, fields))
        .collect::<Vec<_>>();

    let holidays = match store.select_records(&fields.config_collection, &Query::all()) {
        Ok(records) => parse_holidays(&records, fields),
        Err(err) => {
            warn!(error = %err, "configuration unavailable, assuming no holidays");
            Holidays::new()
        }
    };

    info!(
        workstations = workstations.len(),
        jobs = jobs.len(),
        holidays = holidays.len(),
        "loaded pipeline inputs"
    );

    Ok(PipelineInputs {
        workstations,
        jobs,
        holidays,
    })
}

/// Field values written back for one job.
///
/// Cleared jobs get explicit nulls.
pub fn job_fields(dates: &JobDates, fields: &FieldMap) -> Fields {
    let date_value = |d: Option<NaiveDate>| {
        d.map_or(Value::Null, |d| Value::String(d.format("%Y-%m-%d").to_string()))
    };

    let mut out = Fields::new();
    out.insert(fields.out_start_date.clone(), date_value(dates.start_date));
    out.insert(fields.out_end_date.clone(), date_value(dates.end_date));
    out.insert(
        fields.out_working_days.clone(),
        dates.total_working_days.map_or(Value::Null, Value::from),
    );
    out
}

/// Writes every job's dates; failures are logged and collected.
pub fn write_back<S: RecordStore>(store: &S, fields: &FieldMap, dates: &[JobDates]) -> WriteReport {
    let mut report = WriteReport::default();

    for job in dates {
        match store.update_record(&fields.jobs_collection, &job.job_id, job_fields(job, fields)) {
            Ok(()) => report.written += 1,
            Err(source) => {
                warn!(job = %job.job_id, error = %source, "write-back failed");
                report.failures.push(PerRecordWriteError {
                    job_id: job.job_id.clone(),
                    source,
                });
            }
        }
    }

    info!(
        written = report.written,
        failed = report.failures.len(),
        "write-back finished"
    );
    report
}

/// One configured estimation pipeline.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: EstimationConfig,
}

impl Pipeline {
    /// Creates a pipeline for a configuration.
    pub fn new(config: EstimationConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &EstimationConfig {
        &self.config
    }

    /// Runs the configured estimator over already-loaded inputs.
    pub fn estimate(&self, inputs: &PipelineInputs) -> Result<Estimate> {
        let request = EstimateRequest::from_config(
            &self.config,
            inputs.workstations.clone(),
            inputs.jobs.clone(),
        );
        estimator_for(self.config.strategy).estimate(&request)
    }

    /// Estimates and resolves dates from `epoch` without touching a store.
    pub fn plan(&self, inputs: &PipelineInputs, epoch: NaiveDate) -> Result<(Estimate, Vec<JobDates>)> {
        let estimate = self.estimate(inputs)?;
        let calendar = BusinessCalendar::new(inputs.holidays.clone());
        let aggregator = Aggregator::new(&calendar, epoch, self.config.tracked_category.as_deref())?;
        let dates = aggregator.resolve(&estimate, &inputs.jobs)?;
        Ok((estimate, dates))
    }

    /// Full run: load, estimate, resolve dates, write back.
    ///
    /// Nothing is written if loading or estimation fails.
    pub fn run<S: RecordStore>(&self, store: &S, epoch: NaiveDate) -> Result<RunReport> {
        let inputs = load_inputs(store, &self.config.fields)?;
        let (estimate, dates) = self.plan(&inputs, epoch)?;
        let writes = write_back(store, &self.config.fields, &dates);
        let summary = ScheduleSummary::build(&estimate, dates, self.config.diagnostic_days);

        info!(
            strategy = self.config.strategy.name(),
            total_days = estimate.total_days,
            scheduled = summary.scheduled_count(),
            "estimation run finished"
        );

        Ok(RunReport {
            estimate,
            summary,
            writes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EstimationStrategy;
    use crate::error::{EstimateError, StoreError};
    use crate::store::{MemoryStore, Record};
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn shop() -> MemoryStore {
        MemoryStore::new()
            .with_collection(
                "Workstations",
                vec![
                    Record::new("ws1")
                        .with_field("Workstation Name", "Cut")
                        .with_field("Time per Cabinet", 4),
                    Record::new("ws2")
                        .with_field("Workstation Name", "Assemble")
                        .with_field("Time per Cabinet", 6)
                        .with_field("Setup Time", 2),
                ],
            )
            .with_collection(
                "Jobs",
                vec![
                    Record::new("j2")
                        .with_field("Job Name", "Second")
                        .with_field("Cabinet Line", json!([{"value": "JG Customs"}]))
                        .with_field("Unit Count", json!([{"value": 1}]))
                        .with_field("Needs By", "2025-06-10")
                        .with_field("Days to Complete", 99),
                    Record::new("j1")
                        .with_field("Job Name", "First")
                        .with_field("Cabinet Line", json!([{"value": "JG Customs"}]))
                        .with_field("Unit Count", json!([{"value": 1}]))
                        .with_field("Needs By", "2025-06-01"),
                    Record::new("stock")
                        .with_field("Job Name", "Stock run")
                        .with_field("Cabinet Line", json!([{"value": "Stock"}]))
                        .with_field("Needs By", "2025-06-05")
                        .with_field("Days to Complete", 7),
                    Record::new("done")
                        .with_field("Job Name", "Installed")
                        .with_field("Install Status", json!([{"value": "Complete"}])),
                ],
            )
            .with_collection(
                "Configuration",
                vec![Record::new("cfg")
                    .with_field("Name", "Holidays")
                    .with_field("Value", "05/26")],
            )
    }

    fn config() -> EstimationConfig {
        EstimationConfig::new().with_tracked_category("JG Customs")
    }

    #[test]
    fn test_load_inputs() {
        let inputs = load_inputs(&shop(), &FieldMap::default()).unwrap();
        assert_eq!(inputs.workstations.len(), 2);
        let ids: Vec<&str> = inputs.jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["j1", "stock", "j2"]);
        assert_eq!(inputs.holidays.len(), 1);
    }

    #[test]
    fn test_run_writes_dates() {
        let store = shop();
        let report = Pipeline::new(config())
            .run(&store, date(2025, 5, 23))
            .unwrap();

        assert!(report.writes.is_complete());
        assert_eq!(report.writes.written, 3);

        // j1 clears both stations on Friday 23rd; j2 gets 2h of Assemble.
        let j1 = store.record("Jobs", "j1").unwrap();
        assert_eq!(j1.get("Est. Start Date"), Some(&json!("2025-05-23")));
        assert_eq!(j1.get("Est. Complete Date"), Some(&json!("2025-05-23")));
        assert_eq!(j1.get("Days to Complete"), Some(&json!(1)));

        // j2 finishes after the weekend and the Monday holiday.
        let j2 = store.record("Jobs", "j2").unwrap();
        assert_eq!(j2.get("Est. Start Date"), Some(&json!("2025-05-23")));
        assert_eq!(j2.get("Est. Complete Date"), Some(&json!("2025-05-27")));
        assert_eq!(j2.get("Days to Complete"), Some(&json!(2)));

        // Untracked job has its stale values cleared.
        let stock = store.record("Jobs", "stock").unwrap();
        assert_eq!(stock.get("Est. Start Date"), Some(&Value::Null));
        assert_eq!(stock.get("Days to Complete"), Some(&Value::Null));

        // Completed job is untouched.
        let done = store.record("Jobs", "done").unwrap();
        assert!(done.get("Est. Start Date").is_none());

        assert_eq!(report.summary.scheduled_count(), 2);
        assert_eq!(report.summary.total_jobs, 3);
    }

    #[test]
    fn test_write_failure_isolated() {
        let store = shop().fail_updates_for("stock");
        let report = Pipeline::new(config())
            .run(&store, date(2025, 5, 23))
            .unwrap();

        assert_eq!(report.writes.written, 2);
        assert_eq!(report.writes.failures.len(), 1);
        assert_eq!(report.writes.failures[0].job_id, "stock");
        assert!(matches!(
            report.writes.failures[0].source,
            StoreError::Rejected(_)
        ));
        assert!(store.record("Jobs", "j2").unwrap().get("Est. Start Date").is_some());
    }

    #[test]
    fn test_throughput_strategy() {
        let store = shop();
        let pipeline = Pipeline::new(config().with_strategy(EstimationStrategy::Throughput));
        let report = pipeline.run(&store, date(2025, 5, 23)).unwrap();

        assert_eq!(report.estimate.strategy, EstimationStrategy::Throughput);
        assert!(report.summary.daily.is_empty());
        // 12h each against 16h/day: j2 starts on day 1 in the 4h j1 leaves.
        let j2 = store.record("Jobs", "j2").unwrap();
        assert_eq!(j2.get("Est. Start Date"), Some(&json!("2025-05-23")));
        assert_eq!(j2.get("Est. Complete Date"), Some(&json!("2025-05-23")));
    }

    #[test]
    fn test_undated_job_runs_last() {
        let store = MemoryStore::new()
            .with_collection(
                "Workstations",
                vec![Record::new("ws1").with_field("Time per Cabinet", 8)],
            )
            .with_collection(
                "Jobs",
                vec![
                    Record::new("undated").with_field("Unit Count", 1),
                    Record::new("dated")
                        .with_field("Unit Count", 1)
                        .with_field("Needs By", "2025-06-01"),
                ],
            )
            .with_collection("Configuration", vec![]);

        let inputs = load_inputs(&store, &FieldMap::default()).unwrap();
        let estimate = Pipeline::default().estimate(&inputs).unwrap();

        let dated = estimate.job("dated").unwrap();
        let undated = estimate.job("undated").unwrap();
        assert_eq!(dated.end_day, 1);
        assert_eq!(undated.end_day, 2);
    }

    #[test]
    fn test_no_jobs_writes_nothing() {
        let store = MemoryStore::new()
            .with_collection("Workstations", vec![Record::new("ws1")])
            .with_collection("Jobs", vec![])
            .with_collection("Configuration", vec![]);
        let err = Pipeline::new(config())
            .run(&store, date(2025, 5, 23))
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_missing_collection_is_store_error() {
        let store = MemoryStore::new();
        let err = Pipeline::default().run(&store, date(2025, 5, 23)).unwrap_err();
        assert!(matches!(err, EstimateError::Store(StoreError::CollectionNotFound(_))));
    }

    #[test]
    fn test_job_fields_cleared() {
        let fields = job_fields(&JobDates::cleared("x", "X"), &FieldMap::default());
        assert_eq!(fields.len(), 3);
        assert!(fields.values().all(Value::is_null));
    }
}
