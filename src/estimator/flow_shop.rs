//! Day-by-day flow-shop simulation.
//!
//! # Algorithm
//!
//! Each simulated day sweeps the stations in pipeline order. A station
//! spends up to `hours_per_day` on, in turn:
//!
//! 1. A job waiting at this station (first in admission order).
//! 2. At the first station only, the next unstarted job by priority.
//! 3. Nothing: the rest of the day is logged as idle.
//!
//! A job that clears a station moves to the next one, or completes if it
//! was the last. A job hops at most one station per day; a second hop on
//! the same day waits for the start of the next day. Jobs that need no
//! pipeline hours complete on the day they are admitted.
//!
//! # Complexity
//! O(d * m * n) where d=days, m=stations, n=jobs in progress.

use tracing::{debug, info};

use super::{EstimateRequest, Estimator};
use crate::config::EstimationStrategy;
use crate::error::{EstimateError, Result};
use crate::models::{
    ActivitySlice, Estimate, Job, JobRef, ScheduledJob, SimulationDayRecord, StationActivity,
};

/// Hours below this are treated as zero.
const EPSILON: f64 = 1e-9;

/// Flow-shop simulator.
///
/// # Example
///
/// ```
/// use u_pipeline::estimator::{EstimateRequest, Estimator, FlowShopSimulator};
/// use u_pipeline::models::{Job, Workstation};
///
/// let stations = vec![Workstation::new("S1").with_hours(8.0)];
/// let jobs = vec![Job::new("J1").with_quantity(1.0)];
/// let request = EstimateRequest::new(stations, jobs).with_hours_per_day(8.0);
///
/// let estimate = FlowShopSimulator::new().estimate(&request).unwrap();
/// assert_eq!(estimate.total_days, 1);
/// assert_eq!(estimate.jobs[0].end_day, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FlowShopSimulator;

#[derive(Debug, Clone, Default)]
struct StationRuntimeState {
    /// Admission position of the job on the station.
    job: Option<usize>,
    /// Hours left to clear this station for that job.
    remaining_hours: f64,
}

#[derive(Debug, Clone)]
struct JobRuntimeState<'a> {
    job: &'a Job,
    station_costs: Vec<f64>,
    station_index: usize,
    completed: bool,
    start_day: u32,
    end_day: u32,
    last_hop_day: Option<u32>,
    hop_pending: bool,
}

impl JobRuntimeState<'_> {
    fn job_ref(&self) -> JobRef {
        JobRef::new(&self.job.id, &self.job.name)
    }

    fn total_hours(&self) -> f64 {
        self.station_costs.iter().sum()
    }

    fn is_waiting_at(&self, station_index: usize) -> bool {
        !self.completed && !self.hop_pending && self.station_index == station_index
    }

    fn scheduled(&self) -> ScheduledJob {
        ScheduledJob {
            job_id: self.job.id.clone(),
            job_name: self.job.name.clone(),
            start_day: self.start_day,
            end_day: self.end_day,
            working_days: self.end_day - self.start_day + 1,
            total_hours: self.total_hours(),
        }
    }
}

/// Mutable state of one simulation run. Created per call, never shared.
struct Simulation<'a> {
    request: &'a EstimateRequest,
    jobs: Vec<JobRuntimeState<'a>>,
    stations: Vec<StationRuntimeState>,
    in_progress: Vec<usize>,
    next_to_start: usize,
    completed: Vec<ScheduledJob>,
}

impl<'a> Simulation<'a> {
    fn new(request: &'a EstimateRequest) -> Self {
        let jobs = request
            .ordered_jobs()
            .into_iter()
            .map(|job| JobRuntimeState {
                job,
                station_costs: request.station_costs(job),
                station_index: 0,
                completed: false,
                start_day: 0,
                end_day: 0,
                last_hop_day: None,
                hop_pending: false,
            })
            .collect();

        Self {
            request,
            jobs,
            stations: vec![StationRuntimeState::default(); request.workstations.len()],
            in_progress: Vec::new(),
            next_to_start: 0,
            completed: Vec::new(),
        }
    }

    fn is_finished(&self) -> bool {
        self.completed.len() == self.jobs.len()
    }

    fn run_day(&mut self, day: u32) -> SimulationDayRecord {
        for &pos in &self.in_progress {
            let state = &mut self.jobs[pos];
            if state.hop_pending {
                state.hop_pending = false;
                state.station_index += 1;
                state.last_hop_day = Some(day);
            }
        }

        let mut record = SimulationDayRecord {
            day,
            stations: Vec::with_capacity(self.stations.len()),
            jobs_started: Vec::new(),
            jobs_completed: Vec::new(),
        };

        for station_index in 0..self.stations.len() {
            let activity = self.run_station(day, station_index, &mut record);
            record.stations.push(activity);
        }

        record
    }

    fn run_station(
        &mut self,
        day: u32,
        station_index: usize,
        record: &mut SimulationDayRecord,
    ) -> StationActivity {
        let capacity = self.request.hours_per_day;
        let last_station = self.stations.len() - 1;
        let mut worked = 0.0;
        let mut slices = Vec::new();

        while capacity - worked > EPSILON {
            if self.stations[station_index].job.is_none() && !self.assign(day, station_index, record)
            {
                break;
            }
            let Some(pos) = self.stations[station_index].job else {
                // Admitted job completed instantly; look for more work.
                continue;
            };

            let station = &mut self.stations[station_index];
            let hours = (capacity - worked).min(station.remaining_hours);
            station.remaining_hours -= hours;
            worked += hours;
            if hours > EPSILON {
                slices.push(ActivitySlice::Work {
                    job: self.jobs[pos].job_ref(),
                    hours,
                });
            }

            if station.remaining_hours <= EPSILON {
                station.job = None;
                station.remaining_hours = 0.0;
                if station_index == last_station {
                    self.complete(pos, day, record);
                } else {
                    let state = &mut self.jobs[pos];
                    if state.last_hop_day == Some(day) {
                        state.hop_pending = true;
                    } else {
                        state.station_index += 1;
                        state.last_hop_day = Some(day);
                    }
                }
            }
        }

        if capacity - worked > EPSILON {
            slices.push(ActivitySlice::Idle {
                hours: capacity - worked,
            });
        }

        let ws = &self.request.workstations[station_index];
        StationActivity {
            station_id: ws.id.clone(),
            station_name: ws.name.clone(),
            slices,
            holding: self.stations[station_index]
                .job
                .map(|pos| self.jobs[pos].job_ref()),
        }
    }

    /// Puts work on an idle station. Returns `false` if there is none.
    fn assign(&mut self, day: u32, station_index: usize, record: &mut SimulationDayRecord) -> bool {
        let waiting = self
            .in_progress
            .iter()
            .copied()
            .find(|&pos| self.jobs[pos].is_waiting_at(station_index));

        if let Some(pos) = waiting {
            self.occupy(station_index, pos);
            return true;
        }

        if station_index != 0 || self.next_to_start >= self.jobs.len() {
            return false;
        }

        let pos = self.next_to_start;
        self.next_to_start += 1;
        self.jobs[pos].start_day = day;
        record.jobs_started.push(self.jobs[pos].job_ref());

        if self.jobs[pos].total_hours() <= EPSILON {
            self.complete(pos, day, record);
        } else {
            self.in_progress.push(pos);
            self.occupy(station_index, pos);
        }
        true
    }

    fn occupy(&mut self, station_index: usize, pos: usize) {
        let station = &mut self.stations[station_index];
        station.job = Some(pos);
        station.remaining_hours = self.jobs[pos].station_costs[station_index];
    }

    fn complete(&mut self, pos: usize, day: u32, record: &mut SimulationDayRecord) {
        let state = &mut self.jobs[pos];
        state.completed = true;
        state.end_day = day;
        record.jobs_completed.push(state.job_ref());
        self.completed.push(state.scheduled());
        self.in_progress.retain(|&p| p != pos);
    }
}

impl FlowShopSimulator {
    /// Creates a simulator.
    pub fn new() -> Self {
        Self
    }

    /// Runs the simulation.
    ///
    /// # Errors
    /// - [`EstimateError::Configuration`] for invalid input.
    /// - [`EstimateError::SimulationOverrun`] if jobs remain after
    ///   `request.max_days` days.
    pub fn simulate(&self, request: &EstimateRequest) -> Result<Estimate> {
        request.validate()?;

        let mut sim = Simulation::new(request);
        let mut days = Vec::new();
        let mut day: u32 = 1;

        while !sim.is_finished() {
            if day > request.max_days {
                return Err(EstimateError::SimulationOverrun {
                    max_days: request.max_days,
                    completed: sim.completed.len(),
                    total: sim.jobs.len(),
                });
            }

            let record = sim.run_day(day);
            debug!(
                day,
                started = record.jobs_started.len(),
                completed = record.jobs_completed.len(),
                in_progress = sim.in_progress.len(),
                "simulated day"
            );
            days.push(record);
            day += 1;
        }

        let total_days = days.len() as u32;
        info!(
            jobs = sim.completed.len(),
            stations = request.workstations.len(),
            total_days,
            "flow-shop simulation finished"
        );

        Ok(Estimate {
            strategy: EstimationStrategy::FlowShop,
            jobs: sim.completed,
            days,
            total_days,
        })
    }
}

impl Estimator for FlowShopSimulator {
    fn strategy(&self) -> EstimationStrategy {
        EstimationStrategy::FlowShop
    }

    fn estimate(&self, request: &EstimateRequest) -> Result<Estimate> {
        self.simulate(request)
    }
}
