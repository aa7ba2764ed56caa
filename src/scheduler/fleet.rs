//! Tick-driven fleet scheduler.
//!
//! # Algorithm (one call to `tick`)
//!
//! 1. Split idle robots into those needing a charge and those fit for work.
//! 2. Offer one Charge task per unoccupied charging station.
//! 3. Match charge-seeking robots to those tasks; claim each matched station.
//! 4. Match work-ready robots to the pending pool; matched tasks leave it.
//!    A pooled Charge task is only offered while its station is free, and
//!    claims the station when matched.
//! 5. Tick every robot once, in id order, including robots assigned above.
//! 6. Release the station of every robot whose Charging subtask just finished.
//!
//! Stations and the pool are only mutated inside steps 3, 4 and 6, so one
//! call is one atomic time step. If this ever runs under a concurrent
//! runtime, each of the two matching steps must hold a single lock over the
//! station table and pool for its whole duration.
//!
//! # Reference
//! Gerkey & Matarić (2004), "A Formal Analysis and Taxonomy of Task
//! Allocation in Multi-Robot Systems" (ST-SR-IA: instantaneous assignment)

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::config::FleetConfig;
use crate::matching::{match_robots_to_tasks, match_robots_to_tasks_where};
use crate::models::{Robot, RobotId, SubTask, Task, TaskKind, TaskSpec};
use crate::validation::{validate_config, ValidationError};

/// An exclusive, location-keyed charging slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargingStation {
    /// Station position on the line.
    pub location: f64,
    /// Robot currently holding the slot.
    pub occupant: Option<RobotId>,
}

impl ChargingStation {
    /// Creates a free station.
    pub fn new(location: f64) -> Self {
        Self {
            location,
            occupant: None,
        }
    }

    /// Whether no robot holds the slot.
    #[inline]
    pub fn is_free(&self) -> bool {
        self.occupant.is_none()
    }
}

/// What one robot did during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickOutcome {
    /// Robot that was ticked.
    pub robot: RobotId,
    /// Subtask worked on, `None` if the robot had nothing to do.
    pub subtask: Option<SubTask>,
}

/// Counters accumulated over the scheduler's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetCounters {
    /// Trolley tasks whose last subtask completed.
    pub completed_trolley_tasks: u64,
    /// Charge tasks whose last subtask completed.
    pub completed_charge_tasks: u64,
    /// Tasks cut short by battery protection.
    pub aborted_tasks: u64,
}

/// Owns the robots, the charging-station table and the task pool, and
/// advances the whole fleet one discrete step at a time.
///
/// # Example
///
/// ```
/// use u_fleet::models::{SubTask, TaskSpec};
/// use u_fleet::scheduler::FleetScheduler;
///
/// let mut scheduler = FleetScheduler::new(100.0);
/// scheduler.add_station(0.0);
/// let robot = scheduler.add_robot(6.0);
/// scheduler.add_task(TaskSpec::Trolley { source: 1.0, destination: 2.0 });
///
/// let outcomes = scheduler.tick();
/// assert_eq!(outcomes[0].robot, robot);
/// assert_eq!(outcomes[0].subtask, Some(SubTask::driving(1.0)));
/// assert!(scheduler.pending_tasks().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct FleetScheduler {
    battery_capacity: f64,
    robots: Vec<Robot>,
    stations: Vec<ChargingStation>,
    pool: Vec<Task>,
    elapsed_ticks: u64,
    counters: FleetCounters,
}

impl FleetScheduler {
    /// Creates an empty scheduler; robots added later get `battery_capacity`.
    pub fn new(battery_capacity: f64) -> Self {
        Self {
            battery_capacity,
            robots: Vec::new(),
            stations: Vec::new(),
            pool: Vec::new(),
            elapsed_ticks: 0,
            counters: FleetCounters::default(),
        }
    }

    /// Builds a scheduler from a validated configuration.
    pub fn from_config(config: &FleetConfig) -> Result<Self, Vec<ValidationError>> {
        validate_config(config)?;

        let mut scheduler = Self::new(config.battery_capacity);
        for &location in &config.stations {
            scheduler.add_station(location);
        }
        for &location in &config.robots {
            scheduler.add_robot(location);
        }
        for &task in &config.tasks {
            scheduler.add_task(task);
        }
        Ok(scheduler)
    }

    /// Adds a free charging station.
    pub fn add_station(&mut self, location: f64) {
        self.stations.push(ChargingStation::new(location));
    }

    /// Adds an idle, fully charged robot and returns its id.
    pub fn add_robot(&mut self, location: f64) -> RobotId {
        let id = self.robots.len();
        self.robots
            .push(Robot::new(id, location, self.battery_capacity));
        id
    }

    /// Appends a task to the pending pool.
    pub fn add_task(&mut self, spec: TaskSpec) {
        self.pool.push(Task::from(spec));
    }

    /// All robots, in id order.
    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    /// Looks up a robot.
    pub fn robot(&self, id: RobotId) -> Option<&Robot> {
        self.robots.get(id)
    }

    /// Mutable access to a robot, for drivers that seed state.
    pub fn robot_mut(&mut self, id: RobotId) -> Option<&mut Robot> {
        self.robots.get_mut(id)
    }

    /// Tasks awaiting assignment, in insertion order.
    pub fn pending_tasks(&self) -> &[Task] {
        &self.pool
    }

    /// Charging-station table.
    pub fn stations(&self) -> &[ChargingStation] {
        &self.stations
    }

    /// Station located at `location`.
    pub fn station(&self, location: f64) -> Option<&ChargingStation> {
        self.stations.iter().find(|s| s.location == location)
    }

    /// Number of completed ticks.
    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    /// Lifetime counters.
    pub fn counters(&self) -> FleetCounters {
        self.counters
    }

    /// Ids of robots holding Standby.
    pub fn idle_robots(&self) -> Vec<RobotId> {
        self.robots
            .iter()
            .filter(|r| r.is_idle())
            .map(|r| r.id)
            .collect()
    }

    /// One Charge task per unoccupied station, in station order.
    pub fn free_charge_tasks(&self) -> Vec<Task> {
        self.stations
            .iter()
            .filter(|s| s.is_free())
            .map(|s| Task::charge(s.location))
            .collect()
    }

    /// Advances the fleet by one discrete time step.
    ///
    /// Returns what every robot worked on, in id order.
    pub fn tick(&mut self) -> Vec<TickOutcome> {
        self.elapsed_ticks += 1;

        let (charge_seekers, workers): (Vec<RobotId>, Vec<RobotId>) = self
            .robots
            .iter()
            .filter(|r| r.is_idle())
            .map(|r| r.id)
            .partition(|&id| self.robots[id].needs_charge());

        // Charging first so a flat robot never competes for work
        let mut charge_tasks = self.free_charge_tasks();
        let charge_matches = {
            let robots: Vec<&Robot> = charge_seekers.iter().map(|&id| &self.robots[id]).collect();
            match_robots_to_tasks(&robots, &mut charge_tasks)
        };
        for m in charge_matches {
            if let Some(location) = m.task.station() {
                self.claim_station(location, m.robot);
            }
            self.robots[m.robot].assign_task(m.task);
        }

        // Pooled Charge tasks only go out while their station is free
        let work_matches = {
            let robots: Vec<&Robot> = workers.iter().map(|&id| &self.robots[id]).collect();
            let stations = &self.stations;
            match_robots_to_tasks_where(&robots, &mut self.pool, |task, committed| {
                let Some(location) = task.station() else {
                    return true;
                };
                let free = stations
                    .iter()
                    .find(|s| s.location == location)
                    .map_or(true, ChargingStation::is_free);
                free && !committed
                    .iter()
                    .any(|m| m.task.station() == Some(location))
            })
        };
        for m in work_matches {
            if let Some(location) = m.task.station() {
                self.claim_station(location, m.robot);
            }
            self.robots[m.robot].assign_task(m.task);
        }

        let outcomes: Vec<TickOutcome> = self
            .robots
            .iter_mut()
            .map(|robot| TickOutcome {
                robot: robot.id,
                subtask: robot.tick(),
            })
            .collect();

        for outcome in &outcomes {
            self.record_outcome(outcome);
        }
        self.release_orphaned_stations();

        trace!(
            tick = self.elapsed_ticks,
            pending = self.pool.len(),
            free_stations = self.stations.iter().filter(|s| s.is_free()).count(),
            "tick complete"
        );
        outcomes
    }

    fn record_outcome(&mut self, outcome: &TickOutcome) {
        let Some(subtask) = outcome.subtask else {
            return;
        };
        let robot = &self.robots[outcome.robot];

        if robot.is_idle() {
            // Worked a subtask yet holds Standby: battery protection fired
            self.counters.aborted_tasks += 1;
            return;
        }

        let task = robot.current_task();
        let finished = task.is_terminal().then(|| task.kind());
        let station = task.station();
        let charged = subtask.is_charging() && subtask.is_done(&robot.state);

        match finished {
            Some(TaskKind::Trolley { .. }) => self.counters.completed_trolley_tasks += 1,
            Some(TaskKind::Charge { .. }) => self.counters.completed_charge_tasks += 1,
            _ => {}
        }

        if charged {
            if let Some(location) = station {
                self.release_station(location, outcome.robot);
            }
        }
    }

    fn claim_station(&mut self, location: f64, robot: RobotId) {
        if let Some(station) = self.stations.iter_mut().find(|s| s.location == location) {
            debug!(station = location, robot, "station claimed");
            station.occupant = Some(robot);
        }
    }

    fn release_station(&mut self, location: f64, robot: RobotId) {
        if let Some(station) = self
            .stations
            .iter_mut()
            .find(|s| s.location == location && s.occupant == Some(robot))
        {
            debug!(station = location, robot, "station released");
            station.occupant = None;
        }
    }

    /// Frees slots whose occupant no longer carries a Charge task for them.
    fn release_orphaned_stations(&mut self) {
        for station in &mut self.stations {
            let Some(id) = station.occupant else {
                continue;
            };
            let holds_slot = self
                .robots
                .get(id)
                .and_then(|r| r.current_task().station())
                .is_some_and(|s| s == station.location);
            if !holds_slot {
                warn!(
                    station = station.location,
                    robot = id,
                    "releasing station held by robot without a charge task"
                );
                station.occupant = None;
            }
        }
    }
}

impl Default for FleetScheduler {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_BATTERY_CAPACITY)
    }
}
