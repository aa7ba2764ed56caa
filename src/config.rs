//! Construction-time fleet configuration.
//!
//! A `FleetConfig` is plain data: station locations, robot start
//! locations, the initial task pool and the battery size shared by every
//! robot. It is serde-friendly so a driver can load it from JSON or any
//! other format and hand it to `FleetScheduler::from_config`.

use serde::{Deserialize, Serialize};

use crate::models::TaskSpec;

/// Battery capacity used when a configuration does not name one (kWh).
pub const DEFAULT_BATTERY_CAPACITY: f64 = 100.0;

fn default_battery_capacity() -> f64 {
    DEFAULT_BATTERY_CAPACITY
}

/// Input container for building a scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetConfig {
    /// Battery capacity of every robot (kWh).
    #[serde(default = "default_battery_capacity")]
    pub battery_capacity: f64,
    /// Charging-station locations, all initially unoccupied.
    #[serde(default)]
    pub stations: Vec<f64>,
    /// Robot start locations. Robots start fully charged and idle.
    #[serde(default)]
    pub robots: Vec<f64>,
    /// Initial task pool, in insertion order.
    #[serde(default)]
    pub tasks: Vec<TaskSpec>,
}

impl FleetConfig {
    /// Creates an empty configuration with the default battery.
    pub fn new() -> Self {
        Self {
            battery_capacity: DEFAULT_BATTERY_CAPACITY,
            stations: Vec::new(),
            robots: Vec::new(),
            tasks: Vec::new(),
        }
    }

    /// Sets the battery capacity.
    pub fn with_battery_capacity(mut self, capacity: f64) -> Self {
        self.battery_capacity = capacity;
        self
    }

    /// Adds a charging station.
    pub fn with_station(mut self, location: f64) -> Self {
        self.stations.push(location);
        self
    }

    /// Adds a robot.
    pub fn with_robot(mut self, location: f64) -> Self {
        self.robots.push(location);
        self
    }

    /// Adds a task to the initial pool.
    pub fn with_task(mut self, task: TaskSpec) -> Self {
        self.tasks.push(task);
        self
    }
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self::new()
    }
}
