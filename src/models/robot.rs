//! Robot model.
//!
//! A robot is a battery-limited agent on a line. Its physical state
//! (`RobotState`) is a small `Copy` value so cost projections can run on a
//! throwaway copy; the robot itself owns exactly one current task, with
//! `Standby` standing in for "nothing to do".
//!
//! # Battery Protection
//!
//! After every tick `energy_used` is clamped into `[0, capacity]`. If a tick
//! pushes usage past capacity the current task is aborted in favour of
//! Standby.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{SubTask, Task};

/// Robot identifier (index in the scheduler's robot list).
pub type RobotId = usize;

/// Physical state of a robot: position and battery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RobotState {
    /// Position on the line.
    pub location: f64,
    /// Battery capacity (kWh). Fixed for the robot's lifetime.
    pub capacity: f64,
    /// Energy drawn since the last full charge (kWh).
    pub energy_used: f64,
}

impl RobotState {
    /// Creates a fully charged state at `location`.
    pub fn new(location: f64, capacity: f64) -> Self {
        Self {
            location,
            capacity,
            energy_used: 0.0,
        }
    }

    /// Remaining energy, clamped to `[0, capacity]`.
    #[inline]
    pub fn kwh_available(&self) -> f64 {
        (self.capacity - self.energy_used).clamp(0.0, self.capacity)
    }
}

/// A mobile robot with a battery and a current task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Robot {
    /// Identifier.
    pub id: RobotId,
    /// Position and battery.
    pub state: RobotState,
    current_task: Task,
}

impl Robot {
    /// Creates an idle, fully charged robot.
    pub fn new(id: RobotId, location: f64, capacity: f64) -> Self {
        Self {
            id,
            state: RobotState::new(location, capacity),
            current_task: Task::standby(),
        }
    }

    /// Sets the energy already drawn.
    pub fn with_energy_used(mut self, energy_used: f64) -> Self {
        self.state.energy_used = energy_used;
        self
    }

    /// Current position.
    #[inline]
    pub fn location(&self) -> f64 {
        self.state.location
    }

    /// Energy drawn since the last full charge.
    #[inline]
    pub fn energy_used(&self) -> f64 {
        self.state.energy_used
    }

    /// Battery capacity.
    #[inline]
    pub fn capacity(&self) -> f64 {
        self.state.capacity
    }

    /// Task currently held.
    pub fn current_task(&self) -> &Task {
        &self.current_task
    }

    /// Remaining energy, clamped to `[0, capacity]`.
    #[inline]
    pub fn kwh_available(&self) -> f64 {
        self.state.kwh_available()
    }

    /// Whether the robot holds the Standby task.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.current_task.is_standby()
    }

    /// Whether less than half the battery remains.
    #[inline]
    pub fn needs_charge(&self) -> bool {
        self.kwh_available() < self.state.capacity / 2.0
    }

    /// Replaces the current task unconditionally.
    ///
    /// Returns the interrupted task when something other than Standby was
    /// pre-empted. Pre-emption is advisory and logged, never an error.
    pub fn assign_task(&mut self, task: Task) -> Option<Task> {
        let previous = std::mem::replace(&mut self.current_task, task);
        if previous.is_standby() {
            return None;
        }
        warn!(
            robot = self.id,
            interrupted = ?previous.kind(),
            progress = previous.progress(),
            "task pre-empted"
        );
        Some(previous)
    }

    /// Advances the current task by one tick.
    ///
    /// Returns the subtask worked on, or `None` if the task was already
    /// terminal (the robot then drops to Standby).
    pub fn tick(&mut self) -> Option<SubTask> {
        let ticked = self.current_task.tick(&mut self.state);
        if ticked.is_none() {
            self.current_task = Task::standby();
        }

        self.state.energy_used = self.state.energy_used.max(0.0);
        if self.state.energy_used > self.state.capacity {
            warn!(
                robot = self.id,
                energy_used = self.state.energy_used,
                capacity = self.state.capacity,
                aborted = ?self.current_task.kind(),
                "battery exhausted, task aborted"
            );
            self.state.energy_used = self.state.capacity;
            self.current_task = Task::standby();
        }
        ticked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_kwh_available() {
        let mut robot = Robot::new(0, 6.0, 100.0);
        // start fully charged
        assert_eq!(robot.kwh_available(), 100.0);

        robot.state.energy_used = 51.0;
        assert_eq!(robot.kwh_available(), 49.0);

        robot.state.energy_used = 75.75;
        assert_eq!(robot.kwh_available(), 24.25);

        // above capacity
        robot.state.energy_used = 120.0;
        assert_eq!(robot.kwh_available(), 0.0);

        // negative usage
        robot.state.energy_used = -10.0;
        assert_eq!(robot.kwh_available(), 100.0);
    }

    #[test]
    fn test_needs_charge_threshold() {
        let robot = Robot::new(0, 0.0, 100.0).with_energy_used(50.0);
        assert!(!robot.needs_charge());

        let robot = Robot::new(0, 0.0, 100.0).with_energy_used(50.5);
        assert!(robot.needs_charge());
    }

    #[test]
    fn test_idle() {
        let mut robot = Robot::new(0, 0.0, 100.0);
        assert!(robot.is_idle());

        robot.assign_task(Task::trolley(1.0, 2.0));
        assert!(!robot.is_idle());
    }

    #[test]
    fn test_standby_tick_returns_none() {
        let mut robot = Robot::new(0, 3.0, 100.0).with_energy_used(40.0);
        assert_eq!(robot.tick(), None);
        assert!(robot.is_idle());
        assert_eq!(robot.location(), 3.0);
        assert_eq!(robot.energy_used(), 40.0);
    }

    #[test]
    fn test_charge_scenario() {
        let mut robot = Robot::new(0, 6.0, 100.0);
        robot.assign_task(Task::charge(10.0));

        for _ in 0..4 {
            assert_eq!(robot.tick(), Some(SubTask::driving(10.0)));
        }
        assert_eq!(robot.location(), 10.0);
        assert!((robot.energy_used() - 0.8).abs() < EPS);

        assert_eq!(robot.tick(), Some(SubTask::Charging));
        assert_eq!(robot.energy_used(), 0.0);
        // Terminal but not yet swapped out
        assert!(robot.current_task().is_terminal());
        assert!(!robot.is_idle());

        assert_eq!(robot.tick(), None);
        assert!(robot.is_idle());
    }

    #[test]
    fn test_negative_usage_clamped_after_tick() {
        let mut robot = Robot::new(0, 0.0, 100.0).with_energy_used(-3.0);
        robot.assign_task(Task::trolley(0.0, 0.0));
        robot.tick();
        assert!(robot.energy_used() >= 0.0);
    }

    #[test]
    #[traced_test]
    fn test_battery_protection_aborts_task() {
        let mut robot = Robot::new(0, 0.0, 100.0).with_energy_used(99.9);
        robot.assign_task(Task::trolley(0.0, 5.0));

        // Driving(0) completes immediately, Attaching pushes past capacity
        robot.tick();
        robot.tick();
        assert!(robot.is_idle());
        assert_eq!(robot.energy_used(), 100.0);
        assert!(logs_contain("battery exhausted"));
    }

    #[test]
    #[traced_test]
    fn test_assign_preempts() {
        let mut robot = Robot::new(7, 0.0, 100.0);
        assert_eq!(robot.assign_task(Task::trolley(5.0, 9.0)), None);

        robot.tick();
        let interrupted = robot.assign_task(Task::charge(1.0));
        let interrupted = interrupted.unwrap();
        assert_eq!(
            interrupted.kind(),
            crate::models::TaskKind::Trolley {
                source: 5.0,
                destination: 9.0
            }
        );
        assert!(robot.current_task().is_charge());
        assert!(logs_contain("task pre-empted"));
    }
}
