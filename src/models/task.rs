//! Task (job) model.
//!
//! A task is an ordered sequence of subtasks plus a progress index. Three
//! kinds exist: `Charge` (drive to a station, recharge), `Trolley` (fetch a
//! trolley and deliver it) and `Standby`, the idle sentinel with no
//! subtasks that is always terminal.
//!
//! # Sequences
//!
//! | Kind | Subtasks |
//! |------|----------|
//! | Charge(station) | Driving(station), Charging |
//! | Trolley(src, dst) | Driving(src), Attaching, Driving(dst), Detaching |
//! | Standby | (none) |

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::{RobotState, SubTask};

/// What a task does, with its immutable parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TaskKind {
    /// Recharge at the station located at `station`.
    Charge { station: f64 },
    /// Carry a trolley from `source` to `destination`.
    Trolley { source: f64, destination: f64 },
    /// Idle.
    Standby,
}

/// Plain-data description of a task submitted by a driver.
///
/// Standby is not submittable; it is what robots do without work.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskSpec {
    /// Transport job.
    Trolley { source: f64, destination: f64 },
    /// Charging job at a station.
    Charge { station: f64 },
}

impl TaskSpec {
    /// Every location this job refers to.
    pub fn locations(&self) -> Vec<f64> {
        match *self {
            Self::Trolley {
                source,
                destination,
            } => vec![source, destination],
            Self::Charge { station } => vec![station],
        }
    }
}

/// Projected cost of a task for a particular robot.
///
/// Ordered lexicographically: fewer ticks to begin wins, energy breaks ties.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TaskCost {
    /// Ticks before the first subtask completes (reachability).
    pub start_cost: f64,
    /// Sum of the positive energy deltas across all subtasks (kWh).
    pub max_energy_cost: f64,
}

impl TaskCost {
    /// Creates a cost tuple.
    pub fn new(start_cost: f64, max_energy_cost: f64) -> Self {
        Self {
            start_cost,
            max_energy_cost,
        }
    }

    /// Total lexicographic order over `(start_cost, max_energy_cost)`.
    pub fn lex_cmp(&self, other: &Self) -> Ordering {
        self.start_cost
            .total_cmp(&other.start_cost)
            .then_with(|| self.max_energy_cost.total_cmp(&other.max_energy_cost))
    }
}

/// A task: ordered subtasks plus progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    kind: TaskKind,
    subtasks: Vec<SubTask>,
    progress: usize,
}

impl Task {
    /// Creates a charging task for the station at `station`.
    pub fn charge(station: f64) -> Self {
        Self::with_subtasks(
            TaskKind::Charge { station },
            vec![SubTask::driving(station), SubTask::Charging],
        )
    }

    /// Creates a trolley transport task.
    pub fn trolley(source: f64, destination: f64) -> Self {
        Self::with_subtasks(
            TaskKind::Trolley {
                source,
                destination,
            },
            vec![
                SubTask::driving(source),
                SubTask::Attaching,
                SubTask::driving(destination),
                SubTask::Detaching,
            ],
        )
    }

    /// Creates the idle sentinel.
    pub fn standby() -> Self {
        Self::with_subtasks(TaskKind::Standby, Vec::new())
    }

    fn with_subtasks(kind: TaskKind, subtasks: Vec<SubTask>) -> Self {
        Self {
            kind,
            subtasks,
            progress: 0,
        }
    }

    /// Task kind and parameters.
    #[inline]
    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    /// Subtask sequence.
    pub fn subtasks(&self) -> &[SubTask] {
        &self.subtasks
    }

    /// Index of the subtask currently being worked on.
    #[inline]
    pub fn progress(&self) -> usize {
        self.progress
    }

    /// Whether every subtask has completed.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.progress >= self.subtasks.len()
    }

    /// Whether this is the idle sentinel.
    #[inline]
    pub fn is_standby(&self) -> bool {
        matches!(self.kind, TaskKind::Standby)
    }

    /// Whether this is a charging task.
    #[inline]
    pub fn is_charge(&self) -> bool {
        matches!(self.kind, TaskKind::Charge { .. })
    }

    /// Station location of a charging task (destination of its first drive).
    pub fn station(&self) -> Option<f64> {
        match self.kind {
            TaskKind::Charge { .. } => match self.subtasks.first() {
                Some(SubTask::Driving { destination }) => Some(*destination),
                _ => None,
            },
            _ => None,
        }
    }

    /// Projects the cost of running this task from `state`.
    ///
    /// `state` is taken by value and threaded through every subtask's
    /// simulation, so the caller's robot is never touched.
    ///
    /// # Feasibility Bound
    /// Only positive energy deltas are summed. This is a sound peak bound
    /// only while the recovering subtask (Charging) comes last in the
    /// sequence, which holds for every task kind defined here.
    pub fn calc_costs(&self, mut state: RobotState) -> TaskCost {
        let mut cost = TaskCost::default();
        for (i, subtask) in self.subtasks.iter().enumerate() {
            let step = subtask.calc_cost(&mut state);
            if i == 0 {
                cost.start_cost = step.time;
            }
            if step.energy > 0.0 {
                cost.max_energy_cost += step.energy;
            }
        }
        cost
    }

    /// Works the current subtask for one tick against the real robot.
    ///
    /// Returns the subtask that was ticked, or `None` when the task is
    /// already terminal (no side effects in that case).
    pub fn tick(&mut self, state: &mut RobotState) -> Option<SubTask> {
        let subtask = *self.subtasks.get(self.progress)?;
        subtask.tick(state);
        if subtask.is_done(state) {
            self.progress += 1;
        }
        Some(subtask)
    }
}

impl Default for Task {
    fn default() -> Self {
        Self::standby()
    }
}

impl From<TaskSpec> for Task {
    fn from(spec: TaskSpec) -> Self {
        match spec {
            TaskSpec::Trolley {
                source,
                destination,
            } => Self::trolley(source, destination),
            TaskSpec::Charge { station } => Self::charge(station),
        }
    }
}
