//! Subtask (atomic unit of work) model.
//!
//! A subtask is the smallest executable step of a task: drive somewhere,
//! recharge, attach a trolley, detach a trolley. Subtasks carry only their
//! immutable parameters; completion is decided from the robot's current
//! state, never from history kept inside the subtask.
//!
//! # Cost Model
//!
//! | Variant | Time | Energy | Per-tick effect |
//! |---------|------|--------|-----------------|
//! | Driving | `|location - destination|` | `time * 0.2` | one unit toward destination |
//! | Charging | `max(0, energy_used)` | `-time` | `energy_used -= 1` (floored at 0) |
//! | Attaching | 1 | +0.3 | `energy_used += 0.3` |
//! | Detaching | 1 | +0.1 | `energy_used += 0.1` |

use serde::{Deserialize, Serialize};

use super::RobotState;

/// Energy spent per unit of distance driven (kWh).
pub const DRIVE_KWH_PER_UNIT: f64 = 0.2;
/// Energy spent coupling a trolley (kWh).
pub const ATTACH_KWH: f64 = 0.3;
/// Energy spent releasing a trolley (kWh).
pub const DETACH_KWH: f64 = 0.1;
/// Energy restored per tick while docked at a charging station (kWh).
pub const CHARGE_KWH_PER_TICK: f64 = 1.0;

/// An atomic, one-tick-costed unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SubTask {
    /// Drive to the given location on the line.
    Driving { destination: f64 },
    /// Recharge until the battery is full.
    Charging,
    /// Couple a trolley at the current location.
    Attaching,
    /// Release the trolley at the current location.
    Detaching,
}

/// Projected cost of completing one subtask from a given robot state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SubTaskCost {
    /// Ticks needed to finish.
    pub time: f64,
    /// Net energy change (kWh). Negative for recovery.
    pub energy: f64,
}

impl SubTask {
    /// Creates a driving subtask.
    pub fn driving(destination: f64) -> Self {
        Self::Driving { destination }
    }

    /// Advances the robot by one unit of work.
    ///
    /// Driving moves at most one unit, landing exactly on the destination
    /// when less than a unit remains. Energy is drawn per unit moved, so a
    /// full step costs `DRIVE_KWH_PER_UNIT` (0.2) but a partial step costs
    /// proportionally less and a tick that starts on the destination costs
    /// nothing. This keeps the ticked total equal to what `calc_cost`
    /// projects for the same drive.
    pub fn tick(&self, state: &mut RobotState) {
        match *self {
            Self::Driving { destination } => {
                let remaining = destination - state.location;
                let step = remaining.abs().min(1.0);
                if step < 1.0 {
                    state.location = destination;
                } else {
                    state.location += remaining.signum();
                }
                state.energy_used += step * DRIVE_KWH_PER_UNIT;
            }
            Self::Charging => {
                state.energy_used = (state.energy_used - CHARGE_KWH_PER_TICK).max(0.0);
            }
            Self::Attaching => state.energy_used += ATTACH_KWH,
            Self::Detaching => state.energy_used += DETACH_KWH,
        }
    }

    /// Whether the robot's current state completes this subtask.
    pub fn is_done(&self, state: &RobotState) -> bool {
        match *self {
            Self::Driving { destination } => state.location == destination,
            Self::Charging => state.energy_used <= 0.0,
            Self::Attaching | Self::Detaching => true,
        }
    }

    /// Simulates full completion against a private robot copy.
    ///
    /// The copy is left in the post-completion state so consecutive calls
    /// can be chained through a task's sequence.
    pub fn calc_cost(&self, state: &mut RobotState) -> SubTaskCost {
        match *self {
            Self::Driving { destination } => {
                let time = (state.location - destination).abs();
                let energy = time * DRIVE_KWH_PER_UNIT;
                state.location = destination;
                state.energy_used += energy;
                SubTaskCost { time, energy }
            }
            Self::Charging => {
                let time = state.energy_used.max(0.0);
                state.energy_used -= time;
                SubTaskCost {
                    time,
                    energy: -time,
                }
            }
            Self::Attaching => {
                state.energy_used += ATTACH_KWH;
                SubTaskCost {
                    time: 1.0,
                    energy: ATTACH_KWH,
                }
            }
            Self::Detaching => {
                state.energy_used += DETACH_KWH;
                SubTaskCost {
                    time: 1.0,
                    energy: DETACH_KWH,
                }
            }
        }
    }

    /// Whether this is the energy-recovering subtask.
    #[inline]
    pub fn is_charging(&self) -> bool {
        matches!(self, Self::Charging)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_driving_tick_moves_one_unit() {
        let mut state = RobotState::new(6.0, 100.0);
        let drive = SubTask::driving(10.0);

        drive.tick(&mut state);
        assert_eq!(state.location, 7.0);
        assert!((state.energy_used - 0.2).abs() < EPS);
        assert!(!drive.is_done(&state));
    }

    #[test]
    fn test_driving_tick_backwards() {
        let mut state = RobotState::new(6.0, 100.0);
        let drive = SubTask::driving(1.0);

        drive.tick(&mut state);
        assert_eq!(state.location, 5.0);
    }

    #[test]
    fn test_driving_lands_on_fractional_destination() {
        let mut state = RobotState::new(0.0, 100.0);
        let drive = SubTask::driving(1.5);

        drive.tick(&mut state);
        drive.tick(&mut state);
        assert_eq!(state.location, 1.5);
        assert!(drive.is_done(&state));
        assert!((state.energy_used - 0.3).abs() < EPS);
    }

    #[test]
    fn test_driving_in_place_draws_nothing() {
        let mut state = RobotState::new(5.0, 100.0);
        let drive = SubTask::driving(5.0);
        let projected = drive.calc_cost(&mut state.clone());

        drive.tick(&mut state);
        assert_eq!(state.location, 5.0);
        assert_eq!(state.energy_used, 0.0);
        assert_eq!(projected.energy, state.energy_used);
        assert!(drive.is_done(&state));
    }

    #[test]
    fn test_driving_cost() {
        let mut state = RobotState::new(6.0, 100.0);
        let cost = SubTask::driving(10.0).calc_cost(&mut state);

        assert_eq!(cost.time, 4.0);
        assert!((cost.energy - 0.8).abs() < EPS);
        // Copy ends at the destination
        assert_eq!(state.location, 10.0);
        assert!((state.energy_used - 0.8).abs() < EPS);
    }

    #[test]
    fn test_charging_tick_floors_at_zero() {
        let mut state = RobotState::new(0.0, 100.0);
        state.energy_used = 1.5;

        SubTask::Charging.tick(&mut state);
        assert!((state.energy_used - 0.5).abs() < EPS);
        assert!(!SubTask::Charging.is_done(&state));

        SubTask::Charging.tick(&mut state);
        assert_eq!(state.energy_used, 0.0);
        assert!(SubTask::Charging.is_done(&state));
    }

    #[test]
    fn test_charging_cost_is_negative() {
        let mut state = RobotState::new(0.0, 100.0);
        state.energy_used = 60.0;

        let cost = SubTask::Charging.calc_cost(&mut state);
        assert_eq!(cost.time, 60.0);
        assert_eq!(cost.energy, -60.0);
        assert_eq!(state.energy_used, 0.0);
    }

    #[test]
    fn test_charging_cost_with_negative_usage() {
        let mut state = RobotState::new(0.0, 100.0);
        state.energy_used = -5.0;

        let cost = SubTask::Charging.calc_cost(&mut state);
        assert_eq!(cost.time, 0.0);
        assert_eq!(cost.energy, 0.0);
    }

    #[test]
    fn test_attach_detach() {
        let mut state = RobotState::new(0.0, 100.0);

        SubTask::Attaching.tick(&mut state);
        assert!((state.energy_used - 0.3).abs() < EPS);
        SubTask::Detaching.tick(&mut state);
        assert!((state.energy_used - 0.4).abs() < EPS);

        assert!(SubTask::Attaching.is_done(&state));
        assert!(SubTask::Detaching.is_done(&state));

        let mut copy = RobotState::new(0.0, 100.0);
        assert_eq!(
            SubTask::Attaching.calc_cost(&mut copy),
            SubTaskCost {
                time: 1.0,
                energy: ATTACH_KWH
            }
        );
        assert_eq!(
            SubTask::Detaching.calc_cost(&mut copy),
            SubTaskCost {
                time: 1.0,
                energy: DETACH_KWH
            }
        );
    }
}
