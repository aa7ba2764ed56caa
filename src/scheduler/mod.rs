//! Tick orchestration and fleet KPIs.
//!
//! Provides the discrete-time fleet scheduler and snapshot metrics.
//!
//! # Algorithm
//!
//! `FleetScheduler` re-runs the greedy matching of [`crate::matching`] on
//! every tick, first for charging and then for work, and then advances
//! every robot's current subtask by one unit. It is not optimal, but it is
//! deterministic for a fixed robot order and pool insertion order.
//!
//! # KPI
//!
//! `FleetKpi` reports utilization, pending work, station occupancy,
//! completions and battery levels.

mod fleet;
mod kpi;

pub use fleet::{ChargingStation, FleetCounters, FleetScheduler, TickOutcome};
pub use kpi::FleetKpi;
