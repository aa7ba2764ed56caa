//! Fleet performance metrics (KPIs).
//!
//! Snapshot of a running scheduler, meant to be taken between ticks.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Utilization | Busy robots / total robots |
//! | Charge demand | Idle robots below half battery |
//! | Throughput | Completed trolley tasks per elapsed tick |
//! | Avg / Min energy | `kwh_available` across the fleet |
//! | Station occupancy | Occupied stations / total stations |

use super::FleetScheduler;

/// Fleet performance indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct FleetKpi {
    /// Ticks elapsed so far.
    pub elapsed_ticks: u64,
    /// Robots holding Standby.
    pub idle_robots: usize,
    /// Robots holding any other task.
    pub busy_robots: usize,
    /// Idle robots that need a charge.
    pub robots_needing_charge: usize,
    /// Tasks waiting in the pool.
    pub pending_tasks: usize,
    /// Stations with an occupant.
    pub occupied_stations: usize,
    /// Stations without an occupant.
    pub free_stations: usize,
    /// Trolley tasks finished.
    pub completed_trolley_tasks: u64,
    /// Charge tasks finished.
    pub completed_charge_tasks: u64,
    /// Tasks aborted by battery protection.
    pub aborted_tasks: u64,
    /// Fraction of robots busy (0.0..1.0).
    pub utilization: f64,
    /// Mean available energy (kWh).
    pub avg_kwh_available: f64,
    /// Lowest available energy (kWh). 0 for an empty fleet.
    pub min_kwh_available: f64,
}

impl FleetKpi {
    /// Computes KPIs from the scheduler's current state.
    pub fn calculate(scheduler: &FleetScheduler) -> Self {
        let robots = scheduler.robots();
        let idle_robots = robots.iter().filter(|r| r.is_idle()).count();
        let busy_robots = robots.len() - idle_robots;
        let robots_needing_charge = robots
            .iter()
            .filter(|r| r.is_idle() && r.needs_charge())
            .count();

        let occupied_stations = scheduler
            .stations()
            .iter()
            .filter(|s| !s.is_free())
            .count();
        let free_stations = scheduler.stations().len() - occupied_stations;

        let (utilization, avg_kwh_available, min_kwh_available) = if robots.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            let n = robots.len() as f64;
            let total: f64 = robots.iter().map(|r| r.kwh_available()).sum();
            let min = robots
                .iter()
                .map(|r| r.kwh_available())
                .fold(f64::INFINITY, f64::min);
            (busy_robots as f64 / n, total / n, min)
        };

        let counters = scheduler.counters();

        Self {
            elapsed_ticks: scheduler.elapsed_ticks(),
            idle_robots,
            busy_robots,
            robots_needing_charge,
            pending_tasks: scheduler.pending_tasks().len(),
            occupied_stations,
            free_stations,
            completed_trolley_tasks: counters.completed_trolley_tasks,
            completed_charge_tasks: counters.completed_charge_tasks,
            aborted_tasks: counters.aborted_tasks,
            utilization,
            avg_kwh_available,
            min_kwh_available,
        }
    }

    /// Completed trolley tasks per elapsed tick.
    pub fn throughput(&self) -> f64 {
        if self.elapsed_ticks == 0 {
            0.0
        } else {
            self.completed_trolley_tasks as f64 / self.elapsed_ticks as f64
        }
    }

    /// Occupied stations / total stations (0 when there are none).
    pub fn station_occupancy(&self) -> f64 {
        let total = self.occupied_stations + self.free_stations;
        if total == 0 {
            0.0
        } else {
            self.occupied_stations as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskSpec;

    #[test]
    fn test_kpi_empty() {
        let kpi = FleetKpi::calculate(&FleetScheduler::new(100.0));
        assert_eq!(kpi.idle_robots, 0);
        assert_eq!(kpi.busy_robots, 0);
        assert!((kpi.utilization - 0.0).abs() < 1e-10);
        assert!((kpi.min_kwh_available - 0.0).abs() < 1e-10);
        assert!((kpi.throughput() - 0.0).abs() < 1e-10);
        assert!((kpi.station_occupancy() - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_utilization() {
        let mut scheduler = FleetScheduler::new(100.0);
        scheduler.add_robot(0.0);
        scheduler.add_robot(50.0);
        scheduler.add_task(TaskSpec::Trolley {
            source: 2.0,
            destination: 4.0,
        });
        scheduler.tick();

        let kpi = FleetKpi::calculate(&scheduler);
        assert_eq!(kpi.elapsed_ticks, 1);
        assert_eq!(kpi.busy_robots, 1);
        assert_eq!(kpi.idle_robots, 1);
        assert_eq!(kpi.pending_tasks, 0);
        assert!((kpi.utilization - 0.5).abs() < 1e-10);
        // One robot drove a unit: 99.8 and 100
        assert!((kpi.avg_kwh_available - 99.9).abs() < 1e-9);
        assert!((kpi.min_kwh_available - 99.8).abs() < 1e-9);
    }

    #[test]
    fn test_kpi_throughput_and_stations() {
        let mut scheduler = FleetScheduler::new(100.0);
        scheduler.add_station(0.0);
        scheduler.add_station(100.0);
        let flat = scheduler.add_robot(1.0);
        scheduler.robot_mut(flat).unwrap().state.energy_used = 70.0;
        scheduler.add_robot(10.0);
        scheduler.add_task(TaskSpec::Trolley {
            source: 10.0,
            destination: 11.0,
        });

        for _ in 0..4 {
            scheduler.tick();
        }

        let kpi = FleetKpi::calculate(&scheduler);
        // Robot at 10: drive (0 units), attach, drive, detach
        assert_eq!(kpi.completed_trolley_tasks, 1);
        assert!((kpi.throughput() - 0.25).abs() < 1e-10);
        assert_eq!(kpi.occupied_stations, 1);
        assert_eq!(kpi.free_stations, 1);
        assert!((kpi.station_occupancy() - 0.5).abs() < 1e-10);
        assert_eq!(kpi.robots_needing_charge, 0);
    }
}
