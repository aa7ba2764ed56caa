//! Random scenario generation.
//!
//! Produces plain data (`TaskSpec`s and `FleetConfig`s) for a driver to feed
//! into the scheduler. The random source is always supplied by the caller;
//! nothing in the scheduler, matching or models owns an RNG, so a seeded
//! `R: Rng` reproduces a run exactly.
//!
//! Locations are whole numbers on `[0, track_length]`, which keeps unit
//! drive steps landing exactly on their destinations.

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{FleetConfig, DEFAULT_BATTERY_CAPACITY};
use crate::models::TaskSpec;

/// Parameters for random task and fleet generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioGenerator {
    /// Length of the line; locations fall in `[0, track_length]`.
    pub track_length: u32,
    /// Largest source-to-destination distance of a trolley job.
    pub max_trolley_distance: u32,
}

impl ScenarioGenerator {
    /// Creates a generator.
    pub fn new(track_length: u32, max_trolley_distance: u32) -> Self {
        Self {
            track_length,
            max_trolley_distance: max_trolley_distance.max(1),
        }
    }

    /// A uniformly random location on the track.
    pub fn random_location<R: Rng>(&self, rng: &mut R) -> f64 {
        f64::from(rng.random_range(0..=self.track_length))
    }

    /// A random trolley job whose endpoints both lie on the track.
    pub fn random_trolley<R: Rng>(&self, rng: &mut R) -> TaskSpec {
        let source = rng.random_range(0..=self.track_length);
        // A deserialized generator may carry zero here
        let distance = rng.random_range(1..=self.max_trolley_distance.max(1));
        let destination = if rng.random_bool(0.5) {
            source.saturating_add(distance).min(self.track_length)
        } else {
            source.saturating_sub(distance)
        };
        TaskSpec::Trolley {
            source: f64::from(source),
            destination: f64::from(destination),
        }
    }

    /// `count` random trolley jobs.
    pub fn random_trolleys<R: Rng>(&self, rng: &mut R, count: usize) -> Vec<TaskSpec> {
        (0..count).map(|_| self.random_trolley(rng)).collect()
    }

    /// A whole fleet: robots, distinct stations and an initial pool.
    ///
    /// Station count is capped at the number of distinct track positions.
    pub fn random_config<R: Rng>(
        &self,
        rng: &mut R,
        robots: usize,
        stations: usize,
        tasks: usize,
    ) -> FleetConfig {
        let positions = self.track_length as usize + 1;
        let mut station_locations: Vec<f64> =
            index::sample(rng, positions, stations.min(positions))
                .into_iter()
                .map(|i| i as f64)
                .collect();
        station_locations.sort_by(f64::total_cmp);

        FleetConfig {
            battery_capacity: DEFAULT_BATTERY_CAPACITY,
            stations: station_locations,
            robots: (0..robots).map(|_| self.random_location(rng)).collect(),
            tasks: self.random_trolleys(rng, tasks),
        }
    }
}

impl Default for ScenarioGenerator {
    fn default() -> Self {
        Self::new(100, 30)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::FleetScheduler;
    use crate::validation::validate_config;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_trolley_within_track() {
        let generator = ScenarioGenerator::new(50, 20);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..500 {
            let TaskSpec::Trolley {
                source,
                destination,
            } = generator.random_trolley(&mut rng)
            else {
                panic!("expected a trolley job");
            };
            assert!((0.0..=50.0).contains(&source));
            assert!((0.0..=50.0).contains(&destination));
            assert!((source - destination).abs() <= 20.0);
            assert_eq!(source.fract(), 0.0);
        }
    }

    #[test]
    fn test_zero_distance_from_json_still_generates() {
        let generator: ScenarioGenerator =
            serde_json::from_str(r#"{"track_length":10,"max_trolley_distance":0}"#).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let TaskSpec::Trolley {
            source,
            destination,
        } = generator.random_trolley(&mut rng)
        else {
            panic!("expected a trolley job");
        };
        assert!((source - destination).abs() <= 1.0);
        assert!((0.0..=10.0).contains(&destination));
    }

    #[test]
    fn test_same_seed_same_scenario() {
        let generator = ScenarioGenerator::default();
        let a = generator.random_config(&mut StdRng::seed_from_u64(7), 4, 3, 10);
        let b = generator.random_config(&mut StdRng::seed_from_u64(7), 4, 3, 10);
        assert_eq!(a, b);
    }

    #[test]
    fn test_config_is_valid() {
        let generator = ScenarioGenerator::new(10, 5);
        let mut rng = StdRng::seed_from_u64(3);
        let config = generator.random_config(&mut rng, 5, 4, 8);

        assert_eq!(config.robots.len(), 5);
        assert_eq!(config.stations.len(), 4);
        assert_eq!(config.tasks.len(), 8);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_station_count_capped() {
        let generator = ScenarioGenerator::new(3, 1);
        let mut rng = StdRng::seed_from_u64(1);
        let config = generator.random_config(&mut rng, 1, 10, 0);

        assert_eq!(config.stations, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_seeded_run_is_reproducible() {
        let generator = ScenarioGenerator::default();
        let config = generator.random_config(&mut StdRng::seed_from_u64(11), 3, 2, 6);

        let run = || {
            let mut scheduler = FleetScheduler::from_config(&config).unwrap();
            (0..150).map(|_| scheduler.tick()).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
