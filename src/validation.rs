//! Sanity checks on a `FleetConfig`.
//!
//! A scheduler keys stations by exact location and steps robots along the
//! line with plain float arithmetic, so a config must give it finite
//! numbers, one station per location and a usable battery. `validate_config`
//! walks the whole config and reports every offending entry, each pointing
//! back at the item that caused it.

use std::fmt;

use crate::config::FleetConfig;

/// Outcome of `validate_config`.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// The part of a `FleetConfig` an error points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigItem {
    /// The shared battery capacity.
    BatteryCapacity,
    /// `stations[i]`.
    Station(usize),
    /// `robots[i]`.
    Robot(usize),
    /// `tasks[i]`.
    Task(usize),
}

impl fmt::Display for ConfigItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BatteryCapacity => f.write_str("battery capacity"),
            Self::Station(i) => write!(f, "station #{i}"),
            Self::Robot(i) => write!(f, "robot #{i}"),
            Self::Task(i) => write!(f, "task #{i}"),
        }
    }
}

/// What is wrong with a config item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A second station at an already used location.
    DuplicateStation,
    /// A station, robot or task endpoint that is NaN or infinite.
    NonFiniteLocation,
    /// A battery capacity that is zero, negative or not finite.
    InvalidCapacity,
}

/// One rejected config entry together with the value that failed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub item: ConfigItem,
    /// The capacity or location that failed the check.
    pub value: f64,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { kind, item, value } = self;
        match kind {
            ValidationErrorKind::InvalidCapacity => {
                write!(f, "{item} must be finite and positive, got {value}")
            }
            ValidationErrorKind::DuplicateStation => {
                write!(f, "{item} repeats station location {value}")
            }
            ValidationErrorKind::NonFiniteLocation => {
                write!(f, "{item} has non-finite location {value}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Checks a fleet configuration before a scheduler is built from it.
///
/// The battery capacity must be finite and strictly positive. Station
/// locations must be finite and pairwise distinct; a repeat is reported
/// against the later index. Robot start locations and every task endpoint
/// must be finite.
pub fn validate_config(config: &FleetConfig) -> ValidationResult {
    let mut errors = Vec::new();
    let mut reject = |kind, item, value| errors.push(ValidationError { kind, item, value });

    let capacity = config.battery_capacity;
    if !capacity.is_finite() || capacity <= 0.0 {
        reject(
            ValidationErrorKind::InvalidCapacity,
            ConfigItem::BatteryCapacity,
            capacity,
        );
    }

    for (i, &station) in config.stations.iter().enumerate() {
        if !station.is_finite() {
            reject(
                ValidationErrorKind::NonFiniteLocation,
                ConfigItem::Station(i),
                station,
            );
        } else if config.stations[..i].contains(&station) {
            reject(
                ValidationErrorKind::DuplicateStation,
                ConfigItem::Station(i),
                station,
            );
        }
    }

    for (i, &location) in config.robots.iter().enumerate() {
        if !location.is_finite() {
            reject(
                ValidationErrorKind::NonFiniteLocation,
                ConfigItem::Robot(i),
                location,
            );
        }
    }

    for (i, task) in config.tasks.iter().enumerate() {
        if let Some(&bad) = task.locations().iter().find(|l| !l.is_finite()) {
            reject(
                ValidationErrorKind::NonFiniteLocation,
                ConfigItem::Task(i),
                bad,
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
