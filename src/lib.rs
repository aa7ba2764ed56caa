//! Battery-aware task allocation for mobile robot fleets.
//!
//! Simulates robots that carry trolleys and recharge at exclusive stations,
//! advancing in discrete ticks. Each tick the scheduler projects a
//! feasibility-aware cost for every idle robot and candidate task, commits a
//! greedy worst-placed-first matching, and steps every robot's current
//! subtask by one unit.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Robot`, `RobotState`, `Task`, `TaskSpec`,
//!   `SubTask`, `TaskCost`
//! - **`matching`**: `min_cost_task` and `match_robots_to_tasks`
//! - **`scheduler`**: `FleetScheduler` (tick orchestration) and `FleetKpi`
//! - **`config`**: Serializable `FleetConfig`
//! - **`validation`**: Configuration checks (duplicate stations, bad numbers)
//! - **`scenario`**: Random scenario generation from a caller-owned RNG
//!
//! # Architecture
//!
//! Movement is abstracted to unit steps on a line and the whole simulation
//! is single-threaded: one `tick` is one atomic time step. The core never
//! generates randomness; scenarios come in as plain data.
//!
//! # Logging
//!
//! Events go through `tracing`. Pre-emptions and battery aborts are `warn`,
//! matches and station claims/releases are `debug`. Installing a subscriber
//! is up to the driver.
//!
//! # References
//!
//! - Gerkey & Matarić (2004), "A Formal Analysis and Taxonomy of Task
//!   Allocation in Multi-Robot Systems"
//! - Burkard, Dell'Amico & Martello (2009), "Assignment Problems"

pub mod config;
pub mod matching;
pub mod models;
pub mod scenario;
pub mod scheduler;
pub mod validation;
