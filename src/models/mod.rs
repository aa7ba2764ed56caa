//! Fleet domain models.
//!
//! Provides the core data types of the allocation problem: robots with a
//! battery, the tasks they carry out and the subtasks those tasks are made
//! of.
//!
//! # Domain Mappings
//!
//! | u-fleet | Warehouse | Hospital | Port |
//! |---------|-----------|----------|------|
//! | Robot | AMR | Delivery robot | Straddle carrier |
//! | Trolley task | Cart move | Linen cart run | Container move |
//! | Charge task | Dock visit | Dock visit | Battery swap |
//! | SubTask | Motion primitive | Motion primitive | Motion primitive |

mod robot;
mod subtask;
mod task;

pub use robot::{Robot, RobotId, RobotState};
pub use subtask::{
    SubTask, SubTaskCost, ATTACH_KWH, CHARGE_KWH_PER_TICK, DETACH_KWH, DRIVE_KWH_PER_UNIT,
};
pub use task::{Task, TaskCost, TaskKind, TaskSpec};
