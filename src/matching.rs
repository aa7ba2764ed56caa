//! Feasibility-aware robot-to-task matching.
//!
//! # Algorithm
//!
//! 1. For every robot, project `(start_cost, max_energy_cost)` for every
//!    task and drop tasks whose energy bound exceeds what the robot has left.
//! 2. Each robot's best option is the lexicographic minimum of the rest.
//! 3. The robot whose best option is *worst* is served first, gets that
//!    option, and leaves the round. Repeat until robots or tasks run out.
//!
//! This is a greedy bottleneck heuristic: it protects the worst-placed robot
//! from starvation instead of minimising total cost, and makes no
//! optimality claim.
//!
//! # Tie-breaking
//! Equal costs resolve to the earliest entry in input order, both when a
//! robot picks among tasks and when the round picks among robots. A robot
//! with no feasible task ranks above every robot that has one.
//!
//! # Complexity
//! O(r * t) cost projections per round, at most `min(r, t)` rounds that
//! commit a match.
//!
//! # References
//! - Gerkey & Matarić (2004), "A Formal Analysis and Taxonomy of Task
//!   Allocation in Multi-Robot Systems"
//! - Burkard, Dell'Amico & Martello (2009), "Assignment Problems", Ch. 6
//!   (Bottleneck assignment)

use std::cmp::Ordering;

use tracing::debug;

use crate::models::{Robot, RobotId, Task, TaskCost};

/// The cheapest feasible task for one robot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestTask {
    /// Index into the task slice that was searched.
    pub index: usize,
    /// Projected cost for the robot.
    pub cost: TaskCost,
}

/// A committed robot/task pairing.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// Matched robot.
    pub robot: RobotId,
    /// Task taken out of the pool.
    pub task: Task,
    /// Projected cost at match time.
    pub cost: TaskCost,
}

/// Finds the feasible task with the lowest `(start_cost, max_energy_cost)`.
///
/// Returns `None` when no task fits in the robot's remaining energy.
pub fn min_cost_task(robot: &Robot, tasks: &[Task]) -> Option<BestTask> {
    min_cost_task_where(robot, tasks, |_| true)
}

/// Like [`min_cost_task`], considering only tasks for which `offered` holds.
///
/// The returned index still refers to the full `tasks` slice.
pub fn min_cost_task_where<F>(robot: &Robot, tasks: &[Task], offered: F) -> Option<BestTask>
where
    F: Fn(&Task) -> bool,
{
    let available = robot.kwh_available();
    let mut best: Option<BestTask> = None;

    for (index, task) in tasks.iter().enumerate() {
        if !offered(task) {
            continue;
        }
        let cost = task.calc_costs(robot.state);
        if cost.max_energy_cost > available {
            continue;
        }
        let better = match &best {
            None => true,
            Some(current) => cost.lex_cmp(&current.cost) == Ordering::Less,
        };
        if better {
            best = Some(BestTask { index, cost });
        }
    }

    best
}

/// Orders best options from most to least favourable; `None` is worst.
fn compare_options(a: &Option<BestTask>, b: &Option<BestTask>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cost.lex_cmp(&b.cost),
    }
}

/// Greedily pairs robots with tasks, worst-placed robot first.
///
/// Matched tasks are removed from `tasks`; the remaining pool keeps its
/// order. Every robot is considered at most once and every returned task
/// came from the pool, so no robot or task appears twice.
pub fn match_robots_to_tasks(robots: &[&Robot], tasks: &mut Vec<Task>) -> Vec<Match> {
    match_robots_to_tasks_where(robots, tasks, |_, _| true)
}

/// Like [`match_robots_to_tasks`], offering a task only while `offered`
/// accepts it given the matches committed so far this call.
///
/// Tasks that are never offered stay in `tasks` at their original position.
/// Used to keep exclusive resources (charging stations) from being handed
/// out twice within one matching.
pub fn match_robots_to_tasks_where<F>(
    robots: &[&Robot],
    tasks: &mut Vec<Task>,
    offered: F,
) -> Vec<Match>
where
    F: Fn(&Task, &[Match]) -> bool,
{
    let mut remaining: Vec<&Robot> = robots.to_vec();
    let mut matches = Vec::new();

    while !remaining.is_empty() && !tasks.is_empty() {
        let mut selected: Option<(usize, Option<BestTask>)> = None;

        for (pos, robot) in remaining.iter().enumerate() {
            let best = min_cost_task_where(robot, tasks, |task| offered(task, &matches));
            let worse = match &selected {
                None => true,
                Some((_, current)) => compare_options(&best, current) == Ordering::Greater,
            };
            if worse {
                selected = Some((pos, best));
            }
        }

        let Some((pos, best)) = selected else {
            break;
        };
        let robot = remaining.remove(pos);

        if let Some(best) = best {
            let task = tasks.remove(best.index);
            debug!(
                robot = robot.id,
                task = ?task.kind(),
                start_cost = best.cost.start_cost,
                energy_cost = best.cost.max_energy_cost,
                "matched"
            );
            matches.push(Match {
                robot: robot.id,
                task,
                cost: best.cost,
            });
        }
    }

    matches
}
