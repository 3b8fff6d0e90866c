//! Solvability checks over static grids via multi-target breadth-first search.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;

use crate::state::Grid;
use crate::types::{Pos, TileKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationFailure {
    MissingStart,
    MissingGoal,
    NoKeys,
    KeysUnreachable { reached: usize, total: usize },
    GoalUnreachable,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStart => write!(f, "no start tile"),
            Self::MissingGoal => write!(f, "no goal tile"),
            Self::NoKeys => write!(f, "no keys found"),
            Self::KeysUnreachable { reached, total } => {
                write!(f, "not all keys reachable from start ({reached}/{total})")
            }
            Self::GoalUnreachable => write!(f, "goal not reachable from start"),
        }
    }
}

/// Breadth-first search from `source`, treating walls and traps as
/// impassable and every other tile kind as open terrain. Returns the subset
/// of `targets` actually reached. The search stops early once every target
/// has been seen; the result does not depend on expansion order.
pub fn reachable_targets(grid: &Grid, source: Pos, targets: &BTreeSet<Pos>) -> BTreeSet<Pos> {
    let mut reached = BTreeSet::new();
    let mut visited = BTreeSet::from([source]);
    let mut queue = VecDeque::from([source]);

    while let Some(current) = queue.pop_front() {
        if targets.contains(&current) {
            reached.insert(current);
            if reached.len() == targets.len() {
                break;
            }
        }
        for next in current.neighbors() {
            if !grid.in_bounds(next) || visited.contains(&next) {
                continue;
            }
            match grid.tile_at(next) {
                TileKind::Wall | TileKind::Trap => {}
                TileKind::Empty | TileKind::Start | TileKind::Goal | TileKind::Key => {
                    visited.insert(next);
                    queue.push_back(next);
                }
            }
        }
    }

    reached
}

/// Acceptance test for generated maps: every key and the goal must be
/// reachable from the start. The goal is treated as open terrain here — the
/// check proves the path exists once the goal unlocks, independent of the
/// runtime locked-goal rule.
pub fn validate_map(grid: &Grid) -> Result<(), ValidationFailure> {
    let start = grid.find_unique(TileKind::Start).ok_or(ValidationFailure::MissingStart)?;
    let goal = grid.find_unique(TileKind::Goal).ok_or(ValidationFailure::MissingGoal)?;

    let keys: BTreeSet<Pos> = grid.positions_of(TileKind::Key).into_iter().collect();
    if keys.is_empty() {
        return Err(ValidationFailure::NoKeys);
    }

    let reached_keys = reachable_targets(grid, start, &keys);
    if reached_keys.len() != keys.len() {
        return Err(ValidationFailure::KeysUnreachable {
            reached: reached_keys.len(),
            total: keys.len(),
        });
    }

    if reachable_targets(grid, start, &BTreeSet::from([goal])).is_empty() {
        return Err(ValidationFailure::GoalUnreachable);
    }

    Ok(())
}
