//! Distance-based potential over the dynamic grid, consumed only as a
//! step-to-step difference (shaping reward).

use std::collections::{BTreeSet, VecDeque};

use crate::state::Grid;
use crate::types::{Pos, TileKind};

/// Normalized negative safe-path distance to the current objective: the
/// remaining keys while any are uncollected, the goal afterwards. A locked
/// goal is impassable terrain during the key hunt. When no target is
/// reachable the distance saturates at `width * height`, so the potential
/// bottoms out at -1.0 instead of failing the step.
pub(super) fn compute_potential(
    grid: &Grid,
    agent: Pos,
    keys_collected: u32,
    total_keys: u32,
) -> f64 {
    let hunting_keys = keys_collected < total_keys;
    let target_kind = if hunting_keys { TileKind::Key } else { TileKind::Goal };
    let targets: BTreeSet<Pos> = grid.positions_of(target_kind).into_iter().collect();
    if targets.is_empty() {
        return 0.0;
    }

    let area = grid.width * grid.height;
    let distance = shortest_distance(grid, agent, &targets, hunting_keys).unwrap_or(area);
    -(distance as f64 / area as f64)
}

fn shortest_distance(
    grid: &Grid,
    source: Pos,
    targets: &BTreeSet<Pos>,
    goal_locked: bool,
) -> Option<usize> {
    let mut visited = BTreeSet::from([source]);
    let mut queue = VecDeque::from([(source, 0_usize)]);

    while let Some((current, distance)) = queue.pop_front() {
        if targets.contains(&current) {
            return Some(distance);
        }
        for next in current.neighbors() {
            if !grid.in_bounds(next) || visited.contains(&next) {
                continue;
            }
            let tile = grid.tile_at(next);
            if tile == TileKind::Wall || tile == TileKind::Trap {
                continue;
            }
            if goal_locked && tile == TileKind::Goal {
                continue;
            }
            visited.insert(next);
            queue.push_back((next, distance + 1));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closer_positions_score_higher() {
        let grid = Grid::from_rows(&["S..KG"]);
        let far = compute_potential(&grid, Pos { y: 0, x: 0 }, 0, 1);
        let near = compute_potential(&grid, Pos { y: 0, x: 2 }, 0, 1);
        assert!(near > far);
        assert_eq!(far, -(3.0 / 5.0));
    }

    #[test]
    fn objective_switches_to_goal_once_keys_are_done() {
        let grid = Grid::from_rows(&["S...G"]);
        let potential = compute_potential(&grid, Pos { y: 0, x: 2 }, 1, 1);
        assert_eq!(potential, -(2.0 / 5.0));
    }

    #[test]
    fn locked_goal_blocks_the_safe_path_to_keys() {
        // The only corridor to the key runs through the locked goal.
        let grid = Grid::from_rows(&["S.G.K"]);
        let potential = compute_potential(&grid, Pos { y: 0, x: 0 }, 0, 1);
        assert_eq!(potential, -1.0, "unreachable key must saturate");
    }

    #[test]
    fn traps_are_never_safe_path_terrain() {
        let grid = Grid::from_rows(&[
            "S.x.K", //
            "..x..",
        ]);
        let potential = compute_potential(&grid, Pos { y: 0, x: 0 }, 0, 1);
        assert_eq!(potential, -1.0);
    }

    #[test]
    fn standing_on_the_target_scores_zero_distance() {
        let grid = Grid::from_rows(&["S.K.G"]);
        let potential = compute_potential(&grid, Pos { y: 0, x: 2 }, 0, 1);
        assert_eq!(potential, 0.0);
    }

    #[test]
    fn empty_target_set_scores_zero() {
        // A keyless grid with the key hunt still active has nothing to chase.
        let grid = Grid::from_rows(&["S...G"]);
        assert_eq!(compute_potential(&grid, Pos { y: 0, x: 0 }, 0, 1), 0.0);
    }
}
