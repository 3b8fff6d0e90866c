//! Breadth-first action planning over static grids, used by oracle rollouts
//! and end-to-end completability tests.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::state::Grid;
use crate::types::{Action, Pos, TileKind};

/// Shortest action sequence from `start` to the nearest tile of `target`,
/// or `None` when no such tile is reachable. Walls and traps block; while
/// the target is a key the goal blocks too, mirroring the locked-goal rule
/// the executing agent would face.
pub fn plan_route(grid: &Grid, start: Pos, target: TileKind) -> Option<Vec<Action>> {
    let mut visited = BTreeSet::from([start]);
    let mut came_from: BTreeMap<Pos, (Pos, Action)> = BTreeMap::new();
    let mut queue = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        if grid.tile_at(current) == target {
            return Some(reconstruct_actions(&came_from, start, current));
        }
        for action in Action::ALL {
            let next = current.step(action);
            if !grid.in_bounds(next) || visited.contains(&next) {
                continue;
            }
            let tile = grid.tile_at(next);
            if tile == TileKind::Wall || tile == TileKind::Trap {
                continue;
            }
            if target == TileKind::Key && tile == TileKind::Goal {
                continue;
            }
            visited.insert(next);
            came_from.insert(next, (current, action));
            queue.push_back(next);
        }
    }

    None
}

/// Full completion plan: one leg per key, then the goal leg. Plans against a
/// working copy that clears each collected key, exactly as the dynamic grid
/// would evolve. `None` means some leg has no safe path.
pub fn oracle_actions(grid: &Grid, num_keys: usize) -> Option<Vec<Action>> {
    let mut working = grid.clone();
    let mut position = working.find_unique(TileKind::Start)?;
    let mut actions = Vec::new();

    for _ in 0..num_keys {
        let leg = plan_route(&working, position, TileKind::Key)?;
        position = walk(position, &leg);
        working.set_tile(position, TileKind::Empty);
        actions.extend(leg);
    }

    let goal_leg = plan_route(&working, position, TileKind::Goal)?;
    actions.extend(goal_leg);
    Some(actions)
}

fn walk(start: Pos, actions: &[Action]) -> Pos {
    actions.iter().fold(start, |pos, action| pos.step(*action))
}

fn reconstruct_actions(
    came_from: &BTreeMap<Pos, (Pos, Action)>,
    start: Pos,
    end: Pos,
) -> Vec<Action> {
    let mut actions = Vec::new();
    let mut current = end;
    while current != start {
        let Some(&(previous, action)) = came_from.get(&current) else {
            return Vec::new();
        };
        actions.push(action);
        current = previous;
    }
    actions.reverse();
    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_corridor_plans_minimal_legs() {
        let grid = Grid::from_rows(&["S.K.G"]);
        let to_key = plan_route(&grid, Pos { y: 0, x: 0 }, TileKind::Key).expect("key leg");
        assert_eq!(to_key, vec![Action::Right, Action::Right]);

        let plan = oracle_actions(&grid, 1).expect("full plan");
        assert_eq!(plan, vec![Action::Right; 4]);
    }

    #[test]
    fn planner_detours_around_traps() {
        let grid = Grid::from_rows(&[
            "SxK", //
            "...",
        ]);
        let plan = plan_route(&grid, Pos { y: 0, x: 0 }, TileKind::Key).expect("detour");
        assert_eq!(plan.len(), 4);
        assert_eq!(walk(Pos { y: 0, x: 0 }, &plan), Pos { y: 0, x: 2 });
    }

    #[test]
    fn key_leg_refuses_to_cross_the_locked_goal() {
        let grid = Grid::from_rows(&["S.G.K"]);
        assert_eq!(plan_route(&grid, Pos { y: 0, x: 0 }, TileKind::Key), None);
        assert_eq!(oracle_actions(&grid, 1), None);
    }

    #[test]
    fn multi_key_plan_consumes_keys_in_nearest_first_order() {
        let grid = Grid::from_rows(&["S.K.K.G"]);
        let plan = oracle_actions(&grid, 2).expect("two key legs plus goal");
        assert_eq!(plan, vec![Action::Right; 6]);
    }

    #[test]
    fn starting_on_the_target_needs_no_actions() {
        let grid = Grid::from_rows(&["K.G"]);
        let plan = plan_route(&grid, Pos { y: 0, x: 0 }, TileKind::Key).expect("already there");
        assert!(plan.is_empty());
    }
}
