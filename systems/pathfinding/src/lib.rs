#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Breadth-first pathfinding over the terrain grid.
//!
//! Pure functions over a borrowed [`GridView`]: no state is held between
//! calls. Neighbor exploration order is shuffled once per call so that
//! equally short routes do not funnel every pursuer down the same lane.

use std::collections::{HashMap, VecDeque};

use ore_siege_core::{Direction, GridCoord, GridView};
use rand::seq::SliceRandom;
use rand::Rng;

/// Returns the first step of a shortest walkable route from `from` to `to`,
/// or `None` when no route exists.
///
/// Cells in `blocked` are impassable except for `to` itself, which is
/// always a legal endpoint. Callers chasing the player pass the player's
/// cell in `blocked` so routes never thread through it.
pub fn next_step<R: Rng>(
    grid: GridView<'_>,
    from: GridCoord,
    to: GridCoord,
    blocked: &[GridCoord],
    rng: &mut R,
) -> Option<GridCoord> {
    shortest_path(grid, from, to, blocked, rng).and_then(|path| path.first().copied())
}

/// Computes a shortest walkable route from `from` to `to`, excluding the
/// starting cell and ending at `to`. Returns `None` when unreachable and
/// an empty path when `from == to`.
///
/// The search visits each cell at most once, so it terminates within grid
/// area even when the target is fully enclosed.
pub fn shortest_path<R: Rng>(
    grid: GridView<'_>,
    from: GridCoord,
    to: GridCoord,
    blocked: &[GridCoord],
    rng: &mut R,
) -> Option<Vec<GridCoord>> {
    if from == to {
        return Some(Vec::new());
    }
    if !grid.in_bounds(from) || !grid.in_bounds(to) {
        return None;
    }

    let mut order = Direction::ALL;
    order.shuffle(rng);

    let mut came_from: HashMap<GridCoord, GridCoord> = HashMap::new();
    let mut frontier = VecDeque::new();
    frontier.push_back(from);
    let _ = came_from.insert(from, from);

    while let Some(cell) = frontier.pop_front() {
        for direction in order {
            let Some(neighbor) = cell.offset(direction) else {
                continue;
            };
            if came_from.contains_key(&neighbor) {
                continue;
            }
            if !traversable(grid, neighbor, to, blocked) {
                continue;
            }
            let _ = came_from.insert(neighbor, cell);
            if neighbor == to {
                return Some(reconstruct(&came_from, from, to));
            }
            frontier.push_back(neighbor);
        }
    }

    None
}

fn traversable(grid: GridView<'_>, cell: GridCoord, goal: GridCoord, blocked: &[GridCoord]) -> bool {
    let Some(kind) = grid.kind(cell) else {
        return false;
    };
    if !kind.is_walkable() {
        return false;
    }
    cell == goal || !blocked.contains(&cell)
}

fn reconstruct(
    came_from: &HashMap<GridCoord, GridCoord>,
    from: GridCoord,
    to: GridCoord,
) -> Vec<GridCoord> {
    let mut path = vec![to];
    let mut cursor = to;
    while let Some(parent) = came_from.get(&cursor) {
        if *parent == from {
            break;
        }
        path.push(*parent);
        cursor = *parent;
    }
    path.reverse();
    path
}
