//! Shortest-path search: breadth-first reachability (used to validate a
//! maze's exits and to seed the longest-path reachability prefilter) and
//! A* for the shortest path to one specific goal.

use std::collections::HashMap;

use crate::coord::Coordinate;
use crate::grid::Grid;
use crate::search::{NodeArena, PriorityQueue, Queue};

/// Breadth-first cost map from `start` over every cell it can reach.
/// Unreachable cells are simply absent from the map.
pub fn reachable_costs(grid: &Grid, start: Coordinate) -> HashMap<Coordinate, u32> {
    let mut costs = HashMap::new();
    costs.insert(start, 0);

    let mut frontier = Queue::new();
    frontier.push(start);

    while let Some(current) = frontier.pop() {
        let cost = costs[&current];
        for next in grid.neighbors(current) {
            if !costs.contains_key(&next) {
                costs.insert(next, cost + 1);
                frontier.push(next);
            }
        }
    }

    costs
}

/// Every passable bottom-row cell reachable from `start`, in ascending
/// column order. A maze is valid exactly when this returns one element.
pub fn find_bottom_exits(grid: &Grid, start: Coordinate) -> Vec<Coordinate> {
    let bottom_row = grid.dimension().height - 1;
    let mut exits: Vec<Coordinate> = reachable_costs(grid, start)
        .into_keys()
        .filter(|c| c.row == bottom_row)
        .collect();
    exits.sort();
    exits
}

/// The shortest path from `start` to `goal`, found with A* and the
/// Manhattan-distance heuristic. `None` if `goal` is unreachable.
pub fn find_shortest_path(grid: &Grid, start: Coordinate, goal: Coordinate) -> Option<Vec<Coordinate>> {
    let mut arena = NodeArena::new();
    let mut frontier = PriorityQueue::new();
    let mut best_cost: HashMap<Coordinate, f64> = HashMap::new();

    let root = arena.push(start, None, 0.0, Grid::manhattan(start, goal) as f64);
    best_cost.insert(start, 0.0);
    frontier.push(arena.priority(root), root);

    while let Some((_, idx)) = frontier.pop() {
        let here = arena.location(idx);
        if here == goal {
            return Some(arena.backtrack(idx));
        }

        if arena.cost(idx) > *best_cost.get(&here).unwrap_or(&f64::INFINITY) {
            continue;
        }

        for next in grid.neighbors(here) {
            let next_cost = arena.cost(idx) + 1.0;
            if next_cost < *best_cost.get(&next).unwrap_or(&f64::INFINITY) {
                best_cost.insert(next, next_cost);
                let heuristic = Grid::manhattan(next, goal) as f64;
                let child = arena.push(next, Some(idx), next_cost, heuristic);
                frontier.push(arena.priority(child), child);
            }
        }
    }

    None
}
