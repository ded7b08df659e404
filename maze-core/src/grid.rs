//! Immutable maze grid: dimensions, walls, neighbor rules and the
//! memoized lookups the solvers lean on.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::coord::{Coordinate, Dimension};

/// Cardinal offsets in the tie-break order used throughout the solvers:
/// East, West, North, South.
const OFFSETS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, -1), (0, 1)];

/// An immutable rectangular maze: a [`Dimension`] plus a wall set.
///
/// `passable`, `neighbors` and `sorted_neighbors_toward` memoize their
/// results for the lifetime of the grid — every wall lookup after the
/// first for a given coordinate is a hash-map hit.
pub struct Grid {
    dimension: Dimension,
    walls: HashSet<Coordinate>,
    passable_cache: RefCell<HashMap<Coordinate, bool>>,
    neighbor_cache: RefCell<HashMap<Coordinate, Vec<Coordinate>>>,
    sorted_neighbor_cache: RefCell<HashMap<(Coordinate, Coordinate), Vec<Coordinate>>>,
}

impl Grid {
    pub fn new(dimension: Dimension, walls: HashSet<Coordinate>) -> Self {
        Self {
            dimension,
            walls,
            passable_cache: RefCell::new(HashMap::new()),
            neighbor_cache: RefCell::new(HashMap::new()),
            sorted_neighbor_cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn walls(&self) -> &HashSet<Coordinate> {
        &self.walls
    }

    pub fn in_bounds(&self, c: Coordinate) -> bool {
        c.col < self.dimension.width && c.row < self.dimension.height
    }

    pub fn passable(&self, c: Coordinate) -> bool {
        if let Some(hit) = self.passable_cache.borrow().get(&c) {
            return *hit;
        }

        let result = self.in_bounds(c) && !self.walls.contains(&c);
        self.passable_cache.borrow_mut().insert(c, result);
        result
    }

    /// The passable cardinal neighbors of `c`, in `E, W, N, S` order.
    pub fn neighbors(&self, c: Coordinate) -> Vec<Coordinate> {
        if let Some(hit) = self.neighbor_cache.borrow().get(&c) {
            return hit.clone();
        }

        let result: Vec<Coordinate> = OFFSETS
            .iter()
            .filter_map(|&(dc, dr)| offset(c, dc, dr))
            .filter(|&n| self.passable(n))
            .collect();

        self.neighbor_cache.borrow_mut().insert(c, result.clone());
        result
    }

    pub fn manhattan(a: Coordinate, b: Coordinate) -> u32 {
        a.col.abs_diff(b.col) + a.row.abs_diff(b.row)
    }

    /// `neighbors(c)` sorted by descending Manhattan distance to `goal` —
    /// farther-first, biasing the longest-path search toward detours.
    pub fn sorted_neighbors_toward(&self, goal: Coordinate, c: Coordinate) -> Vec<Coordinate> {
        let key = (goal, c);
        if let Some(hit) = self.sorted_neighbor_cache.borrow().get(&key) {
            return hit.clone();
        }

        let mut neighbors = self.neighbors(c);
        neighbors.sort_by_key(|&n| std::cmp::Reverse(Grid::manhattan(n, goal)));

        self.sorted_neighbor_cache
            .borrow_mut()
            .insert(key, neighbors.clone());
        neighbors
    }
}

fn offset(c: Coordinate, dc: i64, dr: i64) -> Option<Coordinate> {
    let col = c.col as i64 + dc;
    let row = c.row as i64 + dr;
    if col < 0 || row < 0 {
        return None;
    }
    Some(Coordinate::new(col as u32, row as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Dimension;

    fn grid(walls: &[(u32, u32)], w: u32, h: u32) -> Grid {
        let walls = walls
            .iter()
            .map(|&(c, r)| Coordinate::new(c, r))
            .collect();
        Grid::new(Dimension::new(w, h), walls)
    }

    #[test]
    fn neighbors_respect_walls_and_bounds() {
        let g = grid(&[(1, 0)], 3, 3);
        let n = g.neighbors(Coordinate::new(0, 0));
        // East is walled, North and West are out of bounds; only South remains.
        assert_eq!(n, vec![Coordinate::new(0, 1)]);
    }

    #[test]
    fn manhattan_distance() {
        assert_eq!(Grid::manhattan(Coordinate::new(0, 0), Coordinate::new(3, 4)), 7);
    }

    #[test]
    fn sorted_neighbors_are_farthest_first() {
        let g = grid(&[], 5, 5);
        let c = Coordinate::new(2, 2);
        let goal = Coordinate::new(4, 4);
        let sorted = g.sorted_neighbors_toward(goal, c);
        let distances: Vec<u32> = sorted.iter().map(|&n| Grid::manhattan(n, goal)).collect();
        let mut expected = distances.clone();
        expected.sort_by(|a, b| b.cmp(a));
        assert_eq!(distances, expected);
    }

    #[test]
    fn passable_is_false_outside_bounds_or_on_wall() {
        let g = grid(&[(1, 1)], 3, 3);
        assert!(!g.passable(Coordinate::new(3, 0)));
        assert!(!g.passable(Coordinate::new(1, 1)));
        assert!(g.passable(Coordinate::new(0, 0)));
    }
}
