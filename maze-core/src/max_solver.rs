//! Longest simple-path search: a depth-bounded, explicitly-stacked DFS
//! biased toward detours and pruned by a reachability prefilter and an
//! edge-dominance memo.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::coord::Coordinate;
use crate::grid::Grid;
use crate::min_solver::reachable_costs;
use crate::search::NodeArena;

/// Depth and total-pop ceilings past which the search gives up on
/// improving the best path found so far and returns it.
const MAX_DEPTH: u32 = 1000;
const MAX_POPS: u64 = 100_000_000;

struct Frame {
    idx: usize,
    neighbors: Vec<Coordinate>,
    next: usize,
}

/// Neighbors of `c`, farthest-from-`goal` first, with ties broken
/// randomly rather than by grid order: shuffle first, then a stable
/// sort by distance leaves equal-distance neighbors in shuffled order.
fn biased_neighbors(grid: &Grid, rng: &mut StdRng, goal: Coordinate, c: Coordinate) -> Vec<Coordinate> {
    let mut neighbors = grid.neighbors(c);
    neighbors.shuffle(rng);
    neighbors.sort_by_key(|&n| std::cmp::Reverse(Grid::manhattan(n, goal)));
    neighbors
}

/// Walks the parent chain from `goal_idx` back to the root, recording
/// for every edge on that path the greatest depth at which it was ever
/// walked on a path that actually reached the goal. Only a path that
/// reaches the goal gets to write the memo — a dead-end branch must
/// never poison an edge for branches explored after it.
fn record_solved_edges(arena: &NodeArena, goal_idx: usize, memo: &mut HashMap<(Coordinate, Coordinate), u32>) {
    let mut cur = goal_idx;
    while let Some(parent) = arena.parent(cur) {
        let edge = (arena.location(parent), arena.location(cur));
        let cost = arena.cost(cur) as u32;
        let entry = memo.entry(edge).or_insert(0);
        if cost > *entry {
            *entry = cost;
        }
        cur = parent;
    }
}

/// Whether `edge`, attempted at `next_depth`, is dominated by a path that
/// already reached the goal through it at a strictly greater depth. A
/// memoized depth equal to `next_depth` is not a reason to prune: only a
/// strictly better solution already on record wins.
fn is_pruned(memo: &HashMap<(Coordinate, Coordinate), u32>, edge: (Coordinate, Coordinate), next_depth: u32) -> bool {
    memo.get(&edge).is_some_and(|&seen_depth| seen_depth > next_depth)
}

/// The longest simple path from `start` to `goal`, or `[start]` if
/// `start == goal` or no path exists at all. `seed` makes the search
/// reproducible: the same maze and seed always retrace the same walk.
pub fn find_longest_path(grid: &Grid, start: Coordinate, goal: Coordinate, seed: u64) -> Vec<Coordinate> {
    let mut best: Vec<Coordinate> = vec![start];
    if start == goal {
        return best;
    }

    // Cells that cannot reach the goal at all are dead ends for this
    // search; pruning them here avoids wasting pops descending into them.
    let reach = reachable_costs(grid, goal);
    if !reach.contains_key(&start) {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut arena = NodeArena::new();
    let mut memo: HashMap<(Coordinate, Coordinate), u32> = HashMap::new();
    let root = arena.push(start, None, 0.0, 0.0);

    let mut stack = vec![Frame {
        idx: root,
        neighbors: biased_neighbors(grid, &mut rng, goal, start),
        next: 0,
    }];

    let mut pops: u64 = 0;
    let mut found_goal = false;

    while let Some(frame) = stack.last_mut() {
        pops += 1;
        if pops >= MAX_POPS {
            break;
        }

        let idx = frame.idx;
        let depth = arena.cost(idx) as u32;

        if depth >= MAX_DEPTH || frame.next >= frame.neighbors.len() {
            stack.pop();
            continue;
        }

        let next_loc = frame.neighbors[frame.next];
        frame.next += 1;

        if arena.has_visited(idx, next_loc) || !reach.contains_key(&next_loc) {
            continue;
        }

        let next_depth = depth + 1;
        let edge = (arena.location(idx), next_loc);
        if is_pruned(&memo, edge, next_depth) {
            continue;
        }

        let child = arena.push(next_loc, Some(idx), next_depth as f64, 0.0);

        if next_loc == goal {
            found_goal = true;
            record_solved_edges(&arena, child, &mut memo);
            let path = arena.backtrack(child);
            if path.len() > best.len() {
                best = path;
            }
            continue;
        }

        stack.push(Frame {
            idx: child,
            neighbors: biased_neighbors(grid, &mut rng, goal, next_loc),
            next: 0,
        });
    }

    if found_goal {
        best
    } else {
        Vec::new()
    }
}
