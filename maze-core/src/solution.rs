//! The solution state machine and the two solve phases that drive it.
//!
//! A [`SolutionRecord`] starts at [`SolutionStatus::New`], moves through
//! `Processing` at least twice (once for the shortest-path phase, once
//! for the longest-path phase), and ends at exactly one terminal status.
//! Terminal statuses are never left once reached.

use serde::{Deserialize, Serialize};

use crate::coord::{Coordinate, Dimension};
use crate::grid::Grid;
use crate::max_solver::find_longest_path;
use crate::min_solver::find_bottom_exits;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolutionStatus {
    New,
    Processing,
    SolvedMin,
    SolvedMax,
    FailedMax,
    InvalidGeometry,
    InvalidEntryInWall,
    InvalidEntryOutOfBounds,
    InvalidNoExit,
    InvalidMultiExit,
    SystemFail,
}

impl SolutionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, SolutionStatus::New | SolutionStatus::Processing | SolutionStatus::SolvedMin)
    }
}

/// The persisted record of a solve attempt against one fingerprinted
/// maze. `shortest_path`/`longest_path`/`exit` populate as the record
/// advances; they stay `None` if the corresponding phase is never
/// reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionRecord {
    pub fingerprint: String,
    pub status: SolutionStatus,
    pub exit: Option<Coordinate>,
    pub shortest_path: Option<Vec<Coordinate>>,
    pub longest_path: Option<Vec<Coordinate>>,
}

impl SolutionRecord {
    pub fn new(fingerprint: String) -> Self {
        Self {
            fingerprint,
            status: SolutionStatus::New,
            exit: None,
            shortest_path: None,
            longest_path: None,
        }
    }

    pub fn start_processing(&mut self) {
        debug_assert!(
            matches!(self.status, SolutionStatus::New | SolutionStatus::SolvedMin),
            "processing may only start from New or SolvedMin",
        );
        self.status = SolutionStatus::Processing;
    }

    pub fn mark_invalid(&mut self, status: SolutionStatus) {
        debug_assert!(
            matches!(
                status,
                SolutionStatus::InvalidGeometry
                    | SolutionStatus::InvalidEntryInWall
                    | SolutionStatus::InvalidEntryOutOfBounds
                    | SolutionStatus::InvalidNoExit
                    | SolutionStatus::InvalidMultiExit
            ),
            "mark_invalid requires one of the Invalid* statuses",
        );
        self.status = status;
    }

    pub fn mark_solved_min(&mut self, exit: Coordinate, path: Vec<Coordinate>) {
        debug_assert_eq!(self.status, SolutionStatus::Processing);
        self.exit = Some(exit);
        self.shortest_path = Some(path);
        self.status = SolutionStatus::SolvedMin;
    }

    pub fn mark_solved_max(&mut self, path: Vec<Coordinate>) {
        debug_assert_eq!(self.status, SolutionStatus::Processing);
        self.longest_path = Some(path);
        self.status = SolutionStatus::SolvedMax;
    }

    pub fn mark_failed_max(&mut self) {
        debug_assert_eq!(self.status, SolutionStatus::Processing);
        self.status = SolutionStatus::FailedMax;
    }

    pub fn mark_system_fail(&mut self) {
        self.status = SolutionStatus::SystemFail;
    }
}

/// Geometry and entrance validity, checked before any search runs.
/// Returns the invalid status to record, or `Ok` if the maze is
/// eligible for solving.
pub fn validate_entrance(dimension: Dimension, grid: &Grid, entrance: Coordinate) -> Result<(), SolutionStatus> {
    if !dimension.is_valid_geometry() {
        return Err(SolutionStatus::InvalidGeometry);
    }
    if !grid.in_bounds(entrance) {
        return Err(SolutionStatus::InvalidEntryOutOfBounds);
    }
    if grid.walls().contains(&entrance) {
        return Err(SolutionStatus::InvalidEntryInWall);
    }
    Ok(())
}

/// Phase one: find the single valid bottom-row exit and the shortest
/// path to it. `Err` carries the invalid/failure status to record.
pub fn solve_min(grid: &Grid, entrance: Coordinate) -> Result<(Coordinate, Vec<Coordinate>), SolutionStatus> {
    let exits = find_bottom_exits(grid, entrance);
    match exits.len() {
        0 => Err(SolutionStatus::InvalidNoExit),
        1 => {
            let exit = exits[0];
            let path = crate::min_solver::find_shortest_path(grid, entrance, exit)
                .expect("an exit returned by find_bottom_exits is reachable by construction");
            Ok((exit, path))
        }
        _ => Err(SolutionStatus::InvalidMultiExit),
    }
}

/// Phase two: the longest simple path from `entrance` to `exit`. Returns
/// `None` if the bounded search never reaches the exit at all, which the
/// caller records as [`SolutionStatus::FailedMax`].
pub fn solve_max(grid: &Grid, entrance: Coordinate, exit: Coordinate, seed: u64) -> Option<Vec<Coordinate>> {
    let path = find_longest_path(grid, entrance, exit, seed);
    if path.is_empty() {
        None
    } else {
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn grid(walls: &[(u32, u32)], w: u32, h: u32) -> Grid {
        let walls = walls.iter().map(|&(c, r)| Coordinate::new(c, r)).collect::<HashSet<_>>();
        Grid::new(Dimension::new(w, h), walls)
    }

    #[test]
    fn record_transitions_through_solved_min_to_solved_max() {
        let mut record = SolutionRecord::new("fp".to_string());
        assert_eq!(record.status, SolutionStatus::New);

        record.start_processing();
        record.mark_solved_min(Coordinate::new(0, 2), vec![Coordinate::new(0, 0)]);
        assert_eq!(record.status, SolutionStatus::SolvedMin);

        record.start_processing();
        record.mark_solved_max(vec![Coordinate::new(0, 0), Coordinate::new(0, 2)]);
        assert_eq!(record.status, SolutionStatus::SolvedMax);
        assert!(record.status.is_terminal());
    }

    #[test]
    fn validate_entrance_rejects_bad_geometry_and_placement() {
        let g = grid(&[(1, 1)], 3, 3);
        assert_eq!(
            validate_entrance(Dimension::new(3, 1), &g, Coordinate::new(0, 0)),
            Err(SolutionStatus::InvalidGeometry)
        );
        assert_eq!(
            validate_entrance(Dimension::new(3, 3), &g, Coordinate::new(9, 9)),
            Err(SolutionStatus::InvalidEntryOutOfBounds)
        );
        assert_eq!(
            validate_entrance(Dimension::new(3, 3), &g, Coordinate::new(1, 1)),
            Err(SolutionStatus::InvalidEntryInWall)
        );
        assert_eq!(validate_entrance(Dimension::new(3, 3), &g, Coordinate::new(0, 0)), Ok(()));
    }

    #[test]
    fn solve_min_reports_no_exit_and_multi_exit() {
        let walled_off = grid(&[(0, 2), (1, 2), (2, 2)], 3, 3);
        assert_eq!(solve_min(&walled_off, Coordinate::new(0, 0)), Err(SolutionStatus::InvalidNoExit));

        let open = grid(&[], 3, 3);
        assert_eq!(solve_min(&open, Coordinate::new(1, 0)), Err(SolutionStatus::InvalidMultiExit));
    }

    #[test]
    fn solve_min_then_max_on_single_corridor() {
        let g = grid(&[(1, 0), (1, 1), (1, 2)], 3, 3);
        let (exit, shortest) = solve_min(&g, Coordinate::new(0, 0)).unwrap();
        assert_eq!(exit, Coordinate::new(0, 2));
        assert_eq!(shortest.len(), 3);

        let longest = solve_max(&g, Coordinate::new(0, 0), exit, 1).unwrap();
        assert_eq!(longest.first(), Some(&Coordinate::new(0, 0)));
        assert_eq!(longest.last(), Some(&exit));
    }
}
