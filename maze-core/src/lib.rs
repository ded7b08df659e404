//! Shared types and solving logic for the maze engine.
//!
//! This crate owns the maze domain model — coordinates, the grid,
//! fingerprinting, and the two solvers — independent of how a maze is
//! submitted, dispatched, or persisted. `maze-dispatch` and `maze-api`
//! build the concurrent and HTTP surfaces on top of it.

pub mod coord;
pub mod error;
pub mod fingerprint;
pub mod grid;
pub mod max_solver;
pub mod min_solver;
pub mod search;
pub mod solution;

pub use coord::{Coordinate, Dimension};
pub use error::CoreError;
pub use fingerprint::maze_fingerprint;
pub use grid::Grid;
pub use solution::{solve_max, solve_min, validate_entrance, SolutionRecord, SolutionStatus};
