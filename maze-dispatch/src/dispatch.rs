//! The solve dispatcher: a fixed worker pool behind a non-blocking
//! admission gate, an in-flight dedup set keyed by maze fingerprint, and
//! the per-fingerprint solution state machine itself.

use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use maze_core::{solve_max, solve_min, validate_entrance, Coordinate, Grid, SolutionStatus};
use uuid::Uuid;

use crate::config::Settings;
use crate::models::{StoredMaze, StoredSolution};
use crate::pool::WorkerPool;
use crate::store::{Store, StoreError, Table, TypedStore};

/// Fixed worker pool size this solving service is sized for.
const WORKER_COUNT: usize = 3;
/// Non-blocking admission limit: at most this many solves queue behind
/// the worker pool before new requests are rejected outright.
const ADMISSION_LIMIT: usize = 2;
/// How long a request waits for a dispatched solve before it's told the
/// solution is still being computed. Chosen to sit comfortably under a
/// typical platform request timeout.
const SOLVE_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steps {
    Min,
    Max,
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("there is already a solving process running for this maze")]
    AlreadyProcessing,
    #[error("there are already too many mazes being solved, please try again later")]
    TooManyInFlight,
    #[error("the solution is still being processed, please check back later")]
    StillProcessing,
    #[error("the maze is probably too complex to be solved here")]
    MaxTooComplex,
    #[error("maze is invalid: {0:?}")]
    InvalidMaze(SolutionStatus),
    #[error("the system could not compute a solution for this maze")]
    SystemFail,
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// A non-blocking counting semaphore: `try_acquire` never parks the
/// caller, it just reports whether a permit was available.
struct AdmissionGate {
    permits: AtomicUsize,
    max: usize,
}

impl AdmissionGate {
    fn new(max: usize) -> Self {
        Self {
            permits: AtomicUsize::new(0),
            max,
        }
    }

    fn try_acquire(&self) -> bool {
        loop {
            let current = self.permits.load(Ordering::SeqCst);
            if current >= self.max {
                return false;
            }
            if self
                .permits
                .compare_exchange(current, current + 1, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                return true;
            }
        }
    }

    fn release(&self) {
        self.permits.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Derives a solver seed from a maze's fingerprint so the same maze
/// always retraces the same longest-path search.
fn seed_from_fingerprint(fingerprint: &str) -> u64 {
    u64::from_str_radix(&fingerprint[0..16], 16).unwrap_or(0)
}

fn solutions_table(store: &dyn Store) -> TypedStore<'_, StoredSolution> {
    TypedStore::new(store, Table::MazeSolutions)
}

/// Runs (or resumes) the solve pipeline for one maze, synchronously.
/// This is the function both the inline path and the worker pool run,
/// covering both the min-solve and the max-solve step.
fn run_solve_job(store: Arc<dyn Store>, maze: StoredMaze, steps: Steps, solution_id: Uuid) -> Result<Vec<Coordinate>, DispatchError> {
    let solutions = solutions_table(store.as_ref());

    let mut stored = solutions
        .get_by_key(solution_id)
        .unwrap_or_else(|_| StoredSolution::new_for(maze.hash.clone()));

    if stored.record.status == SolutionStatus::New {
        stored.record.start_processing();
        solutions.put(stored.id, &stored)?;

        let grid = Grid::new(maze.dimension, maze.walls.iter().copied().collect());

        if let Err(status) = validate_entrance(maze.dimension, &grid, maze.entrance) {
            stored.record.mark_invalid(status);
            solutions.put(stored.id, &stored)?;
            return Err(DispatchError::InvalidMaze(status));
        }

        match solve_min(&grid, maze.entrance) {
            Ok((exit, path)) => stored.record.mark_solved_min(exit, path),
            Err(status) => {
                stored.record.mark_invalid(status);
                solutions.put(stored.id, &stored)?;
                return Err(DispatchError::InvalidMaze(status));
            }
        }
        solutions.put(stored.id, &stored)?;
    }

    if steps == Steps::Min {
        return Ok(stored
            .record
            .shortest_path
            .clone()
            .expect("SolvedMin implies a shortest path"));
    }

    match stored.record.status {
        SolutionStatus::SolvedMax => {
            return Ok(stored.record.longest_path.clone().expect("SolvedMax implies a longest path"))
        }
        SolutionStatus::FailedMax => return Err(DispatchError::MaxTooComplex),
        SolutionStatus::SolvedMin => {}
        other => return Err(DispatchError::InvalidMaze(other)),
    }

    stored.record.start_processing();
    solutions.put(stored.id, &stored)?;

    let grid = Grid::new(maze.dimension, maze.walls.iter().copied().collect());
    let exit = stored.record.exit.expect("SolvedMin implies a detected exit");
    let seed = seed_from_fingerprint(&maze.hash);

    match solve_max(&grid, maze.entrance, exit, seed) {
        Some(path) => {
            stored.record.mark_solved_max(path.clone());
            solutions.put(stored.id, &stored)?;
            Ok(path)
        }
        None => {
            stored.record.mark_failed_max();
            solutions.put(stored.id, &stored)?;
            Err(DispatchError::MaxTooComplex)
        }
    }
}

/// Whether the currently-stored status already answers `steps` without
/// any further solving, and if so, what to return.
fn fast_path(record: &maze_core::SolutionRecord, steps: Steps) -> Option<Result<Vec<Coordinate>, DispatchError>> {
    use SolutionStatus::*;

    match record.status {
        SystemFail => return Some(Err(DispatchError::SystemFail)),
        InvalidGeometry | InvalidEntryInWall | InvalidEntryOutOfBounds | InvalidNoExit | InvalidMultiExit => {
            return Some(Err(DispatchError::InvalidMaze(record.status)))
        }
        _ => {}
    }

    match (steps, record.status) {
        (Steps::Min, SolvedMin) | (Steps::Min, SolvedMax) | (Steps::Min, FailedMax) => Some(Ok(record
            .shortest_path
            .clone()
            .expect("SolvedMin implies a shortest path"))),
        (Steps::Max, SolvedMax) => Some(Ok(record.longest_path.clone().expect("SolvedMax implies a longest path"))),
        (Steps::Max, FailedMax) => Some(Err(DispatchError::MaxTooComplex)),
        _ => None,
    }
}

/// Dispatches maze solves across a bounded worker pool, de-duplicating
/// concurrent requests for the same maze and falling back to solving
/// inline when no background pool is available.
pub struct Dispatcher {
    store: Arc<dyn Store>,
    pool: Option<WorkerPool>,
    admission: Arc<AdmissionGate>,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn Store>, settings: &Settings) -> Self {
        let pool = if settings.deta_runtime {
            None
        } else {
            Some(WorkerPool::new(WORKER_COUNT))
        };

        Self {
            store,
            pool,
            admission: Arc::new(AdmissionGate::new(ADMISSION_LIMIT)),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Finds or creates the solution record for `maze`, and returns the
    /// path it holds for `steps` — computing it first if necessary.
    pub fn solve(&self, maze: &StoredMaze, steps: Steps) -> Result<Vec<Coordinate>, DispatchError> {
        let solutions = solutions_table(self.store.as_ref());

        let mut matches = solutions.get_by_field("fingerprint", &serde_json::json!(maze.hash))?;
        let stored = matches.pop().unwrap_or_else(|| StoredSolution::new_for(maze.hash.clone()));

        if stored.record.status == SolutionStatus::Processing {
            return Err(DispatchError::AlreadyProcessing);
        }

        if let Some(result) = fast_path(&stored.record, steps) {
            return result;
        }

        solutions.put(stored.id, &stored)?;

        match &self.pool {
            None => run_solve_job(Arc::clone(&self.store), maze.clone(), steps, stored.id),
            Some(pool) => self.dispatch_to_pool(pool, maze, steps, stored.id),
        }
    }

    fn dispatch_to_pool(&self, pool: &WorkerPool, maze: &StoredMaze, steps: Steps, solution_id: Uuid) -> Result<Vec<Coordinate>, DispatchError> {
        {
            let mut in_flight = self.in_flight.lock().expect("in-flight set mutex poisoned");
            if !in_flight.insert(maze.hash.clone()) {
                return Err(DispatchError::AlreadyProcessing);
            }
        }

        if !self.admission.try_acquire() {
            self.in_flight.lock().expect("in-flight set mutex poisoned").remove(&maze.hash);
            return Err(DispatchError::TooManyInFlight);
        }

        let (tx, rx) = mpsc::channel();
        let store = Arc::clone(&self.store);
        let maze_for_job = maze.clone();
        let admission = Arc::clone(&self.admission);
        let in_flight = Arc::clone(&self.in_flight);
        let fingerprint = maze.hash.clone();

        pool.submit(move || {
            let outcome = catch_unwind(AssertUnwindSafe(|| run_solve_job(store, maze_for_job, steps, solution_id)));
            admission.release();
            in_flight.lock().expect("in-flight set mutex poisoned").remove(&fingerprint);
            let _ = tx.send(outcome);
        });

        match rx.recv_timeout(SOLVE_TIMEOUT) {
            Ok(Ok(result)) => result,
            Ok(Err(_panic)) => Err(DispatchError::SystemFail),
            Err(_timeout) => Err(DispatchError::StillProcessing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use maze_core::Dimension;
    use std::sync::Barrier;

    fn corridor_maze() -> StoredMaze {
        let walls = vec![Coordinate::new(1, 0), Coordinate::new(1, 1), Coordinate::new(1, 2)];
        let dimension = Dimension::new(3, 3);
        let entrance = Coordinate::new(0, 0);
        let hash = maze_core::maze_fingerprint(entrance, dimension, &walls);
        StoredMaze {
            id: Uuid::new_v4(),
            owner_id: "owner".into(),
            mazenum: 1,
            dimension,
            entrance,
            walls,
            hash,
        }
    }

    #[test]
    fn solves_min_then_max_inline() {
        let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
        let settings = Settings {
            deta_runtime: true,
            ..Settings::default()
        };
        let dispatcher = Dispatcher::new(store, &settings);
        let maze = corridor_maze();

        let min_path = dispatcher.solve(&maze, Steps::Min).unwrap();
        assert_eq!(min_path.first(), Some(&maze.entrance));

        let max_path = dispatcher.solve(&maze, Steps::Max).unwrap();
        assert_eq!(max_path.first(), Some(&maze.entrance));
        assert_eq!(max_path.last(), Some(&Coordinate::new(0, 2)));
    }

    #[test]
    fn invalid_maze_reports_invalid_status() {
        let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
        let settings = Settings {
            deta_runtime: true,
            ..Settings::default()
        };
        let dispatcher = Dispatcher::new(store, &settings);

        let dimension = Dimension::new(3, 3);
        let entrance = Coordinate::new(0, 0);
        let walls = vec![];
        let hash = maze_core::maze_fingerprint(entrance, dimension, &walls);
        let maze = StoredMaze {
            id: Uuid::new_v4(),
            owner_id: "owner".into(),
            mazenum: 1,
            dimension,
            entrance,
            walls,
            hash,
        };

        let err = dispatcher.solve(&maze, Steps::Min).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidMaze(SolutionStatus::InvalidMultiExit)));
    }

    #[test]
    fn admission_gate_rejects_beyond_its_limit() {
        let gate = AdmissionGate::new(2);
        assert!(gate.try_acquire());
        assert!(gate.try_acquire());
        assert!(!gate.try_acquire());
        gate.release();
        assert!(gate.try_acquire());
    }

    #[test]
    fn pooled_dispatch_runs_concurrent_distinct_mazes() {
        let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
        let settings = Settings::default();
        let dispatcher = Arc::new(Dispatcher::new(store, &settings));

        let barrier = Arc::new(Barrier::new(2));
        let handles: Vec<_> = (0..2)
            .map(|i| {
                let dispatcher = Arc::clone(&dispatcher);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    let mut maze = corridor_maze();
                    maze.hash = format!("{:064x}", i + 1);
                    barrier.wait();
                    dispatcher.solve(&maze, Steps::Min)
                })
            })
            .collect();

        for h in handles {
            assert!(h.join().unwrap().is_ok());
        }
    }
}
