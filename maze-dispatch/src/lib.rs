//! Concurrency, persistence and configuration around the maze-core
//! solvers: the dispatcher that runs solves on a bounded worker pool,
//! the storage seam solves are read from and written to, and the
//! environment-driven settings that wire them together.

pub mod config;
pub mod dispatch;
pub mod models;
pub mod pool;
pub mod store;

pub use config::Settings;
pub use dispatch::{DispatchError, Dispatcher, Steps};
pub use models::{StoredMaze, StoredSolution};
pub use store::{InMemoryStore, Store, StoreError, Table, TypedStore};

use std::sync::Arc;

use maze_core::{Coordinate, Dimension};
use serde_json::json;
use uuid::Uuid;

/// Creates (or returns the existing) maze for `owner_id` with the given
/// geometry, deduplicating by content fingerprint the same way the
/// corpus's `create_maze` endpoint does: resubmitting an identical maze
/// returns the maze already on file instead of creating a duplicate.
pub fn create_maze(
    store: &dyn Store,
    owner_id: &str,
    dimension: Dimension,
    entrance: Coordinate,
    walls: Vec<Coordinate>,
) -> Result<StoredMaze, StoreError> {
    let hash = maze_core::maze_fingerprint(entrance, dimension, &walls);
    let mazes: TypedStore<StoredMaze> = TypedStore::new(store, Table::Mazes);

    let existing = mazes.get_by_fields(&[("owner_id", &json!(owner_id)), ("hash", &json!(hash))])?;
    if let Some(found) = existing.into_iter().next() {
        return Ok(found);
    }

    let mazenum = next_maze_num(store, owner_id)?;
    let maze = StoredMaze {
        id: Uuid::new_v4(),
        owner_id: owner_id.to_string(),
        mazenum,
        dimension,
        entrance,
        walls,
        hash,
    };
    mazes.put(maze.id, &maze)?;
    Ok(maze)
}

/// The next unused per-owner maze number: one past the highest one this
/// owner already has, starting at `1`.
fn next_maze_num(store: &dyn Store, owner_id: &str) -> Result<u64, StoreError> {
    let mazes: TypedStore<StoredMaze> = TypedStore::new(store, Table::Mazes);
    let owned = mazes.get_by_field("owner_id", &json!(owner_id))?;
    Ok(owned.iter().map(|m| m.mazenum).max().unwrap_or(0) + 1)
}

pub fn get_maze_by_num(store: &dyn Store, owner_id: &str, mazenum: u64) -> Result<Option<StoredMaze>, StoreError> {
    let mazes: TypedStore<StoredMaze> = TypedStore::new(store, Table::Mazes);
    let found = mazes.get_by_fields(&[("owner_id", &json!(owner_id)), ("mazenum", &json!(mazenum))])?;
    Ok(found.into_iter().next())
}

pub fn get_maze_by_id(store: &dyn Store, id: Uuid) -> Result<Option<StoredMaze>, StoreError> {
    let mazes: TypedStore<StoredMaze> = TypedStore::new(store, Table::Mazes);
    match mazes.get_by_key(id) {
        Ok(maze) => Ok(Some(maze)),
        Err(StoreError::NotFound) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Deletes a maze outright. Its solution record is left in place,
/// keyed by fingerprint rather than maze id, so a second maze with the
/// same geometry still benefits from it.
pub fn delete_maze(store: &dyn Store, id: Uuid) -> Result<(), StoreError> {
    let mazes: TypedStore<StoredMaze> = TypedStore::new(store, Table::Mazes);
    mazes.delete(id)
}

/// Solves a single self-contained maze without going through the
/// persistence layer at all — the path the CLI binary uses.
pub fn solve_standalone(
    dimension: Dimension,
    entrance: Coordinate,
    walls: Vec<Coordinate>,
    steps: Steps,
) -> Result<Vec<Coordinate>, DispatchError> {
    let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
    let dispatcher = Dispatcher::new(Arc::clone(&store), &Settings::default());
    let maze = create_maze(store.as_ref(), "cli", dimension, entrance, walls)
        .map_err(DispatchError::Store)?;
    dispatcher.solve(&maze, steps)
}
