//! Wire/storage records for the two tables the dispatcher owns.

use maze_core::{Coordinate, Dimension, SolutionRecord};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A maze as it is stored and returned to callers. `mazenum` is a
/// per-owner sequence number so callers can address a maze without
/// carrying its UUID around, via a `GET /maze/{mazenum}` convention.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredMaze {
    pub id: Uuid,
    pub owner_id: String,
    pub mazenum: u64,
    pub dimension: Dimension,
    pub entrance: Coordinate,
    pub walls: Vec<Coordinate>,
    pub hash: String,
}

/// A solve attempt, keyed by its own id but looked up by the maze's
/// content hash (`fingerprint`) so two mazes with identical geometry
/// share one solution record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSolution {
    pub id: Uuid,
    #[serde(flatten)]
    pub record: SolutionRecord,
}

impl StoredSolution {
    pub fn new_for(fingerprint: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            record: SolutionRecord::new(fingerprint),
        }
    }
}
