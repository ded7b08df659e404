use thiserror::Error;

/// Errors raised while parsing coordinate and dimension labels.
///
/// Callers propagate these with `?` from [`crate::coord`]; `maze-api`
/// surfaces them directly as a 422, and the CLI prints them and exits
/// non-zero. Entrance/goal placement errors are not parse errors — those
/// are reported as [`crate::solution::SolutionStatus`] variants instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid coordinate label: {0}")]
    InvalidCoordinate(String),

    #[error("invalid grid size label: {0}")]
    InvalidGridSize(String),
}
