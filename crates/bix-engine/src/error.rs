//! Error types for the midpoint engine.

use bix_dag::DagError;

/// Errors that can occur during midpoint selection.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Midpoint selection was asked on an empty graph. The controller
    /// submits instead of querying once the graph is empty, so this is a
    /// caller bug.
    #[error("cannot pick a midpoint of an empty graph")]
    EmptyGraph,

    /// An underlying DAG operation failed mid-pass.
    #[error(transparent)]
    Dag(#[from] DagError),
}

/// Convenience alias for engine results.
pub type EngineResult<T> = Result<T, EngineError>;
