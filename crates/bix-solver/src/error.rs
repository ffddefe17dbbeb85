//! Error types for the bisection controller.

use bix_dag::DagError;
use bix_engine::EngineError;
use bix_oracle::OracleError;

/// Errors that abort a solving session.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// A DAG operation failed: a local inconsistency, treated as a
    /// programmer error.
    #[error("DAG error: {0}")]
    Dag(#[from] DagError),

    /// Midpoint selection failed.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// The oracle transport or protocol failed.
    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),

    /// The querying loop ended without ever observing a Bad commit.
    #[error("no bad commit observed for instance {0}")]
    NoBadObserved(String),
}

/// Convenience alias for solver results.
pub type SolverResult<T> = Result<T, SolverError>;
