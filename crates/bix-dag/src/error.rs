//! Error types for the commit DAG store.

use bix_types::CommitId;

/// Errors that can occur during DAG operations.
#[derive(Debug, thiserror::Error)]
pub enum DagError {
    /// An empty commit id was supplied.
    #[error("empty commit id")]
    IdEmpty,

    /// A non-empty id not present in the graph was referenced.
    #[error("unknown commit: {0}")]
    VertexUnknown(CommitId),

    /// The edge already exists in the graph.
    #[error("edge {child} -> {parent} is already known")]
    EdgeDuplicate {
        /// The child endpoint.
        child: CommitId,
        /// The parent endpoint.
        parent: CommitId,
    },

    /// A self-loop was attempted.
    #[error("edge endpoints coincide: {0}")]
    SrcDstEqual(CommitId),

    /// The edge would introduce a cycle.
    #[error("edge {child} -> {parent} would create a loop")]
    EdgeLoop {
        /// The child endpoint.
        child: CommitId,
        /// The parent endpoint.
        parent: CommitId,
    },
}

/// Convenience alias for DAG results.
pub type DagResult<T> = Result<T, DagError>;
