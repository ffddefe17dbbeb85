//! Wire message shapes for the bix oracle protocol.
//!
//! The oracle speaks JSON text frames over a persistent bidirectional
//! channel. Every frame is one externally-tagged message: `{"Question":
//! "<commit>"}` from the solver, `{"Answer": "Good"}` back, and so on.
//! This crate owns those shapes plus the canonical DAG encoding
//! (`[commit, [parent, …]]` tuples) and the recorded problem-file format
//! used by the offline replay harness.

pub mod error;
pub mod message;
pub mod replay;
pub mod wire;

pub use error::{ProtocolError, ProtocolResult};
pub use message::{
    ClientMessage, DagEntry, Failure, Instance, InstanceOutcome, Repo, ScoreReport, ServerMessage,
};
pub use replay::{ProblemFile, ReplayProblem, ReplaySolution};
pub use wire::{decode_server, encode_client};
