//! Bisection controller for the bix solver.
//!
//! [`Solver`] drives a whole session: it loads each problem from an
//! [`Oracle`], contracts the DAG by the announced good and bad commits,
//! then alternates midpoint queries and contractions until the candidate
//! set is pinned down, and submits the narrowest known-bad commit as the
//! bug.
//!
//! [`Oracle`]: bix_oracle::Oracle

pub mod controller;
pub mod error;

pub use controller::{SessionReport, Solver, SolverConfig};
pub use error::{SolverError, SolverResult};
