//! Foundation types for the bix bisection solver.
//!
//! This crate provides the two value types every other bix crate speaks:
//!
//! - [`CommitId`] -- Opaque commit identifier, as issued by the problem server
//! - [`Verdict`] -- The oracle's Good/Bad answer to a question

pub mod commit;
pub mod verdict;

pub use commit::CommitId;
pub use verdict::Verdict;
