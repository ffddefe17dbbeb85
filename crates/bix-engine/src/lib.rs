//! Midpoint selection for the bix bisection solver.
//!
//! Given the current candidate DAG, [`midpoint`] picks the commit whose
//! answer will shrink the candidate set the most: the one maximizing
//! `min(a, N - a)` where `a` is its ancestor count and `N` the DAG order.
//! Small graphs are scored exhaustively; above [`ParamConfig::limit`] a
//! sampled candidate pool is scored instead. Scoring fans out over a
//! pool of scoped worker threads sharing a read-only borrow of the DAG.

pub mod config;
pub mod error;
pub mod midpoint;

pub use config::ParamConfig;
pub use error::{EngineError, EngineResult};
pub use midpoint::midpoint;
