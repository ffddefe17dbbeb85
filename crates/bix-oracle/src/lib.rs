//! Oracle transports for the bix bisection solver.
//!
//! The solver core only ever sees the narrow [`Oracle`] interface: fetch
//! a problem, ask a question, submit a solution. This crate provides the
//! two implementations: [`WsOracle`] for the live problem server over a
//! persistent websocket, and [`ReplayOracle`] for offline scoring against
//! a directory of recorded problem files.

pub mod error;
pub mod replay;
pub mod transport;
pub mod ws;

pub use error::{OracleError, OracleResult};
pub use replay::ReplayOracle;
pub use transport::{Oracle, Problem, Submission};
pub use ws::{ConnectConfig, WsOracle};
