use async_trait::async_trait;

use bix_protocol::{Instance, Repo, ScoreReport};
use bix_types::{CommitId, Verdict};

use crate::error::OracleResult;

/// One problem to solve: a repository DAG plus the good/bad pair.
#[derive(Clone, Debug)]
pub struct Problem {
    /// The repository the instance plays on.
    pub repo: Repo,
    /// The instance's good and bad commits.
    pub instance: Instance,
}

/// What the oracle says after a solution is submitted.
#[derive(Clone, Debug)]
pub enum Submission {
    /// The session is over; here is the final score map.
    Score(ScoreReport),
    /// Another problem follows: a new instance on the same repository,
    /// or a fresh repository with its first instance.
    Next(Problem),
}

/// The narrow interface the solver consumes.
///
/// Implementations own framing, authentication, and timeouts; the solver
/// only sequences questions and submissions. Errors are fatal to the
/// session; the oracle is stateful and retries would corrupt the dialog.
#[async_trait]
pub trait Oracle: Send {
    /// Fetch the opening problem of the session. `None` means there is
    /// nothing to solve (or the opening problem was already fetched;
    /// follow-up problems arrive through [`submit`]).
    ///
    /// [`submit`]: Oracle::submit
    async fn fetch_instance(&mut self) -> OracleResult<Option<Problem>>;

    /// Ask whether a commit is Good or Bad.
    async fn ask(&mut self, commit: &CommitId) -> OracleResult<Verdict>;

    /// Submit the final guess for the current instance.
    async fn submit(&mut self, solution: &CommitId) -> OracleResult<Submission>;

    /// Tear down the channel.
    async fn close(&mut self) -> OracleResult<()>;
}
