//! Replay oracle: offline scoring against recorded problem files.
//!
//! Each file in the replay directory is a `[problem, solution]` pair in
//! the canonical encoding. The oracle answers questions from the hidden
//! `all_bad` set, counts them, and scores each submission against the
//! hidden `bug`. Files are served in path order so a replay run is
//! reproducible.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use bix_protocol::{Failure, InstanceOutcome, ProblemFile, ReplaySolution, ScoreReport};
use bix_types::{CommitId, Verdict};

use crate::error::{OracleError, OracleResult};
use crate::transport::{Oracle, Problem, Submission};

/// Oracle implementation over a set of recorded problems.
pub struct ReplayOracle {
    pending: VecDeque<ProblemFile>,
    current: Option<Attempt>,
    scores: ScoreReport,
}

struct Attempt {
    name: String,
    solution: ReplaySolution,
    questions: u32,
}

impl ReplayOracle {
    /// Load every problem file in a directory, in path order.
    pub fn from_dir(dir: impl AsRef<Path>) -> OracleResult<Self> {
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let text = fs::read_to_string(&path)?;
            let file: ProblemFile = serde_json::from_str(&text)
                .map_err(|source| OracleError::MalformedProblemFile { path, source })?;
            files.push(file);
        }
        info!(problems = files.len(), "loaded replay problems");
        Ok(Self::from_files(files))
    }

    /// Build directly from parsed problem files.
    pub fn from_files(files: Vec<ProblemFile>) -> Self {
        Self {
            pending: files.into(),
            current: None,
            scores: ScoreReport::new(),
        }
    }

    /// The scores accumulated so far.
    pub fn scores(&self) -> &ScoreReport {
        &self.scores
    }

    fn activate(&mut self) -> Option<Problem> {
        let ProblemFile(problem, solution) = self.pending.pop_front()?;
        let name = problem.name.clone();
        debug!(instance = %name, commits = problem.dag.len(), "serving problem");
        let (repo, instance) = problem.into_parts();
        self.current = Some(Attempt {
            name,
            solution,
            questions: 0,
        });
        Some(Problem { repo, instance })
    }
}

#[async_trait]
impl Oracle for ReplayOracle {
    async fn fetch_instance(&mut self) -> OracleResult<Option<Problem>> {
        if self.current.is_some() {
            return Ok(None);
        }
        Ok(self.activate())
    }

    async fn ask(&mut self, commit: &CommitId) -> OracleResult<Verdict> {
        let attempt = self.current.as_mut().ok_or(OracleError::NoActiveInstance)?;
        attempt.questions += 1;
        let verdict = if attempt.solution.all_bad.contains(commit) {
            Verdict::Bad
        } else {
            Verdict::Good
        };
        debug!(instance = %attempt.name, %commit, %verdict, question = attempt.questions, "answered");
        Ok(verdict)
    }

    async fn submit(&mut self, solution: &CommitId) -> OracleResult<Submission> {
        let attempt = self.current.take().ok_or(OracleError::NoActiveInstance)?;
        let outcome = if attempt.solution.bug == *solution {
            InstanceOutcome::Questions(attempt.questions)
        } else {
            InstanceOutcome::Failed(Failure::Wrong)
        };
        info!(instance = %attempt.name, %outcome, "scored instance");
        self.scores.insert(attempt.name, outcome);

        match self.activate() {
            Some(problem) => Ok(Submission::Next(problem)),
            None => Ok(Submission::Score(self.scores.clone())),
        }
    }

    async fn close(&mut self) -> OracleResult<()> {
        Ok(())
    }
}
