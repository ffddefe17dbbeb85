use serde::{Deserialize, Serialize};

use bix_types::CommitId;

use crate::message::{DagEntry, Instance, Repo};

/// A recorded problem file: a two-element JSON array of the problem and
/// its hidden solution, as produced by the scoring server's exporter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProblemFile(pub ReplayProblem, pub ReplaySolution);

impl ProblemFile {
    /// The problem half.
    pub fn problem(&self) -> &ReplayProblem {
        &self.0
    }

    /// The hidden solution half.
    pub fn solution(&self) -> &ReplaySolution {
        &self.1
    }
}

/// The problem half of a recorded file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplayProblem {
    /// Problem name, used as the score map key.
    pub name: String,
    /// The known-good commit. May be empty, in which case the good
    /// contraction is skipped.
    pub good: CommitId,
    /// The known-bad commit.
    pub bad: CommitId,
    /// The full DAG in the canonical encoding.
    pub dag: Vec<DagEntry>,
}

impl ReplayProblem {
    /// Split into the live-protocol `Repo` + `Instance` pair.
    pub fn into_parts(self) -> (Repo, Instance) {
        (
            Repo {
                name: self.name,
                instance_count: 1,
                dag: self.dag,
            },
            Instance {
                good: self.good,
                bad: self.bad,
            },
        )
    }
}

/// The hidden solution half of a recorded file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplaySolution {
    /// The one true bug commit.
    pub bug: CommitId,
    /// Every commit the oracle would answer Bad for.
    pub all_bad: Vec<CommitId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE: &str = r#"[
        {"name":"prob1","good":"a","bad":"d","dag":[["a",[]],["b",["a"]],["c",["b"]],["d",["c"]]]},
        {"bug":"c","all_bad":["c","d"]}
    ]"#;

    #[test]
    fn problem_file_parses() {
        let file: ProblemFile = serde_json::from_str(FILE).unwrap();
        assert_eq!(file.problem().name, "prob1");
        assert_eq!(file.problem().good, CommitId::new("a"));
        assert_eq!(file.problem().bad, CommitId::new("d"));
        assert_eq!(file.problem().dag.len(), 4);
        assert_eq!(file.solution().bug, CommitId::new("c"));
        assert_eq!(file.solution().all_bad.len(), 2);
    }

    #[test]
    fn into_parts_carries_the_dag() {
        let file: ProblemFile = serde_json::from_str(FILE).unwrap();
        let (repo, instance) = file.0.into_parts();
        assert_eq!(repo.name, "prob1");
        assert_eq!(repo.instance_count, 1);
        assert_eq!(repo.dag.len(), 4);
        assert_eq!(instance.good, CommitId::new("a"));
        assert_eq!(instance.bad, CommitId::new("d"));
    }

    #[test]
    fn problem_file_roundtrips() {
        let file: ProblemFile = serde_json::from_str(FILE).unwrap();
        let json = serde_json::to_string(&file).unwrap();
        let reparsed: ProblemFile = serde_json::from_str(&json).unwrap();
        assert_eq!(reparsed, file);
    }
}
