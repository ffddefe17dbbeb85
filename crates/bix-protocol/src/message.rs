use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use bix_types::{CommitId, Verdict};

/// Messages the solver sends to the oracle.
///
/// External tagging gives the wire shapes directly: `{"User": […]}`,
/// `{"Question": "<commit>"}`, `{"Solution": "<commit>"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ClientMessage {
    /// Authentication, sent once right after connecting.
    User(Vec<String>),
    /// Ask whether a commit is Good or Bad.
    Question(CommitId),
    /// Submit the final guess at the bug for the current instance.
    Solution(CommitId),
}

/// Messages the oracle sends to the solver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ServerMessage {
    /// A repository: its name and full commit DAG. Always followed by an
    /// `Instance` frame.
    Repo(Repo),
    /// A problem instance on the current repository.
    Instance(Instance),
    /// The answer to the most recent question.
    Answer(Verdict),
    /// The final per-instance score map, ending the session.
    Score(ScoreReport),
}

impl ServerMessage {
    /// The message's wire tag, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Repo(_) => "Repo",
            Self::Instance(_) => "Instance",
            Self::Answer(_) => "Answer",
            Self::Score(_) => "Score",
        }
    }
}

/// A repository description: the commit DAG the instances play on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Repo {
    /// Repository name; score map keys derive from it.
    pub name: String,
    /// How many instances the oracle will pose on this repository.
    pub instance_count: u32,
    /// The full DAG as vertex declarations with inbound edges.
    pub dag: Vec<DagEntry>,
}

/// One problem instance: a known-good and a known-bad commit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// Commit the oracle asserts is bug-free.
    pub good: CommitId,
    /// Commit the oracle asserts contains the bug.
    pub bad: CommitId,
}

/// One vertex declaration in the canonical DAG encoding: the commit and
/// all of its parents, serialized as `[commit, [parent, …]]`.
///
/// There is no separate vertex list; a commit appearing only inside some
/// other entry's parent list is still a real vertex.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DagEntry(pub CommitId, pub Vec<CommitId>);

impl DagEntry {
    /// The declared commit.
    pub fn commit(&self) -> &CommitId {
        &self.0
    }

    /// The commit's parents.
    pub fn parents(&self) -> &[CommitId] {
        &self.1
    }
}

/// The final score map: one entry per instance.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreReport(pub BTreeMap<String, InstanceOutcome>);

impl ScoreReport {
    /// An empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one instance.
    pub fn insert(&mut self, instance: impl Into<String>, outcome: InstanceOutcome) {
        self.0.insert(instance.into(), outcome);
    }

    /// Iterate over (instance, outcome) pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &InstanceOutcome)> {
        self.0.iter()
    }

    /// Number of scored instances.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no instance has been scored.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of question counts across correctly solved instances.
    pub fn total_questions(&self) -> u64 {
        self.0
            .values()
            .map(|outcome| match outcome {
                InstanceOutcome::Questions(n) => u64::from(*n),
                InstanceOutcome::Failed(_) => 0,
            })
            .sum()
    }
}

/// How one instance ended: a raw question count for a correct answer, or
/// a failure marker.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InstanceOutcome {
    /// Solved correctly in this many questions.
    Questions(u32),
    /// Not solved.
    Failed(Failure),
}

/// The failure markers the oracle uses in score maps.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Failure {
    /// The submitted commit was not the bug.
    Wrong,
    /// The solver abandoned the instance.
    GaveUp,
}

impl fmt::Display for InstanceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Questions(n) => write!(f, "{n}"),
            Self::Failed(Failure::Wrong) => write!(f, "Wrong"),
            Self::Failed(Failure::GaveUp) => write!(f, "GaveUp"),
        }
    }
}
