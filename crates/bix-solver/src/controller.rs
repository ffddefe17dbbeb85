//! The per-session bisection driver.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use bix_dag::{CommitDag, DagError};
use bix_engine::{midpoint, ParamConfig};
use bix_oracle::{Oracle, Submission};
use bix_protocol::{Repo, ScoreReport};
use bix_types::{CommitId, Verdict};

use crate::error::{SolverError, SolverResult};

/// Controller configuration.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Midpoint selection knobs.
    pub params: ParamConfig,
    /// Optional question budget per instance. When exhausted the solver
    /// stops querying and submits its narrowest known-bad commit as-is.
    pub max_questions: Option<u32>,
}

/// What a finished session looks like: the oracle's score map plus the
/// ideal (log₂ of the contracted candidate count) score per instance.
#[derive(Clone, Debug)]
pub struct SessionReport {
    /// The oracle's verdict per instance.
    pub scores: ScoreReport,
    /// log₂ of each instance's candidate count after the initial
    /// contractions, what a perfect bisection would spend.
    pub ideal: BTreeMap<String, f64>,
}

/// Stateful driver translating problems into oracle dialogs.
///
/// Holds no cross-instance state beyond the ideal-score bookkeeping; the
/// DAG of each instance is rebuilt from the repo's edge list and
/// discarded when the instance ends.
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    /// Create a solver with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Solve every instance the oracle poses and return the final report.
    pub async fn run<O: Oracle>(&self, oracle: &mut O) -> SolverResult<SessionReport> {
        let mut ideal = BTreeMap::new();

        let Some(mut problem) = oracle.fetch_instance().await? else {
            info!("oracle has nothing to solve");
            oracle.close().await?;
            return Ok(SessionReport {
                scores: ScoreReport::new(),
                ideal,
            });
        };

        loop {
            info!(
                repo = %problem.repo.name,
                commits = problem.repo.dag.len(),
                "loading instance"
            );
            let mut dag = build_dag(&problem.repo)?;
            debug!(order = dag.order(), size = dag.size(), "DAG built");

            if !problem.instance.good.is_empty() {
                dag.good_contract(&problem.instance.good)?;
            }
            dag.bad_contract(&problem.instance.bad)?;
            info!(order = dag.order(), "contracted by instance endpoints");
            ideal.insert(problem.repo.name.clone(), ideal_score(dag.order()));

            let solution = self
                .bisect(&mut dag, oracle)
                .await?
                .ok_or_else(|| SolverError::NoBadObserved(problem.repo.name.clone()))?;

            info!(repo = %problem.repo.name, bug = %solution, "submitting solution");
            match oracle.submit(&solution).await? {
                Submission::Score(scores) => {
                    oracle.close().await?;
                    return Ok(SessionReport { scores, ideal });
                }
                Submission::Next(next) => problem = next,
            }
        }
    }

    /// The querying loop of one instance: midpoint, ask, contract, until
    /// the candidate set is pinned to the narrowest known-bad commit.
    async fn bisect<O: Oracle>(
        &self,
        dag: &mut CommitDag,
        oracle: &mut O,
    ) -> SolverResult<Option<CommitId>> {
        let mut questions = 0u32;
        while dag.order() > 0 {
            if let Some(budget) = self.config.max_questions {
                if questions >= budget {
                    info!(questions, "question budget exhausted, submitting best guess");
                    break;
                }
            }
            let mid = midpoint(dag, &self.config.params)?;
            let verdict = oracle.ask(&mid).await?;
            questions += 1;
            match verdict {
                Verdict::Good => {
                    dag.good_contract(&mid)?;
                }
                Verdict::Bad => {
                    // A second Bad on the narrowest known-bad commit can
                    // only happen once it is the sole survivor: the
                    // candidate set is exhausted and it is the bug.
                    if dag.last_bad() == Some(&mid) {
                        debug!(questions, bug = %mid, "bad commit confirmed");
                        return Ok(Some(mid));
                    }
                    dag.bad_contract(&mid)?;
                }
            }
            debug!(questions, order = dag.order(), "answer folded in");
        }
        Ok(dag.last_bad().cloned())
    }
}

/// Build the candidate DAG from a repo's edge list.
///
/// Real inputs occasionally declare the same edge twice; duplicates are
/// collapsed. Anything else structurally wrong aborts the instance.
fn build_dag(repo: &Repo) -> SolverResult<CommitDag> {
    let mut dag = CommitDag::new();
    for entry in &repo.dag {
        dag.add_vertex(entry.commit().clone())?;
        for parent in entry.parents() {
            match dag.add_edge(entry.commit().clone(), parent.clone()) {
                Ok(()) => {}
                Err(DagError::EdgeDuplicate { child, parent }) => {
                    debug!(%child, %parent, "duplicate edge declaration collapsed");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
    Ok(dag)
}

fn ideal_score(order: usize) -> f64 {
    if order == 0 {
        0.0
    } else {
        (order as f64).log2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bix_oracle::ReplayOracle;
    use bix_protocol::{
        DagEntry, Failure, InstanceOutcome, ProblemFile, ReplayProblem, ReplaySolution,
    };

    fn c(id: &str) -> CommitId {
        CommitId::new(id)
    }

    fn entry(commit: &str, parents: &[&str]) -> DagEntry {
        DagEntry(c(commit), parents.iter().map(|p| c(p)).collect())
    }

    fn problem_file(
        name: &str,
        good: &str,
        bad: &str,
        dag: Vec<DagEntry>,
        bug: &str,
        all_bad: &[&str],
    ) -> ProblemFile {
        ProblemFile(
            ReplayProblem {
                name: name.into(),
                good: c(good),
                bad: c(bad),
                dag,
            },
            ReplaySolution {
                bug: c(bug),
                all_bad: all_bad.iter().map(|id| c(id)).collect(),
            },
        )
    }

    /// The seven-commit branching graph:
    ///
    /// ```text
    ///     A
    ///    / \
    ///   B   C
    ///  / \ / \
    /// D   E   F
    ///  \ /
    ///   G
    /// ```
    fn branching_dag() -> Vec<DagEntry> {
        vec![
            entry("A", &[]),
            entry("B", &["A"]),
            entry("C", &["A"]),
            entry("D", &["B"]),
            entry("E", &["B", "C"]),
            entry("F", &["C"]),
            entry("G", &["D", "E"]),
        ]
    }

    fn chain_entries(n: usize) -> Vec<DagEntry> {
        (1..=n)
            .map(|k| {
                if k == 1 {
                    entry("c1", &[])
                } else {
                    DagEntry(c(&format!("c{k}")), vec![c(&format!("c{}", k - 1))])
                }
            })
            .collect()
    }

    async fn solve(files: Vec<ProblemFile>) -> SessionReport {
        let mut oracle = ReplayOracle::from_files(files);
        Solver::new(SolverConfig::default())
            .run(&mut oracle)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn branching_instance_is_solved_in_two_questions() {
        // good = B, bad = E, hidden bug = C: contraction leaves {C, E}.
        let report = solve(vec![problem_file(
            "branching",
            "B",
            "E",
            branching_dag(),
            "C",
            &["C", "E"],
        )])
        .await;
        assert_eq!(report.scores.0["branching"], InstanceOutcome::Questions(2));
    }

    #[tokio::test]
    async fn single_vertex_instance_takes_one_question() {
        let report = solve(vec![problem_file(
            "single",
            "",
            "X",
            vec![entry("X", &[])],
            "X",
            &["X"],
        )])
        .await;
        assert_eq!(report.scores.0["single"], InstanceOutcome::Questions(1));
    }

    #[tokio::test]
    async fn three_chain_takes_at_most_two_questions() {
        for (bug, all_bad) in [("B", vec!["B", "C"]), ("C", vec!["C"])] {
            let report = solve(vec![problem_file(
                "chain3",
                "A",
                "C",
                chain_entries(3)
                    .into_iter()
                    .map(|DagEntry(commit, parents)| {
                        // Rename c1..c3 to A..C to keep the fixture readable.
                        let rename = |id: &CommitId| match id.as_str() {
                            "c1" => c("A"),
                            "c2" => c("B"),
                            _ => c("C"),
                        };
                        DagEntry(rename(&commit), parents.iter().map(rename).collect())
                    })
                    .collect(),
                bug,
                &all_bad.iter().map(|s| *s).collect::<Vec<_>>(),
            )])
            .await;
            let InstanceOutcome::Questions(n) = report.scores.0["chain3"] else {
                panic!("expected a correct solve for bug {bug}");
            };
            assert!(n <= 2, "bug {bug} took {n} questions");
        }
    }

    #[tokio::test]
    async fn diamond_finds_the_branch_bug() {
        let dag = vec![
            entry("root", &[]),
            entry("L", &["root"]),
            entry("R", &["root"]),
            entry("tip", &["L", "R"]),
        ];
        for (bug, all_bad) in [("L", vec!["L", "tip"]), ("R", vec!["R", "tip"])] {
            let report = solve(vec![problem_file(
                "diamond",
                "root",
                "tip",
                dag.clone(),
                bug,
                &all_bad.iter().map(|s| *s).collect::<Vec<_>>(),
            )])
            .await;
            let InstanceOutcome::Questions(n) = report.scores.0["diamond"] else {
                panic!("expected a correct solve for bug {bug}");
            };
            assert!((2..=3).contains(&n), "bug {bug} took {n} questions");
        }
    }

    #[tokio::test]
    async fn chain_query_count_stays_logarithmic() {
        let report = solve(vec![problem_file(
            "chain16",
            "c1",
            "c16",
            chain_entries(16),
            "c11",
            &["c11", "c12", "c13", "c14", "c15", "c16"],
        )])
        .await;
        let InstanceOutcome::Questions(n) = report.scores.0["chain16"] else {
            panic!("expected a correct solve");
        };
        // ceil(log2 16) plus the slack of the confirming final question.
        assert!(n <= 6, "took {n} questions");
        assert!((report.ideal["chain16"] - 15f64.log2()).abs() < 1e-9);
    }

    #[tokio::test]
    async fn multiple_problems_are_all_scored() {
        let report = solve(vec![
            problem_file("p1", "B", "E", branching_dag(), "C", &["C", "E"]),
            problem_file("p2", "c1", "c16", chain_entries(16), "c5", &[
                "c5", "c6", "c7", "c8", "c9", "c10", "c11", "c12", "c13", "c14", "c15", "c16",
            ]),
        ])
        .await;
        assert_eq!(report.scores.len(), 2);
        assert!(matches!(
            report.scores.0["p1"],
            InstanceOutcome::Questions(_)
        ));
        assert!(matches!(
            report.scores.0["p2"],
            InstanceOutcome::Questions(_)
        ));
        assert_eq!(report.ideal.len(), 2);
    }

    #[tokio::test]
    async fn duplicate_edge_declarations_are_collapsed() {
        let report = solve(vec![problem_file(
            "dupes",
            "A",
            "C",
            vec![
                entry("A", &[]),
                entry("B", &["A", "A"]),
                entry("C", &["B"]),
            ],
            "C",
            &["C"],
        )])
        .await;
        assert!(matches!(
            report.scores.0["dupes"],
            InstanceOutcome::Questions(_)
        ));
    }

    #[tokio::test]
    async fn exhausted_budget_submits_the_best_guess() {
        let mut oracle = ReplayOracle::from_files(vec![problem_file(
            "budget",
            "c1",
            "c16",
            chain_entries(16),
            "c5",
            &["c5", "c6", "c7", "c8", "c9", "c10", "c11", "c12", "c13", "c14", "c15", "c16"],
        )]);
        let config = SolverConfig {
            max_questions: Some(0),
            ..SolverConfig::default()
        };
        let report = Solver::new(config).run(&mut oracle).await.unwrap();
        // Zero questions allowed: the initial bad commit is submitted,
        // which is not the bug.
        assert_eq!(
            report.scores.0["budget"],
            InstanceOutcome::Failed(Failure::Wrong)
        );
    }

    #[tokio::test]
    async fn replay_of_the_same_problem_is_deterministic() {
        let file = problem_file("det", "B", "E", branching_dag(), "C", &["C", "E"]);
        let first = solve(vec![file.clone()]).await;
        let second = solve(vec![file]).await;
        assert_eq!(first.scores.0["det"], second.scores.0["det"]);
    }

    #[tokio::test]
    async fn empty_session_yields_an_empty_report() {
        let mut oracle = ReplayOracle::from_files(vec![]);
        let report = Solver::new(SolverConfig::default())
            .run(&mut oracle)
            .await
            .unwrap();
        assert!(report.scores.is_empty());
        assert!(report.ideal.is_empty());
    }
}
