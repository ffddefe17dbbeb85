use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bix",
    about = "bix — interactive bisection solver for adversarial git-bisect",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Solve a live session against the problem server
    Solve(SolveArgs),
    /// Replay recorded problem files and score offline
    Replay(ReplayArgs),
}

#[derive(Args)]
pub struct SolveArgs {
    /// Problem server address (host:port)
    #[arg(long, default_value = "127.0.0.1:1234")]
    pub addr: String,

    /// Authentication tokens, in order
    #[arg(long, required = true, num_args = 1..)]
    pub user: Vec<String>,

    #[command(flatten)]
    pub knobs: HeuristicArgs,
}

#[derive(Args)]
pub struct ReplayArgs {
    /// Directory of recorded problem files
    pub dir: String,

    #[command(flatten)]
    pub knobs: HeuristicArgs,
}

/// The midpoint heuristic's tuning knobs.
#[derive(Args)]
pub struct HeuristicArgs {
    /// Graph order at or below which every vertex is scored
    #[arg(long, default_value_t = 1000)]
    pub limit: usize,

    /// Sample density per branch in sampled mode
    #[arg(long, default_value_t = 300)]
    pub divisions: usize,

    /// Merge commits included in the sampled candidate pool
    #[arg(long, default_value_t = 2000)]
    pub merges: usize,

    /// Give up on an instance after this many questions
    #[arg(long)]
    pub max_questions: Option<u32>,
}
