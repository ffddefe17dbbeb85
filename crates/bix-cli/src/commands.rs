use colored::Colorize;

use bix_engine::ParamConfig;
use bix_oracle::{ConnectConfig, ReplayOracle, WsOracle};
use bix_solver::{SessionReport, Solver, SolverConfig};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Solve(args) => cmd_solve(args).await,
        Command::Replay(args) => cmd_replay(args).await,
    }
}

async fn cmd_solve(args: SolveArgs) -> anyhow::Result<()> {
    let url = format!("ws://{}/", args.addr);
    println!("Connecting to problem server {}...", url.bold());

    let mut oracle = WsOracle::connect(ConnectConfig::new(url, args.user)).await?;
    let report = Solver::new(solver_config(&args.knobs))
        .run(&mut oracle)
        .await?;

    print_report(&report);
    Ok(())
}

async fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    println!("Replaying problems from {}...", args.dir.bold());

    let mut oracle = ReplayOracle::from_dir(&args.dir)?;
    let report = Solver::new(solver_config(&args.knobs))
        .run(&mut oracle)
        .await?;

    print_report(&report);
    Ok(())
}

fn solver_config(knobs: &HeuristicArgs) -> SolverConfig {
    SolverConfig {
        params: ParamConfig {
            limit: knobs.limit,
            divisions: knobs.divisions,
            merges: knobs.merges,
        },
        max_questions: knobs.max_questions,
    }
}

fn print_report(report: &SessionReport) {
    use bix_protocol::InstanceOutcome;

    println!();
    println!("{}", "Scores".bold());
    let mut ideal_total = 0.0;
    for (instance, outcome) in report.scores.iter() {
        let shown = match outcome {
            InstanceOutcome::Questions(n) => n.to_string().green(),
            other => other.to_string().red(),
        };
        match report.ideal.get(instance) {
            Some(ideal) => {
                ideal_total += ideal;
                println!(
                    "  {:<24} {:>8}  {}",
                    instance.yellow(),
                    shown,
                    format!("(ideal {ideal:.1})").dimmed()
                );
            }
            None => println!("  {:<24} {:>8}", instance.yellow(), shown),
        }
    }
    println!(
        "  {:<24} {:>8}  {}",
        "total".bold(),
        report.scores.total_questions().to_string().bold(),
        format!("(ideal {ideal_total:.1})").dimmed()
    );
}
