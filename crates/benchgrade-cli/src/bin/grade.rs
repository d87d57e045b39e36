use argh::FromArgs;
use std::path::PathBuf;

use benchgrade::io::{ResultLog, Table};
use benchgrade::metrics::rank_percentage;
use benchgrade::tasks::{grade, GradeError, Task};

#[derive(FromArgs)]
/// Grade benchmark submissions
struct Args {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Score(ScoreArgs),
    Rank(RankArgs),
}

#[derive(FromArgs)]
/// Validate a submission and compute its score
#[argh(subcommand, name = "score")]
struct ScoreArgs {
    /// task name, e.g. image/hard
    #[argh(positional)]
    task: Task,

    /// path to the submission file
    #[argh(positional)]
    submission: PathBuf,

    /// path to the answers file
    #[argh(positional)]
    answers: PathBuf,

    /// write the outcome to this result file as `score###message` or the error message
    #[argh(option, short = 'l')]
    log: Option<PathBuf>,

    /// print the report as JSON
    #[argh(switch)]
    json: bool,
}

#[derive(FromArgs)]
/// Locate a score on a leaderboard
#[argh(subcommand, name = "rank")]
struct RankArgs {
    /// the score to rank
    #[argh(positional)]
    score: f64,

    /// leaderboard file with a `Score` or `score` column
    #[argh(option, default = "PathBuf::from(\"leaderboard.csv\")")]
    leaderboard: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    match args.command {
        Command::Score(args) => score(args),
        Command::Rank(args) => rank(args),
    }
}

fn score(args: ScoreArgs) -> Result<(), Box<dyn std::error::Error>> {
    let result_log = args.log.map(ResultLog::new);

    let report = match grade(args.task, &args.submission, &args.answers) {
        Ok(report) => report,
        Err(err) => {
            if let Some(result_log) = &result_log {
                result_log.write_failure(&err.to_string())?;
            }
            report_failure(&err);
            return Err(err.into());
        }
    };

    if let Some(result_log) = &result_log {
        result_log.write_success(report.score, "submission success")?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    Ok(())
}

fn report_failure(err: &GradeError) {
    if err.is_submission_error() {
        log::error!("the submission cannot be graded: {err}");
    } else {
        log::error!("grading failed: {err}");
    }
}

fn rank(args: RankArgs) -> Result<(), Box<dyn std::error::Error>> {
    let table = Table::read_csv(&args.leaderboard)?;
    let column = ["Score", "score"]
        .into_iter()
        .find(|name| table.has_column(name))
        .ok_or("the leaderboard has no `Score` column")?;

    let scores = table
        .column(column)?
        .into_iter()
        .enumerate()
        .filter_map(|(row, cell)| match cell.trim().parse::<f64>() {
            Ok(score) => Some(score),
            Err(_) => {
                log::warn!("skipping leaderboard row {row}: invalid score `{cell}`");
                None
            }
        })
        .collect::<Vec<_>>();

    let position = rank_percentage(args.score, &scores)?;

    println!("Score: {}", args.score);
    println!("Rank: {} / {}", position.rank, position.total);
    println!("Rank Percentage: {:.2}%", position.percentage);

    Ok(())
}
