use argh::FromArgs;
use std::path::PathBuf;

use benchgrade::pose::{
    evaluate_files, DuplicatePolicy, PoseEvalParams, TripletSearch, DEFAULT_THRESHOLD,
};

#[derive(FromArgs)]
/// Score predicted camera poses with the mean average accuracy of the aligned camera centers
struct Args {
    /// path to the submission pose table
    #[argh(positional)]
    submission: PathBuf,

    /// path to the ground truth pose table
    #[argh(positional)]
    ground_truth: PathBuf,

    /// inlier distance threshold
    #[argh(option, default = "DEFAULT_THRESHOLD")]
    threshold: f64,

    /// number of random triplets to try instead of every triplet, at least 1
    #[argh(option)]
    samples: Option<usize>,

    /// seed of the random triplet sampling
    #[argh(option)]
    seed: Option<u64>,

    /// fail on repeated image ids instead of keeping the last row
    #[argh(switch)]
    strict: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let search = match args.samples {
        Some(iterations) => TripletSearch::Sampled {
            iterations,
            seed: args.seed,
        },
        None => TripletSearch::Exhaustive,
    };
    let duplicates = if args.strict {
        DuplicatePolicy::Reject
    } else {
        DuplicatePolicy::LastWins
    };
    let params = PoseEvalParams {
        threshold: args.threshold,
        search,
        duplicates,
    };

    let result = evaluate_files(&args.submission, &args.ground_truth, &params)?;
    if let Some(triplet) = &result.triplet {
        log::info!("best triplet {:?}", triplet);
    }

    println!("Mean Average Accuracy (mAA): {:.4}", result.maa);

    Ok(())
}
