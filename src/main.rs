use cbir::query::{self, DistanceKind, FeatureKind, Query};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Rank a database of images against a target image.
#[derive(Parser, Debug)]
#[command(name = "cbir")]
#[command(about = "Content-based image retrieval over a directory of images", long_about = None)]
struct Args {
    /// Target image to compare the database against
    target_image: PathBuf,

    /// Directory of candidate images (.jpg, .jpeg, .png, .bmp)
    database_dir: PathBuf,

    /// Feature kind used to describe each image
    #[arg(value_enum)]
    feature: FeatureKind,

    /// Distance metric (selects cosine vs ssd for dnn features)
    #[arg(value_enum)]
    distance: DistanceKind,

    /// Number of matches to report
    n: usize,

    /// Embeddings CSV keyed by image basename, required for dnn features
    embeddings_csv: Option<PathBuf>,

    /// Report the least similar matches instead of the most similar
    #[arg(long)]
    least: bool,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    // clap exits with status 2 on usage errors by default; this tool
    // reports 1.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            std::process::exit(1);
        }
    };

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    // Logs go to stderr; stdout carries only the ranked matches.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let query = Query {
        target: args.target_image,
        database_dir: args.database_dir,
        feature: args.feature,
        distance: args.distance,
        top_n: args.n,
        embeddings_csv: args.embeddings_csv,
        least_similar: args.least,
    };

    info!(target = %query.target.display(), "running retrieval query");
    let matches = query::run(&query)?;
    for m in &matches {
        println!("{} {}", m.id, m.distance);
    }
    Ok(())
}
