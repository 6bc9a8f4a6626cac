use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use review_core::{PracticeMode, Quality, SystemClock};
use review_store::{
    logging, AnswerReport, AppConfig, JsonFileStore, RecordReviews, ReviewService, SqliteStore, StoreKind,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(version, about = "Spaced repetition reviews and answer checking", long_about = None)]
struct Cli {
    /// Store backend, overrides REVIEW_STORE.
    #[arg(long, value_parser = parse_store)]
    store: Option<StoreKind>,
    /// Store file, overrides REVIEW_DB_PATH / REVIEW_JSON_PATH.
    #[arg(long)]
    path: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Items due now out of the given ids, or the upcoming ones.
    Due {
        #[arg(required = true)]
        item_ids: Vec<String>,
    },
    /// Grade an item: 0-5 or again/hard/good/easy.
    Grade {
        item_id: String,
        quality: Quality,
    },
    /// Score an answer against the expected ones.
    Check {
        actual: String,
        /// Acceptable answer; repeat for kanji and reading.
        #[arg(short, long = "expected", required = true)]
        expected: Vec<String>,
        #[arg(long, value_parser = parse_mode, default_value = "dictation")]
        mode: PracticeMode,
        /// Acceptance threshold in percent for this check only.
        #[arg(long)]
        threshold: Option<f64>,
        /// Also grade this item with the quality suggested by the result tier.
        #[arg(long)]
        grade: Option<String>,
    },
    /// Totals over all stored states.
    Stats,
    /// Logged gradings of one item.
    History { item_id: String },
    /// Clear all progress.
    Reset {
        #[arg(long)]
        yes: bool,
    },
}

fn parse_store(s: &str) -> Result<StoreKind, String> {
    StoreKind::from_name(s).ok_or_else(|| format!("unknown store: {s}"))
}

fn parse_mode(s: &str) -> Result<PracticeMode, String> {
    PracticeMode::from_name(s).ok_or_else(|| format!("unknown mode: {s}"))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn execute<S: RecordReviews>(service: ReviewService<S>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Due { item_ids } => {
            let ids: Vec<&str> = item_ids.iter().map(String::as_str).collect();
            print_json(&service.review_queue(&ids)?)
        }
        Command::Grade { item_id, quality } => {
            print_json(&service.submit_review(&item_id, quality.value())?)
        }
        Command::Check {
            actual,
            expected,
            mode,
            threshold,
            grade,
        } => {
            let result = service.check_answer_with(&expected, &actual, mode, threshold)?;
            let tier = result.tier;
            print_json(&AnswerReport::from(result))?;
            if let Some(item_id) = grade {
                let quality = tier.suggested_quality().value();
                print_json(&service.submit_review(&item_id, quality)?)?;
            }
            Ok(())
        }
        Command::Stats => print_json(&service.stats()?),
        Command::History { item_id } => print_json(&service.history(&item_id)?),
        Command::Reset { yes } => {
            if !yes {
                bail!("refusing to clear all progress without --yes");
            }
            let removed = service.reset_progress()?;
            print_json(&serde_json::json!({ "removed": removed }))
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::from_env().context("loading configuration")?;
    logging::init();

    if let Some(store) = cli.store {
        config.store = store;
    }
    let clock = Arc::new(SystemClock);

    match config.store {
        StoreKind::Sqlite => {
            let path = cli.path.unwrap_or(config.db_path);
            tracing::info!("Opening review database at {}", path.display());
            let store = SqliteStore::open(&path)
                .with_context(|| format!("opening {}", path.display()))?;
            execute(ReviewService::new(store, config.practice, clock)?, cli.command)
        }
        StoreKind::Json => {
            let path = cli.path.unwrap_or(config.json_path);
            tracing::info!("Using review snapshot at {}", path.display());
            let store = JsonFileStore::open(&path)
                .with_context(|| format!("opening {}", path.display()))?;
            execute(ReviewService::new(store, config.practice, clock)?, cli.command)
        }
    }
}
