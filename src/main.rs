//! CLI: разбивает исходные данные на train/test и сохраняет
//! масштабированные наборы вместе с обученным препроцессором

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use cancer_prep::config::{DEFAULT_SEED, DEFAULT_TRAIN_SIZE};
use cancer_prep::PrepConfig;

#[derive(Debug, Parser)]
#[command(name = "cancer-prep")]
#[command(version, about = "Split the raw cancer data and fit the preprocessor", long_about = None)]
struct Args {
    /// Path to raw data
    #[arg(long = "raw_data", alias = "raw-data")]
    raw_data: PathBuf,

    /// Path to directory where processed data will be written to
    #[arg(long = "write_to", alias = "write-to")]
    write_to: PathBuf,

    /// Share of rows that go to the training set
    #[arg(long = "train_size", alias = "train-size", default_value_t = DEFAULT_TRAIN_SIZE)]
    train_size: f64,

    /// Seed of the split
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    // Инициализация логирования
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = PrepConfig::new(args.raw_data, args.write_to)
        .with_train_size(args.train_size)
        .with_seed(args.seed);

    let report = cancer_prep::run(&config)
        .with_context(|| format!("failed to prepare {:?}", config.raw_data))?;

    tracing::info!(
        "Done: {} train / {} test rows written to {:?}",
        report.n_train,
        report.n_test,
        config.write_to
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
