use anyhow::Context;
use clap::Parser;
use nestedcv::config::ConfigManager;
use nestedcv::data::CsvConnector;
use nestedcv::{DataSplitter, NestedCvSplitter};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "nestedcv", about = "Time-ordered nested cross-validation splits over a CSV file")]
struct Args {
    /// CSV file with a date column
    csv: PathBuf,

    /// TOML configuration file (NESTEDCV__* environment variables override it)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Column holding the dates (default: "date")
    #[arg(long)]
    date_column: Option<String>,

    /// Number of folds (default: 3)
    #[arg(long)]
    folds: Option<usize>,

    /// Print fold summaries as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let manager = ConfigManager::new();
    if let Some(path) = &args.config {
        manager
            .load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?;
    }
    manager.update(|cfg| {
        if let Some(folds) = args.folds {
            cfg.splitter.folds = folds;
        }
        if let Some(column) = &args.date_column {
            cfg.splitter.date_column = column.clone();
        }
    })?;
    let config = manager.get();
    let date_column = config.splitter.date_column.as_str();

    let df = CsvConnector::load_for_split(&args.csv, &config)
        .with_context(|| format!("loading {}", args.csv.display()))?;
    let metadata = CsvConnector::create_metadata(&args.csv, &df, date_column)?;
    log::info!(
        "Loaded {} rows x {} columns spanning {} month(s)",
        metadata.num_rows,
        metadata.num_columns,
        metadata.distinct_months
    );

    let splitter = NestedCvSplitter::from_config(&config.splitter)?;
    let mut summaries = Vec::with_capacity(splitter.n_folds());
    for fold in splitter.split(&df, date_column)? {
        let summary = fold?.summary();
        log::info!("{}", summary);
        summaries.push(summary);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        for summary in &summaries {
            println!("{}", summary);
        }
    }

    Ok(())
}
