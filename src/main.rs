//! Fraudlens main entry point

use anyhow::Context;
use clap::Parser;
use fraudlens_config::{Config, OutputFormat};
use fraudlens_core::{Dataset, Enricher, FraudFilter, SortDirection, SortSpec, TableQuery};
use fraudlens_ingest::{DefaultRecordSource, RecordSourceTrait};
use log::{info, warn};
use std::path::PathBuf;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "fraudlens")]
#[command(version = "0.1.0")]
#[command(about = "Transaction analytics engine for fraud monitoring", long_about = None)]
struct Args {
    /// Record set to analyze (.csv or .json)
    input: PathBuf,

    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Free-text search term over all columns
    #[arg(short, long, default_value = "")]
    search: String,

    /// Label filter: all, fraud, or legitimate
    #[arg(short, long, default_value = "all")]
    filter: FraudFilter,

    /// Column to sort by
    #[arg(long)]
    sort_key: Option<String>,

    /// Sort direction: asc or desc
    #[arg(long, default_value = "asc")]
    sort_dir: SortDirection,

    /// Page of the table to show (1-based)
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Records per page, overriding the configured value
    #[arg(long)]
    page_size: Option<usize>,

    /// Extra grouping dimension to report on
    #[arg(short, long)]
    group_by: Option<String>,

    /// Output format: text or json
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Write a default configuration file and exit
    #[arg(long)]
    init_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.init_config {
        std::fs::write(&args.config, Config::generate_default())
            .with_context(|| format!("Failed to write {}", args.config.display()))?;
        println!("Wrote default configuration to {}", args.config.display());
        return Ok(());
    }

    let config = if args.config.exists() {
        Config::load(args.config.clone())?
    } else {
        Config::default()
    };

    env_logger::Builder::new()
        .parse_filters(&config.logging.level)
        .init();

    if !args.config.exists() {
        warn!(
            "Config file {} not found, using defaults",
            args.config.display()
        );
    }

    let rt = Runtime::new()?;
    let records = rt.block_on(async {
        let source = DefaultRecordSource;
        source.load_file(args.input.clone()).await
    })?;
    info!(
        "Loaded {} raw records from {}",
        records.len(),
        args.input.display()
    );

    let enricher = Enricher::new(config.engine.clone());
    let dataset = Dataset::from_records(enricher.enrich(&records));

    let sort = args.sort_key.as_ref().map(|key| SortSpec {
        key: key.clone(),
        direction: args.sort_dir,
    });
    let params = TableQuery {
        term: args.search.clone(),
        filter: args.filter,
        sort,
        page: args.page,
        page_size: args
            .page_size
            .unwrap_or(config.pagination.records_per_page),
    };

    let table = dataset.table(&params);
    let analytics = dataset.analytics(&config);
    let extra_group = match &args.group_by {
        Some(name) => Some(dataset.group_report_by_name(name)?),
        None => None,
    };

    match args.format.unwrap_or(config.report.format) {
        OutputFormat::Json => {
            let payload = serde_json::json!({
                "table": table,
                "analytics": analytics,
                "group": extra_group,
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        OutputFormat::Text => {
            render_text(&table, &analytics, extra_group.as_ref());
        }
    }

    Ok(())
}

// ==================== Text Rendering ====================

fn render_text(
    table: &fraudlens_core::TableResponse,
    analytics: &fraudlens_core::AnalyticsReport,
    extra_group: Option<&fraudlens_core::GroupStatsReport>,
) {
    let summary = &analytics.summary;
    println!("== Summary ==");
    println!(
        "Records: {}  Fraud: {}  Legitimate: {}",
        summary.summary.total, summary.summary.fraud, summary.summary.legitimate
    );
    println!(
        "Fraud rate: {}  Avg amount: {}  High value: {}  Risk: {}",
        summary.fraud_rate_text,
        summary.average_amount_text,
        summary.summary.high_value,
        summary.risk_level_text
    );
    println!();

    println!(
        "== Table (page {}/{}, {} of {} records match) ==",
        table.current_page, table.total_pages, table.filtered_count, table.total_count
    );
    println!("{}", table.columns.join(" | "));
    for row in &table.rows {
        println!("{}", row.join(" | "));
    }
    println!();

    let metrics = &analytics.metrics;
    println!(
        "== Model metrics ({} records evaluated) ==",
        metrics.evaluated_count
    );
    println!(
        "TP: {}  TN: {}  FP: {}  FN: {}",
        metrics.matrix.true_positives,
        metrics.matrix.true_negatives,
        metrics.matrix.false_positives,
        metrics.matrix.false_negatives
    );
    println!(
        "Accuracy: {:.4}  Precision: {:.4}  Recall: {:.4}  F1: {:.4}",
        metrics.metrics.accuracy,
        metrics.metrics.precision,
        metrics.metrics.recall,
        metrics.metrics.f1_score
    );
    if metrics.metrics.self_consistent {
        println!("Note: predictions match ground truth exactly; they may be derived from it");
    }
    println!();

    for group in analytics.group_stats.iter().chain(extra_group) {
        println!("== Fraud by {} ==", group.dimension);
        for stat in &group.groups {
            println!(
                "{}: {} total, {} fraud, {} legitimate",
                stat.key, stat.total, stat.fraud, stat.legitimate
            );
        }
        println!();
    }
}
