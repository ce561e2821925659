mod client;
mod dataset;
mod metrics;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use client::ApiClient;
use metrics::{EvaluationMetrics, QueryOutcome};

/// Evaluate the recommendation service against a labeled query set.
#[derive(Debug, Parser)]
#[command(name = "recommend-eval", version)]
struct Args {
    /// Path to the labeled CSV (query → relevant assessment URLs).
    #[arg(long)]
    train_csv: PathBuf,

    /// Base URL of the running recommendation service.
    #[arg(long, default_value = "http://localhost:8000")]
    api_url: String,

    /// Ranking cutoff for Recall@K and Precision@K.
    #[arg(long, default_value_t = 10)]
    k: usize,

    /// Where to write the aggregate metrics JSON.
    #[arg(long, default_value = "evaluation_metrics.json")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let args = Args::parse();

    let labeled = dataset::load_labeled_csv(&args.train_csv)?;
    info!(queries = labeled.len(), csv = %args.train_csv.display(), "labeled queries loaded");

    let api = ApiClient::new(&args.api_url)?;
    api.check_health().await?;
    info!(api_url = %args.api_url, "service healthy");

    let total = labeled.len();
    let mut outcomes: Vec<QueryOutcome> = Vec::with_capacity(total);

    for (idx, entry) in labeled.into_iter().enumerate() {
        info!(index = idx + 1, total, query = %entry.query, "evaluating");

        let predicted = match api.predicted_urls(&entry.query).await {
            Ok(urls) => urls,
            Err(e) => {
                warn!(error = %e, query = %entry.query, "recommend call failed, counting as zero predictions");
                Vec::new()
            }
        };

        let recall = metrics::recall_at_k(&predicted, &entry.relevant_urls, args.k);
        let precision = metrics::precision_at_k(&predicted, &entry.relevant_urls, args.k);
        info!(
            recall,
            precision,
            predicted = predicted.len(),
            relevant = entry.relevant_urls.len(),
            "query evaluated"
        );

        outcomes.push(QueryOutcome {
            relevant: entry.relevant_urls,
            predicted,
        });
    }

    let summary = EvaluationMetrics {
        mean_recall_at_k: metrics::mean_recall_at_k(&outcomes, args.k),
        mean_precision_at_k: metrics::mean_precision_at_k(&outcomes, args.k),
        mean_average_precision: metrics::mean_average_precision(&outcomes),
        k: args.k,
        num_queries: outcomes.len(),
    };

    print_summary(&summary);

    let json = serde_json::to_string_pretty(&summary)?;
    std::fs::write(&args.output, json)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!(output = %args.output.display(), "metrics saved");

    Ok(())
}

fn print_summary(m: &EvaluationMetrics) {
    println!("{}", "=".repeat(60));
    println!("EVALUATION SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Queries evaluated : {}", m.num_queries);
    println!("K value           : {}", m.k);
    println!("Mean Recall@K     : {:.4}", m.mean_recall_at_k);
    println!("Mean Precision@K  : {:.4}", m.mean_precision_at_k);
    println!("Mean AP           : {:.4}", m.mean_average_precision);
    println!("{}", "=".repeat(60));
}
