use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use recommender_core::config;
use recommender_core::config::AppConfig;
use recommender_core::pipeline;
use recommender_core::{Recommendation, RecommendError};
use serde::Serialize;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Index => run_index(cfg).await,
        Commands::Recommend { query, json } => run_recommend(cfg, &query, json).await,
        Commands::Batch { input, output } => run_batch(cfg, &input, &output).await,
    }
}

#[derive(Parser)]
#[command(name = "assess", about = "Balanced assessment recommendations from hiring queries")]
struct Cli {
    /// Path to a config file (defaults to config/default.toml).
    #[arg(long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed the catalog into the configured vector store.
    Index,
    /// Recommend assessments for a single query.
    Recommend {
        query: String,
        /// Emit the API-shaped JSON response instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Run every query from a CSV (`Query` column) and write
    /// `Query,Assessment_url` prediction rows.
    Batch {
        #[arg(long)]
        input: String,
        #[arg(long)]
        output: String,
    },
}

#[derive(Serialize)]
struct RecommendResponse<'a> {
    recommended_assessments: &'a [Recommendation],
}

async fn run_index(cfg: AppConfig) -> Result<()> {
    let indexed = pipeline::run_indexer(&cfg).await?;
    println!("indexed {indexed} assessments");
    Ok(())
}

async fn run_recommend(cfg: AppConfig, query: &str, json: bool) -> Result<()> {
    let engine = pipeline::build_engine(&cfg).await?;
    let result = engine.recommend(query).await?;

    if json {
        let response = RecommendResponse {
            recommended_assessments: &result.items,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if !result.intent.is_empty() {
        let domains: Vec<&str> = result.intent.iter().map(|d| d.name()).collect();
        println!("intent: {}", domains.join(", "));
    }
    for (i, rec) in result.items.iter().enumerate() {
        let a = &rec.assessment;
        let domain = a
            .primary_domain()
            .map(|d| d.name())
            .unwrap_or("Uncategorized");
        let duration = a
            .duration
            .map(|m| format!("{m} min"))
            .unwrap_or_else(|| "unknown".to_string());
        println!(
            "{:2}. [{:.3}] {} ({domain}, {duration})\n    {}",
            i + 1,
            rec.score,
            a.name,
            a.url
        );
    }
    Ok(())
}

async fn run_batch(cfg: AppConfig, input: &str, output: &str) -> Result<()> {
    let engine = pipeline::build_engine(&cfg).await?;

    let mut reader = csv::Reader::from_path(input).with_context(|| format!("open {input}"))?;
    let headers = reader.headers()?.clone();
    let query_col = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("query"))
        .context("input CSV has no Query column")?;

    let mut writer = csv::Writer::from_path(output).with_context(|| format!("create {output}"))?;
    writer.write_record(["Query", "Assessment_url"])?;

    let mut rows = 0usize;
    for record in reader.records() {
        let record = record?;
        let Some(query) = record.get(query_col) else {
            continue;
        };
        match engine.recommend(query).await {
            Ok(result) => {
                if result.items.is_empty() {
                    tracing::warn!(query, "no recommendations for query");
                    continue;
                }
                for rec in &result.items {
                    writer.write_record([query, rec.assessment.url.as_str()])?;
                    rows += 1;
                }
            }
            // Skip malformed rows, surface everything else.
            Err(RecommendError::InvalidQuery(reason)) => {
                tracing::warn!(query, %reason, "skipping invalid query");
            }
            Err(e) => return Err(e.into()),
        }
    }
    writer.flush()?;
    println!("wrote {rows} prediction rows to {output}");
    Ok(())
}
