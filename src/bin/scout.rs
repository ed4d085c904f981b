//! `scout` CLI: run a scan or generate a content batch once and print a summary.

use anyhow::Result;
use clap::{Parser, Subcommand};

use content_scout::compose::Mode;
use content_scout::tasks::{GenerateRequest, ScanRequest};
use content_scout::telemetry::init_tracing;
use content_scout::{ScoutConfig, Task, TaskOutcome, TaskRunner};

#[derive(Parser)]
#[command(name = "scout")]
#[command(about = "Score trending ideas and compose content batches")]
struct Cli {
    /// Path to the scout TOML config
    #[arg(long, env = "SCOUT_CONFIG_PATH")]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest feeds, score and rank ideas, write the scan report
    Scan {
        /// Only keep ideas from the last N days
        #[arg(long)]
        days: Option<u32>,
        /// Minimum idea score to qualify
        #[arg(long)]
        min_score: Option<f64>,
    },
    /// Compose and score content pieces from the latest scan
    Generate {
        /// Angle set: professional, spicy or balanced
        #[arg(long, default_value = "balanced")]
        mode: Mode,
        /// Leave every piece for manual review
        #[arg(long)]
        no_auto_approve: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ScoutConfig::from_path(path)?,
        None => ScoutConfig::from_toml_or_default()?,
    };
    let runner = TaskRunner::from_config(config)?;

    let task = match cli.command {
        Command::Scan { days, min_score } => Task::Scan(ScanRequest {
            ideas: None,
            min_score,
            days_back: days,
        }),
        Command::Generate {
            mode,
            no_auto_approve,
        } => Task::Generate(GenerateRequest {
            mode,
            auto_approve: Some(!no_auto_approve),
        }),
    };

    match runner.run(task).await? {
        TaskOutcome::Scanned(report) => {
            let m = &report.metadata;
            println!(
                "scanned {} ideas, {} qualified (min score {}), {} sources",
                m.total_raw_ideas, m.qualified_ideas, m.min_score_threshold, m.distinct_sources
            );
            for (rank, s) in report.ideas.iter().take(10).enumerate() {
                println!(
                    "{:>2}. [{:>6.2}] {} ({}, {})",
                    rank + 1,
                    s.scores.total,
                    s.idea.title,
                    s.opportunity_type.as_str(),
                    s.fusion_potential.as_str()
                );
            }
        }
        TaskOutcome::Generated(batch) => {
            let m = &batch.metadata;
            println!(
                "{} pieces ({} mode): {} auto-approved, {} need review",
                m.total_pieces, m.mode, m.auto_approved, m.requires_review
            );
            for p in &batch.pieces {
                println!(
                    "[{:>3}] {:?} {}",
                    p.quality_score.total, p.fusion_strength, p.trend_source.title
                );
            }
        }
        TaskOutcome::Approved(r) => println!("approved piece {} ({})", r.index, r.title),
    }
    Ok(())
}
