use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dashapi::config::config::{DashboardConfig, load_config};
use dashapi::{BugUpdate, Build, Crash, Dashboard, FailedRepro, PollRequest};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "dashapi", about = "Talk to the syzkaller dashboard")]
struct Cli {
    /// Defaults to config/settings.toml in the working directory.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a build description read from a JSON file.
    UploadBuild { file: PathBuf },
    /// Report a crash read from a JSON file.
    ReportCrash { file: PathBuf },
    /// Report a failed repro attempt read from a JSON file.
    ReportFailedRepro { file: PathBuf },
    /// Send a bug status update read from a JSON file.
    UpdateBug { file: PathBuf },
    /// Poll for bugs pending external reporting.
    Poll {
        #[arg(value_name = "TYPE")]
        kind: String,
    },
    /// Send a line to the dashboard error log.
    LogError { name: String, text: String },
}

fn read_record<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json_content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read json file {:?}", path))?;

    serde_json::from_str(&json_content)
        .with_context(|| format!("Failed to parse json file {:?}", path))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DashboardConfig::from_file(path)?,
        None => load_config()?,
    };
    let dash = Dashboard::from_config(&config).context("Failed to create dashboard client")?;

    match cli.command {
        Command::UploadBuild { file } => {
            let build: Build = read_record(&file)?;
            dash.upload_build(&build)
                .await
                .with_context(|| format!("Failed to upload build {}", build.id))?;
            info!("Build {} uploaded", build.id);
        }
        Command::ReportCrash { file } => {
            let crash: Crash = read_record(&file)?;
            dash.report_crash(&crash)
                .await
                .with_context(|| format!("Failed to report crash {:?}", crash.title))?;
            info!("Crash {:?} reported", crash.title);
        }
        Command::ReportFailedRepro { file } => {
            let repro: FailedRepro = read_record(&file)?;
            dash.report_failed_repro(&repro)
                .await
                .with_context(|| format!("Failed to report failed repro {:?}", repro.title))?;
            info!("Failed repro {:?} reported", repro.title);
        }
        Command::UpdateBug { file } => {
            let update: BugUpdate = read_record(&file)?;
            dash.update_bug(&update)
                .await
                .with_context(|| format!("Failed to update bug {}", update.id))?;
            info!("Bug {} updated to {:?}", update.id, update.status);
        }
        Command::Poll { kind } => {
            let resp = dash
                .poll(&PollRequest { kind: kind.clone() })
                .await
                .with_context(|| format!("Failed to poll {} reports", kind))?;
            info!("Polled {} {} reports", resp.reports.len(), kind);
            for report in &resp.reports {
                println!("{}\t{}", report.id, report.title);
            }
        }
        Command::LogError { name, text } => {
            dash.log_error(&name, text).await;
        }
    }

    Ok(())
}
