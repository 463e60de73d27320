mod commands;
mod logging;
mod progress;

use std::io::{self, Write};
use std::process;

use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use hot_radar_core::report;
use hot_radar_core::storage::{JsonSnapshotStore, SnapshotStore};
use hot_radar_core::{AppConfig, CycleOutcome, MonitorEngine};
use progress::CliReporter;
use tracing::{error, info, warn};

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match hot_radar_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    let outcome = match args.command {
        Some(Commands::Run) => run_cycle(&config),
        Some(Commands::PrintConfig) => print_config(&config),
        Some(Commands::ShowSnapshot) => show_snapshot(&config),
        Some(Commands::ClearSnapshot) => clear_snapshot(&config),
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    if let Err(err) = outcome {
        error!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run_cycle(config: &AppConfig) -> anyhow::Result<()> {
    let engine = MonitorEngine::new(config.clone())?;
    let reporter = CliReporter::new();
    let result = engine.run_cycle(&reporter);

    match result.outcome {
        CycleOutcome::NoData => {
            println!("{}", "No videos could be fetched; the stored snapshot was kept as is".yellow());
        }
        CycleOutcome::Baseline => {
            println!("Baseline recorded; the growth ranking starts with the next run");
        }
        CycleOutcome::Ranked => {
            print!(
                "{}",
                report::render_console(
                    &result.ranked,
                    config.report.display_count,
                    &result.generated_at
                )
            );
        }
    }

    println!();
    println!(
        "Fetch: {}, Rank: {}",
        format!("{:.2}s", result.fetch_duration.as_secs_f64()).green(),
        format!("{:.3}s", result.rank_duration.as_secs_f64()).green(),
    );
    println!(
        "{} items from {} pages ({} failed), {} growing videos",
        format!("{}", result.fetched_items).cyan(),
        format!("{}", result.pages_ok).cyan(),
        format!("{}", result.pages_failed).red(),
        format!("{}", result.ranked.len()).yellow(),
    );
    info!(
        outcome = ?result.outcome,
        fetched = result.fetched_items,
        pages_failed = result.pages_failed,
        ranked = result.ranked.len(),
        "Cycle finished"
    );
    match &result.report_path {
        Some(path) => println!("Report: {}", path.display().to_string().cyan()),
        None => warn!("HTML report was not written"),
    }
    if result.outcome != CycleOutcome::NoData && !result.snapshot_saved {
        warn!("Snapshot was not saved; the next run compares against the older baseline");
    }

    Ok(())
}

fn print_config(config: &AppConfig) -> anyhow::Result<()> {
    println!("{}", config.redacted().to_toml()?);
    Ok(())
}

fn show_snapshot(config: &AppConfig) -> anyhow::Result<()> {
    let store = JsonSnapshotStore::new(config.storage.snapshot_path.clone());
    let snapshot = store.load()?;
    println!(
        "{} entries in snapshot {}",
        format!("{}", snapshot.len()).cyan(),
        store.path().display()
    );
    Ok(())
}

fn clear_snapshot(config: &AppConfig) -> anyhow::Result<()> {
    let store = JsonSnapshotStore::new(config.storage.snapshot_path.clone());
    let prompt = format!("Delete the snapshot at {}?", store.path().display());
    if confirm(&prompt)? {
        store.clear()?;
        println!("Snapshot cleared");
    }
    Ok(())
}

/// Anything other than `y` or `yes` counts as no.
fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} (y/N): ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
