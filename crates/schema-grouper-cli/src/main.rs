mod commands;
mod logging;
mod progress;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use progress::CliReporter;
use schema_grouper_core::analysis::compute_similarity;
use schema_grouper_core::schema::extract_from_path;
use schema_grouper_core::{AppConfig, GroupingSession};
use tracing::{error, info};

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match schema_grouper_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    let outcome = match args.command {
        Some(Commands::Scan {
            dir,
            recursive,
            pattern,
            sample_rows,
            threshold,
            exact,
            output,
        }) => {
            let mut config = config;
            config.recursive |= recursive;
            if let Some(pattern) = pattern {
                config.pattern = pattern;
            }
            if let Some(sample_rows) = sample_rows {
                config.sample_rows = sample_rows;
            }
            if let Some(threshold) = threshold {
                config.similarity_threshold = threshold;
            }
            run_scan(config, &dir, exact, output)
        }
        Some(Commands::Show { snapshot }) => run_show(config, &snapshot),
        Some(Commands::Files { snapshot, group }) => run_files(config, &snapshot, &group),
        Some(Commands::Similarity { file_a, file_b }) => run_similarity(&config, &file_a, &file_b),
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
            Ok(())
        }
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

fn run_scan(
    config: AppConfig,
    dir: &Path,
    exact: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let threshold = config.similarity_threshold;
    let mut session = GroupingSession::new(config)?;
    let reporter = CliReporter::new();

    let report = session
        .scan_directory(dir, &reporter)
        .with_context(|| format!("scanning {}", dir.display()))?;

    info!(
        "{} candidates, {} schemas, {} skipped in {}",
        format!("{}", report.discovered).cyan(),
        format!("{}", report.schemas.len()).green(),
        format!("{}", report.failures.len()).red(),
        format!("{:.2}s", report.duration.as_secs_f64()).green(),
    );

    if exact {
        session.group_by_exact_match(&reporter);
    } else {
        session.group_by_similarity(threshold, &reporter)?;
    }

    println!();
    println!("{}", session.summary());

    if let Some(output) = output {
        session
            .save_groupings(&output)
            .with_context(|| format!("writing snapshot {}", output.display()))?;
        info!("Groups saved to {}", output.display().to_string().green());
    }

    Ok(())
}

fn load_session(config: AppConfig, snapshot: &Path) -> anyhow::Result<GroupingSession> {
    let mut session = GroupingSession::new(config)?;
    session
        .load_groupings(snapshot)
        .with_context(|| format!("loading snapshot {}", snapshot.display()))?;
    Ok(session)
}

fn run_show(config: AppConfig, snapshot: &Path) -> anyhow::Result<()> {
    let session = load_session(config, snapshot)?;
    println!("{}", session.summary());
    Ok(())
}

fn run_files(config: AppConfig, snapshot: &Path, group: &str) -> anyhow::Result<()> {
    let session = load_session(config, snapshot)?;
    let files = session
        .get_files_in_group(group)
        .ok_or_else(|| schema_grouper_core::Error::UnknownGroup(group.to_string()))?;
    for path in files {
        println!("{}", path);
    }
    Ok(())
}

fn run_similarity(config: &AppConfig, file_a: &Path, file_b: &Path) -> anyhow::Result<()> {
    let a = extract_from_path(file_a, config.sample_rows)?;
    let b = extract_from_path(file_b, config.sample_rows)?;
    let similarity = compute_similarity(&a, &b);
    info!(
        "{} vs {}: {}",
        a.path,
        b.path,
        format!("{:.3}", similarity).yellow()
    );
    println!("{:.3}", similarity);
    Ok(())
}
