use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Local;

use validate_epub::cli::Cli;
use validate_epub::config::{Profile, ToolConfig, resolve_schema_ref};
use validate_epub::error::SetupError;
use validate_epub::file_discovery::FileDiscovery;
use validate_epub::logs::RunLogs;
use validate_epub::orchestrator::{BatchOrchestrator, BatchSummary};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    // Setup failures are fatal: report once and exit before any output
    // file is produced. A completed batch exits 0; failed files are in
    // the logs, not the exit code.
    if let Err(e) = run(cli).await {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<BatchSummary> {
    let config = ToolConfig::load(&cli.config)?;

    let profile = match &cli.profile {
        Some(path) => Some(Profile::load(path)?),
        None => None,
    };
    let schema_ref = resolve_schema_ref(&cli.schema, profile.as_ref())?;

    std::fs::create_dir_all(&cli.out_dir).map_err(|source| SetupError::OutputDir {
        path: cli.out_dir.clone(),
        source,
    })?;

    let discovery = FileDiscovery::new(&cli.extension);
    let files = discovery.discover(&cli.batch_dir).await?;

    let mut logs = RunLogs::create(&cli.out_dir).await?;
    let orchestrator = BatchOrchestrator::new(
        config,
        schema_ref,
        cli.out_dir.clone(),
        Duration::from_secs(cli.timeout),
    );

    println!("validate-epub started: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    if cli.verbose {
        println!("{} file(s) discovered", files.len());
    }
    let start = Instant::now();

    let summary = orchestrator.run(&files, &mut logs).await?;

    println!("validate-epub ended: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!("Elapsed time: {:.2} minutes", start.elapsed().as_secs_f64() / 60.0);
    print_summary(&summary);

    Ok(summary)
}

fn print_summary(summary: &BatchSummary) {
    let colored = atty::is(atty::Stream::Stdout);
    let paint = |text: &str, color: &str| {
        if colored {
            format!("\x1b[{}m{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    };

    println!("Files processed: {}", summary.total);
    println!("  {} {}", paint("Passed:", "32"), summary.passed);
    if summary.failed > 0 {
        println!("  {} {}", paint("Failed:", "31"), summary.failed);
    }
}
