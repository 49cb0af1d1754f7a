//! safeinteract - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use safeinteract::{
    cli::{Args, Commands, Verbosity},
    config::Config,
    logging::init_logging,
    simulation::{run_simulation, Scenario, SimulationReport},
    telemetry::TelemetryDisplay,
};
use std::path::PathBuf;

fn main() -> Result<()> {
    let args = Args::parse();
    let config = match &args.command {
        Commands::Config { init: true } => init_config(&args)?,
        _ => Config::load_or_default(args.config.as_deref())
            .context("Failed to load configuration")?,
    };

    let verbosity = args.verbosity();
    init_logging(
        &config.logging.level,
        verbosity.log_steps(),
        verbosity == Verbosity::Quiet,
    );

    match &args.command {
        Commands::Config { .. } => show_config(&config)?,
        Commands::Simulate { json, .. } => {
            let scenario = args.command.scenario().unwrap_or_default();
            simulate(&config, &scenario, *json, verbosity)?;
        }
    }

    Ok(())
}

/// Write the defaults to the `-c` path or the standard location
fn init_config(args: &Args) -> Result<Config> {
    let path: PathBuf = args
        .config
        .clone()
        .or_else(Config::default_path)
        .context("Could not determine home directory")?;
    let config = Config::init_file(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{} {}", "✓ Wrote configuration to".green(), path.display());
    Ok(config)
}

/// Print the effective configuration
fn show_config(config: &Config) -> Result<()> {
    print!("{}", config.to_toml_string()?);
    Ok(())
}

/// Run the scripted element and report
fn simulate(config: &Config, scenario: &Scenario, json: bool, verbosity: Verbosity) -> Result<()> {
    let report = run_simulation(config, scenario)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);

    if verbosity.show_summary() {
        if let Some(collector) = &report.collector {
            TelemetryDisplay::new(collector.clone(), config.telemetry.recent_events)
                .display_summary();
        }
    }

    Ok(())
}

fn print_report(report: &SimulationReport) {
    println!("{}", "Simulated element".bold());
    println!("  Capabilities: {}", report.capabilities.join(", "));
    println!(
        "  Action runs:  {}   Scrolls: {}",
        report.action_runs, report.scrolls
    );
    println!();

    for outcome in &report.calls {
        match (&outcome.clicks, &outcome.error) {
            (Some(clicks), _) => println!(
                "  {} click {} -> {} total",
                "✓".green(),
                outcome.call,
                clicks
            ),
            (None, Some(error)) => println!("  {} click {} -> {}", "✗".red(), outcome.call, error),
            (None, None) => println!("  {} click {}", "?".yellow(), outcome.call),
        }
    }
}
