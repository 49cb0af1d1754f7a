//! Command-line argument parsing for safeinteract
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use crate::simulation::Scenario;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// safeinteract - resilient UI interaction through recovering proxies
#[derive(Parser, Debug)]
#[command(name = "safeinteract")]
#[command(version)]
#[command(about = "Drive flaky UI elements through recovering interaction proxies", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -v (debug), -vv (trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Display the effective configuration
    Config {
        /// Write the default configuration to the config path
        #[arg(long)]
        init: bool,
    },

    /// Click a scripted flaky element through a configured proxy
    Simulate {
        /// Clicks that fail with "not displayed" before the element shows up
        #[arg(long, default_value_t = 1)]
        hidden_calls: u32,

        /// Element is detached; every click fails unrecoverably
        #[arg(long)]
        fatal: bool,

        /// Scrolling into view fails
        #[arg(long)]
        corrective_fails: bool,

        /// Number of clicks
        #[arg(long, default_value_t = 1)]
        calls: u32,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }
}

impl Commands {
    /// Scenario described by `simulate` flags
    pub fn scenario(&self) -> Option<Scenario> {
        match self {
            Commands::Simulate {
                hidden_calls,
                fatal,
                corrective_fails,
                calls,
                ..
            } => Some(Scenario {
                hidden_calls: *hidden_calls,
                fatal: *fatal,
                corrective_fails: *corrective_fails,
                calls: *calls,
            }),
            Commands::Config { .. } => None,
        }
    }
}

impl Verbosity {
    /// Steps above the configured log level
    pub fn log_steps(&self) -> u8 {
        match self {
            Verbosity::Quiet | Verbosity::Normal => 0,
            Verbosity::Verbose => 1,
            Verbosity::VeryVerbose => 2,
        }
    }

    /// Check if should show the telemetry summary
    pub fn show_summary(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }
}
