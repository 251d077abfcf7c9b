//! Command-line interface for leadboard.
//!
//! This module provides the CLI structure for the `leadboard` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{ConfigCommand, FetchCommand, GeocodeCommand, ServeCommand};

/// leadboard - Lead analytics dashboard for SmartSuite
///
/// Pulls lead records from a SmartSuite table, fills in missing coordinates,
/// and serves a filterable dashboard with state, company and radius search.
#[derive(Debug, Parser)]
#[command(name = "leadboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the dashboard server
    Serve(ServeCommand),

    /// Fetch leads once and print a summary
    Fetch(FetchCommand),

    /// Look up coordinates for a place
    Geocode(GeocodeCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}
