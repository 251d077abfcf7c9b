//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Port to listen on (overrides `server.port`)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind (overrides `server.bind`)
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,
}

/// One-shot fetch arguments.
#[derive(Debug, Args)]
pub struct FetchCommand {
    /// Output leads as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Skip filling missing coordinates
    #[arg(long)]
    pub no_geocode: bool,
}

/// Geocode command arguments.
#[derive(Debug, Args)]
pub struct GeocodeCommand {
    /// The place to look up, e.g. "Austin, TX"
    pub place: String,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
