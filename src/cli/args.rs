//! CLI argument definitions using clap
//!
//! Commands:
//! - fleetdesk init --config <path>
//! - fleetdesk serve --config <path>
//! - fleetdesk create-admin --config <path> --login <login> --password <password>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// FleetDesk - vehicle and owner registry with a server-side data grid
#[derive(Parser, Debug)]
#[command(name = "fleetdesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database schema
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./fleetdesk.json")]
        config: PathBuf,
    },

    /// Start the HTTP API
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./fleetdesk.json")]
        config: PathBuf,
    },

    /// Register an administrator account
    CreateAdmin {
        /// Path to configuration file
        #[arg(long, default_value = "./fleetdesk.json")]
        config: PathBuf,

        #[arg(long)]
        login: String,

        #[arg(long)]
        password: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
