//! FleetDesk CLI entry point
//!
//! Parses arguments, dispatches through `cli::run`, prints errors to stderr
//! and exits non-zero on failure. No other logic lives here.

use fleetdesk::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
