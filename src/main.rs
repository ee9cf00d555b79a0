//! # Vagrant Bootstrap CLI
//!
//! This is the binary entry point for the `vagrant-bootstrap` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Running the bootstrap sequence and emitting the handoff document.
//! - Turning fatal errors into a non-zero exit status.
//!
//! The core logic lives in the `lib.rs` library crate; the binary is a thin
//! wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
