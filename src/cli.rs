//! CLI argument parsing and logger setup

use anyhow::Result;
use clap::Parser;

use crate::commands;
use vagrant_bootstrap::output::{self, OutputConfig};

/// Vagrant Bootstrap - fetch provisioning files and merge layered configuration
///
/// Arguments after the options are forwarded to the orchestration tool.
#[derive(Parser, Debug)]
#[command(name = "vagrant-bootstrap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    bootstrap: commands::bootstrap::BootstrapArgs,

    /// Colorize output (always, never, auto)
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "info",
        env = "VAGRANT_BOOTSTRAP_LOG"
    )]
    log_level: String,
}

impl Cli {
    /// Execute the bootstrap run
    pub fn execute(self) -> Result<()> {
        let output_config = OutputConfig::from_env_and_flag(&self.color);
        output::init_logging(&self.log_level, &output_config)?;

        commands::bootstrap::execute(self.bootstrap)
    }
}
