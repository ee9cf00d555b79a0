//! Bootstrap command implementation
//!
//! Runs the whole sequence before the orchestration tool defines any guest:
//! 1. Resolving the environment and the run context
//! 2. Fetching the remote file set
//! 3. Creating the per-user settings file on first run
//! 4. Building the effective configuration
//! 5. Planning every guest and emitting the handoff document

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use log::{debug, info, warn};
use url::Url;

use vagrant_bootstrap::context::{detect_command, Environment, RunContext};
use vagrant_bootstrap::fetch::{BlockingClient, FetchOutcome, Fetcher};
use vagrant_bootstrap::guest::Handoff;
use vagrant_bootstrap::loader::YamlLoader;
use vagrant_bootstrap::{path, pipeline, settings, suggestions};

/// Format of the handoff document
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Arguments for the bootstrap run
#[derive(Args, Debug)]
pub struct BootstrapArgs {
    /// Environment profile (prod, dev, local, build)
    #[arg(long, value_name = "ENV", default_value = "prod")]
    pub env: String,

    /// Directory receiving the fetched files (defaults to current directory)
    #[arg(long, value_name = "PATH", env = "VAGRANT_BOOTSTRAP_LIB_DIR")]
    pub lib_dir: Option<PathBuf>,

    /// Project configuration file (defaults to ../vagrant-project-config.yml)
    #[arg(long, value_name = "PATH")]
    pub project_config: Option<PathBuf>,

    /// Per-user settings directory
    #[arg(long, value_name = "PATH", env = "VAGRANT_BOOTSTRAP_SETTINGS_DIR")]
    pub settings_dir: Option<PathBuf>,

    /// Base URL the remote file set is served from
    #[arg(long, value_name = "URL", env = "VAGRANT_BOOTSTRAP_BASE_URL")]
    pub base_url: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub timeout: u64,

    /// Let Vagrant manage host entries (answers the first-run question)
    #[arg(long, value_name = "BOOL")]
    pub manage_host: Option<bool>,

    /// Format of the handoff document
    #[arg(long, value_enum, default_value = "yaml")]
    pub format: OutputFormat,

    /// Write the handoff document to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Arguments forwarded to the orchestration tool
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

/// Execute the bootstrap run
pub fn execute(args: BootstrapArgs) -> Result<()> {
    let ctx = build_context(&args)?;
    info!("Environment: {}", ctx.environment);
    match detect_command(&ctx.passthrough) {
        Some(command) => info!("Detected command '{}'", command),
        None => debug!("No known command among {:?}", ctx.passthrough),
    }

    if ctx.environment.fetches_remote() {
        let client = BlockingClient::new(ctx.timeout).map_err(|e| suggestions::fatal(e, &ctx))?;
        let reports = Fetcher::new(&client, &ctx)
            .fetch_all()
            .map_err(|e| suggestions::fatal(e, &ctx))?;
        for report in &reports {
            match &report.outcome {
                FetchOutcome::Downloaded { url } => debug!("{} <- {}", report.path.display(), url),
                FetchOutcome::FellBack { url } => {
                    info!("{} is not available for {}, used {}", report.resource, ctx.environment, url)
                }
                FetchOutcome::KeptLocal { reason, .. } => {
                    debug!("Kept {}: {}", report.path.display(), reason)
                }
            }
        }
    } else {
        info!("Environment is local, using files in {}", ctx.lib_dir.display());
    }

    settings::ensure_local_config(&ctx, args.manage_host)
        .map_err(|e| suggestions::fatal(e, &ctx))?;

    let config = pipeline::build_effective_config(&ctx, &YamlLoader)
        .map_err(|e| suggestions::fatal(e, &ctx))?;
    let handoff = Handoff::build(&ctx, config).map_err(|e| suggestions::fatal(e, &ctx))?;

    let rendered = match args.format {
        OutputFormat::Yaml => handoff.to_yaml(),
        OutputFormat::Json => handoff.to_json(),
    }?;

    match &args.output {
        Some(output) => {
            fs::write(output, rendered)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!("Wrote {} guest plan(s) to {}", handoff.guests.len(), output.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

/// Resolve flags, environment variables and defaults into a [`RunContext`].
fn build_context(args: &BootstrapArgs) -> Result<RunContext> {
    let (forwarded_env, passthrough) = Environment::from_args(args.args.iter().cloned());
    // A forwarded --env comes later on the command line and wins
    let (environment, raw_env) = forwarded_env
        .unwrap_or_else(|| (Environment::from_flag(&args.env), args.env.clone()));
    if let Some(warning) = suggestions::unknown_environment(&raw_env) {
        warn!("{}", warning);
    }

    let lib_dir = match &args.lib_dir {
        Some(dir) => path::expand(dir)?,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let mut ctx = RunContext::new(environment, lib_dir)?;
    ctx.passthrough = passthrough;
    ctx.timeout = Duration::from_secs(args.timeout);
    if let Some(project_config) = &args.project_config {
        ctx.project_config = path::expand(project_config)?;
    }
    if let Some(settings_dir) = &args.settings_dir {
        ctx.settings_dir = path::expand(settings_dir)?;
    }
    if let Some(base_url) = &args.base_url {
        ctx.base_url =
            Url::parse(base_url).with_context(|| format!("Invalid base URL: {}", base_url))?;
    }
    Ok(ctx)
}
