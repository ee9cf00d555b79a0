//! # Output Configuration
//!
//! Controls how the bootstrapper talks to the terminal: whether colors are
//! used, and how log records are rendered on stderr.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! Every log line is prefixed with [`LOG_PREFIX`] so the bootstrapper's
//! output can be told apart from the orchestration tool it runs inside.

use std::env;
use std::io::Write;

use console::style;
use log::{Level, SetLoggerError};

/// Prefix of every log line.
pub const LOG_PREFIX: &str = "tfr-vagrant:";

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// # Arguments
    /// * `color_flag` - The value of the --color CLI flag: "always", "never", or "auto"
    ///
    /// In auto mode, colors are disabled if:
    /// - `NO_COLOR` environment variable is set (any value, including empty)
    /// - `CLICOLOR=0` is set
    /// - `TERM=dumb` is set
    /// - stderr is not a TTY (unless `CLICOLOR_FORCE=1`)
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of the variable (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        // Log records go to stderr
        console::Term::stderr().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Install the global logger.
///
/// `filters` uses the `env_logger` filter syntax, e.g. `info` or
/// `warn,vagrant_bootstrap::fetch=debug`.
pub fn init_logging(filters: &str, config: &OutputConfig) -> Result<(), SetLoggerError> {
    let config = config.clone();
    env_logger::Builder::new()
        .parse_filters(filters)
        .target(env_logger::Target::Stderr)
        .format(move |buf, record| {
            writeln!(
                buf,
                "{}",
                format_line(&config, record.level(), &record.args().to_string())
            )
        })
        .try_init()
}

/// Render one log line with prefix and level label.
pub fn format_line(config: &OutputConfig, level: Level, message: &str) -> String {
    let label = match level {
        Level::Info => return format!("{} {}", LOG_PREFIX, message),
        Level::Error => "error",
        Level::Warn => "warning",
        Level::Debug => "debug",
        Level::Trace => "trace",
    };
    if !config.use_color {
        return format!("{} {}: {}", LOG_PREFIX, label, message);
    }
    let label = match level {
        Level::Error => style(label).red().bold(),
        Level::Warn => style(label).yellow().bold(),
        _ => style(label).dim(),
    }
    .force_styling(true);
    format!("{} {}: {}", LOG_PREFIX, label, message)
}
