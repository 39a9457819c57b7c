// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `csvwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "csvwatch",
    version,
    about = "Serve a watched directory of CSV files over HTTP.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Csvwatch.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Csvwatch.toml")]
    pub config: String,

    /// Override `[server].port` from the config file.
    #[arg(long, value_name = "PORT", value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CSVWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load config and datasets, print what was loaded, but don't serve.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = CliArgs::try_parse_from(["csvwatch"]).unwrap();
        assert_eq!(args.config, "Csvwatch.toml");
        assert_eq!(args.port, None);
        assert!(!args.dry_run);
    }

    #[test]
    fn port_override_must_be_non_zero() {
        let args = CliArgs::try_parse_from(["csvwatch", "--port", "9000"]).unwrap();
        assert_eq!(args.port, Some(9000));

        assert!(CliArgs::try_parse_from(["csvwatch", "--port", "0"]).is_err());
        assert!(CliArgs::try_parse_from(["csvwatch", "--port", "70000"]).is_err());
    }
}
