//! Command-line interface definitions.
//!
//! Defines the CLI structure for the calmprice application using `clap`.
//! Subcommands list the top coins, show smoothed price history, compute calm
//! prices, and manage the cache and configuration.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Rate-limited coin prices with a calm (EMA) trend line
#[derive(Parser, Debug)]
#[command(name = "calmprice")]
#[command(version)]
pub struct Cli {
    /// Configuration file [default: ~/.calmprice/config.toml]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log level implied by `-q` / `-v`, if any.
    #[must_use]
    pub fn log_level_override(&self) -> Option<&'static str> {
        match (self.quiet, self.verbose) {
            (true, _) => Some("error"),
            (false, 0) => None,
            (false, 1) => Some("debug"),
            (false, _) => Some("trace"),
        }
    }
}

/// Color output mode for terminal rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands for the calmprice CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the top coins by market capitalization
    Coins,

    /// Show a coin's price history with its trend line
    History(HistoryArgs),

    /// Show the calm price of every listed coin
    Calm(CalmArgs),

    /// Inspect or clear the response cache
    #[command(subcommand)]
    Cache(CacheCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Arguments for the `history` subcommand.
#[derive(Parser, Debug)]
pub struct HistoryArgs {
    /// Coin identifier (e.g. "bitcoin")
    pub coin: String,

    /// Look-back window in days [default: from config]
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub days: Option<u32>,

    /// Only show the last N points
    #[arg(long)]
    pub tail: Option<usize>,
}

/// Arguments for the `calm` subcommand.
#[derive(Parser, Debug)]
pub struct CalmArgs {
    /// Look-back window in days [default: from config]
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub days: Option<u32>,
}

/// Subcommands for `calmprice cache`.
#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// List cached entries and their freshness.
    List,
    /// Remove every cached entry.
    Clear,
}

/// Subcommands for `calmprice config`.
///
/// Provides configuration management utilities including generation,
/// display, and validation of configuration files.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Generate a new configuration file from template.
    Init(ConfigInitArgs),
    /// Display the effective configuration with defaults applied.
    Show,
    /// Validate a configuration file for correctness.
    Validate,
}

/// Arguments for `config init`.
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn coins_command() {
        let cli = Cli::try_parse_from(["calmprice", "coins"]).unwrap();
        assert!(matches!(cli.command, Commands::Coins));
        assert!(cli.config.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn history_command_with_options() {
        let cli = Cli::try_parse_from([
            "calmprice", "history", "bitcoin", "--days", "90", "--tail", "5",
        ])
        .unwrap();
        if let Commands::History(args) = cli.command {
            assert_eq!(args.coin, "bitcoin");
            assert_eq!(args.days, Some(90));
            assert_eq!(args.tail, Some(5));
        } else {
            panic!("Expected History command");
        }
    }

    #[test]
    fn history_requires_coin() {
        assert!(Cli::try_parse_from(["calmprice", "history"]).is_err());
    }

    #[test]
    fn zero_days_rejected() {
        assert!(Cli::try_parse_from(["calmprice", "calm", "--days", "0"]).is_err());
        assert!(Cli::try_parse_from(["calmprice", "history", "btc", "-d", "0"]).is_err());
    }

    #[test]
    fn calm_defaults_days_to_config() {
        let cli = Cli::try_parse_from(["calmprice", "calm"]).unwrap();
        assert!(matches!(cli.command, Commands::Calm(CalmArgs { days: None })));
    }

    #[test]
    fn cache_subcommands() {
        let cli = Cli::try_parse_from(["calmprice", "cache", "list"]).unwrap();
        assert!(matches!(cli.command, Commands::Cache(CacheCommand::List)));
        let cli = Cli::try_parse_from(["calmprice", "cache", "clear"]).unwrap();
        assert!(matches!(cli.command, Commands::Cache(CacheCommand::Clear)));
    }

    #[test]
    fn config_init_with_force() {
        let cli = Cli::try_parse_from(["calmprice", "config", "init", "--force"]).unwrap();
        if let Commands::Config(ConfigCommand::Init(args)) = cli.command {
            assert!(args.force);
        } else {
            panic!("Expected Config Init command");
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "calmprice", "coins", "--json", "-c", "/tmp/c.toml", "-vv",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_level_override(), Some("trace"));
    }

    #[test]
    fn quiet_wins_over_verbose() {
        let cli = Cli::try_parse_from(["calmprice", "-q", "-v", "coins"]).unwrap();
        assert_eq!(cli.log_level_override(), Some("error"));
    }

    #[test]
    fn color_choice_default_is_auto() {
        let cli = Cli::try_parse_from(["calmprice", "coins"]).unwrap();
        assert_eq!(cli.color, ColorChoice::Auto);
    }
}
