//! CLI module graph and command dispatch.

pub mod cache;
pub mod calm;
pub mod coins;
pub mod command;
pub mod config;
pub mod history;
pub mod output;
pub mod paths;

use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;
use command::{CacheCommand, Cli, ColorChoice, Commands, ConfigCommand};

/// Run the parsed command line to completion.
///
/// `config init` and `config validate` work on the file itself and never
/// touch logging or the network; every other command loads the effective
/// configuration first.
pub async fn execute(cli: Cli) -> Result<()> {
    output::set_color(match cli.color {
        ColorChoice::Always => Some(true),
        ColorChoice::Never => Some(false),
        ColorChoice::Auto => None,
    });

    let config_path = cli.config.clone().unwrap_or_else(paths::default_config);

    match &cli.command {
        Commands::Config(ConfigCommand::Init(args)) => {
            return config::execute_init(&config_path, args.force);
        }
        Commands::Config(ConfigCommand::Validate) => {
            return config::execute_validate(&config_path);
        }
        _ => {}
    }

    let config = Config::load_or_default(cli.config.as_deref(), &paths::default_config())?;
    config.init_logging(cli.log_level_override());

    match cli.command {
        Commands::Coins => {
            let market = bootstrap::build_market_service(&config)?;
            coins::execute(&market).await
        }
        Commands::History(args) => {
            let market = bootstrap::build_market_service(&config)?;
            let days = args.days.unwrap_or(config.history.default_days);
            history::execute(&market, &args.coin, days, args.tail).await
        }
        Commands::Calm(args) => {
            let market = bootstrap::build_market_service(&config)?;
            let days = args.days.unwrap_or(config.history.default_days);
            calm::execute(&market, days).await
        }
        Commands::Cache(CacheCommand::List) => {
            let cache = bootstrap::build_cache(&config)?;
            cache::execute_list(&cache)
        }
        Commands::Cache(CacheCommand::Clear) => {
            let cache = bootstrap::build_cache(&config)?;
            cache::execute_clear(&cache)
        }
        Commands::Config(ConfigCommand::Show) => config::execute_show(&config),
        Commands::Config(_) => Ok(()),
    }
}
