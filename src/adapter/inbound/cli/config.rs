//! Handler for the `config` command group.

use std::fs;
use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::cache::CacheBackend;
use crate::infrastructure::config::settings::Config;

/// Default config template with documentation.
const CONFIG_TEMPLATE: &str = include_str!("../../../../config.toml.example");

/// Execute `config init`.
pub fn execute_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "config",
            reason: "file already exists (use --force to overwrite)".to_string(),
        }
        .into());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, CONFIG_TEMPLATE)?;
    output::section("Config Initialized");
    output::success("Created configuration file");
    output::field("Path", path.display());
    output::section("Next Steps");
    output::note(&format!("1. Edit {} to taste", path.display()));
    output::note(&format!(
        "2. Run: calmprice config validate -c {}",
        path.display()
    ));
    output::note("3. Run: calmprice coins");
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(config: &Config) -> Result<()> {
    if output::is_json() {
        output::json_output(serde_json::to_value(config)?);
        return Ok(());
    }

    output::section("Upstream");
    output::field("Base URL", &config.upstream.base_url);
    output::field("Currency", &config.upstream.vs_currency);
    output::field("Top N", config.upstream.top_n);
    output::field("Timeout", format!("{}s", config.upstream.timeout_secs));

    output::section("Queue");
    output::field("Min delay", format!("{}ms", config.queue.min_delay_ms));

    output::section("Cache");
    output::field("Backend", config.cache.backend.as_str());
    if config.cache.backend == CacheBackend::Sqlite {
        output::field("Path", config.cache.resolved_path().display());
    }
    output::field("Freshness", format!("{}s", config.cache.freshness_secs));

    output::section("Trend");
    output::field("Period", config.trend.period);
    output::field("Seed", format!("{:?}", config.trend.seed));
    output::field("Default days", config.history.default_days);

    output::section("Logging");
    output::field("Level", &config.logging.level);
    output::field("Format", &config.logging.format);

    Ok(())
}

/// Execute `config validate`.
pub fn execute_validate(path: &Path) -> Result<()> {
    output::section("Config Validation");
    output::field("Path", path.display());

    Config::load(path)?;
    output::success("Config file is valid");
    output::hint(&format!(
        "run {} to see effective values",
        output::highlight(format!("calmprice config show -c {}", path.display()))
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn template_is_valid_config_with_defaults() {
        let config = Config::parse_toml(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn init_writes_template_and_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        execute_init(&path, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), CONFIG_TEMPLATE);

        assert!(matches!(
            execute_init(&path, false),
            Err(Error::Config(ConfigError::InvalidValue { field: "config", .. }))
        ));
        execute_init(&path, true).unwrap();
    }

    #[test]
    fn validate_reports_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[upstream]\ntop_n = 0\n").unwrap();
        assert!(execute_validate(&path).is_err());

        fs::write(&path, "[upstream]\ntop_n = 5\n").unwrap();
        assert!(execute_validate(&path).is_ok());
    }
}
