//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{BotConfig, HeraldConfig, LogOutput, LoggingConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &HeraldConfig) -> ConfigResult<()> {
    validate_bot_config(&config.bot)?;
    validate_logging_config(&config.logging)?;
    validate_adapter_keys(config)?;
    Ok(())
}

fn validate_bot_config(bot: &BotConfig) -> ConfigResult<()> {
    if bot.name.is_empty() {
        return Err(ConfigError::missing_field("bot.name"));
    }

    if bot.name.chars().any(char::is_whitespace) {
        return Err(ConfigError::validation(format!(
            "Bot name cannot contain whitespace: {:?}",
            bot.name
        )));
    }

    let name = bot.name.strip_prefix('@').unwrap_or(&bot.name);
    if name.is_empty() {
        return Err(ConfigError::validation("Bot name cannot be just '@'"));
    }

    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File {
        match &logging.file_path {
            None => return Err(ConfigError::missing_field("logging.file_path")),
            Some(path) if path.file_name().is_none() => {
                return Err(ConfigError::validation(format!(
                    "Log file path has no file name: {}",
                    path.display()
                )));
            }
            Some(_) => {}
        }
    }

    if logging.max_files == 0 {
        return Err(ConfigError::validation(
            "logging.max_files must be greater than 0",
        ));
    }

    for module in logging.filters.keys() {
        if module.is_empty() || module.contains(char::is_whitespace) {
            return Err(ConfigError::validation(format!(
                "Invalid log filter target: {module:?}"
            )));
        }
    }

    Ok(())
}

fn validate_adapter_keys(config: &HeraldConfig) -> ConfigResult<()> {
    for key in config.adapters.keys() {
        if key.is_empty() {
            return Err(ConfigError::validation("Adapter section name cannot be empty"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogLevel;
    use std::path::PathBuf;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&HeraldConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_bot_name() {
        let mut config = HeraldConfig::default();
        config.bot.name = String::new();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::MissingField { .. })
        ));

        config.bot.name = "my bot".into();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError { .. })
        ));

        config.bot.name = "@".into();
        assert!(validate_config(&config).is_err());

        config.bot.name = "@herald".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_file_output_requires_path() {
        let mut config = HeraldConfig::default();
        config.logging.output = LogOutput::File;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::MissingField { field }) if field == "logging.file_path"
        ));

        config.logging.file_path = Some(PathBuf::from("logs/herald.log"));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_max_files() {
        let mut config = HeraldConfig::default();
        config.logging.max_files = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_filter_targets() {
        let mut config = HeraldConfig::default();
        config
            .logging
            .filters
            .insert("herald framework".into(), LogLevel::Debug);
        assert!(validate_config(&config).is_err());
    }
}
