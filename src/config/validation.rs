use crate::config::types::{Config, HttpConfig, OutputConfig, ScannerConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scanner_config(&config.scanner)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;

    if config.input.seeds_file.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "seeds_file cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates session and pool sizing
fn validate_scanner_config(config: &ScannerConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 is always true for u32, so no check needed

    if config.workers_per_session < 1 || config.workers_per_session > 100 {
        return Err(ConfigError::Validation(format!(
            "workers_per_session must be between 1 and 100, got {}",
            config.workers_per_session
        )));
    }

    if config.concurrent_sessions < 1 || config.concurrent_sessions > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrent_sessions must be between 1 and 100, got {}",
            config.concurrent_sessions
        )));
    }

    if config.seed_wait_secs < 1 {
        return Err(ConfigError::Validation(
            "seed_wait_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates the request header profile
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    // Header values must be visible ASCII (plus spaces and tabs)
    for (name, value) in [
        ("user_agent", &config.user_agent),
        ("accept", &config.accept),
        ("accept_language", &config.accept_language),
    ] {
        if !value
            .bytes()
            .all(|b| b == b'\t' || (0x20..0x7f).contains(&b))
        {
            return Err(ConfigError::Validation(format!(
                "{} contains characters not allowed in an HTTP header",
                name
            )));
        }
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates outcome table settings
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.reached_file.is_empty() {
        return Err(ConfigError::Validation(
            "reached_file cannot be empty".to_string(),
        ));
    }

    if config.broken_file.is_empty() {
        return Err(ConfigError::Validation(
            "broken_file cannot be empty".to_string(),
        ));
    }

    if config.reached_file == config.broken_file {
        return Err(ConfigError::Validation(format!(
            "reached_file and broken_file must differ, both are '{}'",
            config.reached_file
        )));
    }

    if config.channel_capacity < 1 {
        return Err(ConfigError::Validation(
            "channel_capacity must be >= 1".to_string(),
        ));
    }

    Ok(())
}
