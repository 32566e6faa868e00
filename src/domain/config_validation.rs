//! Configuration validation.
//!
//! Validates all config fields before a rebalance runs. The typed readers here
//! are shared with the CLI so a value that fails validation never falls back
//! to a default.

use crate::domain::error::CountertrendError;
use crate::domain::rebalance::{DEFAULT_LOOKBACK_DAYS, DEFAULT_TOP_N};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_rebalance_config(config: &dyn ConfigPort) -> Result<(), CountertrendError> {
    validate_data_path(config)?;
    validate_session_date(config)?;
    read_count(config, "rebalance", "top_n", DEFAULT_TOP_N)?;
    read_count(config, "rebalance", "lookback_days", DEFAULT_LOOKBACK_DAYS)?;
    validate_target_weight(config)?;
    read_flag(config, "output", "include_holds", true)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> CountertrendError {
    CountertrendError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_data_path(config: &dyn ConfigPort) -> Result<(), CountertrendError> {
    match config.get_string("data", "base_path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(CountertrendError::ConfigMissing {
            section: "data".to_string(),
            key: "base_path".to_string(),
        }),
    }
}

fn validate_session_date(config: &dyn ConfigPort) -> Result<(), CountertrendError> {
    parse_session_date(config.get_string("rebalance", "session_date").as_deref()).map(|_| ())
}

pub fn parse_session_date(value: Option<&str>) -> Result<NaiveDate, CountertrendError> {
    match value {
        None => Err(CountertrendError::ConfigMissing {
            section: "rebalance".to_string(),
            key: "session_date".to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            invalid(
                "rebalance",
                "session_date",
                "invalid session_date format, expected YYYY-MM-DD",
            )
        }),
    }
}

/// Boolean spellings accepted in config files.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Read a count that must be an integer >= 1, or `default` when absent.
pub fn read_count(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, CountertrendError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(default);
    };
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 1 => usize::try_from(n)
            .map_err(|_| invalid(section, key, &format!("{key} is too large: {n}"))),
        Ok(_) => Err(invalid(section, key, &format!("{key} must be at least 1"))),
        Err(_) => Err(invalid(
            section,
            key,
            &format!("{key} must be an integer, got '{raw}'"),
        )),
    }
}

/// Read a boolean flag, or `default` when absent.
pub fn read_flag(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: bool,
) -> Result<bool, CountertrendError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => parse_flag(&raw).ok_or_else(|| {
            invalid(
                section,
                key,
                &format!("{key} must be true/false, yes/no, on/off or 1/0, got '{raw}'"),
            )
        }),
    }
}

fn validate_target_weight(config: &dyn ConfigPort) -> Result<(), CountertrendError> {
    if config.get_string("rebalance", "target_weight").is_none() {
        return Ok(());
    }
    let value = config.get_double("rebalance", "target_weight", f64::NAN);
    if !(value > 0.0 && value <= 1.0) {
        return Err(invalid(
            "rebalance",
            "target_weight",
            "target_weight must be between 0 and 1",
        ));
    }
    Ok(())
}
