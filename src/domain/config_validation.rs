//! Configuration validation.
//!
//! Checks every scan parameter before a run so a bad value fails fast with
//! the section and key named, instead of surfacing mid-backtest.

use crate::domain::error::ScanError;
use crate::ports::config_port::ConfigPort;

pub fn validate_scan_config(config: &dyn ConfigPort) -> Result<(), ScanError> {
    validate_data_path(config)?;
    validate_volume_window(config)?;
    validate_spike_ratio(config)?;
    validate_min_avg_volume(config)?;
    validate_upside_threshold(config)?;
    validate_holding_period(config)?;
    validate_win_threshold(config)?;
    validate_symbols(config)?;
    Ok(())
}

fn invalid(key: &str, reason: &str) -> ScanError {
    ScanError::ConfigInvalid {
        section: "scan".to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_data_path(config: &dyn ConfigPort) -> Result<(), ScanError> {
    match config.get_string("data", "path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(ScanError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        }),
    }
}

fn validate_volume_window(config: &dyn ConfigPort) -> Result<(), ScanError> {
    let value = config.get_int("scan", "volume_window", 30);
    if value < 1 {
        return Err(invalid("volume_window", "volume_window must be at least 1"));
    }
    Ok(())
}

fn validate_spike_ratio(config: &dyn ConfigPort) -> Result<(), ScanError> {
    let value = config.get_double("scan", "spike_ratio", 1.5);
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid("spike_ratio", "spike_ratio must be positive"));
    }
    Ok(())
}

fn validate_min_avg_volume(config: &dyn ConfigPort) -> Result<(), ScanError> {
    let value = config.get_double("scan", "min_avg_volume", 50_000.0);
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(
            "min_avg_volume",
            "min_avg_volume must be non-negative",
        ));
    }
    Ok(())
}

fn validate_upside_threshold(config: &dyn ConfigPort) -> Result<(), ScanError> {
    let value = config.get_double("scan", "upside_threshold", 20.0);
    if !value.is_finite() {
        return Err(invalid("upside_threshold", "upside_threshold must be finite"));
    }
    Ok(())
}

fn validate_holding_period(config: &dyn ConfigPort) -> Result<(), ScanError> {
    let value = config.get_int("scan", "holding_period", 15);
    if value < 1 {
        return Err(invalid("holding_period", "holding_period must be at least 1"));
    }
    Ok(())
}

fn validate_win_threshold(config: &dyn ConfigPort) -> Result<(), ScanError> {
    let value = config.get_double("scan", "win_threshold", 5.0);
    if !value.is_finite() {
        return Err(invalid("win_threshold", "win_threshold must be finite"));
    }
    Ok(())
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(), ScanError> {
    let symbols = config.get_string("scan", "symbols");
    let symbols_file = config.get_string("scan", "symbols_file");

    match (symbols, symbols_file) {
        (Some(s), _) if !s.trim().is_empty() => Ok(()),
        (_, Some(f)) if !f.trim().is_empty() => Ok(()),
        _ => Err(ScanError::ConfigMissing {
            section: "scan".to_string(),
            key: "symbols".to_string(),
        }),
    }
}
