//! Symbol universe handling for multi-symbol scans.
//!
//! The universe comes either from a comma-separated config value or from a
//! CSV file with a `Symbol` column. Each symbol is then checked against the
//! data source; symbols that cannot possibly emit a signal are skipped up
//! front with a warning so the batch keeps going.

use crate::domain::error::ScanError;
use crate::ports::data_port::DataPort;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
}

/// Parse a comma-separated symbol list: trimmed, uppercased, no empties,
/// no duplicates.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if seen.contains(&symbol) {
            return Err(UniverseError::DuplicateSymbol(symbol));
        }
        seen.insert(symbol.clone());
        symbols.push(symbol);
    }

    Ok(symbols)
}

/// Load the universe from a CSV file with a `Symbol` column (matched
/// case-insensitively). Repeated symbols are kept once, in first-seen
/// order.
pub fn load_symbols_csv(path: &Path) -> Result<Vec<String>, ScanError> {
    let file_error = |reason: String| ScanError::ConfigInvalid {
        section: "scan".to_string(),
        key: "symbols_file".to_string(),
        reason,
    };

    let mut rdr = csv::Reader::from_path(path)
        .map_err(|e| file_error(format!("failed to open {}: {}", path.display(), e)))?;

    let headers = rdr
        .headers()
        .map_err(|e| file_error(format!("failed to read header: {}", e)))?;
    let column = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case("symbol"))
        .ok_or_else(|| file_error(format!("no Symbol column in {}", path.display())))?;

    let mut symbols = Vec::new();
    let mut seen = HashSet::new();
    for result in rdr.records() {
        let record = result.map_err(|e| file_error(format!("CSV parse error: {}", e)))?;
        let Some(value) = record.get(column) else {
            continue;
        };
        let symbol = value.trim().to_uppercase();
        if symbol.is_empty() || seen.contains(&symbol) {
            continue;
        }
        seen.insert(symbol.clone());
        symbols.push(symbol);
    }

    Ok(symbols)
}

#[derive(Debug, Clone)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub enum SkipReason {
    NoData,
    InsufficientBars { bars: usize },
}

#[derive(Debug)]
pub struct UniverseValidation {
    pub symbols: Vec<String>,
    pub skipped: Vec<SkippedSymbol>,
}

/// Check each symbol against the data source, keeping those with at least
/// `min_bars` bars. Fetch failures and thin histories are warnings, not
/// batch failures; an entirely unusable universe is an error.
pub fn validate_universe(
    data_port: &dyn DataPort,
    symbols: Vec<String>,
    min_bars: usize,
) -> Result<UniverseValidation, ScanError> {
    let mut valid = Vec::new();
    let mut skipped = Vec::new();

    for symbol in symbols {
        let range = match data_port.get_data_range(&symbol) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Warning: skipping {} ({})", symbol, e);
                skipped.push(SkippedSymbol {
                    symbol,
                    reason: SkipReason::NoData,
                });
                continue;
            }
        };

        match range {
            None => {
                eprintln!("Warning: skipping {} (no data found)", symbol);
                skipped.push(SkippedSymbol {
                    symbol,
                    reason: SkipReason::NoData,
                });
            }
            Some((_, _, bars)) if bars < min_bars => {
                eprintln!(
                    "Warning: skipping {} (only {} bars, minimum {} required)",
                    symbol, bars, min_bars
                );
                skipped.push(SkippedSymbol {
                    symbol,
                    reason: SkipReason::InsufficientBars { bars },
                });
            }
            Some((_, _, bars)) => {
                eprintln!("  {}: {} bars [OK]", symbol, bars);
                valid.push(symbol);
            }
        }
    }

    if valid.is_empty() {
        return Err(ScanError::EmptyUniverse {
            skipped: skipped.len(),
        });
    }

    Ok(UniverseValidation {
        symbols: valid,
        skipped,
    })
}
