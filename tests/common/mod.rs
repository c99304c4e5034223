#![allow(dead_code)]

use chrono::NaiveDate;
use spikescan::domain::bar::PriceBar;
use spikescan::domain::error::ScanError;
use spikescan::domain::scan::ScanConfig;
use spikescan::domain::target::TargetObservation;
use spikescan::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub bars: HashMap<String, Vec<PriceBar>>,
    pub targets: HashMap<String, Vec<TargetObservation>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            bars: HashMap::new(),
            targets: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.bars.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_targets(mut self, symbol: &str, targets: Vec<TargetObservation>) -> Self {
        self.targets.insert(symbol.to_string(), targets);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<PriceBar>, ScanError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(ScanError::Data {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.bars.get(symbol).cloned().unwrap_or_default())
    }

    fn fetch_targets(&self, symbol: &str) -> Result<Vec<TargetObservation>, ScanError> {
        Ok(self.targets.get(symbol).cloned().unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, ScanError> {
        let mut symbols: Vec<String> = self.bars.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, ScanError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(ScanError::Data {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        match self.bars.get(symbol) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(symbol: &str, date: NaiveDate, close: f64, volume: i64) -> PriceBar {
    PriceBar {
        symbol: symbol.to_string(),
        date,
        open: close,
        high: close * 1.02,
        low: close * 0.98,
        close,
        volume,
    }
}

pub fn make_target(date: NaiveDate, price_target: f64) -> TargetObservation {
    TargetObservation {
        published: date,
        price_target,
    }
}

/// Consecutive daily bars at a flat close and volume.
pub fn quiet_bars(symbol: &str, start: NaiveDate, count: usize, close: f64, volume: i64) -> Vec<PriceBar> {
    (0..count)
        .map(|i| make_bar(symbol, start + chrono::Duration::days(i as i64), close, volume))
        .collect()
}

/// 30 quiet bars, a 2x volume spike on day 31, then two forward bars.
pub fn spike_series(symbol: &str) -> Vec<PriceBar> {
    let start = date(2024, 1, 1);
    let mut bars = quiet_bars(symbol, start, 30, 10.0, 1000);
    bars.push(make_bar(symbol, date(2024, 1, 31), 10.0, 2000));
    bars.push(make_bar(symbol, date(2024, 2, 1), 11.0, 1100));
    bars.push(make_bar(symbol, date(2024, 2, 2), 10.5, 1000));
    bars
}

pub fn test_config() -> ScanConfig {
    ScanConfig {
        volume_window: 30,
        spike_ratio: 1.5,
        min_avg_volume: 500.0,
        upside_threshold: 20.0,
        holding_period: 15,
        win_threshold: 5.0,
    }
}
