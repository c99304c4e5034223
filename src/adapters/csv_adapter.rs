//! CSV file data adapter.
//!
//! Layout: one `{SYMBOL}.csv` per symbol with columns
//! `date,open,high,low,close,volume`, and an optional
//! `{SYMBOL}_targets.csv` with columns `published_date,price_target`.
//! Published dates may carry a time component; it is truncated to the
//! calendar day.

use crate::domain::bar::PriceBar;
use crate::domain::error::ScanError;
use crate::domain::target::TargetObservation;
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::PathBuf;

const TARGETS_SUFFIX: &str = "_targets.csv";

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn bars_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn targets_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}{}", symbol, TARGETS_SUFFIX))
    }

    /// Parse `YYYY-MM-DD`, or an ISO datetime truncated to its day.
    fn parse_day(value: &str) -> Option<NaiveDate> {
        let value = value.trim().trim_end_matches('Z');
        if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            return Some(date);
        }
        for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
                return Some(dt.date());
            }
        }
        None
    }

    fn data_error(symbol: &str, reason: String) -> ScanError {
        ScanError::Data {
            symbol: symbol.to_string(),
            reason,
        }
    }

    fn field<'a>(
        record: &'a csv::StringRecord,
        idx: usize,
        name: &str,
        symbol: &str,
    ) -> Result<&'a str, ScanError> {
        record
            .get(idx)
            .ok_or_else(|| Self::data_error(symbol, format!("missing {} column", name)))
    }

    fn parse_price(value: &str, name: &str, symbol: &str) -> Result<f64, ScanError> {
        value
            .trim()
            .parse()
            .map_err(|e| Self::data_error(symbol, format!("invalid {} value: {}", name, e)))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<PriceBar>, ScanError> {
        let path = self.bars_path(symbol);
        let content = fs::read_to_string(&path).map_err(|_| ScanError::NoData {
            symbol: symbol.to_string(),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record =
                result.map_err(|e| Self::data_error(symbol, format!("CSV parse error: {}", e)))?;

            let date_str = Self::field(&record, 0, "date", symbol)?;
            let date = Self::parse_day(date_str).ok_or_else(|| {
                Self::data_error(symbol, format!("invalid date format: {}", date_str))
            })?;

            let open = Self::parse_price(Self::field(&record, 1, "open", symbol)?, "open", symbol)?;
            let high = Self::parse_price(Self::field(&record, 2, "high", symbol)?, "high", symbol)?;
            let low = Self::parse_price(Self::field(&record, 3, "low", symbol)?, "low", symbol)?;
            let close =
                Self::parse_price(Self::field(&record, 4, "close", symbol)?, "close", symbol)?;

            let volume: i64 = Self::field(&record, 5, "volume", symbol)?
                .trim()
                .parse()
                .map_err(|e| Self::data_error(symbol, format!("invalid volume value: {}", e)))?;

            bars.push(PriceBar {
                symbol: symbol.to_string(),
                date,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        Ok(bars)
    }

    fn fetch_targets(&self, symbol: &str) -> Result<Vec<TargetObservation>, ScanError> {
        let path = self.targets_path(symbol);
        // no analyst coverage is a normal state, not an error
        let Ok(content) = fs::read_to_string(&path) else {
            return Ok(Vec::new());
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut targets = Vec::new();

        for result in rdr.records() {
            let record =
                result.map_err(|e| Self::data_error(symbol, format!("CSV parse error: {}", e)))?;

            let date_str = Self::field(&record, 0, "published_date", symbol)?;
            let published = Self::parse_day(date_str).ok_or_else(|| {
                Self::data_error(symbol, format!("invalid published_date: {}", date_str))
            })?;

            let price_target = Self::parse_price(
                Self::field(&record, 1, "price_target", symbol)?,
                "price_target",
                symbol,
            )?;

            targets.push(TargetObservation {
                published,
                price_target,
            });
        }

        Ok(targets)
    }

    fn list_symbols(&self) -> Result<Vec<String>, ScanError> {
        let entries = fs::read_dir(&self.base_path)?;
        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if name_str.ends_with(TARGETS_SUFFIX) || !name_str.ends_with(".csv") {
                continue;
            }
            symbols.push(name_str[..name_str.len() - ".csv".len()].to_string());
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, ScanError> {
        let bars = match self.fetch_bars(symbol) {
            Ok(bars) => bars,
            Err(ScanError::NoData { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        if bars.is_empty() {
            return Ok(None);
        }

        let mut min = bars[0].date;
        let mut max = bars[0].date;
        for bar in &bars[1..] {
            if bar.date < min {
                min = bar.date;
            }
            if bar.date > max {
                max = bar.date;
            }
        }
        Ok(Some((min, max, bars.len())))
    }
}
