//! CSV report adapter implementing ReportPort.
//!
//! One row per signal, chronological order, ratio and percentage columns
//! rounded to two decimals.

use crate::domain::error::ScanError;
use crate::domain::signal::Signal;
use crate::domain::summary::Summary;
use crate::ports::report_port::ReportPort;
use std::path::Path;

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn csv_error(e: csv::Error) -> ScanError {
    ScanError::Io(std::io::Error::other(e))
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        signals: &[Signal],
        _summary: &Summary,
        output_path: &Path,
    ) -> Result<(), ScanError> {
        let mut wtr = csv::Writer::from_path(output_path).map_err(csv_error)?;

        wtr.write_record([
            "symbol",
            "date",
            "entry_price",
            "volume_ratio",
            "target_price",
            "upside_pct",
            "max_price",
            "max_gain_pct",
            "exit_price",
            "final_return_pct",
            "days_observed",
        ])
        .map_err(csv_error)?;

        for s in signals {
            let row = [
                s.symbol.clone(),
                s.date.format("%Y-%m-%d").to_string(),
                format!("{}", s.entry_price),
                format!("{:.2}", s.volume_ratio),
                format!("{}", s.target_price),
                format!("{:.2}", s.upside_pct),
                format!("{}", s.max_price),
                format!("{:.2}", s.max_gain_pct),
                format!("{}", s.exit_price),
                format!("{:.2}", s.final_return_pct),
                s.days_observed.to_string(),
            ];
            wtr.write_record(&row).map_err(csv_error)?;
        }

        wtr.flush()?;
        Ok(())
    }
}
