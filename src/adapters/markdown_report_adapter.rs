//! Markdown report adapter implementing ReportPort.
//!
//! A summary section followed by a signal table, suitable for pasting into
//! an email body or a notes file.

use crate::domain::error::ScanError;
use crate::domain::signal::Signal;
use crate::domain::summary::Summary;
use crate::ports::report_port::ReportPort;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

pub struct MarkdownReportAdapter;

impl MarkdownReportAdapter {
    pub fn new() -> Self {
        Self
    }

    fn percent(value: Option<f64>) -> String {
        match value {
            Some(v) => format!("{:.2}%", v),
            None => "n/a".to_string(),
        }
    }
}

impl Default for MarkdownReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for MarkdownReportAdapter {
    fn write(
        &self,
        signals: &[Signal],
        summary: &Summary,
        output_path: &Path,
    ) -> Result<(), ScanError> {
        let mut out = String::new();

        out.push_str("# Spike scan backtest\n\n## Summary\n\n");
        let _ = writeln!(out, "- Signals: {}", summary.count);
        let _ = writeln!(out, "- Average max gain: {}", Self::percent(summary.avg_max_gain));
        let _ = writeln!(
            out,
            "- Average final return: {}",
            Self::percent(summary.avg_final_return)
        );
        let _ = writeln!(out, "- Win rate: {}", Self::percent(summary.win_rate));

        if !signals.is_empty() {
            out.push_str(
                "\n## Signals\n\n\
                 | Symbol | Date | Entry | Ratio | Target | Upside % | Max Gain % | Final Return % | Days |\n\
                 |--------|------|-------|-------|--------|----------|------------|----------------|------|\n",
            );
            for s in signals {
                let _ = writeln!(
                    out,
                    "| {} | {} | {} | {:.2} | {} | {:.2} | {:.2} | {:.2} | {} |",
                    s.symbol,
                    s.date.format("%Y-%m-%d"),
                    s.entry_price,
                    s.volume_ratio,
                    s.target_price,
                    s.upside_pct,
                    s.max_gain_pct,
                    s.final_return_pct,
                    s.days_observed,
                );
            }
        }

        fs::write(output_path, out)?;
        Ok(())
    }
}
