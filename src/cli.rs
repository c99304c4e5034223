//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::markdown_report_adapter::MarkdownReportAdapter;
use crate::domain::config_validation::validate_scan_config;
use crate::domain::error::ScanError;
use crate::domain::scan::{backtest_symbol, ScanConfig};
use crate::domain::signal::{sort_chronological, Signal};
use crate::domain::summary::Summary;
use crate::domain::universe::{load_symbols_csv, parse_symbols, validate_universe};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "spikescan", about = "Volume-spike / analyst-upside signal backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the signal backtest over the configured universe
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Report path; a .md extension selects the markdown report
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Backtest a single symbol instead of the configured universe
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for symbol(s)
    Info {
        #[arg(long)]
        symbol: Option<String>,
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            output,
            symbol,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config, symbol.as_deref())
            } else {
                run_backtest(&config, output.as_deref(), symbol.as_deref())
            }
        }
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Info { symbol, config } => run_info(symbol.as_deref(), &config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

/// Assemble a `ScanConfig` from `[scan]`, falling back to the documented
/// defaults for absent keys. Call after `validate_scan_config`.
pub fn build_scan_config(adapter: &dyn ConfigPort) -> ScanConfig {
    let defaults = ScanConfig::default();
    ScanConfig {
        volume_window: adapter.get_int("scan", "volume_window", defaults.volume_window as i64)
            as usize,
        spike_ratio: adapter.get_double("scan", "spike_ratio", defaults.spike_ratio),
        min_avg_volume: adapter.get_double("scan", "min_avg_volume", defaults.min_avg_volume),
        upside_threshold: adapter.get_double("scan", "upside_threshold", defaults.upside_threshold),
        holding_period: adapter.get_int("scan", "holding_period", defaults.holding_period as i64)
            as usize,
        win_threshold: adapter.get_double("scan", "win_threshold", defaults.win_threshold),
    }
}

/// Universe resolution order: `--symbol` override, then `[scan] symbols`,
/// then `[scan] symbols_file`.
pub fn resolve_symbols(
    symbol_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Vec<String>, ScanError> {
    if let Some(symbol) = symbol_override {
        return Ok(vec![symbol.trim().to_uppercase()]);
    }

    if let Some(list) = config
        .get_string("scan", "symbols")
        .filter(|s| !s.trim().is_empty())
    {
        return parse_symbols(&list).map_err(|e| ScanError::ConfigInvalid {
            section: "scan".to_string(),
            key: "symbols".to_string(),
            reason: e.to_string(),
        });
    }

    if let Some(file) = config
        .get_string("scan", "symbols_file")
        .filter(|s| !s.trim().is_empty())
    {
        return load_symbols_csv(Path::new(&file));
    }

    Err(ScanError::ConfigMissing {
        section: "scan".to_string(),
        key: "symbols".to_string(),
    })
}

fn data_adapter(config: &dyn ConfigPort) -> Result<CsvAdapter, ScanError> {
    let path = config
        .get_string("data", "path")
        .ok_or_else(|| ScanError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        })?;
    Ok(CsvAdapter::new(PathBuf::from(path)))
}

fn fmt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v),
        None => "n/a".to_string(),
    }
}

fn run_backtest(
    config_path: &Path,
    output_path: Option<&Path>,
    symbol_override: Option<&str>,
) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_scan_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let scan_config = build_scan_config(&adapter);

    // Stage 2: Resolve universe
    let symbols = match resolve_symbols(symbol_override, &adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_port = match data_adapter(&adapter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 3: Validate universe against available data
    eprintln!("Validating {} symbols...", symbols.len());
    let validation =
        match validate_universe(&data_port, symbols, scan_config.min_usable_bars()) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

    // Stage 4: Per-symbol backtest; one bad symbol never aborts the batch
    eprintln!(
        "Running backtest: {} symbols, window {}, ratio {}x, upside {}%",
        validation.symbols.len(),
        scan_config.volume_window,
        scan_config.spike_ratio,
        scan_config.upside_threshold,
    );

    let mut all_signals: Vec<Signal> = Vec::new();
    for symbol in &validation.symbols {
        let bars = match data_port.fetch_bars(symbol) {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("warning: skipping {} ({})", symbol, e);
                continue;
            }
        };
        let targets = match data_port.fetch_targets(symbol) {
            Ok(targets) => targets,
            Err(e) => {
                eprintln!("warning: skipping {} ({})", symbol, e);
                continue;
            }
        };

        match backtest_symbol(symbol, bars, targets, &scan_config) {
            Ok(signals) => {
                if !signals.is_empty() {
                    eprintln!("  {}: {} signals", symbol, signals.len());
                }
                all_signals.extend(signals);
            }
            Err(e) => {
                eprintln!("warning: skipping {} ({})", symbol, e);
            }
        }
    }

    // Stage 5: Aggregate and report
    sort_chronological(&mut all_signals);
    let summary = Summary::compute(&all_signals, scan_config.win_threshold);

    eprintln!("\n=== Performance Summary ===");
    eprintln!("Total Signals:     {}", summary.count);
    eprintln!("Avg Max Gain:      {}", fmt_pct(summary.avg_max_gain));
    eprintln!("Avg Final Return:  {}", fmt_pct(summary.avg_final_return));
    eprintln!(
        "Win Rate (>{}%):   {}",
        scan_config.win_threshold,
        fmt_pct(summary.win_rate)
    );

    let output = output_path.map(Path::to_path_buf).unwrap_or_else(|| {
        adapter
            .get_string("report", "output")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("backtest_results.csv"))
    });

    let report: Box<dyn ReportPort> = match output.extension().and_then(|e| e.to_str()) {
        Some("md") => Box::new(MarkdownReportAdapter::new()),
        _ => Box::new(CsvReportAdapter::new()),
    };

    match report.write(&all_signals, &summary, &output) {
        Ok(()) => {
            eprintln!("\nResults written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to write report: {e}");
            (&e).into()
        }
    }
}

fn run_dry_run(config_path: &Path, symbol_override: Option<&str>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_scan_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("Config validated successfully");

    let scan_config = build_scan_config(&adapter);
    eprintln!("\nScan parameters:");
    eprintln!("  volume_window:    {}", scan_config.volume_window);
    eprintln!("  spike_ratio:      {}x", scan_config.spike_ratio);
    eprintln!("  min_avg_volume:   {}", scan_config.min_avg_volume);
    eprintln!("  upside_threshold: {}%", scan_config.upside_threshold);
    eprintln!("  holding_period:   {} days", scan_config.holding_period);
    eprintln!("  win_threshold:    {}%", scan_config.win_threshold);

    match resolve_symbols(symbol_override, &adapter) {
        Ok(symbols) => {
            eprintln!("\nUniverse: {} symbols", symbols.len());
            eprintln!("  {}", symbols.join(", "));
        }
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let data_port = match data_adapter(&adapter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let symbols = match data_port.list_symbols() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}

fn run_info(symbol_override: Option<&str>, config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let data_port = match data_adapter(&adapter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let symbols = match resolve_symbols(symbol_override, &adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    for symbol in &symbols {
        match data_port.get_data_range(symbol) {
            Ok(Some((min_date, max_date, count))) => {
                println!("{}: {} bars, {} to {}", symbol, count, min_date, max_date);
            }
            Ok(None) => {
                eprintln!("{}: no data found", symbol);
            }
            Err(e) => {
                eprintln!("error querying {}: {}", symbol, e);
            }
        }
    }
    ExitCode::SUCCESS
}
