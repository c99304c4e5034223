//! Data access port trait.

use crate::domain::bar::PriceBar;
use crate::domain::error::ScanError;
use crate::domain::target::TargetObservation;
use chrono::NaiveDate;

/// Source of per-symbol market data. Implementations return whatever they
/// have, in any order; normalization happens in the domain.
pub trait DataPort {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<PriceBar>, ScanError>;

    /// Target history for a symbol. A symbol without analyst coverage
    /// returns an empty vector, not an error.
    fn fetch_targets(&self, symbol: &str) -> Result<Vec<TargetObservation>, ScanError>;

    fn list_symbols(&self) -> Result<Vec<String>, ScanError>;

    /// (first date, last date, bar count) for a symbol, or `None` when the
    /// symbol has no bars.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, ScanError>;
}
