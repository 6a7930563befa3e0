use crate::domain::errors::AppResult;
use crate::domain::market_data::PricePoint;

/// Source of the raw (unfiltered) price table
pub trait PriceRepository {
    /// Load every record the source holds
    fn load_prices(&self) -> AppResult<Vec<PricePoint>>;

    /// Human readable origin, used in logs
    fn source_name(&self) -> &str;
}
