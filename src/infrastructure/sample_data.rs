use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::{
    errors::{AppError, AppResult},
    logging::{LogComponent, get_logger},
    market_data::{Price, PricePoint, PriceRepository, Symbol},
};

/// Monthly closes for MSFT, AMZN, IBM, GOOG and AAPL, 2003-2010
pub const STOCKS_CSV: &str = include_str!("../../assets/stocks.csv");

/// Date layout of the `date` column, e.g. `Jan 1 2004`
pub const STOCKS_DATE_FORMAT: &str = "%b %d %Y";

#[derive(Debug, Deserialize)]
struct StockRow {
    symbol: String,
    date: String,
    price: f64,
}

impl StockRow {
    fn into_point(self, line: usize) -> AppResult<PricePoint> {
        let date = NaiveDate::parse_from_str(self.date.trim(), STOCKS_DATE_FORMAT)
            .map_err(|e| AppError::Data(format!("line {}: bad date '{}': {}", line, self.date, e)))?;
        if !self.price.is_finite() {
            return Err(AppError::Data(format!("line {}: price is not finite", line)));
        }
        let symbol = Symbol::new(&self.symbol).map_err(|e| AppError::Data(format!("line {}: {}", line, e)))?;
        Ok(PricePoint::new(date, symbol, Price::from(self.price)))
    }
}

/// Parse a `symbol,date,price` table
pub fn parse_stocks_csv(text: &str) -> AppResult<Vec<PricePoint>> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_reader(text.as_bytes());

    reader
        .deserialize::<StockRow>()
        .enumerate()
        .map(|(idx, row)| {
            // header is line 1
            let line = idx + 2;
            row.map_err(|e| AppError::Data(format!("line {}: {}", line, e)))?.into_point(line)
        })
        .collect()
}

/// Repository over the dataset compiled into the binary
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedStocksRepository {
    csv: &'static str,
}

impl Default for EmbeddedStocksRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddedStocksRepository {
    pub fn new() -> Self {
        Self { csv: STOCKS_CSV }
    }
}

impl PriceRepository for EmbeddedStocksRepository {
    fn load_prices(&self) -> AppResult<Vec<PricePoint>> {
        let points = parse_stocks_csv(self.csv)?;
        get_logger().debug(
            LogComponent::Infrastructure("EmbeddedStocks"),
            &format!("Parsed {} embedded rows", points.len()),
        );
        Ok(points)
    }

    fn source_name(&self) -> &str {
        "embedded stocks.csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_non_padded_days() {
        let points = parse_stocks_csv("symbol,date,price\nGOOG,Mar 1 2008,440.47\n").unwrap();
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2008, 3, 1).unwrap());
        assert_eq!(points[0].symbol.value(), "GOOG");
    }

    #[test]
    fn reports_the_failing_line() {
        let err = parse_stocks_csv("symbol,date,price\nIBM,Jan 1 2004,80\nIBM,someday,81\n").unwrap_err();
        assert!(matches!(&err, AppError::Data(msg) if msg.starts_with("line 3")));
    }
}
