pub use super::value_objects::{DatasetFingerprint, Price, Symbol};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::time_utils::{date_to_millis, format_tooltip_date};

/// Domain entity - one observation of the price table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub symbol: Symbol,
    pub price: Price,
}

impl PricePoint {
    pub fn new(date: NaiveDate, symbol: Symbol, price: Price) -> Self {
        Self { date, symbol, price }
    }

    pub fn timestamp_ms(&self) -> f64 {
        date_to_millis(self.date)
    }
}

/// Anything a tooltip can read named fields from.
pub trait FieldSource {
    fn field_text(&self, field: &str) -> Option<String>;
}

impl FieldSource for PricePoint {
    fn field_text(&self, field: &str) -> Option<String> {
        match field {
            "date" => Some(format_tooltip_date(self.date)),
            "symbol" => Some(self.symbol.to_string()),
            "price" => Some(format!("{:.2}", self.price.value())),
            _ => None,
        }
    }
}

/// Read-only queries over a slice of price points.
#[derive(Debug, Clone, Copy)]
pub struct PriceTable<'a> {
    points: &'a [PricePoint],
}

impl<'a> PriceTable<'a> {
    pub fn new(points: &'a [PricePoint]) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &'a [PricePoint] {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Symbols in order of first appearance
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = Vec::new();
        for point in self.points {
            if !symbols.contains(&point.symbol) {
                symbols.push(point.symbol.clone());
            }
        }
        symbols
    }

    /// Points of one symbol sorted by date
    pub fn series(&self, symbol: &Symbol) -> Vec<&'a PricePoint> {
        let mut series: Vec<&PricePoint> = self.points.iter().filter(|p| &p.symbol == symbol).collect();
        series.sort_by_key(|p| p.date);
        series
    }

    pub fn on_date(&self, date: NaiveDate) -> Vec<&'a PricePoint> {
        self.points.iter().filter(|p| p.date == date).collect()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.points.first()?.date;
        Some(self.points.iter().fold((first, first), |(lo, hi), p| (lo.min(p.date), hi.max(p.date))))
    }

    pub fn price_range(&self) -> Option<(Price, Price)> {
        let first = self.points.first()?.price.value();
        let (lo, hi) = self
            .points
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.min(p.price.value()), hi.max(p.price.value())));
        Some((Price::from(lo), Price::from(hi)))
    }

    /// Content hash over every (symbol, date, price) triple, in order.
    pub fn fingerprint(&self) -> DatasetFingerprint {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.points.len() as u64).to_le_bytes());
        for point in self.points {
            hasher.update(point.symbol.value().as_bytes());
            hasher.update(&[0]);
            hasher.update(&point.date.num_days_from_ce().to_le_bytes());
            hasher.update(&point.price.value().to_bits().to_le_bytes());
        }
        DatasetFingerprint::new(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(symbol: &str, y: i32, m: u32, price: f64) -> PricePoint {
        PricePoint::new(NaiveDate::from_ymd_opt(y, m, 1).unwrap(), Symbol::from(symbol), Price::from(price))
    }

    fn sample() -> Vec<PricePoint> {
        vec![
            point("MSFT", 2008, 2, 26.74),
            point("GOOG", 2008, 3, 440.47),
            point("MSFT", 2008, 1, 32.64),
            point("GOOG", 2008, 2, 471.18),
        ]
    }

    #[test]
    fn symbols_keep_first_appearance_order() {
        let data = sample();
        let table = PriceTable::new(&data);
        assert_eq!(table.symbols(), vec![Symbol::from("MSFT"), Symbol::from("GOOG")]);
    }

    #[test]
    fn series_is_sorted_by_date() {
        let data = sample();
        let table = PriceTable::new(&data);
        let msft = table.series(&Symbol::from("MSFT"));
        assert_eq!(msft.len(), 2);
        assert!(msft[0].date < msft[1].date);
    }

    #[test]
    fn ranges() {
        let data = sample();
        let table = PriceTable::new(&data);
        let (lo, hi) = table.date_range().unwrap();
        assert_eq!(lo, NaiveDate::from_ymd_opt(2008, 1, 1).unwrap());
        assert_eq!(hi, NaiveDate::from_ymd_opt(2008, 3, 1).unwrap());
        let (min, max) = table.price_range().unwrap();
        assert_eq!(min.value(), 26.74);
        assert_eq!(max.value(), 471.18);
        assert!(PriceTable::new(&[]).price_range().is_none());
    }

    #[test]
    fn fingerprint_tracks_content() {
        let data = sample();
        let same = sample();
        let mut changed = sample();
        changed[0].price = Price::from(26.75);
        assert_eq!(PriceTable::new(&data).fingerprint(), PriceTable::new(&same).fingerprint());
        assert_ne!(PriceTable::new(&data).fingerprint(), PriceTable::new(&changed).fingerprint());
    }

    #[test]
    fn tooltip_fields() {
        let p = point("GOOG", 2008, 3, 440.47);
        assert_eq!(p.field_text("date").as_deref(), Some("Mar 1, 2008"));
        assert_eq!(p.field_text("price").as_deref(), Some("440.47"));
        assert_eq!(p.field_text("volume"), None);
    }
}
