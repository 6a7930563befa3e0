use chrono::NaiveDate;
use derive_more::{Constructor, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::domain::errors::{AppError, AppResult};

/// Value Object - closing price in USD
#[derive(Debug, Clone, Copy, PartialEq, From, Into, Deref, Constructor, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

/// Value Object - ticker symbol, stored upper case
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deref, Display, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: &str) -> AppResult<Self> {
        let trimmed = symbol.trim();
        if trimmed.is_empty() {
            return Err(AppError::Data("Symbol cannot be empty".to_string()));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self(value.trim().to_uppercase())
    }
}

/// Value Object - lower date bound of the plotted data (exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateCutoff(NaiveDate);

impl DateCutoff {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse an ISO `YYYY-MM-DD` literal
    pub fn parse(input: &str) -> AppResult<Self> {
        NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|e| AppError::invalid_date(input, e))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Strictly after the cutoff
    pub fn admits(&self, date: NaiveDate) -> bool {
        date > self.0
    }
}

/// Value Object - content hash of a dataset, used as cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DatasetFingerprint(blake3::Hash);

impl DatasetFingerprint {
    pub fn new(hash: blake3::Hash) -> Self {
        Self(hash)
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_is_normalized() {
        assert_eq!(Symbol::new(" goog ").unwrap().value(), "GOOG");
        assert!(Symbol::new("  ").is_err());
    }

    #[test]
    fn cutoff_is_exclusive() {
        let cutoff = DateCutoff::parse("2004-01-01").unwrap();
        assert!(!cutoff.admits(NaiveDate::from_ymd_opt(2004, 1, 1).unwrap()));
        assert!(cutoff.admits(NaiveDate::from_ymd_opt(2004, 1, 2).unwrap()));
        assert!(!cutoff.admits(NaiveDate::from_ymd_opt(2003, 12, 1).unwrap()));
    }

    #[test]
    fn cutoff_rejects_garbage() {
        assert!(matches!(DateCutoff::parse("first of jan"), Err(AppError::InvalidDate { .. })));
    }
}
