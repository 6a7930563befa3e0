use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::errors::{AppError, AppResult};
use crate::domain::market_data::FieldSource;
use crate::time_utils::{date_to_millis, format_tooltip_date};

/// Format of the annotation date literals, e.g. `Mar 01, 2008`
pub const ANNOTATION_DATE_FORMAT: &str = "%b %d, %Y";

/// Fixed events marked on the chart
pub const ANNOTATIONS: [(&str, &str); 4] = [
    ("Mar 01, 2008", "Pretty good day for GOOG"),
    ("Dec 01, 2007", "Something's going wrong for GOOG & AAPL"),
    ("Nov 01, 2008", "Market starts again thanks to..."),
    ("Dec 01, 2009", "Small crash for GOOG after..."),
];

/// One row of the annotation table. `y` is the baseline the label is anchored to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub date: NaiveDate,
    pub event: String,
    pub y: f64,
}

impl Annotation {
    pub fn timestamp_ms(&self) -> f64 {
        date_to_millis(self.date)
    }
}

impl FieldSource for Annotation {
    fn field_text(&self, field: &str) -> Option<String> {
        match field {
            "event" => Some(self.event.clone()),
            "date" => Some(format_tooltip_date(self.date)),
            _ => None,
        }
    }
}

/// Parse `(date, event)` literals into annotation rows anchored at `y = 0`.
pub fn build_annotation_table(entries: &[(&str, &str)]) -> AppResult<Vec<Annotation>> {
    entries
        .iter()
        .map(|(date, event)| {
            let parsed = NaiveDate::parse_from_str(date.trim(), ANNOTATION_DATE_FORMAT)
                .map_err(|e| AppError::invalid_date(date, e))?;
            Ok(Annotation { date: parsed, event: event.to_string(), y: 0.0 })
        })
        .collect()
}

/// Table built from [`ANNOTATIONS`]
pub fn default_annotations() -> AppResult<Vec<Annotation>> {
    build_annotation_table(&ANNOTATIONS)
}
