//! Dashboard configuration. Every field has a default, so a partial JSON
//! override is enough.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::controls::{ControlState, OffsetBounds, DEFAULT_ANNOTATION_TEXT, DEFAULT_DX, DEFAULT_DY};
use crate::domain::errors::{AppError, AppResult};
use crate::domain::market_data::DateCutoff;

pub const DEFAULT_INTRO: &str = "Risk analysis is one step in the overall risk management and risk assessment process, but it’s a critical one. During a cybersecurity risk analysis, your organization will need to examine each risk to the security of your organization’s information systems (devices, software, hardware, apps, and so forth), and then prioritize which risks need to be remediated first";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Browser tab title
    pub page_title: String,
    pub heading: String,
    pub intro: String,
    pub text_label: String,
    pub footer_prefix: String,
    pub footer_text: String,
    pub footer_url: String,

    /// Rows dated on or before this day (`YYYY-MM-DD`) are dropped
    pub cutoff: String,
    pub chart_title: String,
    pub chart_height: u32,
    /// Lifetime of a cached base chart
    pub chart_ttl_secs: u64,

    pub offset_bounds: OffsetBounds,
    pub default_text: String,
    pub default_dx: i32,
    pub default_dy: i32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_title: "Risk Analysis".to_string(),
            heading: "Risk Analysis ⚠️".to_string(),
            intro: DEFAULT_INTRO.to_string(),
            text_label: "Choose a Risk Analysis Framework (Identification, Preparation, Response ...)".to_string(),
            footer_prefix: "See more on ".to_string(),
            footer_text: "Square Management Luxembourg".to_string(),
            footer_url: "https://sitraka17.github.io/".to_string(),
            cutoff: "2004-01-01".to_string(),
            chart_title: "Evolution of stock prices".to_string(),
            chart_height: 500,
            chart_ttl_secs: 60 * 60 * 24,
            offset_bounds: OffsetBounds::default(),
            default_text: DEFAULT_ANNOTATION_TEXT.to_string(),
            default_dx: DEFAULT_DX,
            default_dy: DEFAULT_DY,
        }
    }
}

impl DashboardConfig {
    /// Parse a (possibly partial) JSON document and validate it.
    pub fn from_json(json: &str) -> AppResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| AppError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        self.offset_bounds.validate()?;
        self.cutoff_date()?;
        if self.chart_height == 0 {
            return Err(AppError::Configuration("chart_height must be positive".to_string()));
        }
        if self.chart_ttl_secs == 0 {
            return Err(AppError::Configuration("chart_ttl_secs must be positive".to_string()));
        }
        Ok(())
    }

    pub fn cutoff_date(&self) -> AppResult<DateCutoff> {
        DateCutoff::parse(&self.cutoff)
    }

    pub fn chart_ttl(&self) -> Duration {
        Duration::from_secs(self.chart_ttl_secs)
    }

    /// Widget state at page load; defaults outside the bounds are clamped.
    pub fn default_controls(&self) -> ControlState {
        ControlState::new(&self.default_text, self.default_dx, self.default_dy, self.offset_bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let config = DashboardConfig::from_json(r#"{"chart_height": 420, "default_text": "Risk"}"#).unwrap();
        assert_eq!(config.chart_height, 420);
        assert_eq!(config.default_controls().text(), "Risk");
        assert_eq!(config.chart_title, "Evolution of stock prices");
        assert_eq!(config.chart_ttl(), Duration::from_secs(86_400));
    }

    #[test]
    fn bad_values_are_configuration_errors() {
        assert!(matches!(
            DashboardConfig::from_json(r#"{"offset_bounds": {"min": 5, "max": -5}}"#),
            Err(AppError::Configuration(_))
        ));
        assert!(matches!(DashboardConfig::from_json(r#"{"cutoff": "soon"}"#), Err(AppError::InvalidDate { .. })));
        assert!(matches!(DashboardConfig::from_json("not json"), Err(AppError::Configuration(_))));
    }
}
