use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use crate::domain::market_data::PriceTable;
use crate::time_utils::{date_to_millis, days_to_millis};

/// Role of a layer inside the composed chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
pub enum LayerKind {
    #[display(fmt = "Lines")]
    #[strum(serialize = "lines")]
    Lines,
    #[display(fmt = "Hover points")]
    #[strum(serialize = "points")]
    HoverPoints,
    #[display(fmt = "Tooltip rule")]
    #[strum(serialize = "rule")]
    TooltipRule,
    #[display(fmt = "Annotations")]
    #[strum(serialize = "annotations")]
    Annotations,
}

/// Encoding channel data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[strum(serialize = "temporal")]
    Temporal,
    #[strum(serialize = "quantitative")]
    Quantitative,
    #[strum(serialize = "nominal")]
    Nominal,
}

/// Time unit applied to a temporal field before encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Serialize)]
pub enum TimeUnit {
    #[serde(rename = "yearmonthdate")]
    #[strum(serialize = "yearmonthdate")]
    YearMonthDate,
}

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TextBaseline {
    Alphabetic,
    #[default]
    Middle,
}

/// Pointer event that drives a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PointerTrigger {
    Mouseover,
}

/// What an empty selection matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyBehavior {
    /// Empty selection matches nothing
    None,
    /// Empty selection matches everything
    All,
}

impl EmptyBehavior {
    pub fn matches_when_empty(&self) -> bool {
        matches!(self, EmptyBehavior::All)
    }
}

/// Value Object - Viewport over the (date, price) plane.
///
/// Times are epoch milliseconds; `width`/`height` are the plot area in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub start_time: f64,
    pub end_time: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub width: u32,
    pub height: u32,
}

/// Narrowest visible date span
pub const MIN_TIME_SPAN_DAYS: f64 = 7.0;
/// Widest visible date span
pub const MAX_TIME_SPAN_DAYS: f64 = 365.0 * 200.0;
/// Headroom above the highest price in the fitted view
pub const PRICE_HEADROOM: f64 = 0.05;

impl Default for Viewport {
    fn default() -> Self {
        Self { start_time: 0.0, end_time: days_to_millis(365.0), min_price: 0.0, max_price: 100.0, width: 800, height: 500 }
    }
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, ..Default::default() }
    }

    /// View covering the whole table. The price axis starts at zero.
    pub fn fit(table: PriceTable<'_>, width: u32, height: u32) -> Self {
        let mut viewport = Self::new(width, height);
        if let Some((first, last)) = table.date_range() {
            viewport.start_time = date_to_millis(first);
            viewport.end_time = date_to_millis(last);
            if viewport.time_range() < days_to_millis(MIN_TIME_SPAN_DAYS) {
                let pad = days_to_millis(MIN_TIME_SPAN_DAYS) / 2.0;
                viewport.start_time -= pad;
                viewport.end_time += pad;
            }
        }
        if let Some((_, max)) = table.price_range() {
            let top = max.value().max(0.0) * (1.0 + PRICE_HEADROOM);
            viewport.min_price = 0.0;
            viewport.max_price = if top > 0.0 { top } else { 1.0 };
        }
        viewport
    }

    pub fn time_range(&self) -> f64 {
        self.end_time - self.start_time
    }

    pub fn price_range(&self) -> f64 {
        self.max_price - self.min_price
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    /// Zoom the time axis by `factor` (> 1 zooms in) keeping the instant
    /// under `center_x` (0..1 across the plot) in place.
    pub fn zoom(&mut self, factor: f64, center_x: f64) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        let center_x = center_x.clamp(0.0, 1.0);
        let anchor = self.start_time + self.time_range() * center_x;
        let new_range = (self.time_range() / factor)
            .clamp(days_to_millis(MIN_TIME_SPAN_DAYS), days_to_millis(MAX_TIME_SPAN_DAYS));
        self.start_time = anchor - new_range * center_x;
        self.end_time = self.start_time + new_range;
    }

    /// Zoom the price axis keeping the price under `center_y` (0 = top) in place.
    pub fn zoom_price(&mut self, factor: f64, center_y: f64) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        let center_y = center_y.clamp(0.0, 1.0);
        let anchor = self.max_price - self.price_range() * center_y;
        let new_range = (self.price_range() / factor).max(f64::EPSILON);
        self.max_price = anchor + new_range * center_y;
        self.min_price = self.max_price - new_range;
    }

    /// Shift by fractions of the visible ranges
    pub fn pan(&mut self, delta_x: f64, delta_y: f64) {
        let time_delta = self.time_range() * delta_x;
        self.start_time += time_delta;
        self.end_time += time_delta;

        let price_delta = self.price_range() * delta_y;
        self.min_price += price_delta;
        self.max_price += price_delta;
    }

    /// Shift by a pointer drag measured in pixels
    pub fn pan_pixels(&mut self, dx_px: f64, dy_px: f64) {
        self.pan(-dx_px / self.width.max(1) as f64, dy_px / self.height.max(1) as f64);
    }

    pub fn time_to_x(&self, timestamp: f64) -> f64 {
        if self.time_range() == 0.0 {
            return 0.0;
        }
        (timestamp - self.start_time) / self.time_range() * self.width as f64
    }

    pub fn price_to_y(&self, price: f64) -> f64 {
        if self.price_range() == 0.0 {
            return self.height as f64 / 2.0;
        }
        let normalized = (price - self.min_price) / self.price_range();
        self.height as f64 * (1.0 - normalized)
    }

    pub fn x_to_time(&self, x: f64) -> f64 {
        self.start_time + self.time_range() * (x / self.width.max(1) as f64)
    }

    pub fn y_to_price(&self, y: f64) -> f64 {
        let normalized = 1.0 - y / self.height.max(1) as f64;
        self.min_price + self.price_range() * normalized
    }

    pub fn contains_pixel(&self, x: f64, y: f64) -> bool {
        (0.0..=self.width as f64).contains(&x) && (0.0..=self.height as f64).contains(&y)
    }
}

/// Margins around the plot area, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotLayout {
    pub width: u32,
    pub height: u32,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
}

impl PlotLayout {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, margin_left: 56.0, margin_right: 72.0, margin_top: 36.0, margin_bottom: 40.0 }
    }

    pub fn plot_width(&self) -> u32 {
        (self.width as f64 - self.margin_left - self.margin_right).max(1.0) as u32
    }

    pub fn plot_height(&self) -> u32 {
        (self.height as f64 - self.margin_top - self.margin_bottom).max(1.0) as u32
    }

    /// Canvas pixel -> plot-area pixel
    pub fn to_plot(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.margin_left, y - self.margin_top)
    }

    /// Plot-area pixel -> canvas pixel
    pub fn to_canvas(&self, x: f64, y: f64) -> (f64, f64) {
        (x + self.margin_left, y + self.margin_top)
    }
}

/// Value Object - Color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    pub fn with_alpha(&self, alpha: f32) -> Self {
        Self { a: alpha, ..*self }
    }

    /// CSS `rgba(...)` string for canvas styles
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            self.a
        )
    }

    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    pub const GRID: Color = Color { r: 0.867, g: 0.867, b: 0.867, a: 1.0 };
    pub const AXIS_TEXT: Color = Color { r: 0.2, g: 0.2, b: 0.2, a: 1.0 };
}

/// Default categorical scheme (tableau10), indexed by symbol order
pub const CATEGORY_PALETTE: [u32; 10] = [
    0x4c78a8, 0xf58518, 0xe45756, 0x72b7b2, 0x54a24b, 0xeeca3b, 0xb279a2, 0xff9da6, 0x9d755d, 0xbab0ac,
];

pub fn category_color(index: usize) -> Color {
    Color::from_hex(CATEGORY_PALETTE[index % CATEGORY_PALETTE.len()])
}
