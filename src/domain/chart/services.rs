use chrono::NaiveDate;
use std::sync::Arc;

use super::entities::{
    ChartSpec, ConditionalValue, Encoding, FieldDef, Layer, LayerData, Mark, SelectionParam, TextMark,
    HOVER_SELECTION,
};
use super::value_objects::{FieldType, LayerKind, TextAlign, TextBaseline, TimeUnit, Viewport};
use crate::domain::annotations::Annotation;
use crate::domain::controls::ControlState;
use crate::domain::market_data::{FieldSource, PricePoint, PriceTable, Symbol};

/// Area of the hover markers, in square pixels
pub const HOVER_POINT_SIZE: f64 = 65.0;
/// Rule opacity while the hover selection is active
pub const RULE_OPACITY: f64 = 0.3;
/// Annotation label font size
pub const ANNOTATION_FONT_SIZE: u32 = 15;
/// Pointer distance that counts as hovering an annotation label
pub const ANNOTATION_HIT_RADIUS: f64 = 12.0;

/// Builds the base price chart and the annotation overlay
#[derive(Debug, Clone)]
pub struct ChartBuilder {
    title: String,
    height: u32,
}

impl ChartBuilder {
    pub fn new(title: &str, height: u32) -> Self {
        Self { title: title.to_string(), height }
    }

    /// Lines + hover points + tooltip rule, in that order.
    pub fn build(&self, data: Arc<Vec<PricePoint>>) -> ChartSpec {
        let x = FieldDef::new("date", FieldType::Temporal).titled("Date");
        let y = FieldDef::new("price", FieldType::Quantitative).titled("Price");

        let lines = Layer::new(
            LayerKind::Lines,
            Mark::Line,
            LayerData::Prices(Arc::clone(&data)),
            Encoding {
                x: Some(x.clone()),
                y: Some(y.clone()),
                color: Some(FieldDef::new("symbol", FieldType::Nominal)),
                ..Default::default()
            },
        );

        // Same encoding as the lines, only drawn where the hover selection matches.
        let points = Layer {
            kind: LayerKind::HoverPoints,
            mark: Mark::Circle { size: HOVER_POINT_SIZE },
            ..lines.clone()
        }
        .filtered_by(HOVER_SELECTION);

        let rule = Layer::new(
            LayerKind::TooltipRule,
            Mark::Rule,
            LayerData::Prices(data),
            Encoding {
                x: Some(FieldDef::new("date", FieldType::Temporal).with_time_unit(TimeUnit::YearMonthDate)),
                y: Some(FieldDef::new("price", FieldType::Quantitative)),
                opacity: Some(ConditionalValue {
                    selection: HOVER_SELECTION.to_string(),
                    value: RULE_OPACITY,
                    otherwise: 0.0,
                }),
                tooltip: vec![
                    FieldDef::new("date", FieldType::Temporal).titled("Date"),
                    FieldDef::new("price", FieldType::Quantitative).titled("Price (USD)"),
                ],
                ..Default::default()
            },
        )
        .with_selection(SelectionParam::hover());

        let mut chart = ChartSpec::new(Some(self.title.clone()), self.height);
        chart.layers = vec![lines, points, rule];
        chart.interactive()
    }

    /// Text layer labelling every annotation row with the widget text.
    ///
    /// The row's own `event` is only reachable through the tooltip.
    pub fn annotation_layer(&self, annotations: Arc<Vec<Annotation>>, controls: &ControlState) -> Layer {
        Layer::new(
            LayerKind::Annotations,
            Mark::Text(TextMark {
                text: controls.text().to_string(),
                size: ANNOTATION_FONT_SIZE,
                dx: controls.dx(),
                dy: controls.dy(),
                align: TextAlign::Center,
                baseline: TextBaseline::Middle,
            }),
            LayerData::Annotations(annotations),
            Encoding {
                x: Some(FieldDef::new("date", FieldType::Temporal)),
                y: Some(FieldDef::new("y", FieldType::Quantitative)),
                tooltip: vec![FieldDef::new("event", FieldType::Nominal)],
                ..Default::default()
            },
        )
    }
}

/// Active state of the hover selection
#[derive(Debug, Clone, PartialEq)]
pub struct HoverSelection {
    /// Selected value of the `date` field
    pub date: NaiveDate,
    /// Row closest to the pointer; feeds the tooltip
    pub nearest: PricePoint,
}

/// Evaluate a selection predicate for a row date
pub fn selection_matches(selection: &SelectionParam, hover: Option<&HoverSelection>, date: NaiveDate) -> bool {
    match hover {
        Some(active) => active.date == date,
        None => selection.empty.matches_when_empty(),
    }
}

/// Caption/value pairs shown next to the pointer
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub entries: Vec<(String, String)>,
}

impl Tooltip {
    /// Read the listed fields off `row`; fields the row lacks are skipped.
    pub fn from_fields(fields: &[FieldDef], row: &dyn FieldSource) -> Option<Self> {
        let entries: Vec<(String, String)> = fields
            .iter()
            .filter_map(|field| row.field_text(&field.field).map(|value| (field.caption().to_string(), value)))
            .collect();
        if entries.is_empty() { None } else { Some(Self { entries }) }
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(|(caption, value)| format!("{}: {}", caption, value)).collect()
    }
}

/// Resolves pointer positions (plot-area pixels) against a chart.
pub struct HoverResolver<'a> {
    chart: &'a ChartSpec,
    viewport: &'a Viewport,
}

impl<'a> HoverResolver<'a> {
    pub fn new(chart: &'a ChartSpec, viewport: &'a Viewport) -> Self {
        Self { chart, viewport }
    }

    /// Nearest price row in screen space; its date becomes the selection.
    pub fn resolve(&self, x: f64, y: f64) -> Option<HoverSelection> {
        let layer = self.selection_layer()?;
        let rows = layer.data.prices()?;
        let nearest = rows
            .iter()
            .map(|row| {
                let px = self.viewport.time_to_x(row.timestamp_ms());
                let py = self.viewport.price_to_y(row.price.value());
                (row, (px - x).powi(2) + (py - y).powi(2))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(row, _)| row)?;
        Some(HoverSelection { date: nearest.date, nearest: nearest.clone() })
    }

    /// Tooltip for the current pointer: an annotation label under the
    /// pointer wins, otherwise the selection layer's tooltip fields.
    pub fn tooltip(&self, x: f64, y: f64, hover: Option<&HoverSelection>) -> Option<Tooltip> {
        if let Some((layer, annotation)) = self.annotation_at(x, y) {
            return Tooltip::from_fields(&layer.encoding.tooltip, annotation);
        }
        let layer = self.selection_layer()?;
        let active = hover?;
        Tooltip::from_fields(&layer.encoding.tooltip, &active.nearest)
    }

    /// Annotation label within [`ANNOTATION_HIT_RADIUS`] of the pointer.
    /// Labels are middle-anchored, so the offset anchor is the glyph center.
    /// Works outside the plot area too: labels are not clipped.
    pub fn annotation_at(&self, x: f64, y: f64) -> Option<(&'a Layer, &'a Annotation)> {
        let layer = self.chart.layer(LayerKind::Annotations)?;
        let mark = layer.text_mark()?;
        let rows = layer.data.annotations()?;
        rows.iter()
            .map(|row| {
                let lx = self.viewport.time_to_x(row.timestamp_ms()) + mark.dx as f64;
                let ly = self.viewport.price_to_y(row.y) + mark.dy as f64;
                (row, ((lx - x).powi(2) + (ly - y).powi(2)).sqrt())
            })
            .filter(|(_, distance)| *distance <= ANNOTATION_HIT_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(row, _)| (layer, row))
    }

    fn selection_layer(&self) -> Option<&'a Layer> {
        self.chart.layers.iter().find(|layer| layer.selection.is_some())
    }
}

/// Symbols of the line layer in order of first appearance; position picks the palette color
pub fn symbol_order(chart: &ChartSpec) -> Vec<Symbol> {
    chart
        .layer(LayerKind::Lines)
        .and_then(|layer| layer.data.prices())
        .map(|rows| PriceTable::new(rows).symbols())
        .unwrap_or_default()
}
