use serde::Serialize;
use std::sync::Arc;

use super::value_objects::{EmptyBehavior, FieldType, LayerKind, PointerTrigger, TextAlign, TextBaseline, TimeUnit};
use crate::domain::annotations::Annotation;
use crate::domain::market_data::PricePoint;

/// Text mark properties. `text` is a constant shared by every row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextMark {
    pub text: String,
    pub size: u32,
    pub dx: i32,
    pub dy: i32,
    pub align: TextAlign,
    /// `middle`: the row's point is the vertical center of the glyphs
    pub baseline: TextBaseline,
}

/// Graphical mark of a layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Mark {
    Line,
    /// `size` is the marker area in square pixels
    Circle { size: f64 },
    Rule,
    Text(TextMark),
}

/// Rows feeding a layer. Shared, never copied per render.
#[derive(Debug, Clone)]
pub enum LayerData {
    Prices(Arc<Vec<PricePoint>>),
    Annotations(Arc<Vec<Annotation>>),
}

impl LayerData {
    pub fn len(&self) -> usize {
        match self {
            LayerData::Prices(rows) => rows.len(),
            LayerData::Annotations(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn prices(&self) -> Option<&[PricePoint]> {
        match self {
            LayerData::Prices(rows) => Some(rows.as_slice()),
            LayerData::Annotations(_) => None,
        }
    }

    pub fn annotations(&self) -> Option<&[Annotation]> {
        match self {
            LayerData::Annotations(rows) => Some(rows.as_slice()),
            LayerData::Prices(_) => None,
        }
    }
}

impl PartialEq for LayerData {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LayerData::Prices(a), LayerData::Prices(b)) => a == b,
            (LayerData::Annotations(a), LayerData::Annotations(b)) => a == b,
            _ => false,
        }
    }
}

/// Channel mapping of one field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    pub field: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_unit: Option<TimeUnit>,
}

impl FieldDef {
    pub fn new(field: &str, kind: FieldType) -> Self {
        Self { field: field.to_string(), kind, title: None, time_unit: None }
    }

    pub fn titled(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_time_unit(mut self, unit: TimeUnit) -> Self {
        self.time_unit = Some(unit);
        self
    }

    /// Axis / tooltip caption, falling back to the field name
    pub fn caption(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.field)
    }
}

/// `value` when the named selection matches the row, `otherwise` else
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalValue {
    pub selection: String,
    pub value: f64,
    pub otherwise: f64,
}

impl ConditionalValue {
    pub fn resolve(&self, selected: bool) -> f64 {
        if selected { self.value } else { self.otherwise }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Encoding {
    pub x: Option<FieldDef>,
    pub y: Option<FieldDef>,
    pub color: Option<FieldDef>,
    pub opacity: Option<ConditionalValue>,
    pub tooltip: Vec<FieldDef>,
}

/// Interactive point selection owned by a layer
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionParam {
    pub name: String,
    pub fields: Vec<String>,
    pub nearest: bool,
    pub on: PointerTrigger,
    pub empty: EmptyBehavior,
}

impl SelectionParam {
    /// Nearest-point hover over the `date` field; empty matches nothing
    pub fn hover() -> Self {
        Self {
            name: HOVER_SELECTION.to_string(),
            fields: vec!["date".to_string()],
            nearest: true,
            on: PointerTrigger::Mouseover,
            empty: EmptyBehavior::None,
        }
    }
}

pub const HOVER_SELECTION: &str = "hover";

/// One visual layer: mark + rows + channel mapping
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub kind: LayerKind,
    pub mark: Mark,
    pub data: LayerData,
    pub encoding: Encoding,
    /// Selection defined by this layer
    pub selection: Option<SelectionParam>,
    /// Only rows matching this selection are drawn
    pub filter: Option<String>,
}

impl Layer {
    pub fn new(kind: LayerKind, mark: Mark, data: LayerData, encoding: Encoding) -> Self {
        Self { kind, mark, data, encoding, selection: None, filter: None }
    }

    pub fn with_selection(mut self, selection: SelectionParam) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn filtered_by(mut self, selection: &str) -> Self {
        self.filter = Some(selection.to_string());
        self
    }

    pub fn text_mark(&self) -> Option<&TextMark> {
        match &self.mark {
            Mark::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Declarative layered chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: Option<String>,
    pub height: u32,
    pub layers: Vec<Layer>,
    /// Scales bound to pan / zoom
    pub interactive: bool,
}

impl ChartSpec {
    pub fn new(title: Option<String>, height: u32) -> Self {
        Self { title, height, layers: Vec::new(), interactive: false }
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, kind: LayerKind) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.kind == kind)
    }

    /// `self + layer`: a new chart with `layer` drawn on top
    pub fn compose(&self, layer: Layer) -> ChartSpec {
        let mut composed = self.clone();
        composed.layers.push(layer);
        composed
    }

    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    /// The selection parameter named `name`, wherever it is defined
    pub fn selection(&self, name: &str) -> Option<&SelectionParam> {
        self.layers.iter().filter_map(|layer| layer.selection.as_ref()).find(|s| s.name == name)
    }
}
