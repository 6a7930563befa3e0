//! Vega-Lite v5 export of a [`ChartSpec`].

use serde::Serialize;
use serde_json::{json, Map, Value};

use super::entities::{ChartSpec, ConditionalValue, Encoding, Layer, LayerData, SelectionParam};
use crate::domain::errors::{AppError, AppResult};

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";
/// Interval param bound to the scales when the chart is interactive
pub const SCALES_PARAM: &str = "grid";

fn to_json<T: Serialize + ?Sized>(value: &T) -> AppResult<Value> {
    serde_json::to_value(value).map_err(|e| AppError::Rendering(format!("vega-lite export: {}", e)))
}

fn selection_json(selection: &SelectionParam) -> Value {
    json!({
        "name": selection.name,
        "select": {
            "type": "point",
            "fields": selection.fields,
            "nearest": selection.nearest,
            "on": selection.on.as_ref(),
        }
    })
}

fn condition_json(condition: &ConditionalValue, empty: bool) -> Value {
    json!({
        "condition": { "param": condition.selection, "value": condition.value, "empty": empty },
        "value": condition.otherwise,
    })
}

impl ChartSpec {
    /// Whether the named selection matches everything while empty
    fn empty_matches(&self, name: &str) -> bool {
        self.selection(name).map(|s| s.empty.matches_when_empty()).unwrap_or(false)
    }

    fn encoding_json(&self, encoding: &Encoding) -> AppResult<Value> {
        let mut channels = Map::new();
        if let Some(x) = &encoding.x {
            channels.insert("x".into(), to_json(x)?);
        }
        if let Some(y) = &encoding.y {
            channels.insert("y".into(), to_json(y)?);
        }
        if let Some(color) = &encoding.color {
            channels.insert("color".into(), to_json(color)?);
        }
        if let Some(opacity) = &encoding.opacity {
            channels.insert("opacity".into(), condition_json(opacity, self.empty_matches(&opacity.selection)));
        }
        if !encoding.tooltip.is_empty() {
            channels.insert("tooltip".into(), to_json(&encoding.tooltip)?);
        }
        Ok(Value::Object(channels))
    }

    fn layer_json(&self, layer: &Layer) -> AppResult<Value> {
        let values = match &layer.data {
            LayerData::Prices(rows) => to_json(rows.as_slice())?,
            LayerData::Annotations(rows) => to_json(rows.as_slice())?,
        };
        let mut object = Map::new();
        object.insert("name".into(), json!(layer.kind.as_ref()));
        object.insert("data".into(), json!({ "values": values }));
        object.insert("mark".into(), to_json(&layer.mark)?);
        object.insert("encoding".into(), self.encoding_json(&layer.encoding)?);

        let mut params = Vec::new();
        if let Some(selection) = &layer.selection {
            params.push(selection_json(selection));
        }
        if !params.is_empty() {
            object.insert("params".into(), Value::Array(params));
        }
        if let Some(filter) = &layer.filter {
            object.insert(
                "transform".into(),
                json!([{ "filter": { "param": filter, "empty": self.empty_matches(filter) } }]),
            );
        }
        Ok(Value::Object(object))
    }

    /// Serialize the chart as a self-contained Vega-Lite document with inline data.
    pub fn to_vega_lite(&self) -> AppResult<Value> {
        let mut layers = self.layers.iter().map(|layer| self.layer_json(layer)).collect::<AppResult<Vec<_>>>()?;

        if self.interactive {
            if let Some(Value::Object(first)) = layers.first_mut() {
                let scales = json!({ "name": SCALES_PARAM, "select": "interval", "bind": "scales" });
                match first.get_mut("params") {
                    Some(Value::Array(params)) => params.push(scales),
                    _ => {
                        first.insert("params".into(), json!([scales]));
                    }
                }
            }
        }

        let mut document = Map::new();
        document.insert("$schema".into(), json!(VEGA_LITE_SCHEMA));
        if let Some(title) = &self.title {
            document.insert("title".into(), json!(title));
        }
        document.insert("width".into(), json!("container"));
        document.insert("height".into(), json!(self.height));
        document.insert("layer".into(), Value::Array(layers));
        Ok(Value::Object(document))
    }
}
