use std::sync::Arc;

use crate::domain::annotations::default_annotations;
use crate::domain::chart::{ChartBuilder, ChartSpec, Layer};
use crate::domain::controls::ControlState;
use crate::domain::errors::AppResult;

/// Use Case: annotation overlay for the current widget values
pub struct RenderPageUseCase {
    builder: ChartBuilder,
}

impl RenderPageUseCase {
    pub fn new(builder: ChartBuilder) -> Self {
        Self { builder }
    }

    /// The annotation table is rebuilt on every call.
    pub fn annotation_layer(&self, controls: &ControlState) -> AppResult<Layer> {
        let annotations = Arc::new(default_annotations()?);
        Ok(self.builder.annotation_layer(annotations, controls))
    }

    /// `chart + annotations`, with pan/zoom enabled
    pub fn compose(&self, chart: &ChartSpec, annotations: Layer) -> ChartSpec {
        chart.compose(annotations).interactive()
    }
}
