use wasm_bindgen::prelude::*;

use crate::application::coordinator::DashboardCoordinator;
use crate::config::DashboardConfig;
use crate::domain::{
    errors::AppError,
    events::ControlEvent,
    logging::{LogComponent, get_logger},
};
use crate::infrastructure::EmbeddedStocksRepository;

impl From<AppError> for JsValue {
    fn from(err: AppError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Dashboard handle for JavaScript callers: widget setters plus the
/// composed chart as Vega-Lite JSON.
#[wasm_bindgen]
pub struct RiskDashboard {
    coordinator: DashboardCoordinator<EmbeddedStocksRepository>,
}

#[wasm_bindgen]
impl RiskDashboard {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<RiskDashboard, JsValue> {
        Ok(Self::start(DashboardConfig::default())?)
    }

    /// Same as the constructor, with a (partial) JSON config override
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(json: &str) -> Result<RiskDashboard, JsValue> {
        let config = DashboardConfig::from_json(json)?;
        Ok(Self::start(config)?)
    }

    #[wasm_bindgen(js_name = setAnnotationText)]
    pub fn set_annotation_text(&mut self, text: String) -> Result<(), JsValue> {
        self.coordinator.dispatch(ControlEvent::TextChanged(text))?;
        Ok(())
    }

    /// Returns the stored (clamped) offset
    #[wasm_bindgen(js_name = setHorizontalOffset)]
    pub fn set_horizontal_offset(&mut self, dx: i32) -> Result<i32, JsValue> {
        self.coordinator.dispatch(ControlEvent::HorizontalOffsetChanged(dx))?;
        Ok(self.coordinator.controls().dx())
    }

    #[wasm_bindgen(js_name = setVerticalOffset)]
    pub fn set_vertical_offset(&mut self, dy: i32) -> Result<i32, JsValue> {
        self.coordinator.dispatch(ControlEvent::VerticalOffsetChanged(dy))?;
        Ok(self.coordinator.controls().dy())
    }

    #[wasm_bindgen(js_name = annotationText)]
    pub fn annotation_text(&self) -> String {
        self.coordinator.controls().text().to_string()
    }

    /// Composed chart as a Vega-Lite v5 document (JSON text)
    #[wasm_bindgen(js_name = vegaLiteSpec)]
    pub fn vega_lite_spec(&self) -> Result<String, JsValue> {
        let chart = self
            .coordinator
            .composed()
            .ok_or_else(|| AppError::Rendering("dashboard not started".to_string()))?;
        let document = chart.to_vega_lite()?;
        serde_json::to_string(&document).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl RiskDashboard {
    fn start(config: DashboardConfig) -> Result<Self, AppError> {
        let mut coordinator = DashboardCoordinator::new(EmbeddedStocksRepository::new(), config)?;
        coordinator.start()?;
        get_logger().info(LogComponent::Presentation("RiskDashboard"), "🌐 JS dashboard handle ready");
        Ok(Self { coordinator })
    }
}
