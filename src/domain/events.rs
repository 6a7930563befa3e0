use std::fmt::Debug;

/// Base trait for all domain events
pub trait DomainEvent: Debug + Clone {
    fn event_type(&self) -> &'static str;
}

/// Inputs that drive a dashboard re-render.
///
/// Pointer coordinates are plot-area pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    TextChanged(String),
    HorizontalOffsetChanged(i32),
    VerticalOffsetChanged(i32),
    PointerMoved { x: f64, y: f64 },
    PointerLeft,
    /// `factor > 1` zooms in; centers are 0..1 across the plot
    Zoom { factor: f64, center_x: f64, center_y: f64 },
    Pan { dx_px: f64, dy_px: f64 },
    Resized { width: u32, height: u32 },
    ResetView,
}

impl ControlEvent {
    /// Widget events invalidate the annotation layer
    pub fn is_widget_event(&self) -> bool {
        matches!(
            self,
            ControlEvent::TextChanged(_)
                | ControlEvent::HorizontalOffsetChanged(_)
                | ControlEvent::VerticalOffsetChanged(_)
        )
    }
}

impl DomainEvent for ControlEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ControlEvent::TextChanged(_) => "TextChanged",
            ControlEvent::HorizontalOffsetChanged(_) => "HorizontalOffsetChanged",
            ControlEvent::VerticalOffsetChanged(_) => "VerticalOffsetChanged",
            ControlEvent::PointerMoved { .. } => "PointerMoved",
            ControlEvent::PointerLeft => "PointerLeft",
            ControlEvent::Zoom { .. } => "Zoom",
            ControlEvent::Pan { .. } => "Pan",
            ControlEvent::Resized { .. } => "Resized",
            ControlEvent::ResetView => "ResetView",
        }
    }
}
