use leptos::*;
use once_cell::sync::OnceCell;

use crate::domain::controls::{DEFAULT_ANNOTATION_TEXT, DEFAULT_DX, DEFAULT_DY};

/// Tooltip overlay content, positioned in canvas pixels
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipData {
    pub lines: Vec<String>,
    pub x: f64,
    pub y: f64,
}

pub struct Globals {
    pub annotation_text: RwSignal<String>,
    pub offset_dx: RwSignal<i32>,
    pub offset_dy: RwSignal<i32>,
    pub tooltip: RwSignal<Option<TooltipData>>,
    pub is_dragging: RwSignal<bool>,
    pub last_mouse_x: RwSignal<f64>,
    pub last_mouse_y: RwSignal<f64>,
    /// Bumped whenever the canvas needs a repaint
    pub frame_version: RwSignal<u64>,
    pub status: RwSignal<String>,
}

static GLOBALS: OnceCell<Globals> = OnceCell::new();

pub fn globals() -> &'static Globals {
    GLOBALS.get_or_init(|| Globals {
        annotation_text: create_rw_signal(DEFAULT_ANNOTATION_TEXT.to_string()),
        offset_dx: create_rw_signal(DEFAULT_DX),
        offset_dy: create_rw_signal(DEFAULT_DY),
        tooltip: create_rw_signal(None),
        is_dragging: create_rw_signal(false),
        last_mouse_x: create_rw_signal(0.0),
        last_mouse_y: create_rw_signal(0.0),
        frame_version: create_rw_signal(0),
        status: create_rw_signal("Loading…".to_string()),
    })
}

/// Request a canvas repaint
pub fn request_redraw() {
    globals().frame_version.update(|version| *version = version.wrapping_add(1));
}
