use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::scene::{DrawCommand, Scene};
use crate::domain::{
    chart::Color,
    errors::{AppError, AppResult},
    logging::{LogComponent, get_logger},
};

const FONT_FAMILY: &str = "sans-serif";

fn js_error(context: &str, err: JsValue) -> AppError {
    AppError::Rendering(format!("{}: {:?}", context, err))
}

/// Canvas 2D backend executing a [`Scene`]
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> AppResult<Self> {
        let context = canvas
            .get_context("2d")
            .map_err(|e| js_error("getContext('2d') failed", e))?
            .ok_or_else(|| AppError::Rendering("2D context unavailable".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| AppError::Rendering("Failed to cast to 2D context".to_string()))?;
        Ok(Self { canvas, context })
    }

    /// Look the canvas up by element id
    pub fn from_element_id(canvas_id: &str) -> AppResult<Self> {
        let canvas = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(canvas_id))
            .ok_or_else(|| AppError::Rendering(format!("canvas '{}' not found", canvas_id)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| AppError::Rendering(format!("'{}' is not a canvas", canvas_id)))?;
        Self::new(canvas)
    }

    pub fn render(&self, scene: &Scene) -> AppResult<()> {
        if self.canvas.width() != scene.width {
            self.canvas.set_width(scene.width);
        }
        if self.canvas.height() != scene.height {
            self.canvas.set_height(scene.height);
        }

        let ctx = &self.context;
        ctx.clear_rect(0.0, 0.0, scene.width as f64, scene.height as f64);

        for command in &scene.commands {
            match command {
                DrawCommand::Background { color } => {
                    ctx.set_fill_style_str(&color.to_css());
                    ctx.fill_rect(0.0, 0.0, scene.width as f64, scene.height as f64);
                }
                DrawCommand::ClipBegin { x, y, width, height } => {
                    ctx.save();
                    ctx.begin_path();
                    ctx.rect(*x, *y, *width, *height);
                    ctx.clip();
                }
                DrawCommand::ClipEnd => ctx.restore(),
                DrawCommand::Polyline { points, color, width } => {
                    let Some(((x0, y0), rest)) = points.split_first() else {
                        continue;
                    };
                    ctx.set_stroke_style_str(&color.to_css());
                    ctx.set_line_width(*width);
                    ctx.set_line_join("round");
                    ctx.begin_path();
                    ctx.move_to(*x0, *y0);
                    for (x, y) in rest {
                        ctx.line_to(*x, *y);
                    }
                    ctx.stroke();
                }
                DrawCommand::Circle { x, y, radius, color } => {
                    ctx.set_fill_style_str(&color.to_css());
                    ctx.begin_path();
                    ctx.arc(*x, *y, *radius, 0.0, TAU).map_err(|e| js_error("arc failed", e))?;
                    ctx.fill();
                }
                DrawCommand::Rule { x, y_top, y_bottom, color } => {
                    self.stroke_segment((*x, *y_top), (*x, *y_bottom), color, 1.0);
                }
                DrawCommand::Segment { from, to, color, width } => {
                    self.stroke_segment(*from, *to, color, *width);
                }
                DrawCommand::Text { x, y, text, size, color, align, baseline, .. } => {
                    ctx.set_font(&format!("{}px {}", size, FONT_FAMILY));
                    ctx.set_text_align(align.as_ref());
                    ctx.set_text_baseline(baseline.as_ref());
                    ctx.set_fill_style_str(&color.to_css());
                    ctx.fill_text(text, *x, *y).map_err(|e| js_error("fillText failed", e))?;
                }
            }
        }

        get_logger().trace(
            LogComponent::Infrastructure("CanvasRenderer"),
            &format!("Rendered {} draw commands", scene.len()),
        );
        Ok(())
    }

    fn stroke_segment(&self, from: (f64, f64), to: (f64, f64), color: &Color, width: f64) {
        let ctx = &self.context;
        ctx.set_stroke_style_str(&color.to_css());
        ctx.set_line_width(width);
        ctx.begin_path();
        // Half-pixel offset keeps 1px lines crisp.
        ctx.move_to(from.0.round() + 0.5, from.1.round() + 0.5);
        ctx.line_to(to.0.round() + 0.5, to.1.round() + 0.5);
        ctx.stroke();
    }
}
